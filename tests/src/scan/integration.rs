use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;

use rigscan_common::{Bookmark, RigEndpoint};
use rigscan_core::{
    InterThreadMessenger, RigClient, ScanConfig, ScanEngine, ScanTask, ScanTimings, StopReason,
    TracingActivityLog, Worker,
};

use crate::fake_rig::FakeRig;

fn instant() -> ScanTimings {
    ScanTimings {
        tune_settle: Duration::ZERO,
        sample_spacing: Duration::ZERO,
    }
}

fn engine(
    endpoint: RigEndpoint,
    messenger: &Arc<InterThreadMessenger>,
) -> ScanEngine<RigClient, TracingActivityLog> {
    let client: RigClient = RigClient::new(endpoint).with_timeout(Duration::from_secs(1));
    ScanEngine::new(client, TracingActivityLog::default(), messenger.clone()).with_timings(instant())
}

/// Runs `job` on a worker and polls for the stop signal the way the CLI does.
async fn run_on_worker(
    job: impl FnOnce(rigscan_core::StopFlag) -> StopReason + Send + 'static,
    messenger: &InterThreadMessenger,
    stop_after: Option<Duration>,
) -> StopReason {
    let mut worker: Worker<StopReason> = Worker::new("scan-test");
    assert!(worker.start(job).unwrap());

    let mut ticker: tokio::time::Interval = tokio::time::interval(Duration::from_millis(5));
    let started: tokio::time::Instant = tokio::time::Instant::now();
    loop {
        ticker.tick().await;
        if messenger.check_stopped() {
            break;
        }
        if stop_after.is_some_and(|limit| started.elapsed() >= limit) {
            worker.stop();
        }
    }
    worker.join().unwrap()
}

#[tokio::test]
async fn bookmark_scan_logs_and_records_each_active_bookmark() {
    let rig: FakeRig = FakeRig::start(100_000_000, "FM").with_default_level("-10.0");
    let messenger: Arc<InterThreadMessenger> = Arc::new(InterThreadMessenger::new());
    let task: ScanTask = ScanTask::new(ScanConfig {
        scan_mode: "bookmarks".to_string(),
        delay: 0,
        record: true,
        log: true,
        bookmarks: vec![
            Bookmark::from_raw("145,500,000", "FM", "calling", "").unwrap(),
            Bookmark::from_raw("145600000", "FM", "locked", "L").unwrap(),
            Bookmark::from_raw("446006250", "FM", "pmr", "O").unwrap(),
        ],
        ..ScanConfig::default()
    })
    .unwrap();

    let mut engine = engine(rig.endpoint(1), &messenger);
    let reason: StopReason = run_on_worker(
        move |flag| {
            let reason: StopReason = engine.scan(&task, &flag);
            assert_eq!(engine.activity().written(), 2);
            reason
        },
        &messenger,
        None,
    )
    .await;

    assert!(matches!(reason, StopReason::PassesExhausted));
    assert_eq!(rig.tuned(), vec![145_500_000, 446_006_250]);
    assert_eq!(rig.count("AOS"), 2);
    assert_eq!(rig.count("LOS"), 2);
    assert_eq!(rig.count("M FM"), 1);
    assert!(!rig.is_recording());
}

#[tokio::test]
async fn sweep_bookmarks_the_local_peak() {
    let rig: FakeRig = FakeRig::start(100_000_000, "FM")
        .with_levels(&["-40.0", "-40.0", "-20.0", "-20.0", "-30.0", "-30.0"]);
    let messenger: Arc<InterThreadMessenger> = Arc::new(InterThreadMessenger::new());
    let task: ScanTask = ScanTask::new(ScanConfig {
        range_min: 1_000,
        range_max: 3_000,
        interval: 1_000,
        delay: 0,
        sgn_level: -50,
        auto_bookmark: true,
        ..ScanConfig::default()
    })
    .unwrap();
    let discovered = task.new_bookmarks().clone();

    let mut engine = engine(rig.endpoint(1), &messenger);
    let reason: StopReason =
        run_on_worker(move |flag| engine.scan(&task, &flag), &messenger, None).await;

    assert!(matches!(reason, StopReason::PassesExhausted));
    assert_eq!(rig.tuned(), vec![1_000, 2_000, 3_000]);
    let found: Vec<Bookmark> = discovered.drain();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].channel().frequency(), 2_000);
}

#[tokio::test]
async fn unbounded_sweep_stops_on_request() {
    let rig: FakeRig = FakeRig::start(100_000_000, "FM");
    let messenger: Arc<InterThreadMessenger> = Arc::new(InterThreadMessenger::new());
    let task: ScanTask = ScanTask::new(ScanConfig {
        range_min: 144_000_000,
        range_max: 146_000_000,
        interval: 12_500,
        passes: i64::from(u32::MAX),
        ..ScanConfig::default()
    })
    .unwrap();

    let mut engine = engine(rig.endpoint(1), &messenger);
    let reason: StopReason = run_on_worker(
        move |flag| engine.scan(&task, &flag),
        &messenger,
        Some(Duration::from_millis(50)),
    )
    .await;

    assert!(matches!(reason, StopReason::Requested));
    assert!(!rig.tuned().is_empty());
}

#[tokio::test]
async fn live_update_changes_the_sweep() {
    let rig: FakeRig = FakeRig::start(100_000_000, "FM");
    let messenger: Arc<InterThreadMessenger> = Arc::new(InterThreadMessenger::new());
    let task: ScanTask = ScanTask::new(ScanConfig {
        range_min: 1_000,
        range_max: 100_000,
        interval: 1_000,
        ..ScanConfig::default()
    })
    .unwrap();
    messenger.send_update("range_min", 50).unwrap();
    messenger.send_update("interval", 25_000).unwrap();

    let mut engine = engine(rig.endpoint(1), &messenger);
    let reason: StopReason =
        run_on_worker(move |flag| engine.scan(&task, &flag), &messenger, None).await;

    assert!(matches!(reason, StopReason::PassesExhausted));
    assert_eq!(rig.tuned(), vec![50_000, 75_000, 100_000]);
}

#[tokio::test]
async fn unreachable_rig_aborts_the_scan() {
    let port: u16 = {
        let listener: TcpListener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let endpoint: RigEndpoint = RigEndpoint::new("127.0.0.1", port, 1).unwrap();
    let messenger: Arc<InterThreadMessenger> = Arc::new(InterThreadMessenger::new());
    let task: ScanTask = ScanTask::new(ScanConfig::default()).unwrap();

    let mut engine = engine(endpoint, &messenger);
    let reason: StopReason =
        run_on_worker(move |flag| engine.scan(&task, &flag), &messenger, None).await;

    assert!(matches!(reason, StopReason::CommunicationError(_)));
}
