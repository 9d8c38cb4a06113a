use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use rigscan_core::{InterThreadMessenger, RigClient, RigError, SyncEngine, SyncTask, Worker};

use crate::fake_rig::FakeRig;

fn wait_for(condition: impl Fn() -> bool) -> bool {
    let deadline: Instant = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(5));
    }
    false
}

#[test]
fn destination_follows_source_until_stopped() {
    let source: FakeRig = FakeRig::start(433_920_000, "AM");
    let dest: FakeRig = FakeRig::start(100_000_000, "WFM");
    let messenger: Arc<InterThreadMessenger> = Arc::new(InterThreadMessenger::new());

    let mut task = SyncTask::new(
        messenger.clone(),
        RigClient::new(source.endpoint(1)),
        RigClient::new(dest.endpoint(2)),
    );
    let engine: SyncEngine = SyncEngine::new().with_interval(Duration::from_millis(5));

    let mut worker: Worker<Result<(), RigError>> = Worker::new("sync-test");
    assert!(worker.start(move |flag| engine.sync(&mut task, &flag)).unwrap());
    assert!(!worker.start(|_| Ok(())).unwrap());

    assert!(wait_for(|| dest.frequency() == 433_920_000 && dest.mode() == "AM"));

    worker.stop();
    assert!(wait_for(|| messenger.check_stopped()));
    assert!(worker.join().unwrap().is_ok());
}

#[test]
fn dead_destination_ends_the_sync() {
    let source: FakeRig = FakeRig::start(433_920_000, "AM");
    let dest: FakeRig = FakeRig::start(100_000_000, "FM");
    let dest_endpoint = dest.endpoint(2);
    drop(dest);

    let messenger: Arc<InterThreadMessenger> = Arc::new(InterThreadMessenger::new());
    let mut task = SyncTask::new(
        messenger.clone(),
        RigClient::new(source.endpoint(1)),
        RigClient::new(dest_endpoint).with_timeout(Duration::from_millis(500)),
    );

    let result: Result<(), RigError> = SyncEngine::new().sync(&mut task, &rigscan_core::StopFlag::new());

    assert!(matches!(result, Err(RigError::Connection { .. })));
    assert!(task.error.is_some());
    assert!(messenger.check_stopped());
}
