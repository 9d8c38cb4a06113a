use std::net::TcpListener;
use std::time::Duration;

use rigscan_common::{Modulation, RigEndpoint};
use rigscan_core::{RigClient, RigControl, RigError};
use rigscan_protocols::{Func, ProtocolError, Vfo};

use crate::fake_rig::FakeRig;

fn client(rig: &FakeRig) -> RigClient {
    RigClient::new(rig.endpoint(1)).with_timeout(Duration::from_secs(1))
}

#[test]
fn scan_operations_round_trip() {
    let rig: FakeRig = FakeRig::start(100_000_000, "WFM").with_levels(&["-45.3"]);
    let client: RigClient = client(&rig);

    client.set_frequency(145_500_000).unwrap();
    client.set_mode(Modulation::Fm).unwrap();

    assert_eq!(client.get_frequency().unwrap(), 145_500_000);
    assert_eq!(client.get_mode().unwrap(), Modulation::Fm);
    assert_eq!(client.get_level().unwrap(), -453);
    assert_eq!(client.get_level().unwrap(), -800);

    client.start_recording().unwrap();
    assert!(rig.is_recording());
    client.stop_recording().unwrap();
    assert!(!rig.is_recording());

    assert_eq!(
        rig.requests(),
        vec!["F 145500000", "M FM", "f", "m", "l", "l", "AOS", "LOS"]
    );
}

#[test]
fn rejected_setter_is_a_protocol_error() {
    let rig: FakeRig = FakeRig::start(100_000_000, "FM");
    let client: RigClient = client(&rig);

    let result = client.set_vfo(Vfo::VfoB);

    assert!(matches!(
        result,
        Err(RigError::Protocol(ProtocolError::Rejected { code: 1, .. }))
    ));
    assert_eq!(rig.requests(), vec!["V VFOB"]);
}

#[test]
fn auxiliary_query_decodes_reply() {
    let rig: FakeRig = FakeRig::start(100_000_000, "FM");
    let client: RigClient = client(&rig);

    assert!(!client.get_func(Func::Nb).unwrap());
    assert_eq!(rig.requests(), vec!["u NB"]);
}

#[test]
fn closed_port_is_a_connection_error() {
    let port: u16 = {
        let listener: TcpListener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let endpoint: RigEndpoint = RigEndpoint::new("127.0.0.1", port, 1).unwrap();
    let client: RigClient = RigClient::new(endpoint).with_timeout(Duration::from_millis(500));

    assert!(matches!(
        client.get_frequency(),
        Err(RigError::Connection { .. })
    ));
}
