//! Settle window, noise handling, and request classification.
use super::*;
use crate::protocol::transport::mock::{MockPort, MockProvider};
use crate::protocol::transport::{HOTT_BAUD_RATE, REQUEST_SETTLE_TIME_US, TEXT_MODE_REQUEST_ID};

fn setup() -> (PortArbiter<MockPort>, MockPort, RequestDetector) {
    let mut provider = MockProvider::empty();
    let mut arbiter = PortArbiter::new(HOTT_BAUD_RATE);
    arbiter.acquire(&mut provider).unwrap();
    let port = provider.opened.clone().unwrap();
    let detector = RequestDetector::new(Duration::from_micros(REQUEST_SETTLE_TIME_US));
    (arbiter, port, detector)
}

fn at(micros: u64) -> Instant {
    Instant::from_micros(micros)
}

#[test]
/// Two bytes are only read once they have settled for 4 ms.
fn test_request_after_settle_time() {
    let (mut arbiter, port, mut detector) = setup();
    port.inject(&[0x80, 0x8A]);

    assert_eq!(detector.poll(&mut arbiter, at(10_000)).unwrap(), DetectorEvent::Armed);
    assert!(detector.is_armed());
    assert_eq!(detector.poll(&mut arbiter, at(13_999)).unwrap(), DetectorEvent::Settling);
    // Nothing consumed while settling.
    assert_eq!(port.state.borrow().reads, 0);

    let event = detector.poll(&mut arbiter, at(14_000)).unwrap();
    assert_eq!(
        event,
        DetectorEvent::Request(Request {
            id: 0x80,
            address: 0x8A
        })
    );
    assert!(!detector.is_armed());
    assert_eq!(arbiter.bytes_waiting(), 0);
}

#[test]
/// Zero or one waiting byte leaves everything untouched.
fn test_not_enough_data() {
    let (mut arbiter, port, mut detector) = setup();
    assert_eq!(detector.poll(&mut arbiter, at(0)).unwrap(), DetectorEvent::Waiting);

    port.inject(&[0x80]);
    assert_eq!(detector.poll(&mut arbiter, at(1_000)).unwrap(), DetectorEvent::Waiting);
    assert_eq!(arbiter.bytes_waiting(), 1);
    assert!(!detector.is_armed());
}

#[test]
/// More than two bytes is noise: flush and disarm.
fn test_noise_flushes_and_disarms() {
    let (mut arbiter, port, mut detector) = setup();
    port.inject(&[0x80, 0x8E]);
    assert_eq!(detector.poll(&mut arbiter, at(0)).unwrap(), DetectorEvent::Armed);

    port.inject(&[0x55]);
    assert_eq!(
        detector.poll(&mut arbiter, at(5_000)).unwrap(),
        DetectorEvent::NoiseDiscarded(3)
    );
    assert!(!detector.is_armed());
    assert_eq!(arbiter.bytes_waiting(), 0);
}

#[test]
/// After a noise reset the next clean request needs a fresh settle window.
fn test_rearm_after_noise() {
    let (mut arbiter, port, mut detector) = setup();
    port.inject(&[1, 2, 3, 4]);
    assert!(matches!(
        detector.poll(&mut arbiter, at(0)).unwrap(),
        DetectorEvent::NoiseDiscarded(4)
    ));

    port.inject(&[0x80, 0x8E]);
    assert_eq!(detector.poll(&mut arbiter, at(100)).unwrap(), DetectorEvent::Armed);
    assert_eq!(detector.poll(&mut arbiter, at(2_000)).unwrap(), DetectorEvent::Settling);
    assert!(matches!(
        detector.poll(&mut arbiter, at(4_100)).unwrap(),
        DetectorEvent::Request(_)
    ));
}

#[test]
/// Binary-mode addresses map to frame kinds, everything else is unrecognized.
fn test_request_classification() {
    let gps = Request { id: 0x80, address: 0x8A };
    let eam = Request { id: 0x80, address: 0x8E };
    let other = Request { id: 0x80, address: 0x8D };
    let text = Request {
        id: TEXT_MODE_REQUEST_ID,
        address: 0x8A,
    };

    assert_eq!(RequestKind::from_request(&gps), RequestKind::Gps);
    assert_eq!(RequestKind::from_request(&eam), RequestKind::Eam);
    assert_eq!(RequestKind::from_request(&other), RequestKind::Unrecognized);
    assert_eq!(RequestKind::from_request(&text), RequestKind::Unrecognized);

    assert_eq!(RequestKind::Gps.frame_kind(), Some(FrameKind::Gps));
    assert_eq!(RequestKind::Eam.frame_kind(), Some(FrameKind::Eam));
    assert_eq!(RequestKind::Unrecognized.frame_kind(), None);
}
