//! Integration tests: link → Listener → ConsoleService → EventSink.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use homecontrol::app::events::ConsoleEvent;
use homecontrol::app::service::ConsoleService;
use homecontrol::config::ConsoleConfig;
use homecontrol::error::TransportError;
use homecontrol::listener::{Listener, ListenerExit, ListenerState};

use crate::mock_link::{RecordingSink, ScriptedReader};

fn shared_service() -> Arc<Mutex<ConsoleService>> {
    Arc::new(Mutex::new(ConsoleService::new(&ConsoleConfig::default())))
}

// ── End-to-end sequence ───────────────────────────────────────

#[test]
fn temp_door_garbage_temp_sequence() {
    let svc = shared_service();
    let sink = RecordingSink::new();
    let reader = ScriptedReader::lines(&["TEMP:30.0", "DOOR:OPEN", "GARBAGE", "TEMP:20.0"]);
    let mut listener = Listener::new(reader, Arc::clone(&svc), sink.clone(), Duration::ZERO);

    // Line 1: warning on.
    assert_eq!(listener.poll_once(), None);
    {
        let s = svc.lock().unwrap();
        assert!(s.state().temperature.warning_active());
        assert!(s.state().door_log().is_empty());
    }

    // Line 2: one log entry.
    assert_eq!(listener.poll_once(), None);
    {
        let s = svc.lock().unwrap();
        assert_eq!(s.state().door_log().len(), 1);
        assert_eq!(s.state().door_status(), Some("OPEN"));
    }

    // Line 3: nothing changes except the discard counter.
    let before = svc.lock().unwrap().snapshot();
    assert_eq!(listener.poll_once(), None);
    {
        let s = svc.lock().unwrap();
        assert_eq!(s.state().temperature, before.temperature);
        assert_eq!(s.state().door_log(), before.door_log());
        assert_eq!(
            s.state().metrics.lines_discarded,
            before.metrics.lines_discarded + 1
        );
    }

    // Line 4: warning off.
    assert_eq!(listener.poll_once(), None);
    assert!(!svc.lock().unwrap().state().temperature.warning_active());

    let events = sink.events();
    assert_eq!(events.len(), 3, "malformed lines emit nothing: {events:?}");
    assert!(matches!(
        events[0],
        ConsoleEvent::Temperature {
            warning_active: true,
            ..
        }
    ));
    assert!(matches!(&events[1], ConsoleEvent::DoorStatus { status, .. } if status == "OPEN"));
    assert!(matches!(
        events[2],
        ConsoleEvent::Temperature {
            warning_active: false,
            ..
        }
    ));
}

#[test]
fn door_log_keeps_arrival_order() {
    let svc = shared_service();
    let reader = ScriptedReader::lines(&[
        "DOOR:OPEN",
        "TEMP:21",
        "DOOR:CLOSED",
        "NOISE",
        "DOOR:",
        "DOOR:LOCKED",
    ]);
    let listener = Listener::new(reader, Arc::clone(&svc), RecordingSink::new(), Duration::ZERO);

    // The script ends with a disconnect.
    assert!(matches!(listener.run(), ListenerExit::LinkLost(_)));

    let s = svc.lock().unwrap();
    let statuses: Vec<&str> = s
        .state()
        .door_log()
        .iter()
        .map(|e| e.status.as_str())
        .collect();
    assert_eq!(statuses, vec!["OPEN", "CLOSED", "", "LOCKED"]);
    assert!(
        s.state()
            .door_log()
            .windows(2)
            .all(|w| w[0].timestamp <= w[1].timestamp)
    );
    assert_eq!(s.state().metrics.lines_received, 6);
    assert_eq!(s.state().metrics.lines_discarded, 1);
}

// ── Timeouts and link loss ────────────────────────────────────

#[test]
fn timeouts_are_not_errors() {
    let svc = shared_service();
    let sink = RecordingSink::new();
    let reader = ScriptedReader::lines(&[])
        .then(Err(TransportError::Timeout))
        .then(Err(TransportError::Timeout))
        .then(Ok("TEMP:22.5".into()));
    let mut listener = Listener::new(reader, Arc::clone(&svc), sink.clone(), Duration::ZERO);

    for _ in 0..3 {
        assert_eq!(listener.poll_once(), None);
    }
    assert_eq!(listener.state(), ListenerState::Reading);
    assert_eq!(
        svc.lock().unwrap().state().temperature.last_reading(),
        Some(22.5)
    );
    assert!(svc.lock().unwrap().state().link_up());
}

#[test]
fn disconnect_stops_listener_and_surfaces_one_error() {
    let svc = shared_service();
    let sink = RecordingSink::new();
    let reader = ScriptedReader::lines(&["DOOR:OPEN"]).then(Err(TransportError::Disconnected));
    let listener = Listener::new(reader, Arc::clone(&svc), sink.clone(), Duration::ZERO);

    assert_eq!(
        listener.run(),
        ListenerExit::LinkLost(TransportError::Disconnected)
    );

    let lost: Vec<_> = sink
        .events()
        .into_iter()
        .filter(|e| matches!(e, ConsoleEvent::ConnectivityLost(_)))
        .collect();
    assert_eq!(lost, vec![ConsoleEvent::ConnectivityLost("device disconnected".into())]);
    assert!(!svc.lock().unwrap().state().link_up());
    assert_eq!(svc.lock().unwrap().state().door_log().len(), 1);
}

#[test]
fn overlong_line_is_counted_and_reading_continues() {
    let svc = shared_service();
    let sink = RecordingSink::new();
    let reader = ScriptedReader::lines(&[])
        .then(Err(TransportError::LineTooLong { limit: 256 }))
        .then(Ok("DOOR:OPEN".into()));
    let mut listener = Listener::new(reader, Arc::clone(&svc), sink.clone(), Duration::ZERO);

    assert_eq!(listener.poll_once(), None);
    assert_eq!(listener.poll_once(), None);
    assert_eq!(listener.state(), ListenerState::Reading);

    let s = svc.lock().unwrap();
    assert!(s.state().link_up());
    assert_eq!(s.state().door_log().len(), 1);
    let m = s.state().metrics;
    assert_eq!(m.lines_received, 2);
    assert_eq!(m.lines_discarded, 1);
    assert_eq!(m.lines_overlong, 1);
    assert_eq!(sink.events().len(), 1, "only the door event is emitted");
}
