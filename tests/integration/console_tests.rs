//! Integration tests: Console facade with a live listener thread.

use std::time::Duration;

use crossbeam_channel::Receiver;
use homecontrol::adapters::channel_sink::ChannelSink;
use homecontrol::adapters::simulated::SimulatedDevice;
use homecontrol::app::commands::{Actuator, ActuatorState, ConsoleCommand};
use homecontrol::app::events::ConsoleEvent;
use homecontrol::config::ConsoleConfig;
use homecontrol::console::Console;
use homecontrol::error::{CommandError, TransportError};
use homecontrol::listener::ListenerExit;

use crate::mock_link::{RecordingWriter, feed};

const WAIT: Duration = Duration::from_secs(5);

fn fast_config() -> ConsoleConfig {
    ConsoleConfig {
        read_timeout_ms: 10,
        ..Default::default()
    }
}

/// Next event matching `pred`, skipping others.
fn wait_for(
    rx: &Receiver<ConsoleEvent>,
    pred: impl Fn(&ConsoleEvent) -> bool,
) -> ConsoleEvent {
    loop {
        let event = rx.recv_timeout(WAIT).expect("event did not arrive");
        if pred(&event) {
            return event;
        }
    }
}

// ── Toggling ──────────────────────────────────────────────────

#[test]
fn toggling_twice_writes_two_opposite_commands() {
    let (_feeder, reader) = feed();
    let writer = RecordingWriter::new();
    let (sink, _events) = ChannelSink::new();
    let console = Console::start(&fast_config(), reader, writer.clone(), sink).unwrap();

    assert_eq!(console.request_toggle(Actuator::Lamp), Ok(ActuatorState::On));
    assert_eq!(console.request_toggle(Actuator::Lamp), Ok(ActuatorState::Off));
    assert_eq!(console.request_toggle(Actuator::Plug), Ok(ActuatorState::On));

    assert_eq!(writer.lines(), vec!["LAMP_ON", "LAMP_OFF", "PLUG_ON"]);
    let s = console.snapshot();
    assert_eq!(s.lamp, ActuatorState::Off);
    assert_eq!(s.plug, ActuatorState::On);
    assert_eq!(s.metrics.commands_sent, 3);

    assert_eq!(console.shutdown(), ListenerExit::Shutdown);
}

#[test]
fn failed_write_is_reported_but_not_reverted() {
    let (_feeder, reader) = feed();
    let writer = RecordingWriter::fail_after(0);
    let (sink, events) = ChannelSink::new();
    let console = Console::start(&fast_config(), reader, writer.clone(), sink).unwrap();

    let err = console.request_toggle(Actuator::Plug).unwrap_err();
    assert!(matches!(
        err,
        CommandError::Write {
            actuator: Actuator::Plug,
            ..
        }
    ));
    assert_eq!(console.snapshot().plug, ActuatorState::On);
    assert!(writer.lines().is_empty());

    assert_eq!(
        events.recv_timeout(WAIT).unwrap(),
        ConsoleEvent::ActuatorChanged {
            actuator: Actuator::Plug,
            state: ActuatorState::On
        }
    );
    assert!(matches!(
        events.recv_timeout(WAIT).unwrap(),
        ConsoleEvent::CommandFailed {
            actuator: Actuator::Plug,
            ..
        }
    ));
}

// ── Listener thread ───────────────────────────────────────────

#[test]
fn lines_from_the_link_reach_the_presentation_channel() {
    let (feeder, reader) = feed();
    let (sink, events) = ChannelSink::new();
    let console = Console::start(&fast_config(), reader, RecordingWriter::new(), sink).unwrap();

    feeder.send(Ok("TEMP:28.5".into())).unwrap();
    feeder.send(Ok("DOOR:OPEN".into())).unwrap();

    assert_eq!(
        wait_for(&events, |e| matches!(e, ConsoleEvent::Temperature { .. })),
        ConsoleEvent::Temperature {
            celsius: 28.5,
            warning_active: true
        }
    );
    let door = wait_for(&events, |e| matches!(e, ConsoleEvent::DoorStatus { .. }));
    assert!(matches!(door, ConsoleEvent::DoorStatus { status, .. } if status == "OPEN"));

    let s = console.snapshot();
    assert_eq!(s.door_log().len(), 1);
    assert!(s.temperature.warning_visible());

    assert_eq!(console.execute(ConsoleCommand::AcknowledgeWarning), Ok(()));
    assert_eq!(
        wait_for(&events, |e| matches!(e, ConsoleEvent::WarningAcknowledged)),
        ConsoleEvent::WarningAcknowledged
    );
    assert!(!console.snapshot().temperature.warning_visible());
    assert!(!console.acknowledge_warning(), "already acknowledged");

    feeder.send(Ok("TEMP:29".into())).unwrap();
    wait_for(&events, |e| matches!(e, ConsoleEvent::Temperature { .. }));
    assert!(console.snapshot().temperature.warning_visible(), "new reading re-arms");
    assert!(console.acknowledge_warning());
}

#[test]
fn link_loss_disables_actuators() {
    let (feeder, reader) = feed();
    let writer = RecordingWriter::new();
    let (sink, events) = ChannelSink::new();
    let console = Console::start(&fast_config(), reader, writer.clone(), sink).unwrap();

    feeder.send(Err(TransportError::Disconnected)).unwrap();
    wait_for(&events, |e| matches!(e, ConsoleEvent::ConnectivityLost(_)));

    assert!(!console.link_up());
    assert!(matches!(
        console.request_toggle(Actuator::Lamp),
        Err(CommandError::LinkDown(_))
    ));
    assert!(matches!(
        console.execute(ConsoleCommand::Toggle(Actuator::Plug)),
        Err(CommandError::LinkDown(_))
    ));
    assert!(writer.lines().is_empty());
    assert_eq!(console.snapshot().lamp, ActuatorState::Off);

    assert_eq!(
        console.shutdown(),
        ListenerExit::LinkLost(TransportError::Disconnected)
    );
}

#[test]
fn shutdown_returns_promptly_on_a_quiet_link() {
    let (_feeder, reader) = feed();
    let (sink, _events) = ChannelSink::new();
    let console = Console::start(&fast_config(), reader, RecordingWriter::new(), sink).unwrap();

    let started = std::time::Instant::now();
    assert_eq!(console.shutdown(), ListenerExit::Shutdown);
    assert!(started.elapsed() < WAIT);
}

// ── Simulated board ───────────────────────────────────────────

#[test]
fn simulated_board_drives_the_console() {
    let device = SimulatedDevice::new();
    let (sink, events) = ChannelSink::new();
    let console = Console::simulated(
        &fast_config(),
        &device,
        Duration::from_millis(5),
        sink,
    )
    .unwrap();

    let door = wait_for(&events, |e| matches!(e, ConsoleEvent::DoorStatus { .. }));
    assert!(matches!(door, ConsoleEvent::DoorStatus { status, .. } if status == "CLOSED"));
    assert_eq!(
        wait_for(&events, |e| matches!(e, ConsoleEvent::Temperature { .. })),
        ConsoleEvent::Temperature {
            celsius: 25.0,
            warning_active: false
        }
    );

    console.request_toggle(Actuator::Lamp).unwrap();
    assert_eq!(device.received(), vec!["LAMP_ON"]);

    device.disconnect();
    wait_for(&events, |e| matches!(e, ConsoleEvent::ConnectivityLost(_)));
    assert!(!console.link_up());
}
