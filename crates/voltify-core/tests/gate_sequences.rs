//! Integration tests for the event gate through the public API.
//!
//! These tests drive sequences of power events through a single gate and
//! check the emitted command stream, the way the agent's event loop does.

use voltify_core::{
    EventGate, GateConfig, IgnoreReason, Outcome, OverlayCommand, OverlayRequestParams,
    PowerEvent,
};

/// Runs `events` through `gate` with a fixed flag and collects the commands.
fn command_stream(gate: &EventGate, events: &[PowerEvent], active: bool) -> Vec<OverlayCommand> {
    events
        .iter()
        .filter_map(|event| gate.handle(*event, active).0)
        .collect()
}

#[test]
fn test_connect_disconnect_connect_yields_start_stop_start() {
    // Arrange
    let gate = EventGate::new(GateConfig::default());
    let events = [
        PowerEvent::Connected,
        PowerEvent::Disconnected,
        PowerEvent::Connected,
    ];

    // Act
    let commands = command_stream(&gate, &events, true);

    // Assert
    let start = OverlayCommand::Start(OverlayRequestParams::charging_alarm(true));
    assert_eq!(commands, vec![start.clone(), OverlayCommand::Stop, start]);
}

#[test]
fn test_inactive_flag_suppresses_a_whole_sequence() {
    let gate = EventGate::new(GateConfig::default());
    let events = [
        PowerEvent::Connected,
        PowerEvent::Disconnected,
        PowerEvent::Connected,
        PowerEvent::Disconnected,
    ];

    assert!(command_stream(&gate, &events, false).is_empty());
}

#[test]
fn test_repeated_disconnects_each_yield_stop() {
    // Stop is produced regardless of whether the overlay is believed running;
    // the host treats redundant stops as no-ops.
    let gate = EventGate::new(GateConfig::default());
    let events = [PowerEvent::Disconnected, PowerEvent::Disconnected];

    assert_eq!(
        command_stream(&gate, &events, true),
        vec![OverlayCommand::Stop, OverlayCommand::Stop]
    );
}

#[test]
fn test_flag_flipping_mid_sequence_is_honoured_per_event() {
    // Arrange
    let gate = EventGate::new(GateConfig::default());
    let steps = [
        (PowerEvent::Connected, true),
        (PowerEvent::Disconnected, false),
        (PowerEvent::Connected, false),
        (PowerEvent::Disconnected, true),
    ];

    // Act
    let outcomes: Vec<Outcome> = steps
        .iter()
        .map(|(event, active)| gate.handle(*event, *active).1)
        .collect();

    // Assert
    assert_eq!(
        outcomes,
        vec![
            Outcome::Dispatched,
            Outcome::Ignored(IgnoreReason::AppInactive),
            Outcome::Ignored(IgnoreReason::AppInactive),
            Outcome::Dispatched,
        ]
    );
}

#[test]
fn test_gate_can_be_shared_across_threads() {
    let gate = EventGate::new(GateConfig {
        gate_on_active_flag: true,
        enable_drag: false,
    });

    let handles: Vec<_> = (0..4)
        .map(|i| {
            std::thread::spawn(move || {
                let event = if i % 2 == 0 {
                    PowerEvent::Connected
                } else {
                    PowerEvent::Disconnected
                };
                gate.handle(event, true).0
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let command = handle.join().expect("thread must not panic");
        if i % 2 == 0 {
            assert_eq!(
                command,
                Some(OverlayCommand::Start(OverlayRequestParams::charging_alarm(false)))
            );
        } else {
            assert_eq!(command, Some(OverlayCommand::Stop));
        }
    }
}
