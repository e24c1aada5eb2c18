//! End-to-end reveal flows: launch, finish, acknowledge, cancel.

use unveil_engine::{InputEvent, Phase, RevealSettings, TickKind, TickOutcome};

use crate::common::{Harness, seeded_settings};

#[test]
fn finished_frame_waits_for_acknowledgement() {
    let names = ["Ann", "Bo", "Cy"];
    let mut harness = Harness::launch(&names, seeded_settings(9));

    assert_eq!(harness.run_to_finish(200), Some(TickOutcome::Finished));
    assert_eq!(harness.phase(), Phase::AwaitingAck);

    let frame: Vec<&str> = harness.scheduler.frame().iter().map(|m| m.trim()).collect();
    assert_eq!(frame, names);

    // Nothing is armed: the finished frame stays up until input arrives.
    assert_eq!(harness.fire_next(), None);
    let elapsed = harness.elapsed_ms();
    assert_eq!(
        harness.input_at(600_000, InputEvent::Other),
        TickOutcome::Continue
    );
    assert_eq!(harness.phase(), Phase::AwaitingAck);
    assert!(elapsed < 600_000);

    assert_eq!(
        harness.input_at(600_001, InputEvent::Acknowledge),
        TickOutcome::Terminate
    );
    assert_eq!(harness.phase(), Phase::Dismissed);
}

#[test]
fn every_frame_keeps_the_shared_width() {
    let settings = RevealSettings {
        min_width: 4,
        ..seeded_settings(4)
    };
    let mut harness = Harness::launch(&["Maximilian", "Al"], settings);
    let width = harness.scheduler.session().width();
    assert_eq!(width, 10);

    while let Some((_, outcome)) = harness.fire_next() {
        for mask in harness.scheduler.frame() {
            assert_eq!(mask.chars().count(), width);
        }
        if outcome != TickOutcome::Continue {
            break;
        }
    }
    assert_eq!(harness.phase(), Phase::AwaitingAck);
}

#[test]
fn same_seed_same_frames() {
    let names = ["Ann", "Bo", "Cy"];
    let mut a = Harness::launch(&names, seeded_settings(42));
    let mut b = Harness::launch(&names, seeded_settings(42));
    assert_eq!(a.scheduler.frame(), b.scheduler.frame());

    for _ in 0..30 {
        let fired_a = a.fire_next();
        let fired_b = b.fire_next();
        assert_eq!(fired_a, fired_b);
        assert_eq!(a.scheduler.frame(), b.scheduler.frame());
    }
}

#[test]
fn cancel_while_jumbling_stops_everything() {
    let mut harness = Harness::launch(&["Ann"], seeded_settings(3));

    assert_eq!(harness.input_at(250, InputEvent::Cancel), TickOutcome::Terminate);
    assert_eq!(harness.phase(), Phase::Cancelled);
    assert!(harness.timers.is_idle());
    assert!(!harness.scheduler.session().is_started());
}

#[test]
fn cancel_mid_resolution_leaves_names_hidden() {
    let mut harness = Harness::launch(&["Ann", "Bo"], seeded_settings(3));
    harness.next_resolve();
    harness.next_resolve();

    assert_eq!(harness.input_at(3000, InputEvent::Cancel), TickOutcome::Terminate);
    assert_eq!(harness.phase(), Phase::Cancelled);
    assert!(!harness.scheduler.session().is_finished());

    // Late timer callbacks after a cancel only confirm termination.
    assert_eq!(
        harness.scheduler.on_tick(TickKind::Resolve, &mut harness.timers),
        TickOutcome::Terminate
    );
}

#[test]
fn resize_redraws_without_touching_timers() {
    let mut harness = Harness::launch(&["Ann"], seeded_settings(8));
    harness.scheduler.take_redraw();
    let resolve = harness.timers.deadline(TickKind::Resolve);

    assert_eq!(harness.input_at(50, InputEvent::Resize), TickOutcome::Continue);
    assert!(harness.scheduler.take_redraw());
    assert_eq!(harness.timers.deadline(TickKind::Resolve), resolve);
    assert_eq!(harness.phase(), Phase::Jumbling);
}
