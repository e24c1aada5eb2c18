//! Activation timelines on the virtual clock.

use std::fmt::Write as _;

use insta::assert_snapshot;
use unveil_engine::{InputEvent, Phase, RevealSettings, TickKind, TickOutcome};

use crate::common::{Harness, MS, seeded_settings};

/// One line per resolve tick: index, virtual time, activation row, active set, outcome.
fn resolve_timeline(harness: &mut Harness, max_ticks: usize) -> String {
    let mut out = String::new();
    for index in 0..max_ticks {
        let Some(outcome) = harness.next_resolve() else {
            break;
        };
        let _ = writeln!(
            out,
            "{index} {}ms {} active={:?} {outcome:?}",
            harness.elapsed_ms(),
            harness.activation_row(),
            harness.scheduler.session().active_indices(),
        );
        if outcome != TickOutcome::Continue {
            break;
        }
    }
    out
}

#[test]
fn staggered_activation_with_period_two() {
    let settings = RevealSettings {
        min_width: 3,
        stagger_period: 2,
        ..seeded_settings(11)
    };
    let mut harness = Harness::launch(&["Ann", "Bo", "Cy"], settings);

    assert_snapshot!(resolve_timeline(&mut harness, 20), @r"
    0 2000ms #.. active=[0] Continue
    1 2500ms #.. active=[0] Continue
    2 3000ms ##. active=[0, 1] Continue
    3 3500ms ##. active=[1] Continue
    4 4000ms ### active=[1, 2] Continue
    5 4500ms ### active=[2] Continue
    6 5000ms ### active=[2] Continue
    7 5500ms ### active=[] Finished
    ");
    assert_eq!(harness.phase(), Phase::AwaitingAck);
    assert!(harness.timers.is_idle());
}

#[test]
fn default_cadence_reveals_five_names() {
    let names = ["Edd Barrett", "Matt Mole", "Han Greer", "Ivy Lane", "Oz Quinn"];
    let mut harness = Harness::launch(&names, seeded_settings(5));

    assert_eq!(harness.run_to_finish(100), Some(TickOutcome::Finished));
    // The last token is activated at tick 16 and needs one tick per character.
    assert_eq!(harness.scheduler.tick(), 37);
    assert_eq!(harness.elapsed_ms(), 2000 + 36 * 500);
    assert_eq!(harness.activation_row(), "#####");
}

#[test]
fn slow_tokens_overlap_the_next_activation() {
    let settings = RevealSettings {
        min_width: 6,
        stagger_period: 2,
        ..seeded_settings(2)
    };
    let mut harness = Harness::launch(&["A", "B", "C"], settings);

    // Tick 2: token 0 still has characters left when token 1 joins.
    for _ in 0..3 {
        harness.next_resolve();
    }
    assert_eq!(harness.scheduler.session().active_indices(), &[0, 1]);
    assert_eq!(harness.activation_row(), "##.");
}

#[test]
fn early_start_replaces_the_initial_delay() {
    let settings = RevealSettings {
        min_width: 3,
        ..seeded_settings(1)
    };
    let mut harness = Harness::launch(&["Ann", "Bo"], settings);

    assert_eq!(harness.input_at(500, InputEvent::Acknowledge), TickOutcome::Continue);
    assert_eq!(harness.phase(), Phase::Resolving);
    assert_eq!(harness.activation_row(), "#.");
    assert_eq!(
        harness.timers.deadline(TickKind::Resolve),
        Some(harness.start + 1000 * MS)
    );
    // Jumbling keeps its own cadence through the early start.
    assert_eq!(
        harness.timers.deadline(TickKind::Jumble),
        Some(harness.start + 600 * MS)
    );
}

#[test]
fn empty_session_finishes_on_first_resolve_tick() {
    let mut harness = Harness::launch(&[], seeded_settings(0));

    assert_eq!(harness.next_resolve(), Some(TickOutcome::Finished));
    assert_eq!(harness.elapsed_ms(), 2000);
    assert_eq!(harness.phase(), Phase::AwaitingAck);
    assert!(harness.timers.is_idle());
    assert_eq!(harness.fire_next(), None);
}
