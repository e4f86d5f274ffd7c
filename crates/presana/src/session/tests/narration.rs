use std::time::Duration;

use super::*;
use crate::session::CueAction;

#[test]
fn observed_offsets() {
    let mut session = session();
    let ticket = accept(&mut session);
    let narration = session
        .receive(&ticket, Ok(success(&["a", "b", "c"], &["A", "C"], 1.0)))
        .unwrap();

    let offsets: Vec<u64> = narration
        .cues(Pacing::observed())
        .map(|cue| cue.at.as_millis() as u64)
        .collect();
    assert_eq!(offsets, vec![800, 950, 1100, 1750]);
    assert_eq!(
        narration.duration(Pacing::observed()),
        Duration::from_millis(1750)
    );
}

#[test]
fn cues_follow_transcript_order_and_end_with_conclude() {
    let mut session = session();
    let ticket = accept(&mut session);
    let narration = session
        .receive(&ticket, Ok(unreachable(&["one", "two"])))
        .unwrap();

    let actions: Vec<CueAction<'_>> = narration
        .cues(Pacing::observed())
        .map(|cue| cue.action)
        .collect();
    assert_eq!(
        actions,
        vec![
            CueAction::Line("one"),
            CueAction::Line("two"),
            CueAction::Conclude
        ]
    );
    assert!(
        narration
            .cues(Pacing::observed())
            .all(|cue| cue.token == ticket.token)
    );
}

#[test]
fn cues_restart_from_the_beginning() {
    let mut session = session();
    let ticket = accept(&mut session);
    let narration = session
        .receive(&ticket, Ok(unreachable(&["one", "two"])))
        .unwrap();
    assert_eq!(narration.cues(Pacing::immediate()).count(), 3);
    assert_eq!(narration.cues(Pacing::immediate()).count(), 3);
}

#[test]
fn backend_failure_has_only_conclude_cue() {
    let mut session = session();
    let ticket = accept(&mut session);
    let narration = session.receive(&ticket, Ok(failure("nope"))).unwrap();
    let cues: Vec<_> = narration.cues(Pacing::observed()).collect();
    assert_eq!(cues.len(), 1);
    assert_eq!(cues[0].action, CueAction::Conclude);
    assert_eq!(cues[0].at, Duration::from_millis(1300));
}

#[test]
fn immediate_pacing_is_zero() {
    let pacing = Pacing::immediate();
    assert!(pacing.is_immediate());
    assert_eq!(pacing.conclude_at(10), Duration::ZERO);
    assert!(!Pacing::observed().is_immediate());
}
