use super::*;
use crate::error::RunRejected;
use crate::session::Phase;

#[test]
fn second_run_rejected_while_awaiting_backend() {
    let mut session = session();
    let first = accept(&mut session);
    drain(&mut session);

    assert_eq!(session.begin_run("B", "D").unwrap_err(), RunRejected::Busy);
    assert_eq!(session.phase(), Phase::AwaitingBackend);
    assert_eq!(session.active_token(), Some(first.token));
    assert_eq!(
        drain(&mut session),
        vec![SessionEvent::Warning(
            "A route search is already in progress.".to_string()
        )]
    );
}

#[test]
fn second_run_rejected_while_narrating() {
    let mut session = session();
    let ticket = accept(&mut session);
    let narration = session
        .receive(&ticket, Ok(success(&["a"], &["A", "C"], 1.0)))
        .unwrap();
    assert_eq!(session.begin_run("B", "D").unwrap_err(), RunRejected::Busy);

    play(&mut session, &narration);
    assert_eq!(texts(&session)[1], "a");
    assert!(session.begin_run("B", "D").is_ok());
}

#[test]
fn randomize_invalidates_pending_cues() {
    let mut session = session();
    let ticket = accept(&mut session);
    let narration = session
        .receive(&ticket, Ok(success(&["a", "b"], &["A", "C"], 1.0)))
        .unwrap();

    let mut cues = narration.cues(Pacing::immediate());
    assert_eq!(session.apply(&cues.next().unwrap()), CueStatus::Applied);

    let mark = session.mark_randomize();
    assert!(session.reset_after_randomize(mark));
    assert_eq!(session.phase(), Phase::Idle);
    assert!(!session.is_busy());
    assert!(session.report().is_none());
    assert_eq!(
        texts(&session),
        vec!["PreSaNa data randomized. Previous state cleared.".to_string()]
    );
    assert_eq!(tags(&session), vec![LogTag::Placeholder]);

    let rest: Vec<CueStatus> = cues.map(|cue| session.apply(&cue)).collect();
    assert_eq!(rest, vec![CueStatus::Stale, CueStatus::Stale]);
    assert_eq!(texts(&session).len(), 1);
    assert!(session.report().is_none());
}

#[test]
fn stale_narration_cannot_interleave_with_new_run() {
    let mut session = session();
    let old = accept(&mut session);
    let old_narration = session
        .receive(&old, Ok(success(&["old-1", "old-2"], &["A", "C"], 1.0)))
        .unwrap();
    let mark = session.mark_randomize();
    assert!(session.reset_after_randomize(mark));

    let new = accept(&mut session);
    assert_ne!(new.token, old.token);
    let new_narration = session
        .receive(&new, Ok(success(&["new-1"], &["A", "B", "C"], 2.0)))
        .unwrap();

    // Interleave the two schedules as coalesced timers might.
    let old_cues: Vec<_> = old_narration.cues(Pacing::immediate()).collect();
    let new_cues: Vec<_> = new_narration.cues(Pacing::immediate()).collect();
    for (i, cue) in new_cues.iter().enumerate() {
        if let Some(stale) = old_cues.get(i) {
            assert_eq!(session.apply(stale), CueStatus::Stale);
        }
        assert_eq!(session.apply(cue), CueStatus::Applied);
    }

    assert_eq!(
        texts(&session),
        vec![
            "--- PreSaNa Session Started (Model: LINEAR) ---".to_string(),
            "new-1".to_string(),
            "SUCCESS: Route optimized.".to_string(),
        ]
    );
    assert_eq!(
        session.report().unwrap().path_label().unwrap(),
        "A \u{2794} B \u{2794} C"
    );
}

#[test]
fn late_response_for_invalidated_run_is_ignored() {
    let mut session = session();
    let ticket = accept(&mut session);
    let mark = session.mark_randomize();
    assert!(session.reset_after_randomize(mark));
    drain(&mut session);

    let narration = session.receive(&ticket, Ok(success(&["late"], &["A", "C"], 1.0)));
    assert!(narration.is_none());
    assert_eq!(session.phase(), Phase::Idle);
    assert!(drain(&mut session).is_empty());
}

#[test]
fn conclude_applies_only_once() {
    let mut session = session();
    let ticket = accept(&mut session);
    let narration = session
        .receive(&ticket, Ok(unreachable(&[])))
        .unwrap();
    play(&mut session, &narration);
    let replay = play(&mut session, &narration);
    assert_eq!(replay, vec![CueStatus::Stale]);
    assert_eq!(
        tags(&session),
        vec![LogTag::Header, LogTag::Error]
    );
}

#[test]
fn randomize_keeps_run_accepted_after_it() {
    let mut session = session();
    let mark = session.mark_randomize();
    let ticket = accept(&mut session);
    let narration = session
        .receive(&ticket, Ok(success(&["a"], &["A", "C"], 3.0)))
        .unwrap();

    assert!(!session.reset_after_randomize(mark));
    assert_eq!(session.active_token(), Some(ticket.token));
    assert!(session.is_busy());

    assert_eq!(
        play(&mut session, &narration),
        vec![CueStatus::Applied, CueStatus::Applied]
    );
    assert_eq!(tags(&session), vec![LogTag::Header, LogTag::Plain, LogTag::Success]);
    assert_eq!(session.report().unwrap().cost_label().unwrap(), "3");
}

#[test]
fn randomize_keeps_run_that_replaced_the_invalidated_one() {
    let mut session = session();
    let old = accept(&mut session);
    let mark = session.mark_randomize();
    let old_narration = session
        .receive(&old, Ok(unreachable(&[])))
        .unwrap();
    play(&mut session, &old_narration);

    let new = accept(&mut session);
    assert!(!session.reset_after_randomize(mark));
    assert_eq!(session.active_token(), Some(new.token));
    assert_eq!(texts(&session)[0], "--- PreSaNa Session Started (Model: LINEAR) ---");
    assert_eq!(texts(&session).len(), 1);
}
