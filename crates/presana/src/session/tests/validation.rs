use super::*;
use crate::error::RunRejected;
use crate::session::Phase;

#[test]
fn same_endpoints_rejected_without_leaving_idle() {
    let mut session = session();
    let err = session.begin_run("A", "A").unwrap_err();
    assert_eq!(err, RunRejected::SameEndpoints);
    assert_eq!(session.phase(), Phase::Idle);
    assert!(!session.is_busy());
    assert!(session.active_token().is_none());
    assert!(session.transcript().is_empty());
    assert_eq!(
        drain(&mut session),
        vec![SessionEvent::Warning(
            "Start and Destination cannot be the same!".to_string()
        )]
    );
}

#[test]
fn rejection_keeps_previous_transcript_and_report() {
    let mut session = session();
    run_to_end(&mut session, success(&["step1"], &["A", "C"], 3.0));
    let before = texts(&session);
    assert!(session.report().is_some());

    session.begin_run("B", "B").unwrap_err();
    assert_eq!(texts(&session), before);
    assert!(session.report().is_some());
}

#[test]
fn accepted_run_clears_and_announces() {
    let mut session = session();
    session.select_model(ModelKind::RandomForest);
    drain(&mut session);

    let ticket = accept(&mut session);
    assert_eq!(session.phase(), Phase::AwaitingBackend);
    assert!(session.is_busy());
    assert_eq!(ticket.request.start, "A");
    assert_eq!(ticket.request.dest, "C");
    assert_eq!(ticket.request.model, ModelKind::RandomForest);
    assert_eq!(
        texts(&session),
        vec!["--- PreSaNa Session Started (Model: RF) ---".to_string()]
    );
    assert_eq!(tags(&session), vec![LogTag::Header]);

    let events = drain(&mut session);
    assert_eq!(events[0], SessionEvent::TranscriptCleared);
    assert_eq!(events[1], SessionEvent::Busy(true));
    assert!(matches!(events[2], SessionEvent::Logged(_)));
}

#[test]
fn accepted_run_hides_previous_report() {
    let mut session = session();
    run_to_end(&mut session, unreachable(&[]));
    assert!(session.report().is_some());
    drain(&mut session);

    accept(&mut session);
    assert!(session.report().is_none());
    assert!(drain(&mut session).contains(&SessionEvent::ReportHidden));
}
