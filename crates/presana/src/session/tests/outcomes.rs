use super::*;
use crate::error::TransportError;
use crate::session::{Phase, Report};

#[test]
fn success_streams_lines_then_reports() {
    let mut session = session();
    let ticket = accept(&mut session);
    let narration = session
        .receive(&ticket, Ok(success(&["step1", "step2"], &["A", "B", "C"], 4.5)))
        .unwrap();
    assert_eq!(session.phase(), Phase::Narrating);
    drain(&mut session);

    let statuses = play(&mut session, &narration);
    assert!(statuses.iter().all(|s| *s == CueStatus::Applied));

    let events = drain(&mut session);
    let logged: Vec<&str> = events
        .iter()
        .filter_map(|e| match e {
            SessionEvent::Logged(line) => Some(line.text.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(logged, vec!["step1", "step2", "SUCCESS: Route optimized."]);

    let report_at = events
        .iter()
        .position(|e| matches!(e, SessionEvent::ReportOpened(_)))
        .unwrap();
    let step2_at = events
        .iter()
        .position(|e| matches!(e, SessionEvent::Logged(l) if l.text == "step2"))
        .unwrap();
    assert!(step2_at < report_at);

    let report = session.report().unwrap();
    assert_eq!(report.path_label().unwrap(), "A \u{2794} B \u{2794} C");
    assert_eq!(report.cost_label().unwrap(), "4.5");
    assert_eq!(
        tags(&session),
        vec![LogTag::Header, LogTag::Plain, LogTag::Plain, LogTag::Success]
    );
    assert_eq!(session.phase(), Phase::Idle);
    assert!(!session.is_busy());
}

#[test]
fn unreachable_reports_and_logs_error() {
    let mut session = session();
    run_to_end(&mut session, unreachable(&["x"]));
    assert_eq!(session.report(), Some(&Report::Unreachable));
    assert_eq!(
        session.report().unwrap().lines(),
        vec!["No feasible route found. All paths are blocked.".to_string()]
    );
    assert_eq!(
        tags(&session),
        vec![LogTag::Header, LogTag::Plain, LogTag::Error]
    );
    assert!(!tags(&session).contains(&LogTag::Success));
    assert_eq!(session.phase(), Phase::Idle);
    assert!(!session.is_busy());
}

#[test]
fn backend_error_logs_without_report() {
    let mut session = session();
    run_to_end(&mut session, failure("blocked"));
    assert_eq!(session.phase(), Phase::Idle);
    assert!(session.report().is_none());
    assert!(!session.is_busy());
    let last = session.transcript().last().unwrap();
    assert_eq!(last.tag, LogTag::Error);
    assert_eq!(last.text, "ERROR: blocked");
}

#[test]
fn transport_error_ends_run_immediately() {
    let mut session = session();
    let ticket = accept(&mut session);
    let narration = session.receive(
        &ticket,
        Err(TransportError::Status {
            url: "http://localhost/api/run".into(),
            status: 502,
        }),
    );
    assert!(narration.is_none());
    assert_eq!(session.phase(), Phase::Idle);
    assert!(!session.is_busy());
    assert!(session.report().is_none());
    assert!(session.active_token().is_none());
    assert_eq!(
        texts(&session).last().unwrap(),
        "SYSTEM ERROR: Could not reach the PreSaNa backend."
    );
    assert_eq!(tags(&session).last(), Some(&LogTag::Error));
}

#[test]
fn report_names_model_captured_at_start() {
    let mut session = session();
    let ticket = accept(&mut session);
    session.select_model(ModelKind::RandomForest);
    let narration = session
        .receive(&ticket, Ok(success(&[], &["A", "C"], 1.0)))
        .unwrap();
    play(&mut session, &narration);

    match session.report().unwrap() {
        Report::Route { model, .. } => assert_eq!(*model, ModelKind::Linear),
        other => panic!("expected route report, got {other:?}"),
    }
    assert_eq!(session.model(), ModelKind::RandomForest);
}

#[test]
fn end_screen_is_orthogonal_to_runs() {
    let mut session = session();
    let ticket = accept(&mut session);
    session.end();
    assert!(session.end_screen_visible());
    assert_eq!(session.phase(), Phase::AwaitingBackend);

    let narration = session
        .receive(&ticket, Ok(success(&["s"], &["A", "C"], 2.0)))
        .unwrap();
    play(&mut session, &narration);
    assert!(session.report().is_some());
    assert!(session.end_screen_visible());
}
