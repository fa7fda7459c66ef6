/// Session tests
///
/// Drives the dispatch actor with textual commands, the way front ends do.
/// Run with: cargo test --test session_tests

use nestkv::session::DialogState;
use nestkv::{Command, Session, SessionConfig};
use std::sync::Arc;

async fn run_script(session: &Session, lines: &[&str]) -> Vec<String> {
    let mut shown = Vec::new();
    for line in lines {
        let view = session.apply_line(line).await.unwrap();
        if let Some(text) = view.display_line() {
            shown.push(text.to_string());
        }
    }
    shown
}

#[tokio::test]
async fn test_session_nested_rollbacks() {
    let session = Session::start(SessionConfig::new().confirm_transactions(false));

    let shown = run_script(
        &session,
        &[
            "set foo 123",
            "set bar 456",
            "begin",
            "set foo 456",
            "begin",
            "count 456",
            "get foo",
            "set foo 789",
            "get foo",
            "rollback",
            "get foo",
            "delete foo",
            "get foo",
            "rollback",
            "get foo",
        ],
    )
    .await;

    assert_eq!(
        shown,
        vec![
            "Value accepted.",
            "Value accepted.",
            "begin transaction with id = 1",
            "Value accepted.",
            "begin transaction with id = 2",
            "2",
            "456",
            "Value accepted.",
            "789",
            "rollback result: OK",
            "456",
            "Deleted.",
            "key not set.",
            "rollback result: OK",
            "123",
        ]
    );

    session.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_confirmation_dialog_flow() {
    let session = Session::start(SessionConfig::default());

    session.apply_line("begin").await.unwrap();
    session.apply_line("set foo 1").await.unwrap();

    let view = session.apply(Command::Rollback).await.unwrap();
    assert_eq!(
        view.dialog,
        DialogState::LastCommandConfirmation {
            message: "are you sure you want to perform the operation rollback ? (y/n):".into()
        }
    );
    assert_eq!(view.pending_command, Some(Command::Rollback));
    assert_eq!(view.last_log(), Some("Try to rollback last transaction."));
    assert_eq!(view.transaction_depth, 1);

    let view = session.apply(Command::Confirm).await.unwrap();
    assert_eq!(view.dialog, DialogState::Hidden);
    assert_eq!(view.last_log(), Some("rollback result: OK"));
    assert_eq!(view.transaction_depth, 0);

    let view = session.apply_line("get foo").await.unwrap();
    assert_eq!(view.last_log(), Some("key not set."));

    let view = session.apply_line("commit").await.unwrap();
    assert!(matches!(view.dialog, DialogState::LastCommandConfirmation { .. }));
    let view = session.apply_line("y").await.unwrap();
    assert_eq!(view.last_log(), Some("commit result: ActiveTransactionNotFound"));
}

#[tokio::test]
async fn test_state_version_counts_handled_commands() {
    let session = Session::start(SessionConfig::default());
    let view = session.apply_line("set a 1").await.unwrap();
    assert_eq!(view.state_version, 1);
    let view = session.apply_line("bogus").await.unwrap();
    assert_eq!(view.state_version, 2);
    let view = session.apply(Command::Exit).await.unwrap();
    assert_eq!(view.state_version, 2);
}

#[tokio::test]
async fn test_concurrent_callers_are_serialized() {
    let session = Arc::new(Session::start(SessionConfig::new().log_capacity(200)));

    let mut handles = Vec::new();
    for worker in 0..8 {
        let session = session.clone();
        handles.push(tokio::spawn(async move {
            for i in 0..10 {
                session
                    .apply_line(&format!("set w{}_{} same", worker, i))
                    .await
                    .unwrap();
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let view = session.apply_line("count same").await.unwrap();
    assert_eq!(view.last_log(), Some("80"));
    assert_eq!(view.state_version, 81);
}

#[tokio::test]
async fn test_subscribers_observe_views() {
    let session = Session::start(SessionConfig::default());
    let mut rx = session.subscribe();

    session.apply_line("set k v").await.unwrap();
    rx.changed().await.unwrap();
    assert_eq!(rx.borrow().last_log(), Some("Value accepted."));
    assert_eq!(session.view().state_version, 1);
}

#[tokio::test]
async fn test_last_view_survives_shutdown() {
    let session = Session::start(SessionConfig::default());
    let rx = session.subscribe();
    session.shutdown().await.unwrap();

    // the last published view outlives the worker
    assert_eq!(rx.borrow().state_version, 0);
    assert!(rx.borrow().operations_log.is_empty());
}
