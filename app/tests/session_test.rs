//! Integration tests for the widget session

mod common;

use bmi_calculator_app::commands::{self, Reply};
use bmi_calculator_app::error::AppError;
use bmi_calculator_shared::{
    Category, CalculatorError, MemoryStore, Notification, Theme, UnitSystem, HISTORY_KEY, THEME_KEY,
};
use common::TestApp;
use std::time::Duration;
use tokio_test::{assert_err, assert_ok};

#[tokio::test(start_paused = true)]
async fn test_submit_completes_after_delay() {
    let mut app = TestApp::new();

    assert_eq!(assert_ok!(app.run("metric 175 70").await), Reply::Silent);
    assert!(app.session.snapshot().calculating);
    assert!(app.session.snapshot().result.is_none());

    tokio::time::sleep(Duration::from_millis(999)).await;
    assert!(app.session.snapshot().calculating);

    app.session.wait_idle().await;
    let snapshot = app.session.snapshot();
    assert!(!snapshot.calculating);

    let result = snapshot.result.as_ref().unwrap();
    assert_eq!(result.value, 22.9);
    assert_eq!(result.category, Category::Normal);
    assert_eq!(result.tips.len(), 4);
    assert_eq!(snapshot.history.len(), 1);
    assert_eq!(snapshot.gauge.as_ref().unwrap().value, 22.9);

    assert_eq!(
        app.drain_notifications(),
        vec![Notification::CalculationSucceeded {
            value: 22.9,
            category: Category::Normal,
        }]
    );
    assert!(app.stored(HISTORY_KEY).await.unwrap().contains("22.9"));
}

#[tokio::test(start_paused = true)]
async fn test_imperial_submission() {
    let mut app = TestApp::new();

    assert_ok!(app.run("imperial 5 7 154").await);
    app.session.wait_idle().await;

    let snapshot = app.session.snapshot();
    assert_eq!(snapshot.unit_system, UnitSystem::Imperial);
    assert_eq!(snapshot.result.as_ref().unwrap().value, 24.1);
}

#[tokio::test(start_paused = true)]
async fn test_second_submit_while_pending_is_rejected() {
    let mut app = TestApp::new();

    assert_ok!(app.run("metric 175 70").await);
    let err = assert_err!(app.run("imperial 5 7 154").await);
    assert!(matches!(err, AppError::Calculator(CalculatorError::Busy)));
    assert_eq!(app.session.snapshot().unit_system, UnitSystem::Metric);

    app.session.wait_idle().await;
    let snapshot = app.session.snapshot();
    assert_eq!(snapshot.unit_system, UnitSystem::Metric);
    assert_eq!(snapshot.history.len(), 1);
    assert_eq!(snapshot.result.as_ref().unwrap().value, 22.9);
}

#[tokio::test(start_paused = true)]
async fn test_input_ending_mid_calculation_still_saves() {
    let mut app = TestApp::new();

    let input: &[u8] = b"theme\nmetric 175 70\n";
    assert_ok!(commands::run(&mut app.session, input).await);

    let snapshot = app.session.snapshot();
    assert!(!snapshot.calculating);
    assert_eq!(snapshot.result.as_ref().unwrap().value, 22.9);
    assert_eq!(snapshot.theme, Theme::Dark);
    assert!(app.stored(HISTORY_KEY).await.unwrap().contains("22.9"));
    assert_eq!(
        app.drain_notifications(),
        vec![Notification::CalculationSucceeded {
            value: 22.9,
            category: Category::Normal,
        }]
    );
}

#[tokio::test(start_paused = true)]
async fn test_quit_waits_for_pending_calculation() {
    let mut app = TestApp::new();

    let input: &[u8] = b"metric 180 90\nquit\nmetric 175 70\n";
    assert_ok!(commands::run(&mut app.session, input).await);

    let snapshot = app.session.snapshot();
    assert_eq!(snapshot.history.len(), 1);
    assert_eq!(snapshot.result.as_ref().unwrap().value, 27.8);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_discards_pending_calculation() {
    let mut app = TestApp::new();

    assert_ok!(app.run("metric 175 70").await);
    assert_ok!(app.run("cancel").await);
    assert!(!app.session.snapshot().calculating);

    tokio::time::sleep(Duration::from_secs(5)).await;
    let snapshot = app.session.snapshot();
    assert!(snapshot.result.is_none());
    assert!(snapshot.history.is_empty());
    assert!(app.drain_notifications().is_empty());

    let err = assert_err!(app.run("cancel").await);
    assert_eq!(err.user_message(), "Nothing to cancel.");
}

#[tokio::test(start_paused = true)]
async fn test_invalid_input_leaves_state_untouched() {
    let mut app = TestApp::new();

    assert_ok!(app.run("metric 175 abc").await);
    app.session.wait_idle().await;

    let snapshot = app.session.snapshot();
    assert!(!snapshot.calculating);
    assert!(snapshot.result.is_none());
    assert!(snapshot.history.is_empty());
    assert_eq!(app.drain_notifications(), vec![Notification::invalid_input()]);
    assert_eq!(app.stored(HISTORY_KEY).await, None);
}

#[tokio::test(start_paused = true)]
async fn test_clear_history() {
    let mut app = TestApp::new();

    assert_ok!(app.run("metric 175 70").await);
    app.session.wait_idle().await;
    assert_ok!(app.run("metric 180 90").await);
    app.session.wait_idle().await;
    assert_eq!(app.session.snapshot().history.len(), 2);
    app.drain_notifications();

    assert_eq!(assert_ok!(app.run("clear").await), Reply::Silent);
    assert!(app.session.snapshot().history.is_empty());
    assert_eq!(app.drain_notifications(), vec![Notification::HistoryCleared]);
    assert_eq!(app.stored(HISTORY_KEY).await, None);

    match assert_ok!(app.run("history").await) {
        Reply::Print(text) => assert_eq!(text, "No calculations yet."),
        other => panic!("unexpected reply: {:?}", other),
    }
}

#[tokio::test]
async fn test_toggle_theme_persists() {
    let mut app = TestApp::new();
    assert_eq!(app.session.snapshot().theme, Theme::Light);

    assert_ok!(app.run("theme").await);
    assert_eq!(app.session.snapshot().theme, Theme::Dark);
    assert_eq!(app.stored(THEME_KEY).await.as_deref(), Some("dark"));

    assert_ok!(app.run("theme").await);
    assert_eq!(app.stored(THEME_KEY).await.as_deref(), Some("light"));
}

#[tokio::test]
async fn test_hydrates_from_store() {
    let history = r#"[{"value":27.1,"date":"2024-05-02T10:00:00Z"},{"value":24.3,"date":"2024-05-01T10:00:00Z"}]"#;
    let store = MemoryStore::new().with(THEME_KEY, "dark").with(HISTORY_KEY, history);
    let mut app = TestApp::with_store(store);

    let snapshot = app.session.snapshot();
    assert_eq!(snapshot.theme, Theme::Dark);
    assert_eq!(snapshot.history.len(), 2);
    assert!(snapshot.result.is_none());

    match assert_ok!(app.run("history").await) {
        Reply::Print(text) => {
            assert!(text.contains("27.1"));
            assert!(text.contains("Entries: 2"));
        }
        other => panic!("unexpected reply: {:?}", other),
    }
}

#[tokio::test]
async fn test_units_command() {
    let mut app = TestApp::new();

    assert_ok!(app.run("units").await);
    assert_eq!(app.session.snapshot().unit_system, UnitSystem::Imperial);
    assert_ok!(app.run("units metric").await);
    assert_eq!(app.session.snapshot().unit_system, UnitSystem::Metric);
}

#[tokio::test]
async fn test_static_panels_and_quit() {
    let mut app = TestApp::new();

    assert!(matches!(assert_ok!(app.run("faq").await), Reply::Print(_)));
    assert!(matches!(assert_ok!(app.run("chart").await), Reply::Print(_)));
    assert!(matches!(assert_ok!(app.run("help").await), Reply::Print(_)));
    assert_eq!(assert_ok!(app.run("quit").await), Reply::Quit);

    let err = assert_err!(app.run("jump").await);
    assert_eq!(err.user_message(), "Unknown command 'jump' (type 'help' for commands)");
}
