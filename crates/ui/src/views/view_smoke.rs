use std::sync::Arc;

use tokio::sync::Notify;

use quiz_core::model::{Catalog, GameResult, ResultId, UserId};
use quiz_core::time::fixed_clock;
use services::AppServices;
use storage::repository::{InMemoryRepository, ResultRepository, ResultRow, Storage, StorageError};

use super::test_harness::{
    ViewHarness, ViewKind, log_in_alice, setup_view_harness, setup_view_harness_with_services,
};
use crate::vm::{BEST_LABEL, LoginIntent, PlayIntent};

fn current_prompt(harness: &ViewHarness) -> Option<String> {
    let vm = harness.play_handles.as_ref().expect("play handles").vm();
    harness.dom.in_runtime(|| {
        vm.read()
            .as_ref()
            .and_then(|play| play.prompt_text().map(str::to_string))
    })
}

async fn submit(harness: &mut ViewHarness, answer: &str) {
    let dispatch = harness.play_handles.as_ref().expect("play handles").dispatch();
    let answer = answer.to_string();
    harness
        .dom
        .in_runtime(|| dispatch.call(PlayIntent::Submit(answer)));
    super::test_harness::drive_dom(&mut harness.dom);
    harness.drive_async().await;
}

async fn login_action(harness: &mut ViewHarness, name: &str, pass: &str, intent: LoginIntent) {
    let handles = harness.login_handles.as_ref().expect("login handles");
    let (mut username, mut password) = handles.fields();
    let dispatch = handles.dispatch();
    harness.dom.in_runtime(|| {
        username.set(name.to_string());
        password.set(pass.to_string());
        dispatch.call(intent);
    });
    super::test_harness::drive_dom(&mut harness.dom);
    harness.drive_async().await;
}

#[tokio::test(flavor = "current_thread")]
async fn login_view_smoke_renders_form() {
    let mut harness = setup_view_harness(ViewKind::Login, false).await;
    harness.rebuild();
    let html = harness.render();
    for expected in ["Username", "Password", "Register", "Log in and play", "Show statistics"] {
        assert!(html.contains(expected), "missing {expected} in {html}");
    }
    assert!(html.contains("password"), "missing password input in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn login_view_smoke_reports_credential_errors() {
    let services = AppServices::in_memory(fixed_clock());
    services.auth().register("alice", "pw123").await.unwrap();

    let mut harness = setup_view_harness_with_services(ViewKind::Login, services, None);
    harness.rebuild();

    login_action(&mut harness, "alice", "wrong", LoginIntent::Play).await;
    let html = harness.render();
    assert!(
        html.contains("Wrong username or password."),
        "missing credential error in {html}"
    );

    login_action(&mut harness, "alice", "other", LoginIntent::Register).await;
    let html = harness.render();
    assert!(
        html.contains("That username is already taken."),
        "missing duplicate error in {html}"
    );

    login_action(&mut harness, "", "pw", LoginIntent::ShowStats).await;
    let html = harness.render();
    assert!(
        html.contains("Enter both a username and a password."),
        "missing validation error in {html}"
    );

    login_action(&mut harness, "bob", "pw", LoginIntent::Register).await;
    let html = harness.render();
    assert!(
        html.contains("Registered bob. You can log in now."),
        "missing confirmation in {html}"
    );
    assert!(!html.contains("already taken"), "stale error in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn play_view_smoke_requires_login() {
    let mut harness = setup_view_harness(ViewKind::Play, false).await;
    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("Log in to play"), "missing login hint in {html}");
    assert!(html.contains("Back to login"), "missing back button in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn play_view_smoke_shows_first_question() {
    let mut harness = setup_view_harness(ViewKind::Play, true).await;
    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("Question 1 of 5"), "missing progress in {html}");

    let prompt = current_prompt(&harness).expect("question shown");
    assert!(Catalog::standard().answer_for(&prompt).is_some());
    assert!(html.contains(&prompt), "missing {prompt} in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn play_view_smoke_completes_and_saves_result() {
    let mut harness = setup_view_harness(ViewKind::Play, true).await;
    harness.rebuild();
    harness.drive_async().await;

    let catalog = Catalog::standard();
    for i in 0..5 {
        let prompt = current_prompt(&harness).expect("question shown");
        let answer = if i < 3 {
            catalog.answer_for(&prompt).expect("known prompt").to_string()
        } else {
            "nezinu".to_string()
        };
        submit(&mut harness, &answer).await;
    }

    let html = harness.render();
    assert!(html.contains("Session complete"), "missing completion in {html}");
    assert!(html.contains("Correct: 3 | Wrong: 2"), "missing score in {html}");
    assert!(html.contains("Play again"), "missing replay in {html}");
    assert!(html.contains("Exit"), "missing exit in {html}");

    let user = harness.user.clone().expect("logged in");
    let stats = harness.services.results().statistics(&user).await.unwrap();
    let recent: Vec<_> = stats.recent.iter().map(|r| r.counts()).collect();
    assert_eq!(recent, vec![(3, 2)]);
}

#[tokio::test(flavor = "current_thread")]
async fn stats_view_smoke_renders_bars_and_best() {
    let services = AppServices::in_memory(fixed_clock());
    let user = log_in_alice(&services).await;
    services.results().save(user.id(), 3, 2).await.unwrap();
    services.results().save(user.id(), 5, 0).await.unwrap();

    let mut harness = setup_view_harness_with_services(ViewKind::Stats, services, Some(user));
    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("Recent sessions"), "missing recent in {html}");
    assert!(html.contains("Personal best"), "missing best in {html}");
    assert!(html.contains(BEST_LABEL), "missing PB label in {html}");
    assert!(html.contains("60%"), "missing scaled bar in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn stats_view_smoke_renders_empty_state() {
    let mut harness = setup_view_harness(ViewKind::Stats, true).await;
    harness.rebuild();
    let html = harness.render();
    assert!(!html.contains("Idle"), "internal state leaked in {html}");
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("No sessions played yet."), "missing empty state in {html}");
}

struct FailingResultRepo;

#[async_trait::async_trait]
impl ResultRepository for FailingResultRepo {
    async fn append_result(&self, _result: &GameResult) -> Result<ResultId, StorageError> {
        Err(StorageError::Connection("fail".to_string()))
    }

    async fn list_recent_results(
        &self,
        _user_id: UserId,
        _limit: u32,
    ) -> Result<Vec<ResultRow>, StorageError> {
        Err(StorageError::Connection("fail".to_string()))
    }

    async fn best_result(&self, _user_id: UserId) -> Result<Option<ResultRow>, StorageError> {
        Err(StorageError::Connection("fail".to_string()))
    }
}

fn failing_results_services() -> AppServices {
    let storage = Storage {
        users: Arc::new(InMemoryRepository::new()),
        results: Arc::new(FailingResultRepo),
    };
    AppServices::from_storage(&storage, fixed_clock())
}

#[tokio::test(flavor = "current_thread")]
async fn stats_view_smoke_renders_error_state() {
    let services = failing_results_services();
    let user = log_in_alice(&services).await;

    let mut harness = setup_view_harness_with_services(ViewKind::Stats, services, Some(user));
    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("Something went wrong"), "missing error in {html}");
    assert!(html.contains("Retry"), "missing retry in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn play_view_smoke_offers_retry_when_save_fails() {
    let services = failing_results_services();
    let user = log_in_alice(&services).await;

    let mut harness = setup_view_harness_with_services(ViewKind::Play, services, Some(user));
    harness.rebuild();
    harness.drive_async().await;
    for _ in 0..5 {
        submit(&mut harness, "?").await;
    }

    let html = harness.render();
    assert!(html.contains("Correct: 0 | Wrong: 5"), "missing score in {html}");
    assert!(html.contains("Retry save"), "missing retry in {html}");
    assert!(html.contains("Something went wrong"), "missing error in {html}");
}

/// Holds every result write until the test releases it.
struct GatedResultRepo {
    inner: InMemoryRepository,
    gate: Arc<Notify>,
}

#[async_trait::async_trait]
impl ResultRepository for GatedResultRepo {
    async fn append_result(&self, result: &GameResult) -> Result<ResultId, StorageError> {
        self.gate.notified().await;
        self.inner.append_result(result).await
    }

    async fn list_recent_results(
        &self,
        user_id: UserId,
        limit: u32,
    ) -> Result<Vec<ResultRow>, StorageError> {
        self.inner.list_recent_results(user_id, limit).await
    }

    async fn best_result(&self, user_id: UserId) -> Result<Option<ResultRow>, StorageError> {
        self.inner.best_result(user_id).await
    }
}

#[tokio::test(flavor = "current_thread")]
async fn play_view_smoke_keeps_question_while_saving() {
    let inner = InMemoryRepository::new();
    let gate = Arc::new(Notify::new());
    let storage = Storage {
        users: Arc::new(inner.clone()),
        results: Arc::new(GatedResultRepo {
            inner,
            gate: gate.clone(),
        }),
    };
    let services = AppServices::from_storage(&storage, fixed_clock());
    let user = log_in_alice(&services).await;

    let mut harness = setup_view_harness_with_services(ViewKind::Play, services, Some(user));
    harness.rebuild();
    harness.drive_async().await;
    for _ in 0..4 {
        submit(&mut harness, "?").await;
    }
    let last_prompt = current_prompt(&harness).expect("last question shown");

    // The final answer triggers the save, which stays blocked on the gate.
    submit(&mut harness, "?").await;
    let html = harness.render();
    assert!(html.contains("Question 5 of 5"), "form vanished in {html}");
    assert!(html.contains(&last_prompt), "missing {last_prompt} in {html}");
    assert!(!html.contains("Session complete"), "completed early in {html}");

    gate.notify_one();
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("Correct: 0 | Wrong: 5"), "missing score in {html}");
    assert!(!html.contains("Retry save"), "save reported as failed in {html}");
}
