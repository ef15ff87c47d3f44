use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use quiz_core::time::fixed_clock;
use services::{AppServices, AuthService, AuthenticatedUser, ResultService, SessionLoopService};

use crate::context::{CurrentUser, UiApp, build_app_context};
use crate::views::login::LoginTestHandles;
use crate::views::play::PlayTestHandles;
use crate::views::{LoginView, PlayView, StatsView};

#[derive(Clone)]
struct TestApp {
    services: AppServices,
}

impl UiApp for TestApp {
    fn auth(&self) -> Arc<AuthService> {
        self.services.auth()
    }

    fn results(&self) -> Arc<ResultService> {
        self.services.results()
    }

    fn session_loop(&self) -> Arc<SessionLoopService> {
        self.services.session_loop()
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Login,
    Play,
    Stats,
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
    user: Option<AuthenticatedUser>,
    login_handles: Option<LoginTestHandles>,
    play_handles: Option<PlayTestHandles>,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for ViewHarnessProps {}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    let user = use_signal(|| props.user.clone());
    use_context_provider(|| CurrentUser(user));
    use_context_provider(|| props.view);
    if let Some(handles) = props.login_handles.clone() {
        use_context_provider(|| handles);
    }
    if let Some(handles) = props.play_handles.clone() {
        use_context_provider(|| handles);
    }
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::Login => rsx! { LoginView {} },
        ViewKind::Play => rsx! { PlayView {} },
        ViewKind::Stats => rsx! { StatsView {} },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub services: AppServices,
    pub user: Option<AuthenticatedUser>,
    pub login_handles: Option<LoginTestHandles>,
    pub play_handles: Option<PlayTestHandles>,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

/// Register and log in `alice` against `services`.
pub async fn log_in_alice(services: &AppServices) -> AuthenticatedUser {
    let auth = services.auth();
    auth.register("alice", "pw123").await.expect("register");
    auth.authenticate("alice", "pw123")
        .await
        .expect("authenticate")
        .expect("credentials accepted")
}

pub async fn setup_view_harness(view: ViewKind, logged_in: bool) -> ViewHarness {
    let services = AppServices::in_memory(fixed_clock());
    let user = if logged_in {
        Some(log_in_alice(&services).await)
    } else {
        None
    };
    setup_view_harness_with_services(view, services, user)
}

pub fn setup_view_harness_with_services(
    view: ViewKind,
    services: AppServices,
    user: Option<AuthenticatedUser>,
) -> ViewHarness {
    let login_handles = match view {
        ViewKind::Login => Some(LoginTestHandles::default()),
        _ => None,
    };
    let play_handles = match view {
        ViewKind::Play => Some(PlayTestHandles::default()),
        _ => None,
    };
    let app = Arc::new(TestApp {
        services: services.clone(),
    });

    let dom = VirtualDom::new_with_props(
        ViewRouterHarness,
        ViewHarnessProps {
            app,
            view,
            user: user.clone(),
            login_handles: login_handles.clone(),
            play_handles: play_handles.clone(),
        },
    );

    ViewHarness {
        dom,
        services,
        user,
        login_handles,
        play_handles,
    }
}
