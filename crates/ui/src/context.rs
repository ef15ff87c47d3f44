use std::sync::Arc;

use dioxus::prelude::*;
use services::{AuthService, AuthenticatedUser, ResultService, SessionLoopService};

/// Services the UI needs from the composition root.
pub trait UiApp: Send + Sync {
    fn auth(&self) -> Arc<AuthService>;
    fn results(&self) -> Arc<ResultService>;
    fn session_loop(&self) -> Arc<SessionLoopService>;
}

#[derive(Clone)]
pub struct AppContext {
    auth: Arc<AuthService>,
    results: Arc<ResultService>,
    session_loop: Arc<SessionLoopService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            auth: app.auth(),
            results: app.results(),
            session_loop: app.session_loop(),
        }
    }

    #[must_use]
    pub fn auth(&self) -> Arc<AuthService> {
        Arc::clone(&self.auth)
    }

    #[must_use]
    pub fn results(&self) -> Arc<ResultService> {
        Arc::clone(&self.results)
    }

    #[must_use]
    pub fn session_loop(&self) -> Arc<SessionLoopService> {
        Arc::clone(&self.session_loop)
    }
}

/// The logged-in player, shared by every route.
#[derive(Clone, Copy)]
pub struct CurrentUser(pub Signal<Option<AuthenticatedUser>>);

impl CurrentUser {
    #[must_use]
    pub fn get(&self) -> Option<AuthenticatedUser> {
        self.0.read().clone()
    }

    pub fn set(&mut self, user: Option<AuthenticatedUser>) {
        self.0.set(user);
    }
}

// Provided by the application composition root (`crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
