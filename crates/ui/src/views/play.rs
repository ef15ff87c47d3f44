use dioxus::prelude::*;
use dioxus_router::use_navigator;

use quiz_core::model::Tally;

use crate::context::{AppContext, CurrentUser};
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{PlayIntent, PlayVm, start_play};

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

/// Render-ready copy of the session so the view never holds a signal borrow.
#[derive(Clone, Debug, PartialEq)]
struct PlaySnapshot {
    prompt: String,
    progress_label: Option<String>,
    /// CSS modifier and message of the last answer.
    feedback: Option<(&'static str, String)>,
    tally: Tally,
    is_complete: bool,
    is_saved: bool,
}

impl PlaySnapshot {
    fn from_vm(vm: &PlayVm) -> Self {
        Self {
            prompt: vm.prompt_text().unwrap_or_default().to_string(),
            progress_label: vm.progress_label(),
            feedback: vm.feedback().map(|f| {
                let modifier = if f.is_correct { "correct" } else { "wrong" };
                (modifier, f.message())
            }),
            tally: vm.tally(),
            is_complete: vm.is_complete(),
            is_saved: vm.result_id().is_some(),
        }
    }
}

#[component]
pub fn PlayView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let current_user = use_context::<CurrentUser>();
    let session_loop = ctx.session_loop();

    let vm = use_signal(|| None::<PlayVm>);
    let error = use_signal(|| None::<ViewError>);
    // Shown while the session is out of `vm` for an in-flight submit.
    let pending = use_signal(|| None::<PlaySnapshot>);
    let mut answer = use_signal(String::new);

    let resource = {
        let session_loop = session_loop.clone();
        use_resource(move || {
            let session_loop = session_loop.clone();
            let mut vm = vm;
            let mut error = error;
            async move {
                let user = current_user.get().ok_or(ViewError::NotLoggedIn)?;
                let play = start_play(&session_loop, &user)?;
                vm.set(Some(play));
                error.set(None);
                Ok::<_, ViewError>(())
            }
        })
    };

    let dispatch_intent = {
        let session_loop = session_loop.clone();
        use_callback(move |intent: PlayIntent| {
            let session_loop = session_loop.clone();
            let mut vm = vm;
            let mut error = error;
            let mut answer = answer;
            let mut pending = pending;
            let mut resource = resource;

            match intent {
                PlayIntent::PlayAgain => {
                    answer.set(String::new());
                    resource.restart();
                }
                PlayIntent::Submit(text) => {
                    spawn(async move {
                        let taken = vm.write().take();
                        let Some(mut play) = taken else {
                            error.set(Some(ViewError::Unknown));
                            return;
                        };

                        pending.set(Some(PlaySnapshot::from_vm(&play)));
                        let result = play.submit(&session_loop, &text).await;
                        // Put the session back even on failure so the player can retry.
                        vm.set(Some(play));
                        pending.set(None);

                        match result {
                            Ok(_) => {
                                error.set(None);
                                answer.set(String::new());
                            }
                            Err(err) => error.set(Some(err)),
                        }
                    });
                }
                PlayIntent::RetrySave => {
                    spawn(async move {
                        let taken = vm.write().take();
                        let Some(mut play) = taken else {
                            error.set(Some(ViewError::Unknown));
                            return;
                        };

                        pending.set(Some(PlaySnapshot::from_vm(&play)));
                        let result = play.retry_save(&session_loop).await;
                        vm.set(Some(play));
                        pending.set(None);
                        error.set(result.err());
                    });
                }
            }
        })
    };

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<PlayTestHandles>() {
                handles.register(dispatch_intent, vm);
            }
        }
    }

    let state = view_state_from_resource(resource);
    let is_pending = pending.read().is_some();
    let snapshot = vm
        .read()
        .as_ref()
        .map(PlaySnapshot::from_vm)
        .or_else(|| pending());

    rsx! {
        div { class: "page play-page",
            h2 { "Play" }

            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Error(ViewError::NotLoggedIn) => rsx! {
                    p { {ViewError::NotLoggedIn.message()} }
                    button {
                        r#type: "button",
                        onclick: move |_| {
                            let _ = navigator.push(Route::Login {});
                        },
                        "Back to login"
                    }
                },
                ViewState::Error(err) => rsx! {
                    p { class: "error", "{err.message()}" }
                },
                ViewState::Ready(()) => rsx! {
                    if let Some(snap) = snapshot {
                        if let Some((modifier, message)) = snap.feedback.clone() {
                            p { class: "feedback feedback--{modifier}", "{message}" }
                        }

                        if snap.is_complete {
                            div { class: "play-complete",
                                h3 { "Session complete" }
                                p { class: "play-score",
                                    "Correct: {snap.tally.correct()} | Wrong: {snap.tally.wrong()}"
                                }
                                if !snap.is_saved {
                                    p { class: "error", "The result could not be saved." }
                                    button {
                                        id: "play-retry-save",
                                        r#type: "button",
                                        disabled: is_pending,
                                        onclick: move |_| dispatch_intent.call(PlayIntent::RetrySave),
                                        "Retry save"
                                    }
                                }
                                div { class: "actions",
                                    button {
                                        id: "play-again",
                                        class: "primary",
                                        r#type: "button",
                                        onclick: move |_| dispatch_intent.call(PlayIntent::PlayAgain),
                                        "Play again"
                                    }
                                    button {
                                        id: "play-stats",
                                        r#type: "button",
                                        onclick: move |_| {
                                            let _ = navigator.push(Route::Stats {});
                                        },
                                        "Show statistics"
                                    }
                                    button {
                                        id: "play-exit",
                                        r#type: "button",
                                        onclick: move |_| dioxus::desktop::window().close(),
                                        "Exit"
                                    }
                                }
                            }
                        } else {
                            if let Some(label) = snap.progress_label.clone() {
                                p { class: "play-progress", "{label}" }
                            }
                            form {
                                class: "play-question",
                                onsubmit: move |evt: FormEvent| {
                                    evt.prevent_default();
                                    dispatch_intent.call(PlayIntent::Submit(answer()));
                                },
                                p { class: "play-prompt", "{snap.prompt}" }
                                input {
                                    id: "play-answer",
                                    value: "{answer}",
                                    autofocus: true,
                                    oninput: move |evt| answer.set(evt.value()),
                                }
                                button {
                                    class: "primary",
                                    r#type: "submit",
                                    disabled: is_pending,
                                    "Submit"
                                }
                            }
                        }
                    }
                },
            }

            if let Some(err) = error() {
                p { class: "error", "{err.message()}" }
            }
        }
    }
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct PlayTestHandles {
    dispatch: Rc<RefCell<Option<Callback<PlayIntent>>>>,
    vm: Rc<RefCell<Option<Signal<Option<PlayVm>>>>>,
}

#[cfg(test)]
impl PlayTestHandles {
    pub(crate) fn register(&self, dispatch: Callback<PlayIntent>, vm: Signal<Option<PlayVm>>) {
        *self.dispatch.borrow_mut() = Some(dispatch);
        *self.vm.borrow_mut() = Some(vm);
    }

    pub(crate) fn dispatch(&self) -> Callback<PlayIntent> {
        (*self.dispatch.borrow()).expect("play dispatch registered")
    }

    pub(crate) fn vm(&self) -> Signal<Option<PlayVm>> {
        (*self.vm.borrow()).expect("play vm registered")
    }
}
