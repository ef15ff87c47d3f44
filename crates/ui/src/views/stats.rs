use dioxus::prelude::*;
use dioxus_router::use_navigator;

use crate::context::{AppContext, CurrentUser};
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{ResultBarsVm, StatsVm, map_statistics};

#[component]
pub fn StatsView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let current_user = use_context::<CurrentUser>();
    let results = ctx.results();
    let questions_per_session = ctx.session_loop().catalog().len();

    let resource = use_resource(move || {
        let results = results.clone();
        async move {
            let user = current_user.get().ok_or(ViewError::NotLoggedIn)?;
            let stats = results
                .statistics(&user)
                .await
                .map_err(|_| ViewError::Unknown)?;
            Ok(map_statistics(&stats, questions_per_session))
        }
    });

    let state = view_state_from_resource(resource);

    rsx! {
        div { class: "page stats-page",
            h2 { "Statistics" }

            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(vm) => {
                    let is_empty = vm.is_empty();
                    let StatsVm { recent, best } = vm;
                    rsx! {
                        if is_empty {
                            p { class: "empty", "No sessions played yet." }
                        } else {
                            h3 { "Recent sessions" }
                            div { class: "chart",
                                for bars in recent {
                                    BarPair { bars }
                                }
                            }
                            if let Some(best) = best {
                                h3 { "Personal best" }
                                div { class: "chart chart--best",
                                    BarPair { bars: best }
                                }
                            }
                            ul { class: "legend",
                                li { class: "legend__correct", "Correct" }
                                li { class: "legend__wrong", "Wrong" }
                            }
                        }
                    }
                }
                ViewState::Error(err) => rsx! {
                    p { class: "error", "{err.message()}" }
                    button {
                        r#type: "button",
                        onclick: move |_| {
                            let mut resource = resource;
                            resource.restart();
                        },
                        "Retry"
                    }
                },
            }

            div { class: "actions",
                button {
                    id: "stats-play",
                    class: "primary",
                    r#type: "button",
                    onclick: move |_| {
                        let _ = navigator.push(Route::Play {});
                    },
                    "Play again"
                }
                button {
                    id: "stats-logout",
                    r#type: "button",
                    onclick: move |_| {
                        let mut current_user = current_user;
                        current_user.set(None);
                        let _ = navigator.push(Route::Login {});
                    },
                    "Log out"
                }
            }
        }
    }
}

#[component]
fn BarPair(bars: ResultBarsVm) -> Element {
    rsx! {
        div { class: "bar-pair", title: "{bars.completed_at_str}",
            div { class: "bar-pair__bars",
                div {
                    class: "bar bar--correct",
                    style: "height: {bars.correct_pct}%",
                    "{bars.correct}"
                }
                div {
                    class: "bar bar--wrong",
                    style: "height: {bars.wrong_pct}%",
                    "{bars.wrong}"
                }
            }
            span { class: "bar-pair__label", "{bars.label}" }
        }
    }
}
