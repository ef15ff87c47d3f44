use dioxus::prelude::*;
use dioxus_router::{Outlet, Routable};

use crate::context::CurrentUser;
use crate::views::{LoginView, PlayView, StatsView};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", LoginView)] Login {},
        #[route("/play", PlayView)] Play {},
        #[route("/stats", StatsView)] Stats {},
}

#[component]
fn Layout() -> Element {
    let user = use_context::<CurrentUser>();
    let player = user.get().map(|u| u.username().to_string());

    rsx! {
        div { class: "app",
            header { class: "topbar",
                h1 { "Quiz" }
                if let Some(name) = player {
                    span { class: "topbar__player", "Player: {name}" }
                }
            }
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}
