use dioxus::prelude::*;
use dioxus_router::Router;

use services::AuthenticatedUser;

use crate::context::CurrentUser;
use crate::routes::Route;

#[component]
pub fn App() -> Element {
    let user = use_signal(|| None::<AuthenticatedUser>);
    use_context_provider(|| CurrentUser(user));

    rsx! {
        document::Stylesheet { href: asset!("/assets/style.css") }

        // Window title stays fixed; each route renders its own heading.
        document::Title { "Quiz" }

        div { class: "app-root",
            ErrorBoundary {
                handle_error: |errors: ErrorContext| rsx! {
                    div { class: "fatal",
                        h1 { "Something went wrong" }
                        pre { "{errors:?}" }
                    }
                },
                Router::<Route> {}
            }
        }
    }
}
