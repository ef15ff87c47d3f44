use dioxus::prelude::*;
use dioxus_router::use_navigator;

use crate::context::{AppContext, CurrentUser};
use crate::routes::Route;
use crate::views::ViewError;
use crate::vm::{LoginIntent, log_in, register};

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

#[component]
pub fn LoginView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let current_user = use_context::<CurrentUser>();
    let auth = ctx.auth();

    let mut username = use_signal(String::new);
    let mut password = use_signal(String::new);
    let error = use_signal(|| None::<ViewError>);
    let notice = use_signal(|| None::<String>);
    let busy = use_signal(|| false);

    let dispatch = use_callback(move |intent: LoginIntent| {
        let auth = auth.clone();
        let name = username();
        let pass = password();
        let mut current_user = current_user;
        let mut error = error;
        let mut notice = notice;
        let mut busy = busy;

        busy.set(true);
        spawn(async move {
            match intent {
                LoginIntent::Register => match register(&auth, &name, &pass).await {
                    Ok(msg) => {
                        error.set(None);
                        notice.set(Some(msg));
                    }
                    Err(err) => {
                        notice.set(None);
                        error.set(Some(err));
                    }
                },
                LoginIntent::Play | LoginIntent::ShowStats => {
                    match log_in(&auth, &name, &pass).await {
                        Ok(user) => {
                            error.set(None);
                            notice.set(None);
                            current_user.set(Some(user));
                            let route = if intent == LoginIntent::Play {
                                Route::Play {}
                            } else {
                                Route::Stats {}
                            };
                            let _ = navigator.push(route);
                        }
                        Err(err) => {
                            notice.set(None);
                            error.set(Some(err));
                        }
                    }
                }
            }
            busy.set(false);
        });
    });

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<LoginTestHandles>() {
                handles.register(dispatch, username, password);
            }
        }
    }

    rsx! {
        div { class: "page login-page",
            h2 { "Log in" }

            div { class: "form",
                label { class: "field",
                    span { "Username" }
                    input {
                        id: "login-username",
                        value: "{username}",
                        autofocus: true,
                        oninput: move |evt| username.set(evt.value()),
                    }
                }
                label { class: "field",
                    span { "Password" }
                    input {
                        id: "login-password",
                        r#type: "password",
                        value: "{password}",
                        oninput: move |evt| password.set(evt.value()),
                    }
                }
            }

            div { class: "actions",
                button {
                    id: "login-register",
                    r#type: "button",
                    disabled: busy(),
                    onclick: move |_| dispatch.call(LoginIntent::Register),
                    "Register"
                }
                button {
                    id: "login-play",
                    class: "primary",
                    r#type: "button",
                    disabled: busy(),
                    onclick: move |_| dispatch.call(LoginIntent::Play),
                    "Log in and play"
                }
                button {
                    id: "login-stats",
                    r#type: "button",
                    disabled: busy(),
                    onclick: move |_| dispatch.call(LoginIntent::ShowStats),
                    "Show statistics"
                }
            }

            if let Some(err) = error() {
                p { class: "error", "{err.message()}" }
            }
            if let Some(msg) = notice() {
                p { class: "notice", "{msg}" }
            }
        }
    }
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct LoginTestHandles {
    dispatch: Rc<RefCell<Option<Callback<LoginIntent>>>>,
    fields: Rc<RefCell<Option<(Signal<String>, Signal<String>)>>>,
}

#[cfg(test)]
impl LoginTestHandles {
    pub(crate) fn register(
        &self,
        dispatch: Callback<LoginIntent>,
        username: Signal<String>,
        password: Signal<String>,
    ) {
        *self.dispatch.borrow_mut() = Some(dispatch);
        *self.fields.borrow_mut() = Some((username, password));
    }

    pub(crate) fn dispatch(&self) -> Callback<LoginIntent> {
        (*self.dispatch.borrow()).expect("login dispatch registered")
    }

    /// Username and password inputs, in that order.
    pub(crate) fn fields(&self) -> (Signal<String>, Signal<String>) {
        (*self.fields.borrow()).expect("login fields registered")
    }
}
