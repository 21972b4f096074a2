use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use super::{bind_input, AppContext, INPUT_CLASS};
use crate::{
    error::ApiError,
    forms::{LoginDraft, RegisterDraft},
    session::{log_in, SessionAction},
};

#[function_component(AuthScreen)]
pub fn auth_screen() -> Html {
    let ctx = use_context::<AppContext>();
    let Some(ctx) = ctx else {
        return html! {};
    };

    let is_login = use_state(|| true);
    let email = use_state(String::new);
    let username = use_state(String::new);
    let password = use_state(String::new);
    let error = use_state(|| None::<String>);
    let notice = use_state(|| None::<String>);
    let loading = use_state(|| false);

    let on_submit = {
        let is_login = is_login.clone();
        let email = email.clone();
        let username = username.clone();
        let password = password.clone();
        let error = error.clone();
        let notice = notice.clone();
        let loading = loading.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            notice.set(None);

            let ctx = ctx.clone();
            let is_login = is_login.clone();
            let password = password.clone();
            let error = error.clone();
            let notice = notice.clone();
            let loading = loading.clone();

            if *is_login {
                let request = match (LoginDraft {
                    username: (*username).clone(),
                    password: (*password).clone(),
                })
                .validate()
                {
                    Ok(request) => request,
                    Err(invalid) => {
                        error.set(Some(invalid.to_string()));
                        return;
                    }
                };

                loading.set(true);
                error.set(None);
                spawn_local(async move {
                    match log_in(ctx.store.api(), &request).await {
                        Ok(user) => ctx.session.dispatch(SessionAction::SetUser(user)),
                        Err(ApiError::InvalidCredentials) => {
                            error.set(Some("Invalid credentials. Please try again.".to_string()));
                        }
                        Err(other) => error.set(Some(ctx.report(&other))),
                    }
                    loading.set(false);
                });
            } else {
                let request = match (RegisterDraft {
                    email: (*email).clone(),
                    username: (*username).clone(),
                    password: (*password).clone(),
                })
                .validate()
                {
                    Ok(request) => request,
                    Err(invalid) => {
                        error.set(Some(invalid.to_string()));
                        return;
                    }
                };

                loading.set(true);
                error.set(None);
                spawn_local(async move {
                    match ctx.store.api().register(&request).await {
                        Ok(user) => {
                            password.set(String::new());
                            is_login.set(true);
                            notice.set(Some(format!(
                                "Account {} created. You can log in now.",
                                user.username
                            )));
                        }
                        Err(other) => {
                            ctx.report(&other);
                            error.set(Some(
                                "Registration failed. Please check your details.".to_string(),
                            ));
                        }
                    }
                    loading.set(false);
                });
            }
        })
    };

    let toggle_mode = {
        let is_login = is_login.clone();
        let error = error.clone();
        Callback::from(move |_| {
            error.set(None);
            is_login.set(!*is_login);
        })
    };

    html! {
        <div class="min-h-screen flex items-center justify-center bg-background">
            <div class="w-full max-w-md bg-card border border-border rounded-2xl shadow-lg p-8">
                <div class="text-center mb-6">
                    <h1 class="text-2xl font-bold text-foreground">{ if *is_login { "Welcome back" } else { "Create account" } }</h1>
                    <p class="text-sm text-muted-foreground mt-2">
                        { if *is_login { "Sign in to continue." } else { "Start managing your finances." } }
                    </p>
                </div>

                <form class="space-y-4" onsubmit={on_submit}>
                    if !*is_login {
                        <div class="space-y-1">
                            <label class="text-sm font-medium text-foreground">{"Email"}</label>
                            <input type="email" class={INPUT_CLASS} value={(*email).clone()} oninput={bind_input(&email)} />
                        </div>
                    }
                    <div class="space-y-1">
                        <label class="text-sm font-medium text-foreground">{"Username"}</label>
                        <input type="text" class={INPUT_CLASS} value={(*username).clone()} oninput={bind_input(&username)} />
                    </div>
                    <div class="space-y-1">
                        <label class="text-sm font-medium text-foreground">{"Password"}</label>
                        <input type="password" class={INPUT_CLASS} value={(*password).clone()} oninput={bind_input(&password)} />
                    </div>

                    if let Some(msg) = &*error {
                        <div class="text-sm text-red-500">{ msg.clone() }</div>
                    }
                    if let Some(msg) = &*notice {
                        <div class="text-sm text-green-600">{ msg.clone() }</div>
                    }

                    <button
                        type="submit"
                        class="w-full bg-primary text-primary-foreground py-2 rounded-lg font-semibold hover:opacity-90 transition-opacity"
                        disabled={*loading}
                    >
                        { if *loading { "Please wait..." } else if *is_login { "Login" } else { "Register" } }
                    </button>
                </form>

                <div class="mt-6 text-center text-sm text-muted-foreground">
                    { if *is_login { "Don't have an account?" } else { "Already have an account?" } }
                    <button class="ml-2 text-primary font-semibold" onclick={toggle_mode}>
                        { if *is_login { "Register" } else { "Login" } }
                    </button>
                </div>
            </div>
        </div>
    }
}
