//! Sign-in page: email + password, honoring a preserved `redirect` target.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::{use_navigate, use_query_map};
use medportal::Credentials;
use medportal::guard::REDIRECT_PARAM;
use medportal::role::{self, SIGN_UP_PATH};

use crate::state::auth::AuthContext;
use crate::util::auth::{install_redirect, signed_in_destination};

#[component]
pub fn SignInPage() -> impl IntoView {
    let auth = expect_context::<AuthContext>();
    let session = auth.session();
    let query = use_query_map();
    let navigate = use_navigate();

    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    let redirect = move || query.get().get(REDIRECT_PARAM);

    // Errors from an earlier attempt do not follow the visitor back here.
    auth.clear_error();

    // Already signed in (e.g. restored from cache): skip the form.
    install_redirect(move || signed_in_destination(&session.get(), redirect().as_deref()), navigate.clone());

    let alive = Arc::new(AtomicBool::new(true));
    let alive_cleanup = Arc::clone(&alive);
    on_cleanup(move || alive_cleanup.store(false, Ordering::Relaxed));

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        busy.set(true);
        let credentials = Credentials::new(email.get_untracked(), password.get_untracked());
        let target = redirect();
        let auth = auth.clone();
        let alive = Arc::clone(&alive);
        let navigate = navigate.clone();
        leptos::task::spawn_local(async move {
            let result = auth.login(&credentials).await;
            if !alive.load(Ordering::Relaxed) {
                return;
            }
            busy.set(false);
            match result {
                Ok(user) => {
                    log::info!("signed in as {}", user.email);
                    let destination = role::post_login_redirect(target.as_deref(), Some(&user.role));
                    navigate(&destination, NavigateOptions { replace: true, ..NavigateOptions::default() });
                }
                Err(e) => log::warn!("sign-in failed: {e}"),
            }
        });
    };

    let error = move || session.get().error;

    view! {
        <div class="auth-page">
            <div class="auth-card">
                <h1>"MedPortal"</h1>
                <p class="auth-card__subtitle">"Sign in to your account"</p>
                <form class="auth-form" on:submit=on_submit>
                    <input
                        class="auth-input"
                        type="email"
                        placeholder="you@example.com"
                        prop:value=move || email.get()
                        on:input=move |ev| email.set(event_target_value(&ev))
                    />
                    <input
                        class="auth-input"
                        type="password"
                        placeholder="Password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <button class="auth-button" type="submit" disabled=move || busy.get()>
                        {move || if busy.get() { "Signing in..." } else { "Sign In" }}
                    </button>
                </form>
                <Show when=move || error().is_some()>
                    <p class="auth-message auth-message--error">{move || error().unwrap_or_default()}</p>
                </Show>
                <p class="auth-card__footer">
                    "New here? "
                    <a href=SIGN_UP_PATH>"Create an account"</a>
                </p>
            </div>
        </div>
    }
}
