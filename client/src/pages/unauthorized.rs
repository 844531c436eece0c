//! Shown when a signed-in user opens a route for another role.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;
use medportal::role::{SIGN_IN_PATH, UNAUTHORIZED_PATH};

use crate::state::auth::AuthContext;
use crate::util::auth::home_target;

#[component]
pub fn UnauthorizedPage() -> impl IntoView {
    let auth = expect_context::<AuthContext>();
    let session = auth.session();
    let navigate = use_navigate();

    // Only offer a way home when home is somewhere other than this page.
    let home = move || {
        home_target(&session.get()).filter(|path| *path != UNAUTHORIZED_PATH)
    };

    let on_switch = move |_| {
        auth.logout();
        navigate(SIGN_IN_PATH, NavigateOptions { replace: true, ..NavigateOptions::default() });
    };

    view! {
        <div class="auth-page">
            <div class="auth-card">
                <h1>"Access denied"</h1>
                <p class="auth-card__subtitle">"Your account does not have access to that page."</p>
                <Show when=move || home().is_some()>
                    <a class="auth-button" href=move || home().unwrap_or(SIGN_IN_PATH)>
                        "Go to my dashboard"
                    </a>
                </Show>
                <button class="auth-link" on:click=on_switch>
                    "Sign in as someone else"
                </button>
            </div>
        </div>
    }
}
