//! Header shown on authenticated pages: who is signed in, plus sign-out.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;
use medportal::role::SIGN_IN_PATH;

use crate::state::auth::AuthContext;

#[component]
pub fn NavBar() -> impl IntoView {
    let auth = expect_context::<AuthContext>();
    let session = auth.session();
    let navigate = use_navigate();

    let name = move || session.get().user.map(|u| u.display_name()).unwrap_or_default();
    let role = move || {
        session
            .get()
            .user
            .and_then(|u| u.role())
            .map_or("", |r| r.label())
    };

    let on_logout = move |_| {
        auth.logout();
        navigate(SIGN_IN_PATH, NavigateOptions { replace: true, ..NavigateOptions::default() });
    };

    view! {
        <header class="nav-bar">
            <span class="nav-bar__brand">"MedPortal"</span>
            <span class="nav-bar__user">{name}</span>
            <span class="nav-bar__role">{role}</span>
            <button class="nav-bar__logout" on:click=on_logout>
                "Sign out"
            </button>
        </header>
    }
}
