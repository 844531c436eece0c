//! Route guard wrapper for protected pages.

use leptos::prelude::*;
use leptos_router::hooks::{use_location, use_navigate};
use medportal::Role;
use medportal::guard::{self, GuardDecision};

use crate::state::auth::AuthContext;
use crate::util::auth::{current_path, install_redirect};

/// Render `children` only when the guard allows the current route.
///
/// Re-evaluated on every session change: while the session is restoring a
/// pending notice is shown, otherwise a denied visit is redirected to sign-in
/// (keeping the requested path) or to the unauthorized page.
#[component]
pub fn RequireRole(role: Option<Role>, children: ChildrenFn) -> impl IntoView {
    let auth = expect_context::<AuthContext>();
    let session = auth.session();
    let location = use_location();
    let (pathname, search) = (location.pathname, location.search);

    let decision = Memo::new(move |_| {
        let path = current_path(&pathname.get(), &search.get());
        guard::evaluate(&session.get(), role, &path)
    });

    install_redirect(move || decision.get().redirect_target().map(str::to_owned), use_navigate());

    view! {
        <Show
            when=move || decision.get().is_allowed()
            fallback=move || {
                view! {
                    <Show when=move || decision.get() == GuardDecision::Loading>
                        <p class="guard-pending">"Checking your session..."</p>
                    </Show>
                }
            }
        >
            {children()}
        </Show>
    }
}
