//! `/`: forwards to the right place once the session has resolved.

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::state::auth::AuthContext;
use crate::util::auth::{home_target, install_redirect};

#[component]
pub fn HomePage() -> impl IntoView {
    let session = expect_context::<AuthContext>().session();
    install_redirect(move || home_target(&session.get()).map(str::to_owned), use_navigate());

    view! { <p class="guard-pending">"Loading MedPortal..."</p> }
}
