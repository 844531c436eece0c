//! Root application component with routing and the auth context provider.

use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};
use leptos_router::StaticSegment;
use leptos_router::components::{Route, Router, Routes};
use medportal::{Role, SessionStore};

use crate::components::require_role::RequireRole;
use crate::net::api::ApiGateway;
use crate::pages::{
    dashboard::DashboardPage, home::HomePage, sign_in::SignInPage, sign_up::SignUpPage,
    unauthorized::UnauthorizedPage,
};
use crate::state::auth::AuthContext;
use crate::util::storage::BrowserStorage;

/// Backend base URL baked in at build time; empty means same-origin.
const API_BASE_URL: &str = match option_env!("MEDPORTAL_API_BASE_URL") {
    Some(url) => url,
    None => "",
};

fn dashboard(role: Role) -> impl IntoView {
    view! {
        <RequireRole role=Some(role)>
            <DashboardPage role=role/>
        </RequireRole>
    }
}

/// Root application component.
///
/// Restores the cached session before the first route renders, then
/// revalidates the token in the background.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let auth = AuthContext::new(SessionStore::new(BrowserStorage, ApiGateway::new(API_BASE_URL)));
    provide_context(auth.clone());

    if let Some(ticket) = auth.restore() {
        leptos::task::spawn_local(async move { auth.revalidate(ticket).await });
    }

    view! {
        <Title text="MedPortal"/>

        <Router>
            <Routes fallback=|| "Page not found.".into_view()>
                <Route path=StaticSegment("") view=HomePage/>
                <Route path=StaticSegment("signin") view=SignInPage/>
                <Route path=StaticSegment("signup") view=SignUpPage/>
                <Route path=StaticSegment("unauthorized") view=UnauthorizedPage/>
                <Route
                    path=(StaticSegment("patient"), StaticSegment("dashboard"))
                    view=|| dashboard(Role::Patient)
                />
                <Route
                    path=(StaticSegment("doctor"), StaticSegment("dashboard"))
                    view=|| dashboard(Role::Doctor)
                />
                <Route
                    path=(StaticSegment("admin"), StaticSegment("dashboard"))
                    view=|| dashboard(Role::Admin)
                />
            </Routes>
        </Router>
    }
}
