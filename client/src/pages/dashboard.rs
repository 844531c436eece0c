//! Role landing pages. Routed behind `RequireRole`, so a user is present.

use leptos::prelude::*;
use medportal::Role;

use crate::components::nav_bar::NavBar;
use crate::state::auth::AuthContext;

fn blurb(role: Role) -> &'static str {
    match role {
        Role::Patient => "View your appointments, prescriptions and test results.",
        Role::Doctor => "Review today's schedule and your patients' records.",
        Role::Admin => "Manage staff accounts and portal settings.",
    }
}

#[component]
pub fn DashboardPage(role: Role) -> impl IntoView {
    let session = expect_context::<AuthContext>().session();
    let greeting = move || {
        session
            .get()
            .user
            .map(|u| format!("Welcome, {}", u.display_name()))
            .unwrap_or_default()
    };

    view! {
        <NavBar/>
        <main class="dashboard">
            <h1>{format!("{} Dashboard", role.label())}</h1>
            <p class="dashboard__greeting">{greeting}</p>
            <p class="dashboard__blurb">{blurb(role)}</p>
        </main>
    }
}
