//! Reusable UI components.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components read the shared `AuthContext` from Leptos context rather than
//! taking session props.

pub mod nav_bar;
pub mod require_role;
