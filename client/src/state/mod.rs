//! Shared client-side state.

pub mod auth;
