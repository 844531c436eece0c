//! Networking for the auth REST API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` is the browser implementation of `medportal::AuthGateway`; the wire
//! contract itself lives in the core crate.

pub mod api;
