//! Utility helpers shared across client UI modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! `storage` isolates the `localStorage` glue; `auth` holds the pure
//! navigation rules pages apply around sign-in.

pub mod auth;
pub mod storage;
