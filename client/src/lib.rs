//! # medportal-web
//!
//! Leptos + WASM frontend for the MedPortal patient, doctor and admin
//! portals. Session state, role checks and the guard decision all come from
//! the `medportal` core; this crate adds the browser storage and fetch
//! backends, the reactive context and the pages.
//!
//! Built with the `csr` feature for the browser. Without it, browser calls
//! compile to stubs so the crate and its tests build natively.

pub mod app;
pub mod components;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// WASM entry point: install logging and mount the app.
#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Debug) {
        web_sys::console::warn_1(&format!("console logger unavailable: {e}").into());
    }
    leptos::mount::mount_to_body(app::App);
}
