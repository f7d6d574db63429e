//! # client
//!
//! Leptos front end for the account area: header, login and signup forms,
//! my page with nickname and profile image editing.
//!
//! Rendered on the server (`ssr`) and hydrated in the browser (`hydrate`).
//! Browser-only code (fetch, alerts, file handles, timers) is gated on the
//! `hydrate` feature; the pure state machines compile and test everywhere.

pub mod app;
pub mod components;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// WASM entry point: attach to the server-rendered body.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::hydrate_body(app::App);
}
