//! Utility helpers shared across client UI modules.
//!
//! Browser calls live in `browser` so pages and components stay renderable
//! on the server; `forms` holds the submit gate shared by every form.

pub mod browser;
pub mod forms;
