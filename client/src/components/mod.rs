//! Reusable UI component modules.
//!
//! Components read the session store, sync service and modal from Leptos
//! context; page-specific data arrives as props.

pub mod header;
pub mod logout_button;
pub mod modal;
pub mod nickname_form;
pub mod profile_img_upload;
