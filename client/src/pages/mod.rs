//! Page modules for route-level screens.
//!
//! Each page owns its form state and action calls and delegates shared
//! chrome to `components`.

pub mod home;
pub mod login;
pub mod mypage;
pub mod signup;
