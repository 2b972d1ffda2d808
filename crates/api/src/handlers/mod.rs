//! Request handlers.
//!
//! Handlers go through the `VideoStore` held in [`crate::state::AppState`]
//! and map errors via [`crate::error::AppError`].

pub mod statistics;
pub mod videos;
