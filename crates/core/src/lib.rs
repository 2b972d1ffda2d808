//! Domain core for tracking video-watching progress.
//!
//! Holds the entity types, the progress lifecycle engine, the list
//! presentation pipeline and the store seam. Nothing in this crate performs
//! I/O directly; persistence is reached through [`store::VideoStore`].

pub mod controller;
pub mod error;
pub mod lifecycle;
pub mod listing;
pub mod search;
pub mod statistics;
pub mod store;
pub mod types;
pub mod video;
