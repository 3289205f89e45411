//! Shared domain types for the fourth-down dashboard.

pub mod config;
pub mod events;
pub mod form;
pub mod game;
pub mod recommendation;

mod errors;

pub use errors::{FourthDownError, Result};
