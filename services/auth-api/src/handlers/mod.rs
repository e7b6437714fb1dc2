//! HTTP handlers

mod health;
mod tokens;

pub use health::{health, ready};
pub use tokens::{issue, logout, refresh, whoami};
