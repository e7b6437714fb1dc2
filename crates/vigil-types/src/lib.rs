//! Vigil Types - Shared domain types
//!
//! This crate contains the domain types used across Vigil services:
//! - User identity
//! - Token pairs returned by the lifecycle manager

pub mod token;
pub mod user;

pub use token::*;
pub use user::*;
