//! Neswara Common Library
//!
//! Wire types and permission names shared by the dashboard crates.

pub mod error;
pub mod permissions;
pub mod types;

pub use error::{Error, Result};
pub use types::*;
