//! Shared Types

pub mod activity;
pub mod comment;
pub mod content;
pub mod page;
pub mod role;
pub mod user;

pub use activity::*;
pub use comment::*;
pub use content::*;
pub use page::*;
pub use role::*;
pub use user::*;
