//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod advice;
pub mod budget;
pub mod chat;
pub mod insights;
pub mod onboarding;
pub mod reference;
pub mod sessions;

// Re-export all handlers for use in router
pub use advice::*;
pub use budget::*;
pub use chat::*;
pub use insights::*;
pub use onboarding::*;
pub use reference::*;
pub use sessions::*;
