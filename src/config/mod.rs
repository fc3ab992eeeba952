//! Configuration constants
//!
//! Built-in defaults and upstream URLs. User configuration layered on top of
//! these lives in [`crate::core::settings`].

pub mod defaults;
pub mod urls;
