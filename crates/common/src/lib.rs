//! Shared error plumbing: the [`FromMessage`] trait and the [`impl_context!`]
//! macro that gives each crate its own `Context` extension trait.

pub mod error;

pub use error::FromMessage;
