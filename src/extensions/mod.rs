//! Handler groups compiled into the server.
//!
//! A group only serves traffic when a manifest in the extensions directory
//! names it.

pub mod trivia;

pub use trivia::Trivia;
