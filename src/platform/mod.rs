//! Platform glue
//!
//! Browser input and page elements. Everything that touches `web_sys` is
//! compiled for wasm32 only; the state it feeds is plain Rust and testable
//! natively.

pub mod dom;
pub mod keyboard;

pub use keyboard::Keyboard;
