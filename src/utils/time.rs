//! Frame clock types.
//!
//! `std::time::Instant` panics on `wasm32-unknown-unknown`; the browser build
//! uses `web-time`, which exposes the same API backed by `performance.now()`.

#[cfg(not(target_arch = "wasm32"))]
pub use std::time::{Duration, Instant};

#[cfg(target_arch = "wasm32")]
pub use web_time::{Duration, Instant};
