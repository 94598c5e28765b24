//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Wall-clock time
//! - Play-area measurement and frame output ([`Surface`](crate::sim::Surface) impls)
//! - Input wiring (web only)

pub mod headless;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use headless::{Autopilot, HeadlessSurface, run_demo};

/// Milliseconds since the Unix epoch
#[cfg(target_arch = "wasm32")]
pub fn wall_clock_ms() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn wall_clock_ms() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}
