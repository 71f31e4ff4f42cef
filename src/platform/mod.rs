//! Platform abstraction layer
//!
//! Browser implementations of the app's seams:
//! - Cookies (`document.cookie`)
//! - Timers (`setTimeout`/`setInterval`)
//! - Ticket canvas and download link
//!
//! Native builds use the in-memory versions in `persistence`, `app` and
//! `renderer` instead.

#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(target_arch = "wasm32")]
pub use web::{BrowserHost, BrowserScheduler, CanvasSurface, DocumentCookies, TimerDispatch};
