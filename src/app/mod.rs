//! View state machine
//!
//! Owns the saved sets and all transient UI state, drives the sampler and
//! the ticket renderer, and exposes a `ViewModel` after every change.
//! Time, storage, drawing and downloads come in through seams so the whole
//! machine runs (and is tested) without a browser.

pub mod host;
pub mod machine;
pub mod state;
pub mod strings;
pub mod timers;
pub mod view;

pub use host::{HeadlessHost, Host};
pub use machine::LottoApp;
pub use state::{ConfettiPiece, Phase, Toast, ViewState};
pub use timers::{ManualScheduler, Scheduler, TimerHandle, TimerKind};
pub use view::{BallView, ButtonView, SavedRow, ViewModel};
