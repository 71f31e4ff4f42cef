//! Lucky Lotto - A lottery number generator widget
//!
//! Core modules:
//! - `sampler`: Number draws (6 distinct numbers in [1, 45]) and tiers
//! - `persistence`: Saved sets mirrored into a 30-day cookie
//! - `renderer`: Ticket-style raster image of the saved sets
//! - `app`: View state machine (spin, save, delete, download, toasts)
//! - `platform`: Browser adapters (cookies, timers, canvas, downloads)

pub mod app;
pub mod error;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod sampler;
pub mod settings;

pub use app::{LottoApp, Phase, ViewModel};
pub use error::{RenderError, SaveRejection, SetError, StoreError};
pub use persistence::{SavedSets, SetStore};
pub use sampler::{NumberSet, Sampler, Tier};
pub use settings::Settings;

/// Widget configuration constants
pub mod consts {
    /// Numbers per set
    pub const SET_SIZE: usize = 6;
    /// Lowest drawable number
    pub const MIN_NUMBER: u8 = 1;
    /// Highest drawable number
    pub const MAX_NUMBER: u8 = 45;

    /// Preview reshuffle period while spinning (ms)
    pub const PREVIEW_TICK_MS: u32 = 100;
    /// Spin duration before the real draw (ms)
    pub const SPIN_DURATION_MS: u32 = 2000;
    /// Toast visibility (ms)
    pub const TOAST_DURATION_MS: u32 = 3000;

    /// Cookie holding the saved sets
    pub const COOKIE_NAME: &str = "lottoSets";
    /// Saved sets survive this many days without a new save
    pub const COOKIE_EXPIRY_DAYS: u32 = 30;

    /// Confetti pieces shown when a spin resolves
    pub const CONFETTI_COUNT: usize = 50;
}
