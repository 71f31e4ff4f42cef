//! Transient view state
//!
//! Nothing here is persisted; it resets on every page load.

use crate::consts::CONFETTI_COUNT;
use crate::sampler::{NumberSet, NumberSource};

use super::timers::TimerHandle;

/// Primary state of the widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Nothing drawn yet
    #[default]
    Idle,
    /// Balls reshuffling, real draw pending
    Spinning,
    /// A real set is on display
    Result,
}

/// Toast currently on screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    /// Dismissal timer; only this handle may hide the toast
    pub dismiss: TimerHandle,
}

/// Confetti palette (CSS classes)
pub const CONFETTI_COLORS: [&str; 5] = [
    "confetti-yellow",
    "confetti-red",
    "confetti-blue",
    "confetti-green",
    "confetti-purple",
];

/// One decorative confetti particle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfettiPiece {
    /// Horizontal start position (% of width)
    pub left_pct: f64,
    /// Animation delay (s), [0, 2)
    pub delay_s: f64,
    /// Fall duration (s), [3, 5)
    pub duration_s: f64,
    /// Index into [`CONFETTI_COLORS`]
    pub color: usize,
}

impl ConfettiPiece {
    pub fn color_class(&self) -> &'static str {
        CONFETTI_COLORS[self.color % CONFETTI_COLORS.len()]
    }
}

/// A burst of confetti
pub fn confetti_burst(jitter: &mut dyn NumberSource) -> Vec<ConfettiPiece> {
    (0..CONFETTI_COUNT)
        .map(|_| ConfettiPiece {
            left_pct: jitter.next_unit() * 100.0,
            delay_s: jitter.next_unit() * 2.0,
            duration_s: 3.0 + jitter.next_unit() * 2.0,
            color: ((jitter.next_unit() * CONFETTI_COLORS.len() as f64) as usize)
                .min(CONFETTI_COLORS.len() - 1),
        })
        .collect()
}

/// Everything the widget shows that is not saved
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub phase: Phase,
    /// Balls on display: empty, a preview (may repeat) or the result
    pub displayed: Vec<u8>,
    /// The real draw, once resolved
    pub result: Option<NumberSet>,
    /// Empty unless confetti is showing
    pub confetti: Vec<ConfettiPiece>,
    pub delete_confirm: bool,
    pub toast: Option<Toast>,
    pub preview_timer: Option<TimerHandle>,
    pub resolve_timer: Option<TimerHandle>,
}

impl ViewState {
    pub fn confetti_visible(&self) -> bool {
        !self.confetti.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::{RngSource, ScriptedSource};

    #[test]
    fn test_confetti_ranges() {
        let pieces = confetti_burst(&mut RngSource::seeded(5));
        assert_eq!(pieces.len(), CONFETTI_COUNT);
        for p in &pieces {
            assert!((0.0..100.0).contains(&p.left_pct));
            assert!((0.0..2.0).contains(&p.delay_s));
            assert!((3.0..5.0).contains(&p.duration_s));
            assert!(p.color < CONFETTI_COLORS.len());
        }
    }

    #[test]
    fn test_confetti_color_clamped() {
        let pieces = confetti_burst(&mut ScriptedSource::with_units(vec![1], vec![0.9999999]));
        assert!(pieces.iter().all(|p| p.color_class() == "confetti-purple"));
    }
}
