//! Presentation snapshot
//!
//! `ViewModel` is everything the page needs to draw itself after a state
//! change. It carries data only; markup and animation live in the page.

use crate::consts::SET_SIZE;
use crate::persistence::SavedSets;
use crate::sampler::Tier;

use super::state::{ConfettiPiece, Phase, ViewState};
use super::strings;

/// One ball on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BallView {
    pub number: u8,
    pub tier: Tier,
    /// Render with the spin animation
    pub spinning: bool,
}

/// A button's label and enabled state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonView {
    pub label: &'static str,
    pub enabled: bool,
}

/// One saved set in the list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedRow {
    /// 1-based position
    pub seq: usize,
    pub balls: Vec<BallView>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewModel {
    pub phase: Phase,
    /// 0 or 6 balls
    pub balls: Vec<BallView>,
    /// Shown instead of balls when none are drawn
    pub placeholder: Option<&'static str>,
    pub spin_button: ButtonView,
    /// Present only when a finished set is on display
    pub save_button: Option<ButtonView>,
    /// Header caption, present only with saved sets
    pub saved_caption: Option<String>,
    pub saved_rows: Vec<SavedRow>,
    pub retention_note: String,
    pub delete_modal: bool,
    pub toast: Option<String>,
    pub confetti: Vec<ConfettiPiece>,
}

impl ViewModel {
    pub fn build(state: &ViewState, saved: &SavedSets, expiry_days: u32) -> Self {
        let spinning = state.phase == Phase::Spinning;

        let balls = if state.displayed.len() == SET_SIZE {
            state
                .displayed
                .iter()
                .map(|&number| BallView {
                    number,
                    tier: Tier::of(number),
                    spinning,
                })
                .collect()
        } else {
            Vec::new()
        };

        let spin_button = if spinning {
            ButtonView {
                label: strings::SPIN_BUSY,
                enabled: false,
            }
        } else {
            ButtonView {
                label: strings::SPIN_IDLE,
                enabled: true,
            }
        };

        let save_button = match (state.phase, state.result) {
            (Phase::Result, Some(result)) if saved.contains(&result) => Some(ButtonView {
                label: strings::SAVE_DUPLICATE,
                enabled: false,
            }),
            (Phase::Result, Some(_)) => Some(ButtonView {
                label: strings::SAVE,
                enabled: true,
            }),
            _ => None,
        };

        let saved_rows = saved
            .iter()
            .enumerate()
            .map(|(i, set)| SavedRow {
                seq: i + 1,
                balls: set
                    .balls()
                    .map(|(number, tier)| BallView {
                        number,
                        tier,
                        spinning: false,
                    })
                    .collect(),
            })
            .collect();

        Self {
            phase: state.phase,
            placeholder: balls.is_empty().then_some(strings::EMPTY_PLACEHOLDER),
            balls,
            spin_button,
            save_button,
            saved_caption: (!saved.is_empty()).then(|| strings::saved_caption(saved.len())),
            saved_rows,
            retention_note: strings::retention_note(expiry_days),
            delete_modal: state.delete_confirm,
            toast: state.toast.as_ref().map(|t| t.message.clone()),
            confetti: state.confetti.clone(),
        }
    }
}
