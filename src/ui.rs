//! Read-only projection of [`GameState`] for the UI sink
//!
//! The HUD consumes derived values only; building them here keeps the DOM
//! glue dumb and the formatting testable off-browser.

use crate::consts::TICKS_PER_SECOND;
use crate::sim::{AbilityGate, GameState};

/// One ability's HUD line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AbilityHud {
    pub unlocked: bool,
    pub available: bool,
    /// 0.0 (ready) to 1.0 (cooldown just started)
    pub cooldown_fraction: f32,
}

impl AbilityHud {
    fn from_gate(gate: &AbilityGate) -> Self {
        Self {
            unlocked: gate.unlocked,
            available: gate.available,
            cooldown_fraction: gate.cooldown_fraction(),
        }
    }
}

/// The active power-up banner, if any
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerupHud {
    pub name: &'static str,
    /// Whole seconds left, rounded up
    pub remaining_secs: u32,
}

/// Everything the HUD shows, derived fresh each frame
#[derive(Debug, Clone, PartialEq)]
pub struct HudModel {
    pub score: u32,
    pub high_score: u32,
    pub evolution_name: &'static str,
    pub fire: AbilityHud,
    pub shield: AbilityHud,
    pub powerup: Option<PowerupHud>,
}

impl HudModel {
    pub fn from_state(state: &GameState) -> Self {
        Self {
            score: state.score,
            high_score: state.high_score,
            evolution_name: state.dragon.evolution.display_name(),
            fire: AbilityHud::from_gate(&state.abilities.fire),
            shield: AbilityHud::from_gate(&state.abilities.shield),
            powerup: state.active_powerup.map(|effect| PowerupHud {
                name: effect.kind.display_name(),
                remaining_secs: effect.remaining.div_ceil(TICKS_PER_SECOND),
            }),
        }
    }
}
