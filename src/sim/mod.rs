//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per rendered frame, run to completion
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{
    circles_overlap, dragon_hits_obstacle, fire_hits_obstacle, is_safe_spawn_position,
};
pub use state::{
    Abilities, AbilityGate, ActiveEffect, Collectible, Dragon, Evolution, FireBreath, GameEvent,
    GamePhase, GameState, Obstacle, Powerup, PowerupKind, SoundCue, TailSegment,
};
pub use tick::{jump, pause, restart, resume, start, tick, use_fire_breath, use_shield};
