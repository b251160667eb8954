//! Dragon Glide - an evolving-dragon side-scrolling arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, tail, collisions, game state)
//! - `ui`: Pure projection of game state for the HUD
//! - `renderer`: Canvas-2D rendering (wasm only)
//! - `audio`: Web Audio cue playback (wasm only)
//! - `highscores`: Persisted best score
//! - `settings`: Player preferences

pub mod highscores;
pub mod settings;
pub mod sim;
pub mod ui;

#[cfg(target_arch = "wasm32")]
pub mod audio;
#[cfg(target_arch = "wasm32")]
pub mod renderer;

pub use highscores::HighScore;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Dragon's fixed horizontal position
    pub const DRAGON_X: f32 = 150.0;
    pub const DRAGON_WIDTH: f32 = 120.0;
    pub const DRAGON_HEIGHT: f32 = 120.0;
    /// Downward acceleration per tick
    pub const GRAVITY: f32 = 0.1;
    /// Velocity assigned (not added) on a jump command
    pub const JUMP_STRENGTH: f32 = -5.0;
    /// Rotation is velocity scaled by this, clamped to the range below (degrees)
    pub const ROTATION_SCALE: f32 = 3.0;
    pub const ROTATION_MIN_DEG: f32 = -30.0;
    pub const ROTATION_MAX_DEG: f32 = 90.0;

    /// Tail segment diameter
    pub const TAIL_SEGMENT_SIZE: f32 = 20.0;
    /// Ticks between successive tail segments when sampling history
    pub const TAIL_STRIDE: usize = 5;

    /// Obstacle column width
    pub const OBSTACLE_WIDTH: f32 = 80.0;
    /// Vertical gap the dragon must pass through
    pub const OBSTACLE_GAP: f32 = 300.0;
    pub const MIN_OBSTACLE_GAP: f32 = 200.0;
    /// Leftward scroll speed, pixels per tick (before the speed multiplier)
    pub const OBSTACLE_SPEED: f32 = 3.0;
    pub const OBSTACLE_SPAWN_INTERVAL: u32 = 150;

    pub const COLLECTIBLE_SIZE: f32 = 25.0;
    pub const COLLECTIBLE_SPAWN_INTERVAL: u32 = 200;

    pub const POWERUP_SIZE: f32 = 30.0;
    /// Rare spawns
    pub const POWERUP_SPAWN_INTERVAL: u32 = 800;
    /// Probability gate applied once the interval has elapsed
    pub const POWERUP_SPAWN_CHANCE: f64 = 0.3;
    /// How long a collected power-up stays in effect (3 s at 60 fps)
    pub const POWERUP_DURATION_TICKS: u32 = 180;
    /// Speed multiplier while slow-motion is active
    pub const SLOWMO_MULTIPLIER: f32 = 0.5;

    /// Fire breath cooldown (5 s at 60 fps)
    pub const FIRE_COOLDOWN_TICKS: u32 = 300;
    /// Shield duration doubles as its cooldown (3 s at 60 fps)
    pub const SHIELD_COOLDOWN_TICKS: u32 = 180;

    /// Projectile speed, pixels per tick (never scaled by the multiplier)
    pub const FIRE_BREATH_SPEED: f32 = 8.0;
    pub const FIRE_BREATH_SIZE: f32 = 15.0;
    pub const FIRE_BREATH_LIFETIME: u32 = 100;

    /// Spawn-safety exclusion radius around the dragon
    pub const SAFE_RADIUS_DRAGON: f32 = 100.0;
    /// Spawn-safety exclusion radius around each tail segment
    pub const SAFE_RADIUS_TAIL: f32 = 80.0;
    /// Horizontal distance within which a candidate must sit inside an obstacle's gap
    pub const SAFE_OBSTACLE_MARGIN: f32 = 100.0;

    /// Fraction shaved off the dragon's box on both axes for obstacle hits
    pub const COLLISION_REDUCTION: f32 = 0.3;

    /// Evolution thresholds, inclusive lower bounds on tail length
    pub const FIRE_THRESHOLD: u32 = 5;
    pub const PHOENIX_THRESHOLD: u32 = 12;
    pub const MYTHICAL_THRESHOLD: u32 = 20;

    /// Display-time conversion for remaining-duration readouts
    pub const TICKS_PER_SECOND: u32 = 60;
}
