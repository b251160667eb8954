//! Session state and core simulation types
//!
//! Everything a run owns lives in [`GameState`]; a new run is a plain reset
//! of this one aggregate, never a scavenger hunt through globals.

use std::collections::VecDeque;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::consts::*;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Waiting on the start command
    Start,
    /// Active gameplay; the only phase in which ticks advance
    Playing,
    /// Suspended by visibility loss
    Paused,
    /// Run ended
    GameOver,
}

/// Dragon form, derived from tail length every tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Evolution {
    Baby,
    Fire,
    Phoenix,
    Mythical,
}

impl Evolution {
    /// Stage for a given tail length. Thresholds are inclusive lower bounds
    /// checked highest-first.
    pub fn for_tail_length(tail_length: u32) -> Self {
        if tail_length >= MYTHICAL_THRESHOLD {
            Evolution::Mythical
        } else if tail_length >= PHOENIX_THRESHOLD {
            Evolution::Phoenix
        } else if tail_length >= FIRE_THRESHOLD {
            Evolution::Fire
        } else {
            Evolution::Baby
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Evolution::Baby => "Baby Dragon",
            Evolution::Fire => "Fire Dragon",
            Evolution::Phoenix => "Phoenix",
            Evolution::Mythical => "Mythical Dragon",
        }
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerupKind {
    Shield,
    Slowmo,
}

impl PowerupKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            PowerupKind::Shield => "Shield Active",
            PowerupKind::Slowmo => "Slow Motion",
        }
    }
}

/// Named audio cues emitted by the core
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    Jump,
    Collect,
    Crash,
    Ability,
}

impl SoundCue {
    /// Minimum ticks between two emissions of the same cue
    pub fn cooldown_ticks(self) -> u32 {
        match self {
            SoundCue::Jump => 10,
            SoundCue::Collect => 15,
            SoundCue::Crash => 30,
            SoundCue::Ability => 20,
        }
    }
}

/// Discrete events for external collaborators, drained once per frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// Rate-limited audio cue
    Cue(SoundCue),
    /// The dragon changed stage this tick
    Evolved(Evolution),
    /// A new best score to persist
    HighScore(u32),
    /// The run ended
    GameOver { score: u32 },
}

/// The player entity
#[derive(Debug, Clone)]
pub struct Dragon {
    /// x stays fixed; only y moves
    pub pos: Vec2,
    pub velocity: f32,
    /// Cosmetic, derived from velocity each tick (degrees)
    pub rotation: f32,
    pub width: f32,
    pub height: f32,
    pub evolution: Evolution,
    /// Non-decreasing within a run
    pub tail_length: u32,
}

impl Dragon {
    fn new(view_height: f32) -> Self {
        Self {
            pos: Vec2::new(DRAGON_X, view_height / 2.0),
            velocity: 0.0,
            rotation: 0.0,
            width: DRAGON_WIDTH,
            height: DRAGON_HEIGHT,
            evolution: Evolution::Baby,
            tail_length: 0,
        }
    }
}

/// One visible tail segment, rebuilt from history every tick
#[derive(Debug, Clone, Copy)]
pub struct TailSegment {
    pub pos: Vec2,
    pub size: f32,
}

/// A scrolling obstacle column with a vertical gap
#[derive(Debug, Clone)]
pub struct Obstacle {
    /// Left edge; decreases every tick
    pub x: f32,
    /// Top of the gap band
    pub gap_y: f32,
    pub gap_size: f32,
    /// Reserved; scoring is pickup-only
    pub passed: bool,
}

impl Obstacle {
    pub fn gap_center_y(&self) -> f32 {
        self.gap_y + self.gap_size / 2.0
    }

    /// Whether a y coordinate falls inside the gap band
    pub fn gap_contains(&self, y: f32) -> bool {
        y >= self.gap_y && y <= self.gap_y + self.gap_size
    }
}

/// A gem worth one point and one tail segment
#[derive(Debug, Clone)]
pub struct Collectible {
    pub pos: Vec2,
    pub size: f32,
    /// Cosmetic spin (degrees)
    pub rotation: f32,
}

/// An uncollected power-up drifting left
#[derive(Debug, Clone)]
pub struct Powerup {
    pub pos: Vec2,
    pub kind: PowerupKind,
    /// Cosmetic spin (degrees)
    pub rotation: f32,
    /// Cosmetic pulse phase (radians)
    pub pulse: f32,
}

/// A fire-breath projectile
#[derive(Debug, Clone)]
pub struct FireBreath {
    pub pos: Vec2,
    pub size: f32,
    /// Remaining ticks before it fizzles
    pub lifetime: u32,
}

/// The unlocked/available/active/cooldown quartet governing one ability.
///
/// Invariant: `available` and `cooldown > 0` are never simultaneously true.
#[derive(Debug, Clone)]
pub struct AbilityGate {
    pub unlocked: bool,
    pub available: bool,
    pub active: bool,
    pub cooldown: u32,
    max_cooldown: u32,
}

impl AbilityGate {
    pub fn new(max_cooldown: u32) -> Self {
        Self {
            unlocked: false,
            available: false,
            active: false,
            cooldown: 0,
            max_cooldown,
        }
    }

    /// One-way unlock; grants immediate availability
    pub fn unlock(&mut self) {
        if !self.unlocked {
            self.unlocked = true;
            self.available = true;
            self.cooldown = 0;
        }
    }

    /// Consume availability and start the cooldown. Returns false (and does
    /// nothing) while locked, on cooldown, or unavailable.
    pub fn try_activate(&mut self) -> bool {
        if self.unlocked && self.available && self.cooldown == 0 {
            self.available = false;
            self.cooldown = self.max_cooldown;
            true
        } else {
            false
        }
    }

    /// Activation imposed by a power-up: turns the ability on for `ticks`
    /// regardless of unlock state. Availability is consumed to keep the
    /// gate invariant; it comes back when the cooldown drains.
    pub fn force_activate(&mut self, ticks: u32) {
        self.active = true;
        self.available = false;
        self.cooldown = ticks;
    }

    /// Advance the cooldown one tick. Hitting zero clears `active` and, for
    /// an unlocked ability, restores availability.
    pub fn tick(&mut self) {
        if self.cooldown > 0 {
            self.cooldown -= 1;
            if self.cooldown == 0 {
                self.active = false;
                if self.unlocked {
                    self.available = true;
                }
            }
        }
    }

    /// Fraction of the cooldown still remaining, for HUD bars
    pub fn cooldown_fraction(&self) -> f32 {
        if self.max_cooldown == 0 {
            0.0
        } else {
            self.cooldown as f32 / self.max_cooldown as f32
        }
    }

    fn reset(&mut self) {
        self.unlocked = false;
        self.available = false;
        self.active = false;
        self.cooldown = 0;
    }
}

/// Both special abilities
#[derive(Debug, Clone)]
pub struct Abilities {
    pub fire: AbilityGate,
    pub shield: AbilityGate,
}

impl Abilities {
    fn new() -> Self {
        Self {
            fire: AbilityGate::new(FIRE_COOLDOWN_TICKS),
            shield: AbilityGate::new(SHIELD_COOLDOWN_TICKS),
        }
    }

    fn reset(&mut self) {
        self.fire.reset();
        self.shield.reset();
    }
}

/// The single in-effect power-up, at most one per run at a time
#[derive(Debug, Clone, Copy)]
pub struct ActiveEffect {
    pub kind: PowerupKind,
    pub remaining: u32,
}

/// Per-cue rate limiting so a burst of identical events can't flood the
/// audio sink
#[derive(Debug, Clone, Default)]
pub struct CueTimers {
    jump: u32,
    collect: u32,
    crash: u32,
    ability: u32,
}

impl CueTimers {
    fn slot(&mut self, cue: SoundCue) -> &mut u32 {
        match cue {
            SoundCue::Jump => &mut self.jump,
            SoundCue::Collect => &mut self.collect,
            SoundCue::Crash => &mut self.crash,
            SoundCue::Ability => &mut self.ability,
        }
    }

    pub fn tick(&mut self) {
        for t in [
            &mut self.jump,
            &mut self.collect,
            &mut self.crash,
            &mut self.ability,
        ] {
            *t = t.saturating_sub(1);
        }
    }
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    pub phase: GamePhase,
    pub score: u32,
    pub high_score: u32,
    /// 1.0 normally, halved while slow-motion is in effect
    pub speed_multiplier: f32,
    /// Play-area dimensions
    pub width: f32,
    pub height: f32,
    /// Ticks advanced this run
    pub time_ticks: u64,

    pub dragon: Dragon,
    /// Recent dragon positions, newest at the back
    pub tail_history: VecDeque<Vec2>,
    /// Projection of the history, rebuilt every tick
    pub tail: Vec<TailSegment>,

    pub obstacles: Vec<Obstacle>,
    pub collectibles: Vec<Collectible>,
    pub powerups: Vec<Powerup>,
    pub fire_breaths: Vec<FireBreath>,

    pub abilities: Abilities,
    pub active_powerup: Option<ActiveEffect>,

    pub obstacle_spawn_timer: u32,
    pub collectible_spawn_timer: u32,
    pub powerup_spawn_timer: u32,

    cue_timers: CueTimers,
    events: Vec<GameEvent>,

    pub(crate) rng: Pcg32,
    seed: u64,
}

impl GameState {
    /// Fresh session in the `Start` phase
    pub fn new(seed: u64, width: f32, height: f32) -> Self {
        Self {
            phase: GamePhase::Start,
            score: 0,
            high_score: 0,
            speed_multiplier: 1.0,
            width,
            height,
            time_ticks: 0,
            dragon: Dragon::new(height),
            tail_history: VecDeque::new(),
            tail: Vec::new(),
            obstacles: Vec::new(),
            collectibles: Vec::new(),
            powerups: Vec::new(),
            fire_breaths: Vec::new(),
            abilities: Abilities::new(),
            active_powerup: None,
            obstacle_spawn_timer: 0,
            collectible_spawn_timer: 0,
            powerup_spawn_timer: 0,
            cue_timers: CueTimers::default(),
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            seed,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// The single authoritative new-run operation. Returns every field of
    /// the run to its initial value; only the view size, the persisted high
    /// score, and the session RNG stream survive.
    pub fn reset(&mut self) {
        self.score = 0;
        self.speed_multiplier = 1.0;
        self.time_ticks = 0;
        self.dragon = Dragon::new(self.height);
        self.tail_history.clear();
        self.tail.clear();
        self.obstacles.clear();
        self.collectibles.clear();
        self.powerups.clear();
        self.fire_breaths.clear();
        self.abilities.reset();
        self.active_powerup = None;
        self.obstacle_spawn_timer = 0;
        self.collectible_spawn_timer = 0;
        self.powerup_spawn_timer = 0;
        self.cue_timers = CueTimers::default();
        self.events.clear();
    }

    /// Adopt a new play-area size, keeping the dragon at the same relative
    /// height
    pub fn resize(&mut self, width: f32, height: f32) {
        if self.height > 0.0 {
            self.dragon.pos.y = self.dragon.pos.y / self.height * height;
        }
        self.width = width;
        self.height = height;
    }

    /// Append the dragon's position to the tail history and trim the front
    /// once the buffer exceeds what the current tail length can consume
    pub fn record_tail(&mut self) {
        self.tail_history.push_back(self.dragon.pos);
        let cap = self.dragon.tail_length as usize * TAIL_STRIDE + TAIL_STRIDE;
        while self.tail_history.len() > cap {
            self.tail_history.pop_front();
        }
    }

    /// Rebuild the visible tail by sampling history at stride-spaced offsets
    /// back from the newest sample. Offsets that fall before the start of
    /// the buffer simply produce no segment this tick.
    pub fn rebuild_tail(&mut self) {
        self.tail.clear();
        for i in 0..self.dragon.tail_length as usize {
            let back = (i + 1) * TAIL_STRIDE;
            if back < self.tail_history.len() {
                let idx = self.tail_history.len() - 1 - back;
                self.tail.push(TailSegment {
                    pos: self.tail_history[idx],
                    size: TAIL_SEGMENT_SIZE,
                });
            }
        }
    }

    /// Emit a sound cue unless that cue type is still rate-limited
    pub fn emit_cue(&mut self, cue: SoundCue) {
        let slot = self.cue_timers.slot(cue);
        if *slot == 0 {
            *slot = cue.cooldown_ticks();
            self.events.push(GameEvent::Cue(cue));
        }
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub(crate) fn tick_cue_timers(&mut self) {
        self.cue_timers.tick();
    }

    /// Drain the events accumulated since the last call
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
