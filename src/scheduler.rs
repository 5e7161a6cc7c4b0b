use std::time::{Duration, Instant};

use crate::game::Game;

// Timing (in milliseconds)
const BASE_TICK_MS: u64 = 1000;
const MIN_TICK_MS: u64 = 100;
const SPEED_INCREASE_PER_LEVEL: u64 = 100;

/// Gravity period for `level`: 100ms faster per level, never below 100ms.
pub fn gravity_interval(level: u32) -> Duration {
    let speed_reduction = u64::from(level.saturating_sub(1)) * SPEED_INCREASE_PER_LEVEL;
    Duration::from_millis(BASE_TICK_MS.saturating_sub(speed_reduction).max(MIN_TICK_MS))
}

/// The state the timer was last armed for. Any change re-arms it.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Arming {
    started: bool,
    level: u32,
    paused: bool,
    game_over: bool,
}

impl Arming {
    fn of(game: &Game) -> Self {
        Self {
            started: game.is_started(),
            level: game.level(),
            paused: game.is_paused(),
            game_over: game.is_game_over(),
        }
    }
}

/// One recurring gravity timer. It is torn down and re-created whenever the
/// game's level, pause or game-over flag changes, so the new period applies
/// from the next tick. Missed ticks are never replayed.
#[derive(Debug, Default)]
pub struct GravityTimer {
    armed_for: Option<Arming>,
    period: Duration,
    deadline: Option<Instant>,
}

impl GravityTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-arms the timer if the game's timing-relevant state changed since
    /// the last call.
    pub fn sync(&mut self, game: &Game, now: Instant) {
        let arming = Arming::of(game);
        if self.armed_for == Some(arming) {
            return;
        }
        self.armed_for = Some(arming);
        self.period = gravity_interval(game.level());
        self.deadline = game.gravity_active().then(|| now + self.period);
    }

    /// Reports whether a tick is due. A due tick schedules the following one a
    /// full period from `now`.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = Some(now + self.period);
                true
            }
            _ => false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Time left before the next tick, or `None` while stopped.
    pub fn time_until_tick(&self, now: Instant) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(now))
    }
}
