//! Single-threaded command dispatch.
//!
//! Key presses and gravity ticks are both queued as [`Command`]s and applied
//! one at a time, each to completion, in arrival order.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::game::{Command, Game, GameEvent};
use crate::scheduler::GravityTimer;

pub struct GameController {
    game: Game,
    timer: GravityTimer,
    queue: VecDeque<Command>,
}

impl GameController {
    pub fn new(game: Game, now: Instant) -> Self {
        let mut timer = GravityTimer::new();
        timer.sync(&game, now);
        Self {
            game,
            timer,
            queue: VecDeque::new(),
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn timer(&self) -> &GravityTimer {
        &self.timer
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Queues a command from the input layer.
    pub fn submit(&mut self, command: Command) {
        self.queue.push_back(command);
    }

    /// Queues a gravity tick if one is due, then drains the queue. Returns the
    /// events produced by everything that ran.
    pub fn advance(&mut self, now: Instant) -> Vec<GameEvent> {
        if self.timer.poll(now) {
            self.queue.push_back(Command::SoftDrop);
        }
        while let Some(command) = self.queue.pop_front() {
            self.game.apply(command);
            self.timer.sync(&self.game, now);
        }
        self.game.take_events()
    }

    /// How long the caller may block waiting for input before the next tick.
    pub fn time_until_tick(&self, now: Instant) -> Option<Duration> {
        self.timer.time_until_tick(now)
    }
}
