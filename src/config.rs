use std::path::PathBuf;

use clap::Parser;

use crate::game::Game;

#[derive(Debug, Clone, Default, Parser)]
#[command(author, version, about = "Terminal falling-block puzzle", long_about = None)]
pub struct Config {
    /// Seed for the piece sequence; the same seed deals the same pieces
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write game events as JSON lines to this file
    #[arg(long, value_name = "PATH")]
    pub event_log: Option<PathBuf>,

    /// Wait on the title screen instead of starting the first game
    #[arg(long)]
    pub paused_start: bool,
}

impl Config {
    /// A fresh game dealing from the configured seed, started unless
    /// `paused_start` is set.
    pub fn new_game(&self) -> Game {
        let mut game = match self.seed {
            Some(seed) => Game::with_seed(seed),
            None => Game::new(),
        };
        if !self.paused_start {
            game.start_new_game();
        }
        game
    }
}
