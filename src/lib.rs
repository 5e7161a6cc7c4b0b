pub mod board;
pub mod config;
pub mod controller;
pub mod event_log;
pub mod game;
pub mod input;
pub mod piece;
pub mod scheduler;
pub mod scoring;
