//! Tests for the pieces the terminal front end is assembled from: key
//! mapping, command-line configuration and the event log.

use std::fs;

use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serial_test::serial;

use blockfall::config::Config;
use blockfall::event_log::EventLog;
use blockfall::game::{Command, GameEvent, GameStatus};
use blockfall::input::{map_key, should_quit};
use blockfall::piece::TetrominoType;

// ============================================================================
// Key Mapping Tests
// ============================================================================

mod key_mapping {
    use super::*;

    #[test]
    fn arrows_move_rotate_and_drop() {
        assert_eq!(map_key(KeyCode::Left), Some(Command::MoveLeft));
        assert_eq!(map_key(KeyCode::Right), Some(Command::MoveRight));
        assert_eq!(map_key(KeyCode::Down), Some(Command::SoftDrop));
        assert_eq!(map_key(KeyCode::Up), Some(Command::Rotate));
    }

    #[test]
    fn space_hard_drops() {
        assert_eq!(map_key(KeyCode::Char(' ')), Some(Command::HardDrop));
    }

    #[test]
    fn p_and_escape_toggle_pause() {
        assert_eq!(map_key(KeyCode::Char('p')), Some(Command::TogglePause));
        assert_eq!(map_key(KeyCode::Char('P')), Some(Command::TogglePause));
        assert_eq!(map_key(KeyCode::Esc), Some(Command::TogglePause));
    }

    #[test]
    fn enter_starts_new_game() {
        assert_eq!(map_key(KeyCode::Enter), Some(Command::StartNewGame));
        assert_eq!(map_key(KeyCode::Char('n')), Some(Command::StartNewGame));
    }

    #[test]
    fn unbound_keys_are_ignored() {
        assert_eq!(map_key(KeyCode::Char('x')), None);
        assert_eq!(map_key(KeyCode::Tab), None);
        assert_eq!(map_key(KeyCode::Char('q')), None);
    }

    #[test]
    fn quit_keys() {
        assert!(should_quit(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE)));
        assert!(should_quit(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(!should_quit(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE)));
        assert!(!should_quit(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)));
    }
}

// ============================================================================
// Configuration Tests
// ============================================================================

mod config {
    use super::*;

    #[test]
    fn defaults_start_immediately_without_log() {
        let config = Config::try_parse_from(["blockfall"]).unwrap();

        assert_eq!(config.seed, None);
        assert_eq!(config.event_log, None);
        assert_eq!(config.new_game().status(), GameStatus::Playing);
    }

    #[test]
    fn paused_start_waits_for_new_game() {
        let config = Config::try_parse_from(["blockfall", "--paused-start"]).unwrap();

        let game = config.new_game();

        assert_eq!(game.status(), GameStatus::NotStarted);
        assert!(game.active_piece().is_none());
    }

    #[test]
    fn seed_makes_games_repeatable() {
        let config = Config::try_parse_from(["blockfall", "--seed", "1234"]).unwrap();
        assert_eq!(config.seed, Some(1234));

        let mut a = config.new_game();
        let mut b = config.new_game();
        for _ in 0..4 {
            assert_eq!(
                a.active_piece().map(|p| p.tetromino_type),
                b.active_piece().map(|p| p.tetromino_type)
            );
            assert_eq!(a.next_piece_type(), b.next_piece_type());
            a.hard_drop();
            b.hard_drop();
        }
    }

    #[test]
    fn rejects_non_numeric_seed() {
        assert!(Config::try_parse_from(["blockfall", "--seed", "abc"]).is_err());
    }
}

// ============================================================================
// Event Log Tests
// ============================================================================

mod event_log {
    use super::*;

    fn parse_lines(bytes: &[u8]) -> Vec<serde_json::Value> {
        std::str::from_utf8(bytes)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn writes_one_json_object_per_event() {
        let mut log = EventLog::new(Vec::new());

        log.record(
            std::time::Duration::from_millis(42),
            &[
                GameEvent::GameStarted,
                GameEvent::LinesCleared(2),
                GameEvent::HardDropped { rows: 7 },
                GameEvent::PieceLocked(TetrominoType::S),
            ],
        )
        .unwrap();

        let records = parse_lines(&log.into_inner());
        assert_eq!(records.len(), 4);
        assert_eq!(records[0]["elapsed_ms"], 42);
        assert_eq!(records[0]["event"], "GameStarted");
        assert_eq!(records[1]["event"]["LinesCleared"], 2);
        assert_eq!(records[2]["event"]["HardDropped"]["rows"], 7);
        assert_eq!(records[3]["event"]["PieceLocked"], "S");
    }

    #[test]
    fn empty_batch_writes_nothing() {
        let mut log = EventLog::new(Vec::new());
        log.record(std::time::Duration::ZERO, &[]).unwrap();
        assert!(log.into_inner().is_empty());
    }

    fn shared_log_path() -> std::path::PathBuf {
        std::env::temp_dir().join("blockfall-event-log-test.jsonl")
    }

    #[test]
    #[serial]
    fn file_log_is_flushed_to_disk() {
        let path = shared_log_path();
        let _ = fs::remove_file(&path);

        let mut log = EventLog::create(&path).unwrap();
        log.record(std::time::Duration::from_millis(5), &[GameEvent::Paused])
            .unwrap();
        log.record(std::time::Duration::from_millis(9), &[GameEvent::Unpaused])
            .unwrap();
        log.flush().unwrap();

        let records = parse_lines(&fs::read(&path).unwrap());
        assert_eq!(records.len(), 2);
        assert_eq!(records[1]["event"], "Unpaused");
        assert_eq!(records[1]["elapsed_ms"], 9);

        let _ = fs::remove_file(&path);
    }

    #[test]
    #[serial]
    fn create_truncates_previous_log() {
        let path = shared_log_path();
        fs::write(&path, "stale line\nanother\n").unwrap();

        let mut log = EventLog::create(&path).unwrap();
        log.record(std::time::Duration::ZERO, &[GameEvent::GameOver])
            .unwrap();
        log.flush().unwrap();

        let records = parse_lines(&fs::read(&path).unwrap());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["event"], "GameOver");

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn create_fails_for_missing_directory() {
        let path = std::env::temp_dir()
            .join("blockfall-no-such-dir")
            .join("events.jsonl");

        let err = EventLog::create(&path).err().unwrap();

        assert!(err.to_string().contains("failed to create event log"));
    }
}
