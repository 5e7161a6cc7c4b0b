use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::game::GameEvent;

#[derive(Serialize)]
struct Record<'a> {
    elapsed_ms: u64,
    event: &'a GameEvent,
}

/// JSON-lines sink for game events. Diagnostics only; nothing reads it back.
pub struct EventLog<W: Write> {
    out: W,
}

impl EventLog<BufWriter<File>> {
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("failed to create event log {}", path.display()))?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> EventLog<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn record(&mut self, elapsed: Duration, events: &[GameEvent]) -> Result<()> {
        for event in events {
            let record = Record {
                elapsed_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
                event,
            };
            serde_json::to_writer(&mut self.out, &record).context("failed to encode event")?;
            self.out.write_all(b"\n").context("failed to write event log")?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.out.flush().context("failed to flush event log")
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
