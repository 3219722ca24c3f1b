//! Score files: a song plus tick-stamped channel events.
//!
//! ```json
//! {
//!   "song": { "instruments": [...], "wavetables": [...] },
//!   "length": 240,
//!   "events": [
//!     { "tick": 0, "channel": 0, "command": { "instrument": { "index": 0 } } },
//!     { "tick": 0, "channel": 0, "command": { "note_on": { "note": 60 } } },
//!     { "tick": 30, "channel": 0, "effect": 16, "value": 1 },
//!     { "tick": 60, "channel": 0, "command": "note_off" }
//!   ]
//! }
//! ```

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use scc_common::{Song, CHANNEL_COUNT};
use scc_driver::Command;

/// What an event does to its channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Action {
    /// A driver command.
    Command {
        /// The command.
        command: Command,
    },
    /// An effect column entry.
    Effect {
        /// Effect code.
        effect: u8,
        /// Effect value.
        value: u8,
    },
}

/// One event on one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Event {
    /// Song tick the event fires on, before that tick is processed.
    pub tick: u32,
    /// Target channel.
    pub channel: usize,
    /// What happens.
    #[serde(flatten)]
    pub action: Action,
}

/// A song and the events that play it.
#[derive(Debug, Clone, Deserialize)]
pub struct Score {
    /// Instruments and wavetables.
    #[serde(default)]
    pub song: Song,
    /// Number of ticks to render; defaults to one second past the last event.
    #[serde(default)]
    pub length: Option<u32>,
    /// Events, in any order.
    #[serde(default)]
    pub events: Vec<Event>,
}

impl Score {
    /// Parse and check a score, sorting its events by tick.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut score: Score = serde_json::from_str(json).context("invalid score JSON")?;
        score.song.validate().context("invalid song in score")?;
        if let Some(event) = score.events.iter().find(|e| e.channel >= CHANNEL_COUNT) {
            bail!(
                "event at tick {} targets channel {}, the SCC has {CHANNEL_COUNT}",
                event.tick,
                event.channel
            );
        }
        score.events.sort_by_key(|e| e.tick);
        Ok(score)
    }

    /// Load a score from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_json(&text)
    }

    /// Ticks to render at `tick_rate` Hz.
    pub fn length_ticks(&self, tick_rate: u32) -> u32 {
        self.length.unwrap_or_else(|| {
            self.events
                .last()
                .map_or(0, |e| e.tick + 1)
                .saturating_add(tick_rate)
        })
    }
}
