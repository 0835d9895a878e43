//! Tic-stamped record of what happened during a run.
//!
//! World events and sound cues are drained into the log at the end of each
//! tic. The log serializes to JSON lines:
//!
//! ```text
//! {"tic":3,"kind":"damaged","serial":7,"amount":12,"source":2}
//! {"tic":3,"kind":"sound","serial":7,"sound":"popain"}
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use thing_core::{Content, World, WorldEvent};

use crate::oracle::SoundCue;

/// One logged occurrence.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LogEvent {
    Spawned { serial: u32, template: String },
    Removed { serial: u32 },
    Damaged { serial: u32, amount: i32, source: Option<u32> },
    Killed { serial: u32, source: Option<u32> },
    Special { serial: u32, tag: i32 },
    Exit { serial: u32 },
    /// `serial` is absent when the emitter was removed in the same tic.
    Sound { serial: Option<u32>, sound: String },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    pub tic: u64,
    #[serde(flatten)]
    pub event: LogEvent,
}

#[derive(Clone, Debug, Default)]
pub struct EventLog {
    entries: Vec<LogEntry>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries of one tic.
    pub fn at(&self, tic: u64) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter().filter(move |entry| entry.tic == tic)
    }

    pub fn count(&self, matches: impl Fn(&LogEvent) -> bool) -> usize {
        self.entries.iter().filter(|entry| matches(&entry.event)).count()
    }

    /// Appends everything the world and the sound sink recorded during `tic`.
    pub(crate) fn absorb(
        &mut self,
        tic: u64,
        content: &Content,
        world: &mut World,
        sounds: Vec<SoundCue>,
    ) {
        for event in world.drain_events() {
            let event = match event {
                WorldEvent::Spawned { serial, template } => LogEvent::Spawned {
                    serial,
                    template: content
                        .templates
                        .get(template)
                        .map_or_else(|| template.0.to_string(), |t| t.name.clone()),
                },
                WorldEvent::Removed { serial } => LogEvent::Removed { serial },
                WorldEvent::Damaged {
                    serial,
                    amount,
                    source,
                } => LogEvent::Damaged {
                    serial,
                    amount,
                    source,
                },
                WorldEvent::Killed { serial, source } => LogEvent::Killed { serial, source },
                WorldEvent::Special { serial, tag } => LogEvent::Special { serial, tag },
                WorldEvent::Exit { serial } => LogEvent::Exit { serial },
            };
            self.entries.push(LogEntry { tic, event });
        }
        for cue in sounds {
            self.entries.push(LogEntry {
                tic,
                event: LogEvent::Sound {
                    serial: world.serial(Some(cue.origin)),
                    sound: cue.sound,
                },
            });
        }
    }

    /// Writes the log as JSON lines.
    pub fn write_jsonl(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let file = File::create(path.as_ref())?;
        let mut out = BufWriter::new(file);
        for entry in &self.entries {
            serde_json::to_writer(&mut out, entry)?;
            out.write_all(b"\n")?;
        }
        out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_one_json_object_per_line() {
        let log = EventLog {
            entries: vec![
                LogEntry {
                    tic: 1,
                    event: LogEvent::Killed {
                        serial: 4,
                        source: Some(2),
                    },
                },
                LogEntry {
                    tic: 2,
                    event: LogEvent::Sound {
                        serial: None,
                        sound: "barexp".into(),
                    },
                },
            ],
        };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.jsonl");
        log.write_jsonl(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            r#"{"tic":1,"kind":"killed","serial":4,"source":2}"#
        );
        assert!(lines[1].contains(r#""sound":"barexp""#));
        assert_eq!(log.count(|event| matches!(event, LogEvent::Sound { .. })), 1);
    }
}
