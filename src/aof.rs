//! Append-only persistence. Every successful write command is recorded as a
//! newline-delimited JSON entry; on startup the log is replayed through the
//! regular command path to reconstruct the store.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::commands;
use crate::store::Store;
use crate::Error;

#[derive(Debug, Serialize, Deserialize)]
pub struct LogEntry {
    /// Nanoseconds since the Unix epoch when the command was applied.
    pub ts: i64,
    pub cmd: String,
    pub args: Vec<String>,
}

pub struct Aof {
    writer: Mutex<BufWriter<File>>,
}

impl Aof {
    /// Opens the log for appending, creating it if it does not exist.
    pub fn open(path: &Path) -> Result<Aof, Error> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Aof {
            writer: Mutex::new(BufWriter::new(file)),
        })
    }

    /// Replays an existing log into `store`, returning the number of entries
    /// applied. A missing file is an empty log. Corrupt lines are skipped
    /// with a warning so a truncated tail does not block startup.
    pub fn load(path: &Path, store: &Store) -> Result<usize, Error> {
        if !path.exists() {
            return Ok(0);
        }

        let reader = BufReader::new(File::open(path)?);
        let mut applied = 0;

        for (line_number, line) in reader.lines().enumerate() {
            let line = line?;
            if line.is_empty() {
                continue;
            }

            let entry: LogEntry = match serde_json::from_str(&line) {
                Ok(entry) => entry,
                Err(err) => {
                    warn!("Skipping corrupt log entry at line {}: {}", line_number + 1, err);
                    continue;
                }
            };

            let args = entry.args.into_iter().map(Bytes::from).collect();
            commands::execute(store, &entry.cmd, args);
            applied += 1;
        }

        Ok(applied)
    }

    pub fn append(&self, cmd: &str, args: &[Bytes]) -> Result<(), Error> {
        let entry = LogEntry {
            ts: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as i64)
                .unwrap_or(0),
            cmd: cmd.to_string(),
            args: args
                .iter()
                .map(|a| String::from_utf8_lossy(a).into_owned())
                .collect(),
        };

        let mut writer = self.writer.lock().unwrap();
        serde_json::to_writer(&mut *writer, &entry)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }
}
