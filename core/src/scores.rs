use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{self, Write as _};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of records shown on the high-score table.
pub const TOP_SCORES: usize = 3;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Could not access the score file")]
    Io(#[from] io::Error),
}

/// A won game, stored as one `name:seconds` line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub name: String,
    pub elapsed_secs: u64,
}

impl ScoreRecord {
    /// Line breaks in `name` are replaced so the record stays on one line.
    pub fn new(name: &str, elapsed_secs: u64) -> Self {
        let name = name.trim().replace(['\n', '\r'], " ");
        Self { name, elapsed_secs }
    }

    /// Parses a `name:seconds` line. Names may contain `:`, the time follows the last one.
    pub fn parse_line(line: &str) -> Option<Self> {
        let (name, elapsed) = line.trim_end_matches(['\n', '\r']).rsplit_once(':')?;
        let elapsed_secs = elapsed.trim().parse().ok()?;
        Some(Self {
            name: name.to_owned(),
            elapsed_secs,
        })
    }
}

impl fmt::Display for ScoreRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.elapsed_secs)
    }
}

/// Every recorded win, in file order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBoard {
    records: Vec<ScoreRecord>,
}

impl ScoreBoard {
    /// Reads one record per line, skipping lines that do not parse.
    pub fn parse(text: &str) -> Self {
        let records = text
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .filter_map(|(number, line)| {
                let record = ScoreRecord::parse_line(line);
                if record.is_none() {
                    log::warn!("Skipping malformed score record on line {}", number + 1);
                }
                record
            })
            .collect();
        Self { records }
    }

    pub fn records(&self) -> &[ScoreRecord] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Fastest `count` records; ties keep file order.
    pub fn top(&self, count: usize) -> Vec<&ScoreRecord> {
        let mut ranked: Vec<_> = self.records.iter().collect();
        ranked.sort_by_key(|record| record.elapsed_secs);
        ranked.truncate(count);
        ranked
    }
}

/// Append-only score file.
#[derive(Clone, Debug)]
pub struct ScoreStore {
    path: PathBuf,
}

impl ScoreStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file is an empty score board.
    pub fn load(&self) -> Result<ScoreBoard, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(ScoreBoard::parse(&text)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(ScoreBoard::default()),
            Err(err) => Err(err.into()),
        }
    }

    pub fn append(&self, record: &ScoreRecord) -> Result<(), StoreError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{record}")?;
        log::debug!("Recorded score {} in {}", record, self.path.display());
        Ok(())
    }
}
