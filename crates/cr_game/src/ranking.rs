//! Top survival times, kept sorted and persisted as plain text.
//!
//! File format: decimal seconds separated by whitespace. We write one value per
//! line with shortest round-trip formatting so a reload reproduces the exact
//! floats. The file is rewritten in full on every save with no temp-file
//! rename, so a crash mid-write can leave it truncated.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub const DEFAULT_CAPACITY: usize = 10;

#[derive(Debug, Error)]
pub enum RankingError {
    #[error("failed to read rankings {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write rankings {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Survival times in seconds, longest first, at most `capacity` entries.
#[derive(Debug, Clone, PartialEq)]
pub struct Rankings {
    times: Vec<f32>,
    capacity: usize,
}

impl Rankings {
    pub fn new(capacity: usize) -> Self {
        Self {
            times: Vec::new(),
            capacity,
        }
    }

    pub fn from_unsorted(times: impl IntoIterator<Item = f32>, capacity: usize) -> Self {
        let mut rankings = Self {
            times: times.into_iter().filter(|t| t.is_finite()).collect(),
            capacity,
        };
        rankings.normalize();
        rankings
    }

    fn normalize(&mut self) {
        self.times.sort_by(|a, b| b.total_cmp(a));
        self.times.truncate(self.capacity);
    }

    /// Add a time and return its 0-based rank, or `None` if it did not make
    /// the board (or is not a finite number).
    pub fn insert(&mut self, time: f32) -> Option<usize> {
        if !time.is_finite() {
            return None;
        }
        // Ties go after existing equal entries.
        let index = self.times.partition_point(|&t| t >= time);
        if index >= self.capacity {
            return None;
        }
        self.times.insert(index, time);
        self.times.truncate(self.capacity);
        Some(index)
    }

    pub fn times(&self) -> &[f32] {
        &self.times
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for Rankings {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

/// Read whitespace-separated numbers. Like stream extraction, reading stops
/// at the first token that is not fully numeric, keeping any numeric prefix
/// of that token (`"12.5abc"` yields 12.5).
pub fn parse_rankings(text: &str) -> Vec<f32> {
    let mut times = Vec::new();
    for token in text.split_whitespace() {
        if let Ok(time) = token.parse::<f32>() {
            times.push(time);
            continue;
        }
        if let Some(time) = numeric_prefix(token) {
            times.push(time);
        }
        break;
    }
    times
}

/// Longest leading slice of `token` that parses as a number.
fn numeric_prefix(token: &str) -> Option<f32> {
    token
        .char_indices()
        .map(|(i, _)| i)
        .skip(1)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .find_map(|end| token[..end].parse::<f32>().ok())
}

pub fn format_rankings(times: &[f32]) -> String {
    let mut out = String::new();
    for time in times {
        out.push_str(&time.to_string());
        out.push('\n');
    }
    out
}

#[derive(Debug, Clone)]
pub struct RankingStore {
    path: PathBuf,
    capacity: usize,
}

impl RankingStore {
    pub fn new(path: impl Into<PathBuf>, capacity: usize) -> Self {
        Self {
            path: path.into(),
            capacity,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file is an empty board, not an error.
    pub fn load(&self) -> Result<Rankings, RankingError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => Ok(Rankings::from_unsorted(
                parse_rankings(&raw),
                self.capacity,
            )),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Rankings::new(self.capacity)),
            Err(source) => Err(RankingError::Read {
                path: self.path.clone(),
                source,
            }),
        }
    }

    pub fn save(&self, rankings: &Rankings) -> Result<(), RankingError> {
        fs::write(&self.path, format_rankings(rankings.times())).map_err(|source| {
            RankingError::Write {
                path: self.path.clone(),
                source,
            }
        })
    }
}
