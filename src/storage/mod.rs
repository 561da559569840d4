//! On-disk shard storage.
//!
//! A shard is one JSON file holding an ordered array of raw video records.
//! Files are named `<prefix><index><suffix>` with a 1-based index and live
//! in a single directory:
//!
//! ```text
//! <shard_dir>/
//! +-- videos_1.json     # shard 1 (its length sets the page size)
//! +-- videos_2.json
//! +-- ...
//! ```
//!
//! There is no manifest. The shard count is the number of files matching
//! the naming pattern, counted once at startup.

pub mod normalize;
pub mod reader;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer};

use crate::error::{CatalogError, Result};

pub use normalize::Normalizer;
pub use reader::ShardReader;

// ── Raw Record ─────────────────────────────────────────────────────

/// One record as stored in a shard file. Position in the shard is its
/// identity; there is no id field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawRecord {
    #[serde(default, deserialize_with = "text")]
    pub title: String,
    /// Embed markup, e.g. an `<iframe src="...">` snippet.
    #[serde(default, deserialize_with = "text")]
    pub embed: String,
    /// One thumbnail URL, or several joined with the list delimiter.
    #[serde(default, deserialize_with = "text")]
    pub thumbnail: String,
    #[serde(default, deserialize_with = "text")]
    pub screenshots: String,
    #[serde(default, deserialize_with = "text")]
    pub tags: String,
    #[serde(default, deserialize_with = "text")]
    pub categories: String,
    #[serde(default, deserialize_with = "text")]
    pub performers: String,
    /// Older exports name the performer list `actors`. Used only when
    /// `performers` is empty.
    #[serde(default, deserialize_with = "text")]
    pub actors: String,
    /// Seconds, as text.
    #[serde(default, deserialize_with = "text")]
    pub duration: String,
    #[serde(default, deserialize_with = "text")]
    pub views: String,
    #[serde(default, deserialize_with = "text")]
    pub likes: String,
    #[serde(default, deserialize_with = "text")]
    pub dislikes: String,
}

/// Accept a string, number, bool or null and keep it as text.
fn text<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Bool(b) => Ok(b.to_string()),
        serde_json::Value::Null => Ok(String::new()),
        other => Err(D::Error::custom(format!("expected text, got {other}"))),
    }
}

// ── Shard Layout ───────────────────────────────────────────────────

/// Naming convention and location of shard files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShardLayout {
    dir: PathBuf,
    prefix: String,
    suffix: String,
}

impl ShardLayout {
    pub fn new(
        dir: impl Into<PathBuf>,
        prefix: impl Into<String>,
        suffix: impl Into<String>,
    ) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the shard file for a 1-based index.
    pub fn shard_path(&self, index: u32) -> PathBuf {
        self.dir.join(format!("{}{}{}", self.prefix, index, self.suffix))
    }

    /// Parse a shard index out of a file name, if it follows the pattern.
    pub fn parse_index(&self, file_name: &str) -> Option<u32> {
        let digits = file_name
            .strip_prefix(self.prefix.as_str())?
            .strip_suffix(self.suffix.as_str())?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse::<u32>().ok().filter(|&i| i > 0)
    }

    /// Count shard files in the directory.
    ///
    /// Fails with `InitializationFailure` if the directory cannot be listed.
    pub fn discover(&self) -> Result<u32> {
        let init_err = |reason: String| CatalogError::InitializationFailure {
            dir: self.dir.clone(),
            reason,
        };

        let entries = std::fs::read_dir(&self.dir).map_err(|e| init_err(e.to_string()))?;

        let mut count = 0u32;
        for entry in entries {
            let entry = entry.map_err(|e| init_err(e.to_string()))?;
            if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
                continue;
            }
            let name = entry.file_name();
            if let Some(name) = name.to_str() {
                if self.parse_index(name).is_some() {
                    count += 1;
                }
            }
        }
        Ok(count)
    }
}
