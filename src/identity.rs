//! Positional video identity.
//!
//! A video id is `"{shard}-{position}"`: the 1-based shard index plus the
//! 0-based position inside that shard. No id table is stored anywhere, so
//! lookup is O(1) without an index file. Ids are only meaningful for the
//! current shard layout and change if the collection is re-sharded.

use std::fmt;
use std::str::FromStr;

use crate::error::{CatalogError, Result};

const SEPARATOR: char = '-';

/// Decoded (shard, position) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VideoId {
    pub shard: u32,
    pub position: usize,
}

impl VideoId {
    pub fn new(shard: u32, position: usize) -> Self {
        Self { shard, position }
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.shard, SEPARATOR, self.position)
    }
}

impl FromStr for VideoId {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self> {
        decode(s)
    }
}

/// Build the id string for a record.
pub fn encode(shard: u32, position: usize) -> String {
    VideoId::new(shard, position).to_string()
}

/// Parse an id string back into its (shard, position) pair.
///
/// Requires exactly two parts, each a non-empty run of ASCII digits.
/// Signs, whitespace and overflowing values are rejected.
pub fn decode(id: &str) -> Result<VideoId> {
    let invalid = || CatalogError::InvalidId(id.to_string());

    let mut parts = id.split(SEPARATOR);
    let (Some(shard), Some(position), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(invalid());
    };

    if !is_digits(shard) || !is_digits(position) {
        return Err(invalid());
    }

    let shard = shard.parse::<u32>().map_err(|_| invalid())?;
    let position = position.parse::<usize>().map_err(|_| invalid())?;
    Ok(VideoId { shard, position })
}

#[inline]
fn is_digits(part: &str) -> bool {
    !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit())
}
