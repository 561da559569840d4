//! Shard reader: load one shard file and normalize its records.
//!
//! Stateless. Every call re-reads and re-parses the file; nothing is
//! cached between calls, so memory stays bounded by one shard per
//! in-flight request and concurrent readers need no coordination.

use std::io::ErrorKind;

use crate::error::{CatalogError, Result};
use crate::identity;
use crate::model::Video;
use crate::storage::{Normalizer, RawRecord, ShardLayout};

#[derive(Debug, Clone)]
pub struct ShardReader {
    layout: ShardLayout,
    normalizer: Normalizer,
}

impl ShardReader {
    pub fn new(layout: ShardLayout, normalizer: Normalizer) -> Self {
        Self { layout, normalizer }
    }

    pub fn layout(&self) -> &ShardLayout {
        &self.layout
    }

    /// Read the raw records of a shard.
    ///
    /// A missing file is an empty shard, not an error.
    pub fn load_raw(&self, index: u32) -> Result<Vec<RawRecord>> {
        let path = self.layout.shard_path(index);
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(CatalogError::CorruptShard {
                    index,
                    reason: format!("read {}: {}", path.display(), e),
                })
            }
        };

        serde_json::from_slice(&bytes).map_err(|e| CatalogError::CorruptShard {
            index,
            reason: e.to_string(),
        })
    }

    /// Load and normalize every video in a shard, in stored order.
    pub fn load_shard(&self, index: u32) -> Result<Vec<Video>> {
        let records = self.load_raw(index)?;
        Ok(records
            .iter()
            .enumerate()
            .map(|(position, raw)| self.normalizer.normalize(raw, index, position))
            .collect())
    }

    /// Video at `position` within shard `index`.
    pub fn video_at(&self, index: u32, position: usize) -> Result<Video> {
        let records = self.load_raw(index)?;
        let raw = records
            .get(position)
            .ok_or_else(|| CatalogError::NotFound(identity::encode(index, position)))?;
        Ok(self.normalizer.normalize(raw, index, position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn reader(dir: &TempDir) -> ShardReader {
        ShardReader::new(
            ShardLayout::new(dir.path(), "videos_", ".json"),
            Normalizer::default(),
        )
    }

    fn write(dir: &TempDir, name: &str, body: &str) {
        std::fs::write(dir.path().join(name), body).unwrap();
    }

    #[test]
    fn test_load_shard_normalizes_in_order() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "videos_2.json",
            r#"[{"title": "first", "duration": "5"}, {"title": "second", "views": "2500"}]"#,
        );

        let videos = reader(&dir).load_shard(2).unwrap();
        assert_eq!(videos.len(), 2);
        assert_eq!(videos[0].id, "2-0");
        assert_eq!(videos[0].duration, "0:05");
        assert_eq!(videos[1].id, "2-1");
        assert_eq!(videos[1].views_display, "2.5K");
    }

    #[test]
    fn test_record_with_performers_and_actors_loads() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "videos_1.json",
            r#"[
                {"title": "a", "performers": "Ann", "actors": "Ann"},
                {"title": "b", "actors": "Bo"}
            ]"#,
        );

        let videos = reader(&dir).load_shard(1).unwrap();
        assert_eq!(videos.len(), 2);
        assert_eq!(videos[0].performers, vec!["Ann"]);
        assert_eq!(videos[1].performers, vec!["Bo"]);
    }

    #[test]
    fn test_missing_shard_is_empty() {
        let dir = TempDir::new().unwrap();
        assert!(reader(&dir).load_shard(9).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_shard_is_corrupt() {
        let dir = TempDir::new().unwrap();
        write(&dir, "videos_1.json", "[{\"title\": ");

        match reader(&dir).load_shard(1) {
            Err(CatalogError::CorruptShard { index, .. }) => assert_eq!(index, 1),
            other => panic!("expected CorruptShard, got {:?}", other),
        }
    }

    #[test]
    fn test_wrong_shape_is_corrupt() {
        let dir = TempDir::new().unwrap();
        write(&dir, "videos_1.json", r#"{"title": "not a list"}"#);
        assert!(matches!(
            reader(&dir).load_shard(1),
            Err(CatalogError::CorruptShard { index: 1, .. })
        ));
    }

    #[test]
    fn test_video_at() {
        let dir = TempDir::new().unwrap();
        write(&dir, "videos_1.json", r#"[{"title": "a"}, {"title": "b"}]"#);
        let reader = reader(&dir);

        assert_eq!(reader.video_at(1, 1).unwrap().title, "b");
        assert!(matches!(reader.video_at(1, 2), Err(CatalogError::NotFound(_))));
        assert!(matches!(reader.video_at(3, 0), Err(CatalogError::NotFound(_))));
    }

    #[test]
    fn test_rereads_after_file_change() {
        let dir = TempDir::new().unwrap();
        write(&dir, "videos_1.json", r#"[{"title": "old"}]"#);
        let reader = reader(&dir);
        assert_eq!(reader.load_shard(1).unwrap()[0].title, "old");

        write(&dir, "videos_1.json", r#"[{"title": "new"}]"#);
        assert_eq!(reader.load_shard(1).unwrap()[0].title, "new");
    }
}
