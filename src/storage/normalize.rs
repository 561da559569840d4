//! Raw record -> `Video` normalization. Pure, no I/O.

use std::sync::OnceLock;

use regex_lite::Regex;

use crate::identity;
use crate::model::Video;
use crate::storage::RawRecord;

/// Primary category for records without any category.
pub const UNCATEGORIZED: &str = "Uncategorized";

fn embed_src_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"src\s*=\s*["']([^"']+)["']"#).expect("embed src pattern is valid")
    })
}

/// Field normalizer, parameterized by the list delimiter.
#[derive(Debug, Clone, Copy)]
pub struct Normalizer {
    delimiter: char,
}

impl Normalizer {
    pub fn new(delimiter: char) -> Self {
        Self { delimiter }
    }

    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    /// Build the `Video` stored at `(shard, position)`.
    pub fn normalize(&self, raw: &RawRecord, shard: u32, position: usize) -> Video {
        let duration_seconds = parse_count(&raw.duration);
        let views = parse_count(&raw.views);
        let categories = self.split_list(&raw.categories);
        let primary_category = categories
            .first()
            .cloned()
            .unwrap_or_else(|| UNCATEGORIZED.to_string());
        let thumbnails = self.split_list(&raw.thumbnail);

        Video {
            id: identity::encode(shard, position),
            title: raw.title.trim().to_string(),
            thumbnail: thumbnails.first().cloned().unwrap_or_default(),
            thumbnails,
            embed_url: extract_embed_url(&raw.embed),
            duration: format_duration(duration_seconds),
            duration_seconds,
            views,
            views_display: abbreviate_count(views),
            likes: parse_count(&raw.likes),
            dislikes: parse_count(&raw.dislikes),
            categories,
            primary_category,
            tags: self.split_list(&raw.tags),
            performers: self.performer_list(raw),
            screenshots: self.split_list(&raw.screenshots),
        }
    }

    /// `performers`, falling back to `actors` when it has no names.
    fn performer_list(&self, raw: &RawRecord) -> Vec<String> {
        let performers = self.split_list(&raw.performers);
        if performers.is_empty() {
            self.split_list(&raw.actors)
        } else {
            performers
        }
    }

    /// Split a joined list: trim each element, drop empties, keep order
    /// and duplicates.
    pub fn split_list(&self, joined: &str) -> Vec<String> {
        joined
            .split(self.delimiter)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(';')
    }
}

/// Parse an integer count, 0 on failure.
pub fn parse_count(text: &str) -> u64 {
    text.trim().parse().unwrap_or(0)
}

/// `m:ss`, minutes unbounded.
pub fn format_duration(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// `1.5M`, `2.5K`, or the plain number below 1000.
pub fn abbreviate_count(count: u64) -> String {
    if count >= 1_000_000 {
        format!("{:.1}M", count as f64 / 1_000_000.0)
    } else if count >= 1_000 {
        format!("{:.1}K", count as f64 / 1_000.0)
    } else {
        count.to_string()
    }
}

/// First quoted URL after `src=` in the embed markup; empty if none.
pub fn extract_embed_url(markup: &str) -> String {
    embed_src_regex()
        .captures(markup)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(categories: &str) -> RawRecord {
        RawRecord {
            title: "  Sunset Timelapse ".to_string(),
            embed: r#"<iframe src="https://player.example/embed/abc" frameborder="0"></iframe>"#
                .to_string(),
            thumbnail: "https://img.example/1.jpg".to_string(),
            screenshots: "s1.jpg; s2.jpg ;;s3.jpg".to_string(),
            tags: "nature;timelapse;nature".to_string(),
            categories: categories.to_string(),
            performers: " Ann Lee ; Bo ".to_string(),
            actors: "Ignored".to_string(),
            duration: "65".to_string(),
            views: "1500000".to_string(),
            likes: "12".to_string(),
            dislikes: "oops".to_string(),
        }
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(65), "1:05");
        assert_eq!(format_duration(5), "0:05");
        assert_eq!(format_duration(0), "0:00");
        assert_eq!(format_duration(3600), "60:00");
    }

    #[test]
    fn test_abbreviate_count() {
        assert_eq!(abbreviate_count(999), "999");
        assert_eq!(abbreviate_count(1000), "1.0K");
        assert_eq!(abbreviate_count(2_500), "2.5K");
        assert_eq!(abbreviate_count(1_500_000), "1.5M");
        assert_eq!(abbreviate_count(0), "0");
    }

    #[test]
    fn test_parse_count_defaults_to_zero() {
        assert_eq!(parse_count("42"), 42);
        assert_eq!(parse_count(" 7 "), 7);
        assert_eq!(parse_count(""), 0);
        assert_eq!(parse_count("-3"), 0);
        assert_eq!(parse_count("12abc"), 0);
    }

    #[test]
    fn test_extract_embed_url() {
        assert_eq!(
            extract_embed_url(r#"<iframe src="https://a.example/e/1"></iframe>"#),
            "https://a.example/e/1"
        );
        assert_eq!(
            extract_embed_url("<iframe src='https://b.example/e/2' src=\"https://c\">"),
            "https://b.example/e/2"
        );
        assert_eq!(extract_embed_url("<iframe></iframe>"), "");
        assert_eq!(extract_embed_url(""), "");
    }

    #[test]
    fn test_split_list() {
        let n = Normalizer::new(';');
        assert_eq!(n.split_list(" a ; b;;c ;a"), vec!["a", "b", "c", "a"]);
        assert!(n.split_list("").is_empty());
        assert!(n.split_list(" ; ;").is_empty());

        let comma = Normalizer::new(',');
        assert_eq!(comma.split_list("x, y"), vec!["x", "y"]);
    }

    #[test]
    fn test_normalize_full_record() {
        let video = Normalizer::default().normalize(&raw("Nature;Travel"), 4, 2);

        assert_eq!(video.id, "4-2");
        assert_eq!(video.title, "Sunset Timelapse");
        assert_eq!(video.embed_url, "https://player.example/embed/abc");
        assert!(video.has_embed());
        assert_eq!(video.thumbnail, "https://img.example/1.jpg");
        assert_eq!(video.duration, "1:05");
        assert_eq!(video.duration_seconds, 65);
        assert_eq!(video.views, 1_500_000);
        assert_eq!(video.views_display, "1.5M");
        assert_eq!(video.likes, 12);
        assert_eq!(video.dislikes, 0);
        assert_eq!(video.categories, vec!["Nature", "Travel"]);
        assert_eq!(video.primary_category, "Nature");
        assert_eq!(video.tags, vec!["nature", "timelapse", "nature"]);
        assert_eq!(video.performers, vec!["Ann Lee", "Bo"]);
        assert_eq!(video.screenshots, vec!["s1.jpg", "s2.jpg", "s3.jpg"]);
    }

    #[test]
    fn test_normalize_uncategorized_fallback() {
        let video = Normalizer::default().normalize(&raw(" ; "), 1, 0);
        assert!(video.categories.is_empty());
        assert_eq!(video.primary_category, UNCATEGORIZED);
    }

    #[test]
    fn test_normalize_actors_fallback() {
        let mut record = raw("News");
        record.performers = " ; ".to_string();
        record.actors = "Cy;Di".to_string();
        let video = Normalizer::default().normalize(&record, 1, 0);
        assert_eq!(video.performers, vec!["Cy", "Di"]);
    }

    #[test]
    fn test_normalize_empty_record() {
        let video = Normalizer::default().normalize(&RawRecord::default(), 1, 0);
        assert_eq!(video.duration, "0:00");
        assert_eq!(video.views_display, "0");
        assert_eq!(video.embed_url, "");
        assert_eq!(video.thumbnail, "");
        assert!(video.screenshots.is_empty());
    }
}
