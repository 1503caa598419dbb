//! The only place that knows the shape of the audio-tag library's chapters.

use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::chapters::ChapterRecord;

/// A chapter as the audio-tag library reads and writes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalChapter {
    pub title: String,
    pub start_millis: u32,
}

impl ExternalChapter {
    pub fn new(title: impl Into<String>, start_millis: u32) -> Self {
        Self {
            title: title.into(),
            start_millis,
        }
    }
}

impl From<ExternalChapter> for (String, u32) {
    fn from(chapter: ExternalChapter) -> Self {
        (chapter.title, chapter.start_millis)
    }
}

/// The audio-tag collaborator. Album art and file info are passed through
/// untouched.
pub trait AudioTags {
    fn chapters(&self) -> Vec<ExternalChapter>;

    fn album_art(&self) -> Option<Vec<u8>>;

    fn file_info(&self) -> String;

    fn update_chapters(&mut self, chapters: &[ExternalChapter]) -> anyhow::Result<()>;
}

pub fn from_external(chapters: &[ExternalChapter]) -> Vec<ChapterRecord> {
    chapters
        .iter()
        .map(|c| {
            ChapterRecord::new(
                c.title.clone(),
                Duration::from_millis(u64::from(c.start_millis)),
            )
        })
        .collect()
}

pub fn to_external<'a, I>(chapters: I) -> Vec<ExternalChapter>
where
    I: IntoIterator<Item = &'a ChapterRecord>,
{
    chapters
        .into_iter()
        .map(|c| ExternalChapter {
            title: c.title.clone(),
            start_millis: duration_to_millis(c.start_time()),
        })
        .collect()
}

// Parsing never yields more than u32::MAX millis, saturate just in case.
fn duration_to_millis(duration: Duration) -> u32 {
    u32::try_from(duration.as_millis()).unwrap_or_else(|_| {
        log::warn!("start time {duration:?} does not fit 32-bit millis, saturating");
        u32::MAX
    })
}

pub fn parse_chapter_json(json: &str) -> anyhow::Result<Vec<ExternalChapter>> {
    let chapters: Vec<ExternalChapter> =
        serde_json::from_str(json).context("Failed to parse chapter json")?;
    Ok(chapters)
}

pub fn chapters_to_json(chapters: &[ExternalChapter]) -> anyhow::Result<String> {
    let json = serde_json::to_string_pretty(chapters)?;
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chapters::ChapterList;

    fn sample() -> Vec<ExternalChapter> {
        vec![ExternalChapter::new("Intro", 0), ExternalChapter::new("Verse", 15_000)]
    }

    #[test]
    fn from_external_copies_millis_in_order() {
        let records = from_external(&sample());
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].title, "Intro");
        assert_eq!(records[0].start_time(), Duration::ZERO);
        assert_eq!(records[1].title, "Verse");
        assert_eq!(records[1].start_time(), Duration::from_millis(15_000));
        assert!(records.iter().all(ChapterRecord::is_valid));
    }

    #[test]
    fn loaded_list_converts_back_unchanged() {
        let mut list = ChapterList::new();
        list.load(sample().into_iter().map(<(String, u32)>::from));
        assert_eq!(to_external(&list), sample());
    }

    #[test]
    fn edits_show_up_in_external_form() {
        let mut list = ChapterList::from(from_external(&sample()));
        list.set_title(1, "Chorus").unwrap();
        list.set_timestamp_text(1, "00:01:30.500").unwrap().unwrap();
        list.add_chapter();

        assert_eq!(
            to_external(&list),
            vec![
                ExternalChapter::new("Intro", 0),
                ExternalChapter::new("Chorus", 90_500),
                ExternalChapter::new("", 0),
            ]
        );
    }

    #[test]
    fn invalid_entry_exports_last_valid_start() {
        let mut list = ChapterList::from(from_external(&sample()));
        let _ = list.set_timestamp_text(1, "garbage");
        assert_eq!(to_external(&list)[1].start_millis, 15_000);
    }

    #[test]
    fn json_interchange() {
        let json = chapters_to_json(&sample()).unwrap();
        assert!(json.contains("\"start_millis\": 15000"));
        assert_eq!(parse_chapter_json(&json).unwrap(), sample());

        let err = parse_chapter_json(r#"[{ "title": "x", "start_millis": -1 }]"#).unwrap_err();
        assert!(err.to_string().contains("chapter json"));
    }
}
