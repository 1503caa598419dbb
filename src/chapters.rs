use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::time::Duration;
use thiserror::Error;

use crate::config::EditorConfig;
use crate::timestamp::{ParseError, TimestampState, format_timestamp, parse_timestamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("chapter index {index} is out of bounds for {len} chapters")]
pub struct IndexError {
    pub index: usize,
    pub len: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterRecord {
    pub title: String,

    // Last successfully parsed start, kept while the field holds invalid text.
    #[serde(with = "humantime_serde")]
    start_time: Duration,

    #[serde(default)]
    timestamp: TimestampState,
}

impl Default for ChapterRecord {
    fn default() -> Self {
        Self::new(String::new(), Duration::ZERO)
    }
}

impl ChapterRecord {
    pub fn new(title: impl Into<String>, start_time: Duration) -> Self {
        Self {
            title: title.into(),
            start_time,
            timestamp: TimestampState::Valid,
        }
    }

    pub fn start_time(&self) -> Duration {
        self.start_time
    }

    pub fn timestamp_state(&self) -> &TimestampState {
        &self.timestamp
    }

    pub fn is_valid(&self) -> bool {
        self.timestamp.is_valid()
    }

    pub fn set_title(&mut self, text: impl Into<String>) {
        self.title = text.into();
    }

    /// Applies user text to the start time. On failure the previous start time
    /// is kept and the raw text is held for display.
    pub fn set_timestamp_text(&mut self, text: &str) -> Result<Duration, ParseError> {
        match parse_timestamp(text) {
            Ok(start_time) => {
                self.start_time = start_time;
                self.timestamp = TimestampState::Valid;
                Ok(start_time)
            }
            Err(e) => {
                self.timestamp = TimestampState::Invalid(text.to_owned());
                Err(e)
            }
        }
    }

    /// Like [`Self::set_timestamp_text`], returning what the field should show
    /// once the user leaves it.
    pub fn commit_timestamp_text(&mut self, text: &str) -> String {
        let _ = self.set_timestamp_text(text);
        self.display_timestamp()
    }

    pub fn display_timestamp(&self) -> String {
        match &self.timestamp {
            TimestampState::Valid => format_timestamp(self.start_time),
            TimestampState::Invalid(raw) => raw.clone(),
        }
    }
}

/// Ordered chapters of one audio file. Order is the order chapters are saved
/// in and is never re-sorted by start time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ChapterList {
    entries: Vec<ChapterRecord>,
}

impl ChapterList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load<I>(&mut self, external: I)
    where
        I: IntoIterator<Item = (String, u32)>,
    {
        self.load_with(external, &EditorConfig::default());
    }

    /// Replaces the entries. An empty source still leaves one placeholder so
    /// the list is never empty after a load.
    pub fn load_with<I>(&mut self, external: I, config: &EditorConfig)
    where
        I: IntoIterator<Item = (String, u32)>,
    {
        self.entries.clear();
        self.entries.extend(external.into_iter().map(|(title, millis)| {
            ChapterRecord::new(title, Duration::from_millis(u64::from(millis)))
        }));

        if self.entries.is_empty() {
            log::info!("no chapters in source, adding placeholder");
            self.entries.push(ChapterRecord::new(
                config.placeholder_title.clone(),
                Duration::ZERO,
            ));
        } else {
            log::info!("loaded {} chapters", self.entries.len());
        }
    }

    pub fn add_chapter(&mut self) -> &mut ChapterRecord {
        self.add_chapter_with(&EditorConfig::default())
    }

    pub fn add_chapter_with(&mut self, config: &EditorConfig) -> &mut ChapterRecord {
        self.push(ChapterRecord::new(
            config.new_chapter_title.clone(),
            Duration::ZERO,
        ))
    }

    pub fn push(&mut self, record: ChapterRecord) -> &mut ChapterRecord {
        self.entries.push(record);
        let last = self.entries.len() - 1;
        &mut self.entries[last]
    }

    pub fn remove_chapter(&mut self, index: usize) -> Result<ChapterRecord, IndexError> {
        self.check_index(index)?;
        Ok(self.entries.remove(index))
    }

    pub fn get(&self, index: usize) -> Result<&ChapterRecord, IndexError> {
        let len = self.entries.len();
        self.entries.get(index).ok_or(IndexError { index, len })
    }

    pub fn get_mut(&mut self, index: usize) -> Result<&mut ChapterRecord, IndexError> {
        let len = self.entries.len();
        self.entries.get_mut(index).ok_or(IndexError { index, len })
    }

    pub fn set_title(&mut self, index: usize, text: impl Into<String>) -> Result<(), IndexError> {
        self.get_mut(index)?.set_title(text);
        Ok(())
    }

    /// Outer error is a bad index, inner one bad text. The entry records the
    /// outcome either way so [`Self::is_save_allowed`] reflects it.
    pub fn set_timestamp_text(
        &mut self,
        index: usize,
        text: &str,
    ) -> Result<Result<Duration, ParseError>, IndexError> {
        Ok(self.get_mut(index)?.set_timestamp_text(text))
    }

    pub fn commit_timestamp_text(
        &mut self,
        index: usize,
        text: &str,
    ) -> Result<String, IndexError> {
        Ok(self.get_mut(index)?.commit_timestamp_text(text))
    }

    pub fn is_save_allowed(&self) -> bool {
        self.entries.iter().all(ChapterRecord::is_valid)
    }

    pub fn invalid_indices(&self) -> Vec<usize> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.is_valid())
            .map(|(i, _)| i)
            .collect()
    }

    pub fn num_chapters(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn as_slice(&self) -> &[ChapterRecord] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChapterRecord> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ChapterRecord> {
        self.entries.iter_mut()
    }

    pub fn to_summary_string(&self) -> String {
        let mut output = String::new();

        for (index, chapter) in self.iter().enumerate() {
            let marker = if chapter.is_valid() { ' ' } else { '!' };
            let _ = writeln!(
                &mut output,
                "{:>3}{} Start: {:<14} Title: {}",
                index,
                marker,
                chapter.display_timestamp(),
                chapter.title
            );
        }

        output
    }

    fn check_index(&self, index: usize) -> Result<(), IndexError> {
        let len = self.entries.len();
        if index < len {
            Ok(())
        } else {
            Err(IndexError { index, len })
        }
    }
}

impl From<Vec<ChapterRecord>> for ChapterList {
    fn from(entries: Vec<ChapterRecord>) -> Self {
        Self { entries }
    }
}

impl From<ChapterList> for Vec<ChapterRecord> {
    fn from(list: ChapterList) -> Self {
        list.entries
    }
}

impl<'a> IntoIterator for &'a ChapterList {
    type Item = &'a ChapterRecord;
    type IntoIter = std::slice::Iter<'a, ChapterRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a mut ChapterList {
    type Item = &'a mut ChapterRecord;
    type IntoIter = std::slice::IterMut<'a, ChapterRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter_mut()
    }
}
