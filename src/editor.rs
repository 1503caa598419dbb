use crate::bridge::{AudioTags, to_external};
use crate::chapters::ChapterList;
use crate::config::EditorConfig;

/// Chapters of one opened audio file plus what the host shows next to them.
#[derive(Debug, Clone, Default)]
pub struct ChapterEditor {
    chapters: ChapterList,
    album_art: Option<Vec<u8>>,
    file_info: String,
    had_chapters: bool,
}

impl ChapterEditor {
    pub fn open(tags: &dyn AudioTags, config: &EditorConfig) -> Self {
        let external = tags.chapters();
        let had_chapters = !external.is_empty();

        let mut chapters = ChapterList::new();
        chapters.load_with(external.into_iter().map(<(String, u32)>::from), config);

        let file_info = if had_chapters {
            tags.file_info()
        } else {
            config.no_chapters_info.clone()
        };

        Self {
            chapters,
            album_art: tags.album_art(),
            file_info,
            had_chapters,
        }
    }

    pub fn chapters(&self) -> &ChapterList {
        &self.chapters
    }

    pub fn chapters_mut(&mut self) -> &mut ChapterList {
        &mut self.chapters
    }

    pub fn album_art(&self) -> Option<&[u8]> {
        self.album_art.as_deref()
    }

    pub fn file_info(&self) -> &str {
        &self.file_info
    }

    /// False when the opened file had no chapters and a placeholder was made.
    pub fn had_chapters(&self) -> bool {
        self.had_chapters
    }

    pub fn can_save(&self) -> bool {
        self.chapters.is_save_allowed()
    }

    pub fn save(&self, tags: &mut dyn AudioTags) -> anyhow::Result<()> {
        if !self.can_save() {
            let invalid = self.chapters.invalid_indices();
            log::warn!("refusing to save, invalid timestamps at {invalid:?}");
            anyhow::bail!("Cannot save chapters, invalid timestamps at {invalid:?}");
        }

        let external = to_external(&self.chapters);
        log::info!("saving {} chapters", external.len());
        tags.update_chapters(&external)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::ExternalChapter;
    use std::time::Duration;

    #[derive(Default)]
    struct MemoryTags {
        chapters: Vec<ExternalChapter>,
        art: Option<Vec<u8>>,
        saved: Option<Vec<ExternalChapter>>,
        fail_update: bool,
    }

    impl AudioTags for MemoryTags {
        fn chapters(&self) -> Vec<ExternalChapter> {
            self.chapters.clone()
        }

        fn album_art(&self) -> Option<Vec<u8>> {
            self.art.clone()
        }

        fn file_info(&self) -> String {
            format!("{} chapters", self.chapters.len())
        }

        fn update_chapters(&mut self, chapters: &[ExternalChapter]) -> anyhow::Result<()> {
            if self.fail_update {
                anyhow::bail!("read-only file");
            }
            self.saved = Some(chapters.to_vec());
            Ok(())
        }
    }

    fn tags_with(chapters: Vec<ExternalChapter>) -> MemoryTags {
        MemoryTags {
            chapters,
            art: Some(vec![0xff, 0xd8, 0xff]),
            ..Default::default()
        }
    }

    #[test]
    fn open_passes_art_and_info_through() {
        let tags = tags_with(vec![ExternalChapter::new("Intro", 0)]);
        let editor = ChapterEditor::open(&tags, &EditorConfig::default());

        assert!(editor.had_chapters());
        assert_eq!(editor.album_art(), Some(&[0xff, 0xd8, 0xff][..]));
        assert_eq!(editor.file_info(), "1 chapters");
        assert_eq!(editor.chapters().num_chapters(), 1);
    }

    #[test]
    fn open_without_chapters_uses_placeholder_and_notice() {
        let config = EditorConfig {
            placeholder_title: "Start".to_owned(),
            ..Default::default()
        };
        let editor = ChapterEditor::open(&MemoryTags::default(), &config);

        assert!(!editor.had_chapters());
        assert_eq!(editor.file_info(), config.no_chapters_info);
        assert_eq!(editor.album_art(), None);
        let only = editor.chapters().get(0).unwrap();
        assert_eq!(only.title, "Start");
        assert_eq!(only.start_time(), Duration::ZERO);
    }

    #[test]
    fn save_writes_edited_chapters() {
        let mut tags = tags_with(vec![
            ExternalChapter::new("Intro", 0),
            ExternalChapter::new("Verse", 15_000),
        ]);
        let mut editor = ChapterEditor::open(&tags, &EditorConfig::default());
        editor.chapters_mut().commit_timestamp_text(1, "20000").unwrap();
        editor.chapters_mut().add_chapter().set_title("Outro");

        editor.save(&mut tags).unwrap();
        assert_eq!(
            tags.saved.unwrap(),
            vec![
                ExternalChapter::new("Intro", 0),
                ExternalChapter::new("Verse", 20_000),
                ExternalChapter::new("Outro", 0),
            ]
        );
    }

    #[test]
    fn save_refused_while_gate_closed() {
        let mut tags = tags_with(vec![ExternalChapter::new("Intro", 0)]);
        let mut editor = ChapterEditor::open(&tags, &EditorConfig::default());
        let _ = editor.chapters_mut().set_timestamp_text(0, "abc");

        assert!(!editor.can_save());
        assert!(editor.save(&mut tags).is_err());
        assert!(tags.saved.is_none());

        let _ = editor.chapters_mut().set_timestamp_text(0, "00:01:30.500");
        assert!(editor.can_save());
        editor.save(&mut tags).unwrap();
        assert_eq!(tags.saved.unwrap()[0].start_millis, 90_500);
    }

    #[test]
    fn collaborator_failure_is_propagated() {
        let mut tags = tags_with(vec![ExternalChapter::new("Intro", 0)]);
        tags.fail_update = true;
        let editor = ChapterEditor::open(&tags, &EditorConfig::default());

        let err = editor.save(&mut tags).unwrap_err();
        assert_eq!(err.to_string(), "read-only file");
    }
}
