use anyhow::Context;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PLACEHOLDER_TITLE: &str = "<Chapter title here>";
pub const DEFAULT_NO_CHAPTERS_INFO: &str = "No chapters found in the selected audio file.";

/// Texts the editor fills in on its own. Missing keys keep their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Title of the entry synthesized when a file has no chapters.
    pub placeholder_title: String,
    /// Title given to chapters added by the user.
    pub new_chapter_title: String,
    /// File info shown in place of the tag summary for a file without chapters.
    pub no_chapters_info: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            placeholder_title: DEFAULT_PLACEHOLDER_TITLE.to_owned(),
            new_chapter_title: String::new(),
            no_chapters_info: DEFAULT_NO_CHAPTERS_INFO.to_owned(),
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("Failed to parse editor config")
    }
}
