/*

Load -> edit -> save:

  AudioTags::chapters()  [("Intro", 0), ("Verse", 15000)]
        |
  ChapterList            "00:00:00.000" Intro
                         "00:00:15.000" Verse   <- user types "90500" / "abc"
        |
  to_external            only once every entry parses

*/

pub mod bridge;
pub mod chapters;
pub mod config;
pub mod editor;
pub mod timestamp;

pub use bridge::{AudioTags, ExternalChapter, from_external, to_external};
pub use chapters::{ChapterList, ChapterRecord, IndexError};
pub use config::EditorConfig;
pub use editor::ChapterEditor;
pub use timestamp::{ParseError, TimestampState, format_timestamp, parse_timestamp};
