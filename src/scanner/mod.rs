pub mod languages;
pub mod tree;
pub mod walker;

pub use tree::{scan, EntryKind, FileStats, LanguageStats, ProjectTree, TreeLine, TreeStats};
