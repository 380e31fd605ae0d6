pub mod concat;
pub mod cursor;
pub mod error;
pub mod processing;
pub mod reader;
pub mod save;
pub mod text;

// Re-export main types for convenient access
pub use concat::ConcatPart;
pub use cursor::{LineCursor, Pattern, PatternCursor, Segment};
pub use error::TextError;
pub use save::{SaveTarget, DEFAULT_MODE};
pub use text::{OwnershipPolicy, SystemBlock, TextBuffer};

// Re-export loading and pipeline utilities used by the CLI
pub use processing::{rejoin, write_stats, SplitMode, SplitStats};
pub use reader::{read_text_async, ReaderConfig, ReadStats, TextReader};
