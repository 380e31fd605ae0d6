// WHY: the split-and-rejoin pipeline lives in the library so the CLI stays a thin
// shell and the pipeline can be tested and benchmarked directly

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::cursor::Segment;
use crate::error::TextError;
use crate::text::TextBuffer;

/// How a buffer is cut into segments
#[derive(Debug, Clone, Default)]
pub enum SplitMode {
    #[default]
    Lines,
    Pattern(String),
}

/// Per-run statistics written by `--stats-out`
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SplitStats {
    pub file_path: String,
    pub bytes_in: u64,
    pub bytes_out: u64,
    pub segments: u64,
    pub mapped: bool,
    pub duration_ms: u64,
}

/// Cut `text` according to `mode` and join the pieces with `delimiter`
///
/// Returns the joined buffer and the number of segments.
pub fn rejoin(
    text: &TextBuffer<'_>,
    mode: &SplitMode,
    delimiter: &[u8],
) -> Result<(TextBuffer<'static>, usize), TextError> {
    // zero-copy views; the only copy is the final concatenation
    let segments: Vec<Segment<'_>> = match mode {
        SplitMode::Lines => text.lines(false).collect(),
        SplitMode::Pattern(pattern) => text.split_str(pattern, false)?.collect(),
    };

    debug!("Split {} bytes into {} segments", text.len(), segments.len());
    let joined = TextBuffer::from_concat(&segments, delimiter);
    Ok((joined, segments.len()))
}

/// Write `stats` as pretty JSON to `path`
pub async fn write_stats(path: &Path, stats: &SplitStats) -> Result<()> {
    let content = serde_json::to_string_pretty(stats)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    tokio::fs::write(path, content).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_rejoin_lines_normalizes_endings() {
        let text = TextBuffer::from_bytes(b"a\r\nb\n\nc\n");
        let (joined, count) = rejoin(&text, &SplitMode::Lines, b"\n").unwrap();
        assert_eq!(joined.as_bytes(), b"a\nb\nc");
        assert_eq!(count, 3);
    }

    #[test]
    fn test_rejoin_with_pattern() {
        let text = TextBuffer::from_bytes(b"k1=v1;;k2=v2");
        let mode = SplitMode::Pattern(";+".to_string());
        let (joined, count) = rejoin(&text, &mode, b", ").unwrap();
        assert_eq!(joined.as_bytes(), b"k1=v1, k2=v2");
        assert_eq!(count, 2);
    }

    #[test]
    fn test_rejoin_rejects_bad_pattern() {
        let text = TextBuffer::from_bytes(b"abc");
        let mode = SplitMode::Pattern("[".to_string());
        assert!(rejoin(&text, &mode, b"").is_err());
    }

    #[tokio::test]
    async fn test_write_stats_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("stats.json");
        let stats = SplitStats {
            file_path: "in.txt".to_string(),
            bytes_in: 10,
            bytes_out: 8,
            segments: 3,
            mapped: false,
            duration_ms: 0,
        };

        write_stats(&path, &stats).await.unwrap();

        let content = tokio::fs::read_to_string(&path).await.unwrap();
        let parsed: SplitStats = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed.segments, 3);
        assert_eq!(parsed.file_path, "in.txt");
    }
}
