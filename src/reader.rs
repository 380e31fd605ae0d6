use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::text::TextBuffer;

/// Configuration for file loading behavior
#[derive(Debug, Clone, Default)]
pub struct ReaderConfig {
    /// Map the file instead of reading it into the heap
    pub use_mmap: bool,
    /// Zero the loaded bytes when the buffer is released
    pub secure_wipe: bool,
}

/// Statistics for a single load
#[derive(Debug, Clone)]
pub struct ReadStats {
    pub file_path: String,
    pub bytes_read: u64,
    pub duration_ms: u64,
    /// Whether the bytes live in a mapping rather than on the heap
    pub mapped: bool,
}

/// Loads whole files into owned [`TextBuffer`]s
pub struct TextReader {
    config: ReaderConfig,
}

impl TextReader {
    pub fn new(config: ReaderConfig) -> Self {
        Self { config }
    }

    /// Load `file_path` as a `Mapped` buffer (with `use_mmap`) or an `OwnedDefault` one
    pub async fn load<P: AsRef<Path>>(
        &self,
        file_path: P,
    ) -> Result<(TextBuffer<'static>, ReadStats)> {
        let path = file_path.as_ref().to_path_buf();
        let start_time = std::time::Instant::now();

        debug!("Starting load of file: {} (mmap: {})", path.display(), self.config.use_mmap);

        let loaded = if self.config.use_mmap {
            let map_path = path.clone();
            // WHY: opening and mapping are blocking syscalls, keep them off the runtime threads
            tokio::task::spawn_blocking(move || -> std::io::Result<TextBuffer<'static>> {
                let file = std::fs::File::open(&map_path)?;
                TextBuffer::map_file(&file)
            })
            .await
            .context("Mapping task panicked")?
        } else {
            tokio::fs::read(&path).await.map(TextBuffer::from_vec)
        };

        let mut text = match loaded {
            Ok(text) => text,
            Err(e) => {
                warn!("Failed to load file {}: {}", path.display(), e);
                return Err(e).with_context(|| format!("Failed to load file {}", path.display()));
            }
        };

        if self.config.secure_wipe {
            text.set_secure_wipe(true)?;
        }

        let stats = ReadStats {
            file_path: path.display().to_string(),
            bytes_read: text.len() as u64,
            duration_ms: start_time.elapsed().as_millis() as u64,
            mapped: text.policy() == crate::text::OwnershipPolicy::Mapped,
        };

        info!(
            "Loaded {}: {} bytes in {}ms ({:?})",
            path.display(),
            stats.bytes_read,
            stats.duration_ms,
            text.policy()
        );

        Ok((text, stats))
    }
}

/// Convenience function for loading a single file with default configuration
pub async fn read_text_async<P: AsRef<Path>>(file_path: P) -> Result<TextBuffer<'static>> {
    let reader = TextReader::new(ReaderConfig::default());
    let (text, _stats) = reader.load(file_path).await?;
    Ok(text)
}
