pub mod chart;
pub mod xlsx;

use anyhow::Context;
use std::path::Path;

/// Writes `bytes` to `path`, creating parent directories as needed.
pub fn write_file(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory {}", parent.display()))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), bytes = bytes.len(), "wrote output file");
    Ok(())
}

/// Ticker symbols may contain characters that are awkward in file names (`BRK/B`, `^GSPC`).
pub fn file_stem(symbol: &str) -> String {
    symbol
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_stem_replaces_path_characters() {
        assert_eq!(file_stem("RELIANCE.NS"), "RELIANCE.NS");
        assert_eq!(file_stem("BRK/B"), "BRK_B");
        assert_eq!(file_stem("^GSPC"), "_GSPC");
    }
}
