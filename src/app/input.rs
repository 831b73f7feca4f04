//! Domain list input.

use std::path::Path;

use tokio::io::{AsyncBufReadExt, BufReader};

/// Reads raw domain entries from `path`, one per line.
///
/// Blank lines and lines starting with `#` are skipped; everything after a
/// `#` on a line is treated as a comment. Entries are returned unnormalized.
pub async fn read_domain_file(path: &Path) -> std::io::Result<Vec<String>> {
    let file = tokio::fs::File::open(path).await?;
    let mut lines = BufReader::new(file).lines();
    let mut entries = Vec::new();

    while let Some(line) = lines.next_line().await? {
        let entry = line.split('#').next().unwrap_or_default().trim();
        if !entry.is_empty() {
            entries.push(entry.to_string());
        }
    }

    log::info!("Read {} domains from {}", entries.len(), path.display());
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_comments_and_blank_lines_are_skipped() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# mail domains").unwrap();
        writeln!(file, "example.com").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "  https://www.example.org/  # marketing").unwrap();
        file.flush().unwrap();

        let entries = read_domain_file(file.path()).await.unwrap();
        assert_eq!(entries, vec!["example.com", "https://www.example.org/"]);
    }

    #[tokio::test]
    async fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_domain_file(&dir.path().join("absent.txt")).await;
        assert!(result.is_err());
    }
}
