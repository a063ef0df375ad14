//! Local file access for uploads and downloads.
//!
//! Downloads never overwrite: an existing file is reported and left alone.

use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, error};
use unpacme_core::Artifact;

/// What happened when writing a downloaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    Written(PathBuf),
    /// A file already existed at the path and was kept.
    AlreadyExists(PathBuf),
}

/// Whether something already exists at `path`.
pub async fn exists(path: &Path) -> io::Result<bool> {
    fs::try_exists(path).await
}

/// Write `data` to a new file at `path`, refusing to replace an existing one.
pub async fn write_new_file(path: &Path, data: &[u8]) -> io::Result<WriteOutcome> {
    let file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await;

    let mut file = match file {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            return Ok(WriteOutcome::AlreadyExists(path.to_path_buf()));
        }
        Err(e) => return Err(e),
    };

    file.write_all(data).await?;
    file.flush().await?;
    debug!(path = %path.display(), bytes = data.len(), "Wrote file");
    Ok(WriteOutcome::Written(path.to_path_buf()))
}

/// Read every regular file in `paths` as an upload artifact.
///
/// Missing paths and non-files are logged and skipped.
pub async fn read_artifacts(paths: &[PathBuf]) -> Vec<Artifact> {
    let mut artifacts = Vec::with_capacity(paths.len());
    for path in paths {
        debug!(path = %path.display(), "Tasking file");
        let metadata = match fs::metadata(path).await {
            Ok(metadata) => metadata,
            Err(e) => {
                error!(path = %path.display(), error = %e, "Path does not exist");
                continue;
            }
        };
        if !metadata.is_file() {
            error!(path = %path.display(), "Path is not a file");
            continue;
        }
        match fs::read(path).await {
            Ok(data) => artifacts.push(Artifact::new(path.display().to_string(), data)),
            Err(e) => error!(path = %path.display(), error = %e, "Failed to read file"),
        }
    }
    artifacts
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_write_new_file_creates() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.bin");

        let outcome = write_new_file(&path, b"MZ").await.unwrap();
        assert_eq!(outcome, WriteOutcome::Written(path.clone()));
        assert_eq!(std::fs::read(&path).unwrap(), b"MZ");
        assert!(exists(&path).await.unwrap());
    }

    #[tokio::test]
    async fn test_write_new_file_keeps_existing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.bin");
        std::fs::write(&path, b"original").unwrap();

        let outcome = write_new_file(&path, b"replacement").await.unwrap();
        assert_eq!(outcome, WriteOutcome::AlreadyExists(path.clone()));
        assert_eq!(std::fs::read(&path).unwrap(), b"original");
    }

    #[tokio::test]
    async fn test_read_artifacts_skips_missing_and_directories() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("sample.exe");
        std::fs::write(&file, b"payload").unwrap();

        let paths = vec![
            dir.path().join("missing.exe"),
            dir.path().to_path_buf(),
            file.clone(),
        ];
        let artifacts = read_artifacts(&paths).await;

        assert_eq!(artifacts.len(), 1);
        assert_eq!(artifacts[0].label, file.display().to_string());
        assert_eq!(artifacts[0].data, b"payload");
    }
}
