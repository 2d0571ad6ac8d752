//! File intake and download I/O
//!
//! Keeps filesystem access out of the controller: front ends turn a picked
//! path into an [`UploadCandidate`] here and hand finished downloads back for
//! saving.

use crate::{
    error::{IntakeError, Result},
    services::MediaFormatHandler,
    types::{DownloadArtifact, UploadCandidate},
};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Upper bound on `name (n).ext` attempts before giving up
const MAX_NAME_COLLISIONS: u32 = 1000;

/// Service for reading picked files and saving downloads
pub struct ImageIoService;

impl ImageIoService {
    /// Read a file into an upload candidate
    ///
    /// The display name is the final path component and the media type is
    /// derived from the extension, falling back to content sniffing.
    ///
    /// # Examples
    /// ```rust,no_run
    /// use bgremove_studio::services::ImageIoService;
    ///
    /// # async fn example() -> bgremove_studio::Result<()> {
    /// let candidate = ImageIoService::load_candidate("cat.jpg").await?;
    /// assert_eq!(candidate.media_type(), "image/jpeg");
    /// # Ok(())
    /// # }
    /// ```
    pub async fn load_candidate<P: AsRef<Path>>(path: P) -> Result<UploadCandidate> {
        let path_ref = path.as_ref();

        let data = tokio::fs::read(path_ref)
            .await
            .map_err(|e| IntakeError::file_io_error("read image file", path_ref, &e))?;

        let name = path_ref
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let media_type = MediaFormatHandler::detect_media_type(path_ref, &data);

        debug!(
            path = %path_ref.display(),
            media_type = %media_type,
            bytes = data.len(),
            "loaded upload candidate"
        );

        Ok(UploadCandidate::new(name, media_type, data))
    }

    /// Directory downloads land in when none is given
    #[must_use]
    pub fn default_download_dir() -> PathBuf {
        dirs::download_dir().unwrap_or_else(|| PathBuf::from("."))
    }

    /// Write a download artifact into `dir`
    ///
    /// Creates the directory when missing. Only the final component of the
    /// artifact's filename is used. An existing file is never overwritten;
    /// the name gains a ` (n)` suffix instead.
    pub async fn save_download<P: AsRef<Path>>(
        artifact: &DownloadArtifact,
        dir: P,
    ) -> Result<PathBuf> {
        let dir_ref = dir.as_ref();

        tokio::fs::create_dir_all(dir_ref)
            .await
            .map_err(|e| IntakeError::file_io_error("create download directory", dir_ref, &e))?;

        let filename = MediaFormatHandler::base_name(&artifact.filename);
        if filename.is_empty() || filename == "." || filename == ".." {
            return Err(IntakeError::file_io_error(
                "save download",
                dir_ref.join(&artifact.filename),
                &std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a file name"),
            ));
        }

        let target = Self::available_path(dir_ref, filename).await?;

        tokio::fs::write(&target, &artifact.data)
            .await
            .map_err(|e| IntakeError::file_io_error("write download", &target, &e))?;

        info!(
            path = %target.display(),
            bytes = artifact.data.len(),
            "download saved"
        );
        Ok(target)
    }

    async fn available_path(dir: &Path, filename: &str) -> Result<PathBuf> {
        let candidate = dir.join(filename);
        if !Self::exists(&candidate).await {
            return Ok(candidate);
        }

        let stem = MediaFormatHandler::file_stem(filename);
        let extension = filename.get(stem.len()..).unwrap_or_default();

        for n in 1..=MAX_NAME_COLLISIONS {
            let candidate = dir.join(format!("{} ({}){}", stem, n, extension));
            if !Self::exists(&candidate).await {
                return Ok(candidate);
            }
        }

        Err(IntakeError::file_io_error(
            "find a free name for",
            dir.join(filename),
            &std::io::Error::new(std::io::ErrorKind::AlreadyExists, "too many existing copies"),
        ))
    }

    async fn exists(path: &Path) -> bool {
        tokio::fs::try_exists(path).await.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn artifact(filename: &str, data: &[u8]) -> DownloadArtifact {
        DownloadArtifact {
            filename: filename.to_string(),
            url: "blob:test".to_string(),
            media_type: "image/png".to_string(),
            data: data.to_vec(),
        }
    }

    #[tokio::test]
    async fn test_load_candidate() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("cat.jpg");
        std::fs::write(&path, [0xFF, 0xD8, 0xFF, 0xE0]).unwrap();

        let candidate = ImageIoService::load_candidate(&path).await.unwrap();
        assert_eq!(candidate.name(), "cat.jpg");
        assert_eq!(candidate.media_type(), "image/jpeg");
        assert_eq!(candidate.size(), 4);
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = ImageIoService::load_candidate(temp_dir.path().join("nope.png"))
            .await
            .unwrap_err();
        assert!(matches!(err, IntakeError::Io(_)));
        assert!(err.to_string().contains("nope.png"));
    }

    #[tokio::test]
    async fn test_save_download_creates_dir() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("nested").join("downloads");

        let saved = ImageIoService::save_download(&artifact("bg-removed-cat.png", b"png"), &dir)
            .await
            .unwrap();

        assert_eq!(saved, dir.join("bg-removed-cat.png"));
        assert_eq!(std::fs::read(&saved).unwrap(), b"png");
    }

    #[tokio::test]
    async fn test_save_download_keeps_inside_dir() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("downloads");

        let saved = ImageIoService::save_download(&artifact("../../escape.png", b"png"), &dir)
            .await
            .unwrap();
        assert_eq!(saved, dir.join("escape.png"));
        assert!(!temp_dir.path().join("escape.png").exists());

        let err = ImageIoService::save_download(&artifact("nested/..", b"png"), &dir)
            .await
            .unwrap_err();
        assert!(matches!(err, IntakeError::Io(_)));
    }

    #[tokio::test]
    async fn test_save_download_never_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let first = ImageIoService::save_download(&artifact("bg-removed-cat.png", b"one"), temp_dir.path())
            .await
            .unwrap();
        let second = ImageIoService::save_download(&artifact("bg-removed-cat.png", b"two"), temp_dir.path())
            .await
            .unwrap();

        assert_eq!(second, temp_dir.path().join("bg-removed-cat (1).png"));
        assert_eq!(std::fs::read(&first).unwrap(), b"one");
        assert_eq!(std::fs::read(&second).unwrap(), b"two");
    }
}
