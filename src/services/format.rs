//! Media type detection and download naming
//!
//! Front ends that only hold a path or raw bytes use this to declare a media
//! type the way a browser fills in `File.type`, and to derive the filename
//! offered for a processed download.

use crate::config::IntakeConfig;
use std::path::Path;

/// Service for media type detection and filename derivation
pub struct MediaFormatHandler;

impl MediaFormatHandler {
    /// Media type for a file extension, case-insensitive
    ///
    /// Unknown extensions yield `None`, the equivalent of an empty `File.type`.
    ///
    /// # Examples
    /// ```rust
    /// use bgremove_studio::services::MediaFormatHandler;
    ///
    /// assert_eq!(MediaFormatHandler::media_type_for_extension("JPG"), Some("image/jpeg"));
    /// assert_eq!(MediaFormatHandler::media_type_for_extension("pdf"), Some("application/pdf"));
    /// assert_eq!(MediaFormatHandler::media_type_for_extension("xyz"), None);
    /// ```
    #[must_use]
    pub fn media_type_for_extension(extension: &str) -> Option<&'static str> {
        let media_type = match extension.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" | "jfif" => "image/jpeg",
            "png" => "image/png",
            "webp" => "image/webp",
            "gif" => "image/gif",
            "bmp" => "image/bmp",
            "tif" | "tiff" => "image/tiff",
            "ico" => "image/x-icon",
            "svg" => "image/svg+xml",
            "avif" => "image/avif",
            "heic" => "image/heic",
            "pdf" => "application/pdf",
            "txt" => "text/plain",
            "json" => "application/json",
            "zip" => "application/zip",
            "mp4" => "video/mp4",
            "mov" => "video/quicktime",
            _ => return None,
        };
        Some(media_type)
    }

    /// Media type guessed from file contents
    #[must_use]
    pub fn sniff_media_type(data: &[u8]) -> Option<&'static str> {
        image::guess_format(data).ok().map(|format| format.to_mime_type())
    }

    /// Media type for a file: extension first, content sniffing as fallback
    ///
    /// Returns an empty string when neither yields a type.
    #[must_use]
    pub fn detect_media_type(path: &Path, data: &[u8]) -> String {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::media_type_for_extension)
            .or_else(|| Self::sniff_media_type(data))
            .unwrap_or_default()
            .to_string()
    }

    /// Final path component of a display name
    ///
    /// Both `/` and `\` count as separators, whatever the host platform.
    #[must_use]
    pub fn base_name(display_name: &str) -> &str {
        display_name
            .rsplit(&['/', '\\'][..])
            .next()
            .unwrap_or(display_name)
    }

    /// Strip the last extension from a display name
    ///
    /// Only a non-empty trailing `.ext` is removed; `photo` and `photo.`
    /// are returned unchanged.
    #[must_use]
    pub fn file_stem(display_name: &str) -> &str {
        match display_name.rfind('.') {
            Some(dot) => {
                let extension = display_name.get(dot + 1..).unwrap_or_default();
                if extension.is_empty() {
                    display_name
                } else {
                    display_name.get(..dot).unwrap_or(display_name)
                }
            },
            None => display_name,
        }
    }

    /// Filename offered for a processed download
    ///
    /// Directory parts of the display name are dropped.
    ///
    /// # Examples
    /// ```rust
    /// use bgremove_studio::{services::MediaFormatHandler, IntakeConfig};
    ///
    /// let config = IntakeConfig::default();
    /// assert_eq!(MediaFormatHandler::download_filename("cat.jpg", &config), "bg-removed-cat.png");
    /// ```
    #[must_use]
    pub fn download_filename(display_name: &str, config: &IntakeConfig) -> String {
        format!(
            "{}{}.{}",
            config.download_prefix,
            Self::file_stem(Self::base_name(display_name)),
            config.download_extension
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_stem() {
        assert_eq!(MediaFormatHandler::file_stem("cat.jpg"), "cat");
        assert_eq!(MediaFormatHandler::file_stem("archive.tar.gz"), "archive.tar");
        assert_eq!(MediaFormatHandler::file_stem("photo"), "photo");
        assert_eq!(MediaFormatHandler::file_stem("photo."), "photo.");
        assert_eq!(MediaFormatHandler::file_stem(".hidden"), "");
        assert_eq!(MediaFormatHandler::file_stem("día soleado.jpeg"), "día soleado");
    }

    #[test]
    fn test_base_name() {
        assert_eq!(MediaFormatHandler::base_name("cat.jpg"), "cat.jpg");
        assert_eq!(MediaFormatHandler::base_name("../../etc/cat.jpg"), "cat.jpg");
        assert_eq!(MediaFormatHandler::base_name("C:\\Users\\me\\dog.png"), "dog.png");
        assert_eq!(MediaFormatHandler::base_name("dir/"), "");
    }

    #[test]
    fn test_download_filename_stays_in_directory() {
        let config = IntakeConfig::default();
        assert_eq!(
            MediaFormatHandler::download_filename("../../secret/cat.jpg", &config),
            "bg-removed-cat.png"
        );
        assert_eq!(
            MediaFormatHandler::download_filename("..\\outside\\dog.png", &config),
            "bg-removed-dog.png"
        );
        assert_eq!(
            MediaFormatHandler::download_filename("holiday.v2/photo", &config),
            "bg-removed-photo.png"
        );
    }

    #[test]
    fn test_download_filename() {
        let config = IntakeConfig::default();
        assert_eq!(
            MediaFormatHandler::download_filename("cat.jpg", &config),
            "bg-removed-cat.png"
        );
        assert_eq!(
            MediaFormatHandler::download_filename("portrait.final.webp", &config),
            "bg-removed-portrait.final.png"
        );
        assert_eq!(
            MediaFormatHandler::download_filename("scan", &config),
            "bg-removed-scan.png"
        );

        let custom = IntakeConfig::builder()
            .download_prefix("cutout_")
            .download_extension("webp")
            .build()
            .unwrap();
        assert_eq!(
            MediaFormatHandler::download_filename("cat.jpg", &custom),
            "cutout_cat.webp"
        );
    }

    #[test]
    fn test_sniff_media_type() {
        let png_header = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
        assert_eq!(MediaFormatHandler::sniff_media_type(&png_header), Some("image/png"));

        let jpeg_header = [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46];
        assert_eq!(MediaFormatHandler::sniff_media_type(&jpeg_header), Some("image/jpeg"));

        assert_eq!(MediaFormatHandler::sniff_media_type(b"%PDF-1.7"), None);
    }

    #[test]
    fn test_detect_media_type() {
        let png_header = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

        assert_eq!(
            MediaFormatHandler::detect_media_type(Path::new("doc.pdf"), b"%PDF-1.7"),
            "application/pdf"
        );
        assert_eq!(
            MediaFormatHandler::detect_media_type(Path::new("upload.bin"), &png_header),
            "image/png"
        );
        assert_eq!(
            MediaFormatHandler::detect_media_type(Path::new("mystery"), b"hello"),
            ""
        );
    }
}
