use regex::Regex;
use std::path::Path;
use crate::errors::{AppError, AppResult};
use crate::form_state::ImageFile;

pub struct InputValidator;

impl InputValidator {
    /// Funding target as typed into a number input: a positive decimal
    pub fn validate_required_amount(amount: &str) -> AppResult<()> {
        let trimmed = amount.trim();

        if trimmed.is_empty() {
            return Err(AppError::validation("required_amount", "Required amount cannot be empty"));
        }

        let number_pattern = Regex::new(r"^\d+(\.\d+)?$").unwrap();
        if !number_pattern.is_match(trimmed) {
            return Err(AppError::validation("required_amount", "Must be a plain decimal number"));
        }

        match trimmed.parse::<f64>() {
            Ok(value) if value > 0.0 && value.is_finite() => Ok(()),
            _ => Err(AppError::validation("required_amount", "Must be greater than 0")),
        }
    }

    pub fn validate_file_path(path: &str) -> AppResult<()> {
        if path.trim().is_empty() {
            return Err(AppError::validation("file_path", "File path cannot be empty"));
        }

        let path_obj = Path::new(path);

        if !path_obj.exists() {
            return Err(AppError::file_not_found(path));
        }

        if !path_obj.is_file() {
            return Err(AppError::validation("file_path", "Path is not a file"));
        }

        Ok(())
    }

    /// The form's file input accepts `image/*`; map the extension to a MIME type.
    pub fn image_mime_type(path: &str) -> AppResult<&'static str> {
        let ext = Path::new(path)
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .ok_or_else(|| AppError::validation("file_path", "File must have an extension"))?;

        match ext.as_str() {
            "png" => Ok("image/png"),
            "jpg" | "jpeg" => Ok("image/jpeg"),
            "webp" => Ok("image/webp"),
            "gif" => Ok("image/gif"),
            "bmp" => Ok("image/bmp"),
            "svg" => Ok("image/svg+xml"),
            "avif" => Ok("image/avif"),
            _ => Err(AppError::invalid_file_type(path)),
        }
    }

    pub fn validate_image_file(file_path: &str, max_size_mb: u64) -> AppResult<()> {
        Self::image_mime_type(file_path)?;
        Self::validate_file_path(file_path)?;

        let metadata = std::fs::metadata(file_path)?;
        if metadata.len() > max_size_mb.saturating_mul(1024 * 1024) {
            return Err(AppError::file_too_large(file_path, max_size_mb));
        }

        Ok(())
    }

    pub fn sanitize_filename(filename: &str) -> String {
        let unsafe_chars = Regex::new(r#"[<>:"/\\|?*\x00-\x1f]"#).unwrap();
        let sanitized = unsafe_chars.replace_all(filename.trim(), "_");

        if sanitized.chars().count() > 255 {
            let truncated: String = sanitized.chars().take(252).collect();
            format!("{}...", truncated)
        } else {
            sanitized.to_string()
        }
    }

    /// Reads a validated image into memory the way a browser `File` holds it
    pub async fn load_image_file(file_path: &str, max_size_mb: u64) -> AppResult<ImageFile> {
        Self::validate_image_file(file_path, max_size_mb)?;

        let mime_type = Self::image_mime_type(file_path)?;
        let bytes = tokio::fs::read(file_path).await?;
        let file_name = Path::new(file_path)
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();

        Ok(ImageFile::new(
            Self::sanitize_filename(&file_name),
            mime_type,
            bytes,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_required_amount_validation() {
        assert!(InputValidator::validate_required_amount("10").is_ok());
        assert!(InputValidator::validate_required_amount(" 0.5 ").is_ok());
        assert!(InputValidator::validate_required_amount("").is_err());
        assert!(InputValidator::validate_required_amount("0").is_err());
        assert!(InputValidator::validate_required_amount("-3").is_err());
        assert!(InputValidator::validate_required_amount("1e9").is_err());
        assert!(InputValidator::validate_required_amount("ten").is_err());
    }

    #[test]
    fn test_image_mime_type() {
        assert_eq!(InputValidator::image_mime_type("a.PNG").unwrap(), "image/png");
        assert_eq!(InputValidator::image_mime_type("a.jpeg").unwrap(), "image/jpeg");
        assert!(matches!(
            InputValidator::image_mime_type("notes.txt"),
            Err(AppError::InvalidFileType { .. })
        ));
        assert!(InputValidator::image_mime_type("noext").is_err());
    }

    #[test]
    fn test_sanitize_filename() {
        let safe = InputValidator::sanitize_filename("my<cover>:art?.png");
        assert_eq!(safe, "my_cover__art_.png");

        let long = "a".repeat(300);
        assert_eq!(InputValidator::sanitize_filename(&long).chars().count(), 255);
    }

    #[tokio::test]
    async fn test_load_image_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cover.png");
        std::fs::write(&path, [0x89, 0x50, 0x4E, 0x47]).unwrap();
        let path_str = path.to_string_lossy().to_string();

        let image = InputValidator::load_image_file(&path_str, 1).await.unwrap();
        assert_eq!(image.file_name, "cover.png");
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.bytes.len(), 4);
    }

    #[test]
    fn test_huge_size_limit_does_not_overflow() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tiny.png");
        std::fs::write(&path, [0x89, 0x50, 0x4E]).unwrap();

        let result = InputValidator::validate_image_file(&path.to_string_lossy(), u64::MAX / 1024);
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_load_image_file_errors() {
        let dir = TempDir::new().unwrap();

        let missing = dir.path().join("missing.png").to_string_lossy().to_string();
        assert!(matches!(
            InputValidator::load_image_file(&missing, 1).await,
            Err(AppError::FileNotFound { .. })
        ));

        let big = dir.path().join("big.png");
        std::fs::write(&big, vec![0u8; 1024 * 1024 + 1]).unwrap();
        assert!(matches!(
            InputValidator::load_image_file(&big.to_string_lossy(), 1).await,
            Err(AppError::FileTooLarge { .. })
        ));
    }
}
