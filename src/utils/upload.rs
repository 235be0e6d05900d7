use crate::config::UploadConfig;
use crate::error::{AppError, AppResult};
use std::path::{Path, PathBuf};

const ALLOWED_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];

/// Image file received from a multipart form.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Writes uploaded tour images to disk and hands back the public path.
#[derive(Clone)]
pub struct ImageStore {
    dir: PathBuf,
    url_prefix: String,
    max_bytes: usize,
}

impl ImageStore {
    pub fn new(config: &UploadConfig) -> Self {
        Self {
            dir: PathBuf::from(&config.dir),
            url_prefix: config.url_prefix.trim_end_matches('/').to_string(),
            max_bytes: config.max_image_bytes,
        }
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    pub fn check(&self, image: &UploadedImage) -> AppResult<String> {
        if image.bytes.is_empty() {
            return Err(AppError::UploadError("Uploaded image is empty".to_string()));
        }
        if image.bytes.len() > self.max_bytes {
            return Err(AppError::UploadError(format!(
                "Image exceeds the {} byte limit",
                self.max_bytes
            )));
        }
        let ext = Path::new(&image.file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
            return Err(AppError::UploadError(
                "Image must be jpg, jpeg, png, gif or webp".to_string(),
            ));
        }
        Ok(ext)
    }

    /// Stores the image under a fresh name and returns e.g. `/uploads/<uuid>.png`.
    pub async fn save(&self, image: &UploadedImage) -> AppResult<String> {
        let ext = self.check(image)?;
        let stored_name = format!("{}.{}", uuid::Uuid::new_v4(), ext);

        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(self.dir.join(&stored_name), &image.bytes).await?;

        log::info!("Stored uploaded image {} ({} bytes)", stored_name, image.bytes.len());
        Ok(format!("{}/{}", self.url_prefix, stored_name))
    }

    pub fn url_prefix(&self) -> &str {
        &self.url_prefix
    }

    /// Reads a stored image back. `None` for names that were never stored.
    pub async fn read(&self, stored_name: &str) -> AppResult<Option<Vec<u8>>> {
        if !is_stored_name(stored_name) {
            return Ok(None);
        }
        match tokio::fs::read(self.dir.join(stored_name)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Best-effort removal of a file stored by [`ImageStore::save`].
    pub async fn discard(&self, public_path: &str) {
        let Some(stored_name) = public_path
            .strip_prefix(&self.url_prefix)
            .map(|rest| rest.trim_start_matches('/'))
            .filter(|name| is_stored_name(name))
        else {
            return;
        };
        if let Err(e) = tokio::fs::remove_file(self.dir.join(stored_name)).await {
            log::warn!("Failed to discard uploaded image {stored_name}: {e}");
        }
    }
}

fn is_stored_name(name: &str) -> bool {
    !name.is_empty() && !name.contains(['/', '\\']) && !name.contains("..")
}

/// Content type for a stored image, by extension.
pub fn image_content_type(stored_name: &str) -> &'static str {
    let ext = Path::new(stored_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}
