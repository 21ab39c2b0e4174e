use crate::domain::ports::BlobStore;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::{fs, io::AsyncWriteExt};
use tracing::{debug, error};
use uuid::Uuid;

/// Stores uploads as flat files under one directory. References are bare file names.
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    pub async fn new(root: impl Into<PathBuf>) -> Result<Self, AppError> {
        let root = root.into();
        fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    fn resolve(&self, reference: &str) -> Option<PathBuf> {
        let valid = !reference.is_empty()
            && !reference.contains(['/', '\\'])
            && reference != "."
            && reference != "..";
        valid.then(|| self.root.join(reference))
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn store(&self, bytes: &[u8], suggested_name: &str) -> Result<String, AppError> {
        let suffix: String = Uuid::new_v4().simple().to_string().chars().take(8).collect();
        let name = format!(
            "{}_{}_{}",
            Utc::now().format("%Y%m%d%H%M%S"),
            suffix,
            sanitize_file_name(suggested_name)
        );

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(self.root.join(&name))
            .await
            .map_err(|e| {
                error!("Could not create blob {}: {:?}", name, e);
                AppError::Storage(e)
            })?;
        file.write_all(bytes).await?;
        file.flush().await?;

        debug!("Stored blob {} ({} bytes)", name, bytes.len());
        Ok(name)
    }

    async fn retrieve(&self, reference: &str) -> Result<Vec<u8>, AppError> {
        let path = self.resolve(reference)
            .ok_or_else(|| AppError::NotFound(format!("Blob {} not found", reference)))?;

        match fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(AppError::NotFound(format!("Blob {} not found", reference)))
            }
            Err(e) => Err(AppError::Storage(e)),
        }
    }
}

/// Longest sanitized name kept; the stored name adds a 24-byte prefix.
const MAX_NAME_LEN: usize = 128;
const MAX_EXTENSION_LEN: usize = 16;

/// Keeps the last path component and replaces anything outside `[A-Za-z0-9._-]`.
/// Long names are cut to `MAX_NAME_LEN` bytes, keeping a short extension.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') { c } else { '_' })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');

    if cleaned.is_empty() {
        return "upload".to_string();
    }
    if cleaned.len() <= MAX_NAME_LEN {
        return cleaned.to_string();
    }

    // All ASCII at this point, so byte offsets are char boundaries.
    let extension = match cleaned.rfind('.') {
        Some(dot) if cleaned.len() - dot <= MAX_EXTENSION_LEN => &cleaned[dot..],
        _ => "",
    };
    let stem = &cleaned[..MAX_NAME_LEN - extension.len()];
    format!("{}{}", stem, extension)
}
