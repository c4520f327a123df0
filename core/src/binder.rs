// restoration-core/src/binder.rs

//! Accepting uploaded media files into the uploads directory.

use crate::error::{OrderError, OrderResult};
use crate::order::{FileMetadata, OrderId};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tracing::{info, instrument, warn};
use uuid::Uuid;

pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 100 * 1024 * 1024;

pub const DEFAULT_ALLOWED_EXTENSIONS: &[&str] = &[
  "mp3", "wav", "mp4", "m4a", "aac", "flac", "ogg", "mov", "avi", "aiff", "wma", "webm", "mkv",
];

/// Shortest file id `locate` will prefix-match on.
const MIN_FILE_ID_LEN: usize = 8;

const COPY_CHUNK: usize = 64 * 1024;

/// Where uploads go and what is accepted.
#[derive(Debug, Clone)]
pub struct UploadPolicy {
  pub upload_dir: PathBuf,
  pub max_bytes: u64,
  pub allowed_extensions: BTreeSet<String>,
}

impl UploadPolicy {
  pub fn new(upload_dir: impl Into<PathBuf>) -> Self {
    Self {
      upload_dir: upload_dir.into(),
      max_bytes: DEFAULT_MAX_UPLOAD_BYTES,
      allowed_extensions: DEFAULT_ALLOWED_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
    }
  }

  pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
    self.max_bytes = max_bytes;
    self
  }

  pub fn with_allowed_extensions<I, S>(mut self, extensions: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    self.allowed_extensions = extensions
      .into_iter()
      .map(|e| e.as_ref().trim().trim_start_matches('.').to_ascii_lowercase())
      .filter(|e| !e.is_empty())
      .collect();
    self
  }

  /// Lowercased extension of `filename` if it is allowed.
  pub fn allowed_extension(&self, filename: &str) -> Option<String> {
    let (_, ext) = filename.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();
    self.allowed_extensions.contains(&ext).then_some(ext)
  }
}

impl Default for UploadPolicy {
  fn default() -> Self {
    Self::new("uploads")
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
  /// `<uuid>` for unbound uploads, `<order_id>_<8 hex>` for bound ones.
  pub file_id: String,
  pub stored_name: String,
  pub path: PathBuf,
  pub original_filename: String,
  pub size: u64,
}

impl StoredFile {
  pub fn metadata(&self) -> FileMetadata {
    FileMetadata {
      stored_path: self.path.to_string_lossy().into_owned(),
      original_filename: self.original_filename.clone(),
      size: self.size,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedFile {
  pub stored_name: String,
  pub path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct FileBinder {
  policy: UploadPolicy,
}

impl FileBinder {
  pub fn new(policy: UploadPolicy) -> Self {
    Self { policy }
  }

  pub async fn ensure_dir(&self) -> OrderResult<()> {
    tokio::fs::create_dir_all(&self.policy.upload_dir).await?;
    Ok(())
  }

  /// Validates and streams one upload to disk.
  ///
  /// `declared_size` lets an over-limit upload be refused before any byte is
  /// read; the limit is enforced on the streamed bytes either way and a partial
  /// file is removed on failure.
  #[instrument(name = "FileBinder::accept", skip(self, reader), fields(order_id = ?order_id.map(OrderId::as_str)))]
  pub async fn accept<R>(
    &self,
    mut reader: R,
    filename: &str,
    declared_size: Option<u64>,
    order_id: Option<&OrderId>,
  ) -> OrderResult<StoredFile>
  where
    R: AsyncRead + Unpin,
  {
    let base = base_name(filename).trim();
    if base.is_empty() {
      return Err(OrderError::Validation("No file selected".to_string()));
    }

    let ext = self.policy.allowed_extension(base).ok_or_else(|| {
      warn!(filename = %base, "Rejected upload with disallowed extension.");
      OrderError::InvalidType {
        filename: base.to_string(),
      }
    })?;

    // A stem made only of dropped characters falls back to a neutral name.
    let original_filename = sanitize_filename(base)
      .filter(|name| {
        name
          .rsplit_once('.')
          .is_some_and(|(stem, kept)| !stem.is_empty() && kept.eq_ignore_ascii_case(&ext))
      })
      .unwrap_or_else(|| format!("upload.{}", ext));

    let limit = self.policy.max_bytes;
    if declared_size.is_some_and(|size| size > limit) {
      warn!(?declared_size, limit, "Rejected upload by declared size.");
      return Err(OrderError::TooLarge { limit });
    }

    let (file_id, stored_name) = storage_name(order_id, &ext);
    self.ensure_dir().await?;
    let path = self.policy.upload_dir.join(&stored_name);

    let size = copy_limited(&mut reader, &path, limit).await?;

    info!(%file_id, %original_filename, size, "File stored.");
    Ok(StoredFile {
      file_id,
      stored_name,
      path,
      original_filename,
      size,
    })
  }

  /// Finds the stored file whose name starts with `file_id`.
  pub async fn locate(&self, file_id: &str) -> OrderResult<LocatedFile> {
    let not_found = || OrderError::FileNotFound {
      file_id: file_id.to_string(),
    };

    let acceptable = file_id.len() >= MIN_FILE_ID_LEN
      && file_id.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
    if !acceptable {
      return Err(not_found());
    }

    let mut entries = match tokio::fs::read_dir(&self.policy.upload_dir).await {
      Ok(entries) => entries,
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(not_found()),
      Err(e) => return Err(e.into()),
    };

    let mut matches = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
      if let Some(name) = entry.file_name().to_str() {
        if name.starts_with(file_id) && entry.file_type().await?.is_file() {
          matches.push(name.to_string());
        }
      }
    }
    matches.sort();

    let stored_name = matches.into_iter().next().ok_or_else(not_found)?;
    Ok(LocatedFile {
      path: self.policy.upload_dir.join(&stored_name),
      stored_name,
    })
  }
}

fn storage_name(order_id: Option<&OrderId>, ext: &str) -> (String, String) {
  let file_id = match order_id {
    None => Uuid::new_v4().to_string(),
    Some(order_id) => {
      let short = Uuid::new_v4().simple().to_string();
      format!("{}_{}", order_id, &short[..8])
    }
  };
  let stored_name = format!("{}.{}", file_id, ext);
  (file_id, stored_name)
}

/// Copies at most `limit` bytes from `reader` into a new file at `path`.
///
/// An existing file at `path` is never touched; a file this call created is
/// removed again if the copy fails.
async fn copy_limited<R>(reader: &mut R, path: &Path, limit: u64) -> OrderResult<u64>
where
  R: AsyncRead + Unpin,
{
  let file = tokio::fs::OpenOptions::new()
    .write(true)
    .create_new(true)
    .open(path)
    .await?;

  match write_limited(reader, file, limit).await {
    Ok(written) => Ok(written),
    Err(e) => {
      if let Err(cleanup) = tokio::fs::remove_file(path).await {
        warn!(path = %path.display(), error = %cleanup, "Could not remove partial upload.");
      }
      Err(e)
    }
  }
}

async fn write_limited<R>(reader: &mut R, mut file: tokio::fs::File, limit: u64) -> OrderResult<u64>
where
  R: AsyncRead + Unpin,
{
  let mut buf = vec![0u8; COPY_CHUNK];
  let mut written: u64 = 0;
  loop {
    let n = reader
      .read(&mut buf)
      .await
      .map_err(|e| OrderError::Validation(format!("Upload stream failed: {}", e)))?;
    if n == 0 {
      break;
    }
    written += n as u64;
    if written > limit {
      return Err(OrderError::TooLarge { limit });
    }
    file.write_all(&buf[..n]).await?;
  }
  file.flush().await?;
  Ok(written)
}

/// Last path component of a client-supplied filename, either separator style.
fn base_name(filename: &str) -> &str {
  filename.rsplit(['/', '\\']).next().unwrap_or_default()
}

/// Reduces a client-supplied filename to a safe base name.
///
/// Directory components are dropped, whitespace becomes `_`, anything outside
/// `[A-Za-z0-9._-]` is removed and leading dots are trimmed. `None` if nothing
/// usable remains.
pub fn sanitize_filename(filename: &str) -> Option<String> {
  let cleaned: String = base_name(filename)
    .split_whitespace()
    .collect::<Vec<_>>()
    .join("_")
    .chars()
    .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
    .collect();
  let cleaned = cleaned.trim_start_matches(['.', '_']).to_string();
  (!cleaned.is_empty()).then_some(cleaned)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn sanitize_strips_directories_and_odd_characters() {
    assert_eq!(sanitize_filename("../../etc/passwd.mp3").as_deref(), Some("passwd.mp3"));
    assert_eq!(sanitize_filename("C:\\tapes\\side a.wav").as_deref(), Some("side_a.wav"));
    assert_eq!(sanitize_filename("mix (final)!.flac").as_deref(), Some("mix_final.flac"));
    assert_eq!(sanitize_filename(".hidden.ogg").as_deref(), Some("hidden.ogg"));
    assert_eq!(sanitize_filename(""), None);
    assert_eq!(sanitize_filename("///"), None);
  }

  #[test]
  fn extension_check_is_case_insensitive() {
    let policy = UploadPolicy::default();
    assert_eq!(policy.allowed_extension("Wedding.MOV").as_deref(), Some("mov"));
    assert_eq!(policy.allowed_extension("tape.aiff").as_deref(), Some("aiff"));
    assert_eq!(policy.allowed_extension("setup.exe"), None);
    assert_eq!(policy.allowed_extension("noext"), None);
  }

  #[test]
  fn custom_extension_list_is_normalized() {
    let policy = UploadPolicy::default().with_allowed_extensions([" .MP3", "wav", ""]);
    assert_eq!(policy.allowed_extensions.len(), 2);
    assert!(policy.allowed_extension("a.mp3").is_some());
    assert!(policy.allowed_extension("a.flac").is_none());
  }

  #[test]
  fn storage_names_embed_order_prefix() {
    let order_id = OrderId::parse("WAR-ABCDEF01").unwrap();
    let (file_id, stored) = storage_name(Some(&order_id), "wav");
    assert!(file_id.starts_with("WAR-ABCDEF01_"));
    assert_eq!(file_id.len(), "WAR-ABCDEF01_".len() + 8);
    assert_eq!(stored, format!("{}.wav", file_id));

    let (file_id, stored) = storage_name(None, "mp3");
    assert!(Uuid::parse_str(&file_id).is_ok());
    assert!(stored.ends_with(".mp3"));
  }

  #[tokio::test]
  async fn copy_into_existing_name_leaves_that_file_alone() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("WAR-ABCDEF01_0000aaaa.wav");
    std::fs::write(&path, b"first upload").unwrap();

    let mut reader = std::io::Cursor::new(b"second".to_vec());
    let err = copy_limited(&mut reader, &path, 1024).await.unwrap_err();

    assert!(matches!(err, OrderError::Storage(_)));
    assert_eq!(std::fs::read(&path).unwrap(), b"first upload");
  }
}
