// tests/binder_tests.rs
mod common;

use common::*;
use restoration_core::{FileBinder, OrderError, OrderId, UploadPolicy};
use std::io::Cursor;
use tempfile::TempDir;

fn upload_count(dir: &TempDir) -> usize {
  match std::fs::read_dir(dir.path().join("uploads")) {
    Ok(entries) => entries.count(),
    Err(_) => 0,
  }
}

#[tokio::test]
async fn unbound_upload_is_stored_under_uuid_name() {
  setup_tracing();
  let dir = TempDir::new().unwrap();
  let binder = binder_in(&dir);

  let stored = binder
    .accept(Cursor::new(b"RIFF....WAVE".to_vec()), "My Tape.WAV", None, None)
    .await
    .unwrap();

  assert!(uuid::Uuid::parse_str(&stored.file_id).is_ok());
  assert_eq!(stored.stored_name, format!("{}.wav", stored.file_id));
  assert_eq!(stored.original_filename, "My_Tape.WAV");
  assert_eq!(stored.size, 12);
  assert_eq!(std::fs::read(&stored.path).unwrap(), b"RIFF....WAVE");
}

#[tokio::test]
async fn bound_upload_name_starts_with_order_id() {
  let dir = TempDir::new().unwrap();
  let binder = binder_in(&dir);
  let order_id = OrderId::generate();

  let stored = binder
    .accept(Cursor::new(vec![1u8; 10]), "clip.mp4", Some(10), Some(&order_id))
    .await
    .unwrap();

  assert!(stored.stored_name.starts_with(&format!("{}_", order_id)));
  assert!(stored.stored_name.ends_with(".mp4"));
  let meta = stored.metadata();
  assert_eq!(meta.original_filename, "clip.mp4");
  assert_eq!(meta.size, 10);
  assert_eq!(meta.stored_path, stored.path.to_string_lossy());
}

#[tokio::test]
async fn disallowed_extension_is_rejected_bound_or_not() {
  let dir = TempDir::new().unwrap();
  let binder = binder_in(&dir);
  let order_id = OrderId::generate();

  for bound in [None, Some(&order_id)] {
    let err = binder
      .accept(Cursor::new(b"MZ".to_vec()), "setup.exe", None, bound)
      .await
      .unwrap_err();
    assert!(matches!(err, OrderError::InvalidType { ref filename } if filename == "setup.exe"));
  }
  assert_eq!(upload_count(&dir), 0);
}

#[tokio::test]
async fn non_latin_stems_keep_their_extension() {
  setup_tracing();
  let dir = TempDir::new().unwrap();
  let binder = binder_in(&dir);

  for (filename, ext) in [("Свадьба.mp3", "mp3"), ("婚礼.wav", "wav"), ("ñ.flac", "flac"), ("..MP3", "mp3")] {
    let stored = binder
      .accept(Cursor::new(b"abc".to_vec()), filename, None, None)
      .await
      .unwrap();
    assert_eq!(stored.original_filename, format!("upload.{}", ext));
    assert!(stored.stored_name.ends_with(&format!(".{}", ext)));
    assert_eq!(stored.size, 3);
  }

  let stored = binder
    .accept(Cursor::new(b"abc".to_vec()), "запись tape 1.ogg", None, None)
    .await
    .unwrap();
  assert_eq!(stored.original_filename, "tape_1.ogg");
  assert_eq!(upload_count(&dir), 5);
}

#[tokio::test]
async fn extension_is_judged_on_the_client_name() {
  let dir = TempDir::new().unwrap();
  let binder = binder_in(&dir);

  let err = binder
    .accept(Cursor::new(b"MZ".to_vec()), "C:\\Users\\Ана\\видео.exe", None, None)
    .await
    .unwrap_err();
  assert!(matches!(err, OrderError::InvalidType { ref filename } if filename == "видео.exe"));

  let err = binder
    .accept(Cursor::new(Vec::new()), "uploads/", None, None)
    .await
    .unwrap_err();
  assert!(matches!(err, OrderError::Validation(ref m) if m == "No file selected"));
  assert_eq!(upload_count(&dir), 0);
}

#[tokio::test]
async fn empty_filename_means_no_file_selected() {
  let dir = TempDir::new().unwrap();
  let binder = binder_in(&dir);
  let err = binder.accept(Cursor::new(Vec::new()), "", None, None).await.unwrap_err();
  assert!(matches!(err, OrderError::Validation(ref m) if m == "No file selected"));
}

#[tokio::test]
async fn declared_size_over_limit_is_refused_up_front() {
  let dir = TempDir::new().unwrap();
  let binder = FileBinder::new(UploadPolicy::new(dir.path().join("uploads")).with_max_bytes(8));

  let err = binder
    .accept(Cursor::new(vec![0u8; 4]), "a.mp3", Some(9), None)
    .await
    .unwrap_err();
  assert!(matches!(err, OrderError::TooLarge { limit: 8 }));
  assert_eq!(upload_count(&dir), 0);
}

#[tokio::test]
async fn streamed_bytes_over_limit_remove_partial_file() {
  setup_tracing();
  let dir = TempDir::new().unwrap();
  let binder = FileBinder::new(UploadPolicy::new(dir.path().join("uploads")).with_max_bytes(100));

  let err = binder
    .accept(Cursor::new(vec![7u8; 101]), "long.ogg", None, None)
    .await
    .unwrap_err();
  assert!(matches!(err, OrderError::TooLarge { limit: 100 }));
  assert_eq!(upload_count(&dir), 0);

  // Exactly at the limit is accepted.
  let stored = binder
    .accept(Cursor::new(vec![7u8; 100]), "fits.ogg", None, None)
    .await
    .unwrap();
  assert_eq!(stored.size, 100);
}

#[tokio::test]
async fn locate_finds_by_full_id_and_prefix() {
  let dir = TempDir::new().unwrap();
  let binder = binder_in(&dir);
  let order_id = OrderId::generate();

  let unbound = binder
    .accept(Cursor::new(b"x".to_vec()), "a.wav", None, None)
    .await
    .unwrap();
  let bound = binder
    .accept(Cursor::new(b"y".to_vec()), "b.flac", None, Some(&order_id))
    .await
    .unwrap();

  let located = binder.locate(&unbound.file_id).await.unwrap();
  assert_eq!(located.stored_name, unbound.stored_name);
  assert_eq!(located.path, unbound.path);

  let located = binder.locate(&bound.file_id).await.unwrap();
  assert_eq!(located.stored_name, bound.stored_name);

  let located = binder.locate(order_id.as_str()).await.unwrap();
  assert_eq!(located.stored_name, bound.stored_name);
}

#[tokio::test]
async fn locate_rejects_traversal_and_short_ids() {
  let dir = TempDir::new().unwrap();
  let binder = binder_in(&dir);
  binder
    .accept(Cursor::new(b"x".to_vec()), "a.wav", None, None)
    .await
    .unwrap();

  for id in ["../orders", "..%2f..%2fetc", "a/b/c/d/e", "abc", ""] {
    assert!(
      matches!(binder.locate(id).await, Err(OrderError::FileNotFound { .. })),
      "{} should not resolve",
      id
    );
  }
  assert!(matches!(
    binder.locate("00000000-0000-0000-0000-000000000000").await,
    Err(OrderError::FileNotFound { .. })
  ));
}

#[tokio::test]
async fn locate_before_any_upload_is_not_found() {
  let dir = TempDir::new().unwrap();
  let binder = binder_in(&dir);
  assert!(matches!(
    binder.locate("0123456789abcdef").await,
    Err(OrderError::FileNotFound { .. })
  ));
}
