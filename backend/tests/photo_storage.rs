//! Photo uploads written to a real directory through the guest service.

use std::sync::Arc;

use rstest::rstest;
use wedding_backend::domain::ports::{GuestCommand, GuestQuery, PhotoStorage};
use wedding_backend::domain::{
    DEFAULT_MAX_UPLOAD_BYTES, ErrorCode, GuestService, PhotoDetails, PhotoUpload, RequestActor,
};
use wedding_backend::test_support::clock::MutableClock;
use wedding_backend::test_support::fixtures::{wedding, wedding_id};
use wedding_backend::test_support::memory::InMemoryStore;
use wedding_backend::test_support::storage::temp_photo_storage;

fn upload(bytes: &[u8]) -> PhotoUpload {
    PhotoUpload {
        details: PhotoDetails {
            wedding_id: wedding_id(),
            original_filename: Some("first dance.webp".to_owned()),
            uploaded_by: Some("Aunt May".to_owned()),
            caption: Some("First dance".to_owned()),
        },
        content_type: "image/webp".to_owned(),
        bytes: bytes.to_vec(),
    }
}

#[rstest]
#[tokio::test]
async fn upload_lands_in_the_upload_directory() {
    let (root, storage) = temp_photo_storage();
    let store = Arc::new(InMemoryStore::with_wedding(wedding()));
    let service = GuestService::new(
        Arc::clone(&store),
        Arc::new(storage),
        Arc::new(MutableClock::fixed()),
    )
    .with_max_upload_bytes(DEFAULT_MAX_UPLOAD_BYTES);
    let actor = RequestActor::guest(Some("203.0.113.7".to_owned()), None);

    let photo = service
        .upload_photo(&actor, upload(b"RIFF0000WEBP"))
        .await
        .expect("upload succeeds");

    let on_disk = root.path().join("uploads").join(&photo.filename);
    assert_eq!(std::fs::read(on_disk).expect("stored file"), b"RIFF0000WEBP");
    assert!(photo.file_path.ends_with(&photo.filename));
    assert_eq!(photo.mime_type, "image/webp");
    assert!(!photo.is_approved);

    let entries = store.audit_entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].ip_address.as_deref(), Some("203.0.113.7"));
    assert!(service.approved_photos().await.expect("list").is_empty());
}

#[rstest]
#[tokio::test]
async fn failed_commit_removes_the_written_file() {
    let (root, storage) = temp_photo_storage();
    let store = Arc::new(InMemoryStore::with_wedding(wedding()));
    let service = GuestService::new(
        Arc::clone(&store),
        Arc::new(storage),
        Arc::new(MutableClock::fixed()),
    );
    store.set_rejecting_commits(true);
    let actor = RequestActor::guest(None, None);

    let err = service
        .upload_photo(&actor, upload(b"RIFF0000WEBP"))
        .await
        .expect_err("commit rejected");

    assert_eq!(err.code(), ErrorCode::PhotoUploadFailed);
    let leftovers = std::fs::read_dir(root.path().join("uploads"))
        .expect("upload dir")
        .count();
    assert_eq!(leftovers, 0);
}

#[rstest]
#[tokio::test]
async fn removing_a_missing_file_is_not_an_error() {
    let (_root, storage) = temp_photo_storage();
    storage
        .remove("never-written.jpg")
        .await
        .expect("missing files are ignored");
}
