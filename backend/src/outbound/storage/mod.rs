//! Photo storage adapters.

mod dir_photo_storage;

pub use dir_photo_storage::DirPhotoStorage;
