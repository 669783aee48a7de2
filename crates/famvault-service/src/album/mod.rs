//! Album management and album/file associations.

pub mod service;

pub use service::{AlbumService, CreateAlbumRequest};
