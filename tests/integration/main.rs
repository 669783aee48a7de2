//! Integration test suite.
//!
//! Exercises the full service graph over the in-memory stores: no
//! database and no blob directory required. Each module covers one
//! service-level concern end to end.

mod helpers;

mod file_test;
mod organize_test;
mod permission_test;
mod rule_test;
mod tag_album_test;
