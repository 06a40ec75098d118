//! Tamper-evident high score persistence
//!
//! One `u32` is kept per user. The record is encrypted with a key that every
//! build of the same source shares, so casual edits to the file are detected
//! and read back as zero. This deters editing the file by hand; it is not
//! meant to withstand someone holding the source.

pub mod cipher;
pub mod error;
pub mod store;

pub use error::ScoreError;
pub use store::{FILE_NAME, SIGNATURE, ScoreStore, decode_record, encode_record, home_dir};
