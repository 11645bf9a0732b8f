//! Core types shared across the updater components.

pub mod error;

pub use error::{FetchError, ReplaceError, StorageError, UpdateError};
