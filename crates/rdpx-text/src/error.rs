#![forbid(unsafe_code)]

//! Errors for the fallible layout surfaces.
//!
//! Measuring and wrapping never fail; malformed text degrades instead. Only
//! the bounded entry points, the glyph cache and configuration validation
//! report errors.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LayoutError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("text of {len} bytes exceeds the layout limit of {limit} bytes")]
    InputTooLarge { len: usize, limit: usize },

    #[error("glyph cache {cache_id} does not exist ({caches} caches configured)")]
    UnknownCache { cache_id: u8, caches: usize },

    #[error("invalid configuration value for {key}: {value:?}")]
    InvalidConfig { key: &'static str, value: String },
}
