#![forbid(unsafe_code)]

//! Layout limits and glyph cache sizing.
//!
//! Defaults suit an RDP session: ten glyph caches of 254 entries each (the
//! sizes advertised by most clients) and a cap on the text a single layout
//! call will accept. Each setting can be overridden from the environment.
//! Values that do not parse, or are out of range, are ignored with a warning.
//!
//! | variable                   | field                 | range      |
//! |----------------------------|-----------------------|------------|
//! | `RDPX_MAX_TEXT_BYTES`      | `max_input_bytes`     | `1..`      |
//! | `RDPX_GLYPH_CACHES`        | `glyph_caches`        | `1..=10`   |
//! | `RDPX_GLYPH_CACHE_ENTRIES` | `glyph_cache_entries` | `1..=256`  |

use crate::error::LayoutError;

const ENV_MAX_TEXT_BYTES: &str = "RDPX_MAX_TEXT_BYTES";
const ENV_GLYPH_CACHES: &str = "RDPX_GLYPH_CACHES";
const ENV_GLYPH_CACHE_ENTRIES: &str = "RDPX_GLYPH_CACHE_ENTRIES";

pub const DEFAULT_MAX_INPUT_BYTES: usize = 64 * 1024;
pub const DEFAULT_GLYPH_CACHES: usize = 10;
pub const DEFAULT_GLYPH_CACHE_ENTRIES: usize = 254;

/// Glyph cache ids are 0..=9 on the wire.
pub const MAX_GLYPH_CACHES: usize = 10;
/// Cache slots are addressed by a single byte.
pub const MAX_GLYPH_CACHE_ENTRIES: usize = 256;

/// Tunables for bounded layout and glyph caching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutConfig {
    /// Largest text accepted by [`crate::wrap::wrap_bounded`].
    pub max_input_bytes: usize,
    /// Number of independent glyph caches.
    pub glyph_caches: usize,
    /// Slots per glyph cache.
    pub glyph_cache_entries: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
            glyph_caches: DEFAULT_GLYPH_CACHES,
            glyph_cache_entries: DEFAULT_GLYPH_CACHE_ENTRIES,
        }
    }
}

impl LayoutConfig {
    /// Defaults overridden by the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Defaults overridden through a custom environment lookup (for tests).
    #[must_use]
    pub fn from_env_with<F>(get_env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            max_input_bytes: setting(
                &get_env,
                ENV_MAX_TEXT_BYTES,
                defaults.max_input_bytes,
                valid_max_input_bytes,
            ),
            glyph_caches: setting(
                &get_env,
                ENV_GLYPH_CACHES,
                defaults.glyph_caches,
                valid_glyph_caches,
            ),
            glyph_cache_entries: setting(
                &get_env,
                ENV_GLYPH_CACHE_ENTRIES,
                defaults.glyph_cache_entries,
                valid_glyph_cache_entries,
            ),
        }
    }

    /// Check every field against its allowed range.
    pub fn validate(&self) -> Result<(), LayoutError> {
        check(ENV_MAX_TEXT_BYTES, self.max_input_bytes, valid_max_input_bytes)?;
        check(ENV_GLYPH_CACHES, self.glyph_caches, valid_glyph_caches)?;
        check(
            ENV_GLYPH_CACHE_ENTRIES,
            self.glyph_cache_entries,
            valid_glyph_cache_entries,
        )
    }
}

fn valid_max_input_bytes(value: usize) -> bool {
    value > 0
}

fn valid_glyph_caches(value: usize) -> bool {
    (1..=MAX_GLYPH_CACHES).contains(&value)
}

fn valid_glyph_cache_entries(value: usize) -> bool {
    (1..=MAX_GLYPH_CACHE_ENTRIES).contains(&value)
}

fn check(key: &'static str, value: usize, valid: fn(usize) -> bool) -> Result<(), LayoutError> {
    if valid(value) {
        Ok(())
    } else {
        Err(LayoutError::InvalidConfig {
            key,
            value: value.to_string(),
        })
    }
}

fn setting<F>(get_env: &F, key: &'static str, default: usize, valid: fn(usize) -> bool) -> usize
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = get_env(key) else {
        return default;
    };
    match raw.trim().parse::<usize>() {
        Ok(value) if valid(value) => value,
        Ok(value) => {
            tracing::warn!(key, value, default, "layout setting out of range, using default");
            default
        }
        Err(err) => {
            tracing::warn!(key, value = %raw, error = %err, default, "ignoring unparsable layout setting");
            default
        }
    }
}
