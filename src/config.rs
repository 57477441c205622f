//! Tuning knobs for the keyed store and the graph built on it.

/// Initial bucket count, `2^8 - 1`.
pub const DEFAULT_INITIAL_LIMIT: u32 = (1 << 8) - 1;
/// Average chain length above which a resize is considered.
pub const DEFAULT_MAX_LOAD: f64 = 1.1;
/// Fraction of buckets that must be occupied before a resize is allowed.
pub const DEFAULT_MIN_OCCUPANCY: f64 = 0.5;
/// Bucket-count ceiling; the store stops growing once the next size would exceed it.
pub const DEFAULT_MAX_LIMIT: u32 = 1 << 30;
/// Longest id kept for a node, in bytes.
pub const DEFAULT_MAX_ID_LEN: usize = 31;

/// Resize policy for a [`KeyedStore`](crate::KeyedStore).
///
/// A resize runs after a successful insert when both
/// `count / slots > max_load` and `slots >= limit * min_occupancy` hold.
/// The new limit is `limit * 2 + 1`, so a limit of the form `2^n - 1` keeps
/// that form.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StoreConfig {
    pub initial_limit: u32,
    pub max_load: f64,
    pub min_occupancy: f64,
    pub max_limit: u32,
}

impl StoreConfig {
    /// Same policy with a different starting bucket count. Zero is bumped to one.
    pub fn with_initial_limit(self, initial_limit: u32) -> Self {
        Self {
            initial_limit: initial_limit.max(1),
            ..self
        }
    }

    pub fn with_max_limit(self, max_limit: u32) -> Self {
        Self { max_limit, ..self }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            initial_limit: DEFAULT_INITIAL_LIMIT,
            max_load: DEFAULT_MAX_LOAD,
            min_occupancy: DEFAULT_MIN_OCCUPANCY,
            max_limit: DEFAULT_MAX_LIMIT,
        }
    }
}

/// Settings for a [`Graph`](crate::Graph).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GraphConfig {
    /// Ids (and record names) longer than this are cut on a char boundary.
    pub max_id_len: usize,
    /// Policy for the id registry and every node's adjacency store.
    pub store: StoreConfig,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            max_id_len: DEFAULT_MAX_ID_LEN,
            store: StoreConfig::default(),
        }
    }
}

/// Longest prefix of `s` that fits in `max` bytes without splitting a char.
pub(crate) fn truncate_id(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
