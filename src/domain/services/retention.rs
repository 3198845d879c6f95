//! Retention Service
//!
//! Pure domain logic for the count-based retention rule shared by the local
//! backups directory and the remote bucket. This service has NO external
//! dependencies.

/// Keep at most `max_count` items; everything older is pruned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    max_count: usize,
}

impl RetentionPolicy {
    /// `max_count` must be at least 1; config validation enforces that
    /// before a policy is ever built.
    pub fn new(max_count: usize) -> Self {
        Self { max_count }
    }

    pub fn max_count(&self) -> usize {
        self.max_count
    }

    /// Split off the items that fall outside the retention window.
    ///
    /// Sorts newest-first by the extracted key (stable, so equal keys keep
    /// their input order) and returns everything past `max_count`. Empty when
    /// the item count is within the limit. The caller performs the actual
    /// deletion; this function only decides.
    pub fn excess<T, K, F>(&self, mut items: Vec<T>, created_at: F) -> Vec<T>
    where
        K: Ord,
        F: Fn(&T) -> K,
    {
        if items.len() <= self.max_count {
            return Vec::new();
        }
        items.sort_by(|a, b| created_at(b).cmp(&created_at(a)));
        items.split_off(self.max_count)
    }
}
