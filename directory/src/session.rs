use crate::aggregate::GroupAggregate;
use crate::config::{DirectoryConfig, ThemeColor};
use crate::error::{DirectoryError, Result};
use crate::filter::{FilterState, compose_visible};
use crate::projection::{ProjectedView, project};
use crate::record::{Record, RecordStore};
use log::{debug, info, warn};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;

/// Memo key for a visible set: the store revision plus the filters.
/// Nothing else (theme, highlight) may take part.
type VisibleKey = (u64, FilterState);

/// State of one directory view.
///
/// Starts empty with `loading = true`. Inputs arrive through the setters;
/// derived values (visible set, aggregate, projection) are recomputed lazily
/// and only when one of their declared inputs changed.
pub struct DirectorySession {
    config: DirectoryConfig,
    store: Arc<RecordStore>,
    revision: u64,
    loading: bool,
    last_error: Option<String>,
    filter: FilterState,
    highlight_oldest: bool,
    theme: ThemeColor,
    visible_cache: LruCache<VisibleKey, Arc<[usize]>>,
    aggregate: Option<(u64, Arc<GroupAggregate>)>,
    memo: MemoCounters,
}

#[derive(Debug, Default)]
struct MemoCounters {
    filter_hits: u64,
    filter_misses: u64,
    aggregate_recomputes: u64,
}

impl DirectorySession {
    /// Create a session in the loading state
    pub fn new(config: DirectoryConfig) -> Result<Self> {
        config.validate().map_err(DirectoryError::InvalidConfig)?;

        let capacity = NonZeroUsize::new(config.filter_cache_size).ok_or_else(|| {
            DirectoryError::InvalidConfig("filter_cache_size must be > 0".to_string())
        })?;

        Ok(Self {
            highlight_oldest: config.highlight_oldest,
            theme: config.theme,
            config,
            store: Arc::new(RecordStore::empty()),
            revision: 0,
            loading: true,
            last_error: None,
            filter: FilterState::default(),
            visible_cache: LruCache::new(capacity),
            aggregate: None,
            memo: MemoCounters::default(),
        })
    }

    /// Install the outcome of an ingestion attempt.
    ///
    /// Failures are absorbed: the store becomes empty and loading ends.
    pub fn finish_ingestion(&mut self, outcome: Result<Vec<Record>>) {
        let store = outcome.and_then(RecordStore::new);
        match store {
            Ok(store) => {
                info!("Ingested {} records", store.len());
                self.install_store(store);
                self.last_error = None;
            }
            Err(err) => {
                warn!("Record ingestion failed: {err}");
                self.install_store(RecordStore::empty());
                self.last_error = Some(err.to_string());
            }
        }
        self.loading = false;
    }

    fn install_store(&mut self, store: RecordStore) {
        self.store = Arc::new(store);
        self.revision += 1;
        self.aggregate = None;
        self.visible_cache.clear();
        debug!("Store revision {} installed; caches cleared", self.revision);
    }

    /// Apply a settled name pattern (the debounced value)
    pub fn apply_settled_name(&mut self, pattern: impl Into<String>) {
        self.filter.name_pattern = pattern.into();
    }

    /// Select a group; an empty key clears the group filter
    pub fn select_group(&mut self, group_key: impl Into<String>) {
        self.filter.group_filter = group_key.into();
    }

    pub fn set_highlight_oldest(&mut self, enabled: bool) {
        self.highlight_oldest = enabled;
    }

    pub fn set_theme(&mut self, theme: ThemeColor) {
        self.theme = theme;
    }

    /// Indices into the store of the records passing the current filters
    pub fn visible_indices(&mut self) -> Arc<[usize]> {
        let key = (self.revision, self.filter.clone());
        if let Some(cached) = self.visible_cache.get(&key) {
            self.memo.filter_hits += 1;
            debug!("Visible set cache hit for {:?}", key.1);
            return Arc::clone(cached);
        }

        self.memo.filter_misses += 1;
        let visible: Arc<[usize]> = compose_visible(self.store.records(), &self.filter).into();
        self.visible_cache.put(key, Arc::clone(&visible));
        visible
    }

    /// Earliest-born record per group, independent of the filters
    pub fn aggregate(&mut self) -> Arc<GroupAggregate> {
        if let Some((revision, aggregate)) = &self.aggregate {
            if *revision == self.revision {
                return Arc::clone(aggregate);
            }
        }

        self.memo.aggregate_recomputes += 1;
        let aggregate = Arc::new(GroupAggregate::compute(self.store.records()));
        self.aggregate = Some((self.revision, Arc::clone(&aggregate)));
        aggregate
    }

    /// Project the current state for rendering
    pub fn view(&mut self) -> ProjectedView {
        let visible = self.visible_indices();
        let aggregate = self.aggregate();
        let store = Arc::clone(&self.store);

        project(
            visible.iter().filter_map(|&idx| store.get(idx)),
            &aggregate,
            self.highlight_oldest,
        )
        .with_loading(self.loading)
    }

    /// Group keys offered for selection, first-seen order
    pub fn group_options(&self) -> Vec<String> {
        self.store
            .group_keys()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn highlight_oldest(&self) -> bool {
        self.highlight_oldest
    }

    pub fn theme(&self) -> ThemeColor {
        self.theme
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Message of the last absorbed ingestion failure
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Number of times the store has been (re)placed
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Clear memoized visible sets
    pub fn clear_cache(&mut self) {
        self.visible_cache.clear();
        info!("Visible set cache cleared");
    }

    /// Get cache statistics
    pub fn cache_stats(&self) -> FilterCacheStats {
        FilterCacheStats {
            size: self.visible_cache.len(),
            capacity: self.visible_cache.cap().get(),
            hits: self.memo.filter_hits,
            misses: self.memo.filter_misses,
        }
    }

    /// How many times the aggregate has been computed
    pub fn aggregate_recomputes(&self) -> u64 {
        self.memo.aggregate_recomputes
    }

    pub fn config(&self) -> &DirectoryConfig {
        &self.config
    }
}

/// Cache statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterCacheStats {
    pub size: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
}
