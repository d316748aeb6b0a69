use dashmap::DashMap;

use crate::domain::ports::CacheInvalidator;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageKey {
    path: String,
    query: String,
}

impl PageKey {
    pub fn new(path: &str, query: &str) -> Self {
        Self {
            path: path.to_string(),
            query: query.to_string(),
        }
    }
}

#[derive(Debug)]
struct CachedPage {
    generation: u64,
    body: String,
}

/// Rendered page bodies, one entry per path and query string.
///
/// Every path carries a generation that `invalidate` bumps. A page is only
/// served while its generation is current, so a body rendered from a read
/// that overlapped an invalidation is never handed out.
#[derive(Debug, Default)]
pub struct PageCache {
    pages: DashMap<PageKey, CachedPage>,
    generations: DashMap<String, u64>,
}

impl PageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take this before reading the data a page is rendered from.
    pub fn generation(&self, path: &str) -> u64 {
        self.generations.get(path).map(|g| *g).unwrap_or(0)
    }

    pub fn get(&self, key: &PageKey) -> Option<String> {
        let page = self.pages.get(key)?;
        (page.generation == self.generation(&key.path)).then(|| page.body.clone())
    }

    /// Stores `body` unless `path` was invalidated since `generation` was
    /// taken. Returns whether the page was kept.
    pub fn store(&self, key: PageKey, body: String, generation: u64) -> bool {
        if generation != self.generation(&key.path) {
            log::debug!("Discarding stale render of {}", key.path);
            return false;
        }
        self.pages.insert(key, CachedPage { generation, body });
        true
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.pages.len()
    }
}

impl CacheInvalidator for PageCache {
    /// Drops every cached variant of `path`, whatever its query string.
    fn invalidate(&self, path: &str) {
        *self.generations.entry(path.to_string()).or_insert(0) += 1;

        let before = self.pages.len();
        self.pages.retain(|key, _| key.path != path);
        log::debug!(
            "Invalidated {} cached page(s) for {}",
            before.saturating_sub(self.pages.len()),
            path
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INVOICES: &str = "/dashboard/invoices";

    fn store_current(cache: &PageCache, key: PageKey, body: &str) {
        let generation = cache.generation(&key.path);
        assert!(cache.store(key, body.to_string(), generation));
    }

    #[test]
    fn invalidate_drops_all_query_variants_of_a_path() {
        let cache = PageCache::new();
        store_current(&cache, PageKey::new(INVOICES, ""), "a");
        store_current(&cache, PageKey::new(INVOICES, "page=2"), "b");
        store_current(&cache, PageKey::new("/dashboard/customers", ""), "c");

        cache.invalidate(INVOICES);

        assert_eq!(cache.len(), 1);
        assert!(cache.get(&PageKey::new(INVOICES, "page=2")).is_none());
        assert_eq!(
            cache.get(&PageKey::new("/dashboard/customers", "")),
            Some("c".to_string())
        );
    }

    #[test]
    fn invalidating_an_uncached_path_is_a_no_op() {
        let cache = PageCache::new();
        cache.invalidate(INVOICES);
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn store_replaces_existing_body() {
        let cache = PageCache::new();
        let key = PageKey::new(INVOICES, "");
        store_current(&cache, key.clone(), "old");
        store_current(&cache, key.clone(), "new");
        assert_eq!(cache.get(&key), Some("new".to_string()));
    }

    #[test]
    fn render_overlapping_an_invalidation_is_not_stored() {
        let cache = PageCache::new();
        let key = PageKey::new(INVOICES, "");

        let generation = cache.generation(INVOICES);
        cache.invalidate(INVOICES);

        assert!(!cache.store(key.clone(), "stale".to_string(), generation));
        assert!(cache.get(&key).is_none());
    }

    #[test]
    fn page_from_an_older_generation_is_not_served() {
        let cache = PageCache::new();
        let key = PageKey::new(INVOICES, "");
        let generation = cache.generation(INVOICES);
        cache.invalidate(INVOICES);

        // Lands after the invalidation already swept the map.
        cache.pages.insert(
            key.clone(),
            CachedPage {
                generation,
                body: "stale".to_string(),
            },
        );

        assert!(cache.get(&key).is_none());
    }

    #[test]
    fn invalidation_leaves_other_paths_current() {
        let cache = PageCache::new();
        let generation = cache.generation("/dashboard/customers");
        cache.invalidate(INVOICES);
        assert!(cache.store(
            PageKey::new("/dashboard/customers", ""),
            "c".to_string(),
            generation
        ));
    }
}
