//! Bounded cache with least-recently-used eviction.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

/// Counters describing cache effectiveness.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups that found an entry.
    pub hits: u64,

    /// Lookups that found nothing.
    pub misses: u64,

    /// Entries evicted to make room or by shrinking/clearing.
    pub evictions: u64,
}

/// Handle returned when registering a cache listener, used to remove it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerId(u64);

struct Listener<K, V> {
    id: u64,
    ejection_only: bool,
    callback: Box<dyn FnMut(&K, &V)>,
}

/// A cache holding at most `capacity` entries, evicting the least
/// recently used entry when full.
///
/// `insert` and `get` count as use; `peek` and iteration do not.
/// Iteration visits entries most recently used first.
///
/// Listeners observe entries leaving the cache. An ejection listener
/// fires only when the cache itself discards an entry (capacity
/// pressure, [`set_capacity`](LruCache::set_capacity) shrinking, or
/// [`clear`](LruCache::clear)); a removal listener additionally fires
/// for explicit [`remove`](LruCache::remove) calls.
/// [`pop_lru`](LruCache::pop_lru) notifies no one.
///
/// # Examples
///
/// ```
/// use bruin_collections::LruCache;
///
/// let mut cache = LruCache::with_capacity(2);
/// cache.insert("a", 1);
/// cache.insert("b", 2);
/// cache.get(&"a");
/// cache.insert("c", 3); // evicts "b", the least recently used
///
/// assert!(cache.peek(&"b").is_none());
/// assert_eq!(cache.len(), 2);
/// ```
pub struct LruCache<K, V> {
    entries: HashMap<K, V>,
    /// Recency list, most recently used first.
    order: Vec<K>,
    capacity: usize,
    stats: CacheStats,
    listeners: Vec<Listener<K, V>>,
    next_listener_id: u64,
}

impl<K, V> LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Create a cache bounded to `capacity` entries.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity >= 1, "capacity must be at least 1");
        Self {
            entries: HashMap::with_capacity(capacity),
            order: Vec::with_capacity(capacity),
            capacity,
            stats: CacheStats::default(),
            listeners: Vec::new(),
            next_listener_id: 0,
        }
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Change the capacity. Shrinking below the current size evicts
    /// least-recently-used entries, notifying ejection listeners.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn set_capacity(&mut self, capacity: usize) {
        assert!(capacity >= 1, "capacity must be at least 1");
        self.capacity = capacity;
        while self.entries.len() > self.capacity {
            self.evict_lru();
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `key` is cached. Does not affect recency.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.contains_key(key)
    }

    /// Insert a key/value pair, returning the previous value if the key
    /// was present.
    ///
    /// An existing key is refreshed and keeps the cache size unchanged.
    /// A new key may first evict the least recently used entry.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        if self.entries.contains_key(&key) {
            self.promote(&key);
            return self.entries.insert(key, value);
        }

        while self.entries.len() >= self.capacity {
            self.evict_lru();
        }
        self.order.insert(0, key.clone());
        self.entries.insert(key, value);
        None
    }

    /// Look up a value, refreshing its recency and counting a hit or
    /// miss.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        if self.entries.contains_key(key) {
            self.stats.hits += 1;
            self.promote(key);
            self.entries.get(key)
        } else {
            self.stats.misses += 1;
            None
        }
    }

    /// Look up a value without touching recency or statistics.
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.get(key)
    }

    /// Remove a key, returning its value. Removal listeners are
    /// notified; ejection-only listeners are not.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let value = self.entries.remove(key)?;
        let pos = self.order.iter().position(|k| k.borrow() == key);
        let owned_key = match pos {
            Some(pos) => self.order.remove(pos),
            None => return Some(value),
        };
        for listener in self.listeners.iter_mut().filter(|l| !l.ejection_only) {
            (listener.callback)(&owned_key, &value);
        }
        Some(value)
    }

    /// Remove and return the least recently used entry without
    /// notifying any listener.
    pub fn pop_lru(&mut self) -> Option<(K, V)> {
        let key = self.order.pop()?;
        let value = self.entries.remove(&key)?;
        Some((key, value))
    }

    /// Evict every entry, notifying ejection and removal listeners.
    pub fn clear(&mut self) {
        while !self.order.is_empty() {
            self.evict_lru();
        }
    }

    /// Keys, most recently used first. Does not affect recency.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.order.iter()
    }

    /// Values, most recently used first. Does not affect recency.
    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.order.iter().map(move |k| &self.entries[k])
    }

    /// Key/value pairs, most recently used first. Does not affect
    /// recency.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            order: self.order.iter(),
            entries: &self.entries,
        }
    }

    /// Hit, miss, and eviction counters.
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Register a listener fired only when the cache discards an entry
    /// on its own (capacity pressure, shrinking, or `clear`).
    pub fn add_ejection_listener<F>(&mut self, callback: F) -> ListenerId
    where
        F: FnMut(&K, &V) + 'static,
    {
        self.add_listener(true, Box::new(callback))
    }

    /// Register a listener fired on every removal, including evictions.
    pub fn add_removal_listener<F>(&mut self, callback: F) -> ListenerId
    where
        F: FnMut(&K, &V) + 'static,
    {
        self.add_listener(false, Box::new(callback))
    }

    /// Unregister a listener. Returns `false` if the id is unknown.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| l.id != id.0);
        self.listeners.len() != before
    }

    /// Unregister every listener.
    pub fn clear_listeners(&mut self) {
        self.listeners.clear();
    }

    fn add_listener(&mut self, ejection_only: bool, callback: Box<dyn FnMut(&K, &V)>) -> ListenerId {
        let id = self.next_listener_id;
        self.next_listener_id += 1;
        self.listeners.push(Listener {
            id,
            ejection_only,
            callback,
        });
        ListenerId(id)
    }

    /// Move `key` to the front of the recency list.
    fn promote<Q>(&mut self, key: &Q)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        if let Some(pos) = self.order.iter().position(|k| k.borrow() == key) {
            if pos > 0 {
                let owned = self.order.remove(pos);
                self.order.insert(0, owned);
            }
        }
    }

    /// Drop the least recently used entry, notifying every listener.
    fn evict_lru(&mut self) {
        let key = match self.order.pop() {
            Some(key) => key,
            None => return,
        };
        let value = match self.entries.remove(&key) {
            Some(value) => value,
            None => return,
        };
        self.stats.evictions += 1;
        for listener in self.listeners.iter_mut() {
            (listener.callback)(&key, &value);
        }
    }
}

/// Iterator over an [`LruCache`], most recently used first.
pub struct Iter<'a, K, V> {
    order: std::slice::Iter<'a, K>,
    entries: &'a HashMap<K, V>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V>
where
    K: Eq + Hash,
{
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let key = self.order.next()?;
        Some((key, &self.entries[key]))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.order.size_hint()
    }
}

impl<K, V> fmt::Debug for LruCache<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("capacity", &self.capacity)
            .field("len", &self.entries.len())
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}
