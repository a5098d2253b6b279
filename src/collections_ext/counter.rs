use std::{borrow::Borrow, collections::HashMap, fmt, hash::Hash};

#[derive(Debug, Clone, Copy)]
struct Slot {
    count: usize,
    // order in which the key was (re)created, used to break count ties
    seq: u64,
}

/// Multiset of keys. Every stored count is >= 1, a key that drops to 0 is removed.
///
/// Ranked views (`entries`, `top`, `keys`, `values`) sort by descending count,
/// equal counts keep first-insertion order. A key that is deleted and added
/// again counts as newly inserted.
///
/// No internal locking: wrap the whole counter in a `Mutex` to share it across threads.
#[derive(Clone)]
pub struct Counter<K> {
    counts: HashMap<K, Slot>,
    next_seq: u64,
}

/// A (key, count) pair materialized by the ranked queries.
pub struct Entry<'a, K> {
    pub key: &'a K,
    pub count: usize,
}

impl<'a, K> Entry<'a, K> {
    pub fn into_pair(self) -> (&'a K, usize) {
        (self.key, self.count)
    }
}

impl<'a, K> Clone for Entry<'a, K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, K> Copy for Entry<'a, K> {}

impl<'a, K: PartialEq> PartialEq for Entry<'a, K> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.count == other.count
    }
}

impl<'a, K: Eq> Eq for Entry<'a, K> {}

impl<'a, K: fmt::Debug> fmt::Debug for Entry<'a, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:?}, {})", self.key, self.count)
    }
}

impl<K> Default for Counter<K> {
    fn default() -> Self {
        Self {
            counts: HashMap::new(),
            next_seq: 0,
        }
    }
}

impl<K: fmt::Debug> fmt::Debug for Counter<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.counts.iter().map(|(k, slot)| (k, slot.count)))
            .finish()
    }
}

impl<K> Counter<K>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// count of `key`, 0 if absent
    pub fn get<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.counts.get(key).map(|slot| slot.count).unwrap_or(0)
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.counts.contains_key(key)
    }

    pub fn add(&mut self, key: K) {
        self.bump(key, 1);
    }

    pub fn add_all<I>(&mut self, keys: I)
    where
        I: IntoIterator<Item = K>,
    {
        keys.into_iter().for_each(|key| self.add(key));
    }

    /// Same as calling `add` n times. n <= 0 leaves the counter untouched and
    /// does not create the key.
    pub fn add_const(&mut self, key: K, n: isize) {
        if n <= 0 {
            return;
        }
        self.bump(key, n as usize);
    }

    fn bump(&mut self, key: K, n: usize) {
        let next_seq = &mut self.next_seq;
        let slot = self.counts.entry(key).or_insert_with(|| {
            let seq = *next_seq;
            *next_seq += 1;
            Slot { count: 0, seq }
        });
        // saturates at usize::MAX
        slot.count = slot.count.saturating_add(n);
    }

    /// Decrement `key` by one. The key is dropped when it reaches 0, absent keys are ignored.
    pub fn remove<Q>(&mut self, key: &Q)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.drain(key, 1);
    }

    pub fn remove_all<'q, Q, I>(&mut self, keys: I)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized + 'q,
        I: IntoIterator<Item = &'q Q>,
    {
        keys.into_iter().for_each(|key| self.remove(key));
    }

    /// Same as calling `remove` n times: n <= 0 is a no-op, and asking for more
    /// than the current count stops at 0 with the key removed.
    pub fn remove_const<Q>(&mut self, key: &Q, n: isize)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        if n <= 0 {
            return;
        }
        self.drain(key, n as usize);
    }

    fn drain<Q>(&mut self, key: &Q, n: usize)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let Some(slot) = self.counts.get_mut(key) else {
            return;
        };

        if slot.count > n {
            slot.count -= n;
            return;
        }

        if slot.count < n {
            tracing::trace!(
                "remove clamped at zero ::> Count: {}, Requested: {}",
                slot.count,
                n
            );
        }
        self.counts.remove(key);
    }

    /// Drop `key` whatever its count. Returns whether it was present.
    pub fn delete<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.counts.remove(key).is_some()
    }

    pub fn clear(&mut self) {
        self.counts.clear();
        self.next_seq = 0;
    }

    /// number of distinct keys
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// sum of all counts, differs from `len` which is deduped. saturates at usize::MAX
    pub fn sum(&self) -> usize {
        self.counts
            .values()
            .map(|slot| slot.count)
            .fold(0, usize::saturating_add)
    }

    /// (key, count) pairs in unspecified order
    pub fn iter(&self) -> impl Iterator<Item = (&K, usize)> + '_ {
        self.counts.iter().map(|(k, slot)| (k, slot.count))
    }

    /// All entries, descending by count.
    pub fn entries(&self) -> Vec<Entry<'_, K>> {
        let mut ranked = self.counts.iter().collect::<Vec<_>>();
        // seq is unique per key, so the unstable sort is still deterministic
        ranked.sort_unstable_by(|a, b| {
            b.1.count
                .cmp(&a.1.count)
                .then_with(|| a.1.seq.cmp(&b.1.seq))
        });
        ranked
            .into_iter()
            .map(|(key, slot)| Entry {
                key,
                count: slot.count,
            })
            .collect()
    }

    /// The first n entries of `entries`. A negative n, or n larger than `len`,
    /// returns every entry. n == 0 returns nothing.
    pub fn top(&self, n: isize) -> Vec<Entry<'_, K>> {
        let mut entries = self.entries();
        if n >= 0 {
            entries.truncate(n as usize);
        }
        entries
    }

    /// the n most common (key, count) pairs
    pub fn most_common(&self, n: usize) -> Vec<(&K, usize)> {
        self.entries()
            .into_iter()
            .take(n)
            .map(Entry::into_pair)
            .collect()
    }

    /// keys in ranked order
    pub fn keys(&self) -> Vec<&K> {
        self.entries().into_iter().map(|entry| entry.key).collect()
    }

    /// counts in ranked order
    pub fn values(&self) -> Vec<usize> {
        self.entries().into_iter().map(|entry| entry.count).collect()
    }
}

impl<K: Eq + Hash> FromIterator<K> for Counter<K> {
    fn from_iter<T: IntoIterator<Item = K>>(iter: T) -> Self {
        let mut counter = Counter::new();
        counter.extend(iter);
        counter
    }
}

impl<K: Eq + Hash> Extend<K> for Counter<K> {
    fn extend<T: IntoIterator<Item = K>>(&mut self, iter: T) {
        let iter = iter.into_iter();
        self.counts.reserve(iter.size_hint().0);
        for key in iter {
            self.add(key);
        }
    }
}
