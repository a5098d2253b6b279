use std::{borrow::Borrow, collections::HashMap, hash::Hash};

use super::counter::Counter;

/// Two level counter: every outer key owns an independent `Counter`.
///
/// Inner counters are created on the first mutating call that addresses their
/// outer key, removals included, so `remove_from` on an unseen outer key leaves
/// an empty inner counter behind. Inner counters are never dropped just because
/// they become empty.
#[derive(Debug, Clone)]
pub struct GroupedCounter<O, I> {
    groups: HashMap<O, Counter<I>>,
}

impl<O, I> Default for GroupedCounter<O, I> {
    fn default() -> Self {
        Self {
            groups: HashMap::new(),
        }
    }
}

impl<O, I> GroupedCounter<O, I>
where
    O: Eq + Hash,
    I: Eq + Hash,
{
    pub fn new() -> Self {
        Self::default()
    }

    fn group_mut(&mut self, outer: O) -> &mut Counter<I> {
        let num_groups = self.groups.len();
        self.groups.entry(outer).or_insert_with(|| {
            tracing::trace!("create inner counter ::> NumGroups: {}", num_groups + 1);
            Counter::new()
        })
    }

    pub fn add_to(&mut self, outer: O, inner: I) {
        self.group_mut(outer).add(inner);
    }

    pub fn add_const_to(&mut self, outer: O, inner: I, n: isize) {
        self.group_mut(outer).add_const(inner, n);
    }

    pub fn remove_from<Q>(&mut self, outer: O, inner: &Q)
    where
        I: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.group_mut(outer).remove(inner);
    }

    pub fn remove_const_from<Q>(&mut self, outer: O, inner: &Q, n: isize)
    where
        I: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.group_mut(outer).remove_const(inner, n);
    }

    pub fn get<Q>(&self, outer: &Q) -> Option<&Counter<I>>
    where
        O: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.groups.get(outer)
    }

    pub fn get_mut<Q>(&mut self, outer: &Q) -> Option<&mut Counter<I>>
    where
        O: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.groups.get_mut(outer)
    }

    pub fn contains_group<Q>(&self, outer: &Q) -> bool
    where
        O: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.groups.contains_key(outer)
    }

    /// outer keys, unspecified order
    pub fn outer_keys(&self) -> Vec<&O> {
        self.groups.keys().collect()
    }

    /// number of groups, empty inner counters included
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&O, &Counter<I>)> + '_ {
        self.groups.iter()
    }
}

#[cfg(test)]
mod test {
    use super::GroupedCounter;

    fn with_x() -> GroupedCounter<&'static str, &'static str> {
        let mut mc = GroupedCounter::new();
        for key in ["a", "b", "c", "d", "a", "c", "c", "b"] {
            mc.add_to("X", key);
        }
        mc
    }

    #[test]
    fn test_add_to() {
        let mut mc: GroupedCounter<i32, &str> = GroupedCounter::new();
        for key in ["a", "b", "c", "d", "a", "c", "c", "b"] {
            mc.add_to(1, key);
        }
        assert_eq!(mc.get(&1).unwrap().get("a"), 2);
        assert_eq!(mc.get(&1).unwrap().get("b"), 2);
        assert_eq!(mc.get(&1).unwrap().len(), 4);

        mc.add_to(1, "a");
        mc.add_to(1, "e");
        let x = mc.get(&1).unwrap();
        assert_eq!(x.get("a"), 3);
        assert_eq!(x.get("e"), 1);
        assert_eq!(x.len(), 5);
        assert_eq!(mc.len(), 1);
    }

    #[test]
    fn test_add_const_to() {
        let mut mc = GroupedCounter::new();
        for _ in 0..3 {
            mc.add_to("X", "a");
        }
        mc.add_const_to("X", "b", 2);
        let x = mc.get("X").unwrap();
        assert_eq!(x.get("a"), 3);
        assert_eq!(x.get("b"), 2);
        assert_eq!(x.len(), 2);
    }

    #[test]
    fn test_remove_from() {
        let mut mc = with_x();
        mc.remove_from("X", "c");
        mc.remove_from("X", "b");
        assert_eq!(mc.get("X").unwrap().get("c"), 2);
        assert_eq!(mc.get("X").unwrap().get("b"), 1);
        assert_eq!(mc.get("X").unwrap().len(), 4);

        mc.remove_from("X", "d");
        mc.remove_from("X", "e");
        assert_eq!(mc.get("X").unwrap().len(), 3);
    }

    #[test]
    fn test_remove_const_from() {
        let mut mc = with_x();
        mc.get_mut("X").unwrap().remove("b");
        assert_eq!(mc.get("X").unwrap().len(), 4);

        mc.remove_const_from("X", "c", 2);
        mc.remove_const_from("X", "b", 1);
        assert_eq!(mc.get("X").unwrap().get("c"), 1);
        assert_eq!(mc.get("X").unwrap().get("b"), 0);
        assert_eq!(mc.get("X").unwrap().len(), 3);

        mc.remove_const_from("X", "d", 1);
        mc.remove_const_from("X", "e", 2);
        assert_eq!(mc.get("X").unwrap().len(), 2);
    }

    #[test]
    fn test_remove_creates_empty_group() {
        let mut mc = with_x();
        assert!(!mc.contains_group("Y"));
        mc.remove_from("Y", "a");
        mc.remove_const_from("Z", "a", 3);
        assert!(mc.get("Y").unwrap().is_empty());
        assert!(mc.get("Z").unwrap().is_empty());
        assert_eq!(mc.len(), 3);

        // emptied groups stay
        mc.add_to("Y", "a");
        mc.remove_from("Y", "a");
        assert!(mc.contains_group("Y"));
        assert_eq!(mc.get("Y").unwrap().len(), 0);
    }

    #[test]
    fn test_outer_keys() {
        let mut mc = with_x();
        mc.add_const_to("Y", "a", 1);
        mc.add_const_to("Z", "a", 0);
        let mut keys = mc.outer_keys();
        keys.sort();
        assert_eq!(keys, vec![&"X", &"Y", &"Z"]);

        let total: usize = mc.iter().map(|(_, c)| c.sum()).sum();
        assert_eq!(total, 9);
    }
}
