use std::collections::BTreeSet;

/// Type alias for sets, we use this to hide which type of `HashSet` we are actually using.
pub type Set<S> = fxhash::FxHashSet<S>;
/// Type alias for maps, we use this to hide which type of `HashMap` we are actually using.
pub type Map<K, V> = fxhash::FxHashMap<K, V>;
/// Sets whose iteration order is given by the ordering of the elements. Unlike [`Set`], an
/// ordered set is itself hashable, which makes it usable as the key of a [`Map`] or as the
/// element of another [`Set`].
pub type OrderedSet<S> = BTreeSet<S>;

/// Returns true if and only if the two ordered sets have at least one element in common.
pub fn intersects<S: Ord>(left: &OrderedSet<S>, right: &Set<S>) -> bool
where
    S: std::hash::Hash,
{
    left.iter().any(|x| right.contains(x))
}

#[cfg(test)]
mod tests {
    use super::{intersects, OrderedSet, Set};

    #[test]
    fn ordered_sets_are_hashable() {
        let mut seen: Set<OrderedSet<u8>> = Set::default();
        assert!(seen.insert([2, 1].into_iter().collect()));
        assert!(!seen.insert([1, 2].into_iter().collect()));
        assert_eq!(seen.len(), 1);
    }

    #[test]
    fn intersection_check() {
        let left: OrderedSet<u8> = [1, 2, 3].into_iter().collect();
        let hit: Set<u8> = [3, 4].into_iter().collect();
        let miss: Set<u8> = [4, 5].into_iter().collect();
        assert!(intersects(&left, &hit));
        assert!(!intersects(&left, &miss));
        assert!(!intersects(&OrderedSet::new(), &hit));
    }
}
