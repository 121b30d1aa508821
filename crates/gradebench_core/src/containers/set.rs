//! Insertion-ordered set.

use crate::inspect::equals;
use crate::value::Value;

/// A set that remembers insertion order.
///
/// Membership is decided by the inspector's structural equality, so `Value`s that are not hashable
/// (arrays, chains, ...) can still be members. Lookups are linear in the set size.
#[derive(Debug, Clone, Default)]
pub struct OrderedSet {
    items: Vec<Value>,
}

impl OrderedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `value` unless an equal element is already present. Returns whether it was inserted.
    pub fn add(&mut self, value: impl Into<Value>) -> bool {
        let value = value.into();
        if self.contains(&value) {
            return false;
        }
        self.items.push(value);
        true
    }

    pub fn remove(&mut self, value: &Value) -> bool {
        match self.items.iter().position(|item| equals(item, value)) {
            Some(at) => {
                self.items.remove(at);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.items.iter().any(|item| equals(item, value))
    }

    /// Elements of `self` not in `other`, in `self`'s insertion order.
    pub fn difference(&self, other: &OrderedSet) -> OrderedSet {
        let items = self.items.iter().filter(|item| !other.contains(item)).cloned().collect();
        OrderedSet { items }
    }

    /// Elements of `self` followed by the new elements of `other`.
    pub fn union(&self, other: &OrderedSet) -> OrderedSet {
        let mut out = self.clone();
        for item in &other.items {
            out.add(item.clone());
        }
        out
    }

    pub fn size(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Elements in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.items.iter()
    }

    pub(crate) fn values_mut(&mut self) -> &mut [Value] {
        &mut self.items
    }
}

impl<V: Into<Value>> FromIterator<V> for OrderedSet {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        let mut set = OrderedSet::new();
        for value in iter {
            set.add(value);
        }
        set
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn duplicates_are_ignored_and_order_is_kept() {
        let mut s = OrderedSet::new();
        assert!(s.add(3));
        assert!(s.add(1));
        assert!(!s.add(3));
        let order: Vec<String> = s.iter().map(crate::render).collect();
        assert_eq!(order, ["3", "1"]);
    }

    #[test]
    fn difference_and_union_preserve_insertion_order() {
        let a: OrderedSet = [1, 2, 3].into_iter().collect();
        let b: OrderedSet = [2, 4].into_iter().collect();
        assert_eq!(crate::render(&Value::Set(a.difference(&b))), "{1, 3}");
        assert_eq!(crate::render(&Value::Set(a.union(&b))), "{1, 2, 3, 4}");
    }

    #[test]
    fn remove_reports_membership() {
        let mut s: OrderedSet = ["a", "b"].into_iter().collect();
        assert!(s.remove(&Value::from("a")));
        assert!(!s.remove(&Value::from("a")));
        assert_eq!(s.size(), 1);
    }
}
