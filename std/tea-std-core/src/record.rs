//!
//! Ordered Key-Value Records
//!
//! Every TeaScript object literal is materialized at run time as a `Record`:
//! two parallel vectors holding keys and values in insertion order.
//!
//! Lookup walks the keys and compares by equality. Compiled object shapes
//! rarely exceed a few dozen fields, so there is no hash index.
//!
//! Keys may repeat. `add` always appends, and `get`/`set` resolve to the
//! first matching key, so a later duplicate is shadowed for lookup but still
//! occupies a slot.
//!

use std::borrow::Borrow;
use std::fmt;

use crate::error::{ConstructionError, LookupError};

/// An ordered, growable key-value object.
///
/// `keys.len() == values.len()` holds for every reachable `Record`.
#[derive(Debug, Clone, PartialEq)]
pub struct Record<K, V> {
    keys: Vec<K>,
    values: Vec<V>,
}

impl<K, V> Record<K, V> {
    /// Build a record from parallel key and value sequences.
    ///
    /// Fails without producing a record when the sequences differ in length.
    pub fn new<KI, VI>(keys: KI, values: VI) -> Result<Self, ConstructionError>
    where
        KI: IntoIterator<Item = K>,
        VI: IntoIterator<Item = V>,
    {
        let keys: Vec<K> = keys.into_iter().collect();
        let values: Vec<V> = values.into_iter().collect();

        if keys.len() != values.len() {
            tracing::debug!(
                keys = keys.len(),
                values = values.len(),
                "rejected record construction"
            );
            return Err(ConstructionError::LengthMismatch {
                keys: keys.len(),
                values: values.len(),
            });
        }

        Ok(Self { keys, values })
    }

    /// Append a pair, even if `key` is already present.
    pub fn add(&mut self, key: K, value: V) {
        self.keys.push(key);
        self.values.push(value);
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Iterate over pairs in insertion order, duplicates included.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            keys: self.keys.iter(),
            values: self.values.iter(),
        }
    }

    pub fn keys(&self) -> std::slice::Iter<'_, K> {
        self.keys.iter()
    }

    pub fn values(&self) -> std::slice::Iter<'_, V> {
        self.values.iter()
    }

    fn position<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.keys.iter().position(|k| k.borrow() == key)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.position(key).is_some()
    }

    /// Value paired with the first occurrence of `key`.
    pub fn get<Q>(&self, key: &Q) -> Result<&V, LookupError>
    where
        K: Borrow<Q>,
        Q: PartialEq + fmt::Debug + ?Sized,
    {
        match self.position(key) {
            Some(idx) => Ok(&self.values[idx]),
            None => Err(key_not_found(key)),
        }
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Result<&mut V, LookupError>
    where
        K: Borrow<Q>,
        Q: PartialEq + fmt::Debug + ?Sized,
    {
        match self.position(key) {
            Some(idx) => Ok(&mut self.values[idx]),
            None => Err(key_not_found(key)),
        }
    }

    /// Replace the value at the first occurrence of `key`.
    pub fn set<Q>(&mut self, key: &Q, value: V) -> Result<(), LookupError>
    where
        K: Borrow<Q>,
        Q: PartialEq + fmt::Debug + ?Sized,
    {
        *self.get_mut(key)? = value;
        Ok(())
    }
}

fn key_not_found<Q: fmt::Debug + ?Sized>(key: &Q) -> LookupError {
    LookupError::KeyNotFound {
        key: format!("{:?}", key),
    }
}

/// Pairs of a record in insertion order.
pub struct Iter<'a, K, V> {
    keys: std::slice::Iter<'a, K>,
    values: std::slice::Iter<'a, V>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        Some((self.keys.next()?, self.values.next()?))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.keys.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<'a, K, V> IntoIterator for &'a Record<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for Record<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("{}");
        }
        f.write_str("{ ")?;
        for (i, (key, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", key, value)?;
        }
        f.write_str(" }")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xy() -> Record<&'static str, i64> {
        Record::new(["x", "y"], [1, 2]).unwrap()
    }

    #[test]
    fn test_length_mismatch_produces_no_record() {
        let cases: [(Vec<&str>, Vec<i64>); 3] = [
            (vec!["a"], vec![]),
            (vec![], vec![1]),
            (vec!["a", "b", "c"], vec![1, 2]),
        ];
        for (keys, values) in cases {
            let (k, v) = (keys.len(), values.len());
            let err = Record::new(keys, values).unwrap_err();
            assert_eq!(err, ConstructionError::LengthMismatch { keys: k, values: v });
        }
    }

    #[test]
    fn test_get_after_construction() {
        let keys = ["a", "b", "c", "d", "e"];
        let values = [10, 20, 30, 40, 50];
        let record = Record::new(keys, values).unwrap();
        assert_eq!(record.len(), keys.len());
        for (key, value) in keys.iter().zip(values.iter()) {
            assert_eq!(record.get(*key), Ok(value));
        }
    }

    #[test]
    fn test_set_touches_only_target() {
        let mut record = Record::new(["a", "b", "c"], [1, 2, 3]).unwrap();
        record.set("b", 99).unwrap();
        assert_eq!(record.get("b"), Ok(&99));
        assert_eq!(record.get("a"), Ok(&1));
        assert_eq!(record.get("c"), Ok(&3));
        assert_eq!(record.len(), 3);
    }

    #[test]
    fn test_duplicate_add_is_shadowed() {
        let mut record = xy();
        record.add("x", 100);
        assert_eq!(record.len(), 3);
        assert_eq!(record.get("x"), Ok(&1));
        assert_eq!(
            record.iter().map(|(k, v)| (*k, *v)).collect::<Vec<_>>(),
            vec![("x", 1), ("y", 2), ("x", 100)]
        );
    }

    #[test]
    fn test_set_resolves_first_duplicate() {
        let mut record = xy();
        record.add("x", 100);
        record.set("x", 5).unwrap();
        assert_eq!(record.values().copied().collect::<Vec<_>>(), vec![5, 2, 100]);
    }

    #[test]
    fn test_missing_key() {
        let mut record = xy();
        assert!(matches!(
            record.get("z"),
            Err(LookupError::KeyNotFound { .. })
        ));
        let err = record.set("z", 3).unwrap_err();
        assert_eq!(
            err,
            LookupError::KeyNotFound {
                key: "\"z\"".to_string()
            }
        );
        assert_eq!(record.len(), 2);
        assert!(!record.contains_key("z"));
    }

    #[test]
    fn test_object_scenario() {
        let mut record = xy();
        assert_eq!(record.get("x"), Ok(&1));
        record.set("y", 20).unwrap();
        assert_eq!(record.get("y"), Ok(&20));
        record.add("x", 100);
        assert_eq!(record.len(), 3);
        assert_eq!(record.get("x"), Ok(&1));
    }

    #[test]
    fn test_empty_record() {
        let record: Record<String, i64> = Record::new(Vec::new(), Vec::new()).unwrap();
        assert_eq!(record.len(), 0);
        assert!(record.is_empty());
        assert!(record.get("anything").is_err());
        assert_eq!(record.to_string(), "{}");
    }

    #[test]
    fn test_get_mut() {
        let mut record = xy();
        *record.get_mut("x").unwrap() += 41;
        assert_eq!(record.get("x"), Ok(&42));
    }

    #[test]
    fn test_owned_keys_lookup_by_str() {
        let record = Record::new(vec!["name".to_string()], vec!["tea"]).unwrap();
        assert_eq!(record.get("name"), Ok(&"tea"));
    }

    #[test]
    fn test_display_in_insertion_order() {
        let mut record = xy();
        record.add("z", 3);
        assert_eq!(record.to_string(), "{ x: 1, y: 2, z: 3 }");
    }
}
