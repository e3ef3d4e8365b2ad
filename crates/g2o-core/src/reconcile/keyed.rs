//! The `Keyed` capability and the keyed-collection builder.

use std::collections::BTreeMap;

/// Anything the engine can match up by identity and compare by tags.
pub trait Keyed {
    /// Stable identity shared by a remote item and its local task.
    fn key(&self) -> &str;

    /// Raw tags, in no particular order and possibly with duplicates.
    fn tags(&self) -> Vec<String>;
}

impl<T: Keyed + ?Sized> Keyed for &T {
    fn key(&self) -> &str {
        (**self).key()
    }

    fn tags(&self) -> Vec<String> {
        (**self).tags()
    }
}

/// A collection with exactly one element per key.
pub type KeyedMap<T> = BTreeMap<String, T>;

/// Index a sequence by key.
///
/// When two elements share a key the later one wins. Never fails; an empty
/// sequence gives an empty map.
#[must_use]
pub fn keyed<T, I>(elements: I) -> KeyedMap<T>
where
    T: Keyed,
    I: IntoIterator<Item = T>,
{
    let mut map = KeyedMap::new();
    for element in elements {
        map.insert(element.key().to_string(), element);
    }
    map
}
