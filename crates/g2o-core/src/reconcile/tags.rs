//! Tag normalization for equivalence checks.
//!
//! Tags compare case-insensitively and as sets. The current side additionally
//! drops local bookkeeping tags (the ignore-list); the desired side never
//! carries those, so the ignore-list is not applied to it.

use std::collections::BTreeSet;

use super::Keyed;

/// A normalized tag set: lower-cased, sorted, duplicates collapsed.
pub type TagSet = BTreeSet<String>;

/// Case-insensitive set of tag names excluded from comparison.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreTags {
    lowered: BTreeSet<String>,
}

impl IgnoreTags {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one tag name to the list.
    pub fn insert(&mut self, tag: &str) {
        self.lowered.insert(tag.to_lowercase());
    }

    /// Returns true if `tag` matches an entry, ignoring case.
    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.lowered.contains(&tag.to_lowercase())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lowered.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lowered.is_empty()
    }

    /// Entries in their lower-cased form.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.lowered.iter().map(String::as_str)
    }
}

impl<S: AsRef<str>> FromIterator<S> for IgnoreTags {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut ignore = Self::new();
        ignore.extend(iter);
        ignore
    }
}

impl<S: AsRef<str>> Extend<S> for IgnoreTags {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for tag in iter {
            self.insert(tag.as_ref());
        }
    }
}

/// Normalize the tags of a desired (remote) element.
#[must_use]
pub fn desired_tags<D: Keyed + ?Sized>(desired: &D) -> TagSet {
    desired.tags().iter().map(|tag| tag.to_lowercase()).collect()
}

/// Normalize the tags of a current (local) element, dropping ignored tags.
#[must_use]
pub fn current_tags<C: Keyed + ?Sized>(current: &C, ignore: &IgnoreTags) -> TagSet {
    current
        .tags()
        .iter()
        .map(|tag| tag.to_lowercase())
        .filter(|tag| !ignore.contains(tag))
        .collect()
}

/// Returns true when both sides describe the same tag set.
#[must_use]
pub fn equivalent<D, C>(desired: &D, current: &C, ignore: &IgnoreTags) -> bool
where
    D: Keyed + ?Sized,
    C: Keyed + ?Sized,
{
    desired_tags(desired) == current_tags(current, ignore)
}
