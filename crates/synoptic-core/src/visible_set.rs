//! Ordered sets of model identifiers reported by the document.
//!
//! The document reports which elements are visible (or need tooltip content)
//! as a single comma-separated string. [`VisibleSet::parse`] turns that into an
//! ordered sequence of [`ModelId`]s. A new set always replaces the previous one
//! wholesale; [`VisibleSet::diff`] is provided for hosts that need to turn the
//! replacement into subscribe/unsubscribe actions.

use std::slice;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::identifier::ModelId;

/// Separator used by the document when reporting identifier lists.
pub const LIST_SEPARATOR: char = ',';

/// Ordered sequence of model identifiers currently visible in the diagram.
///
/// # Examples
///
/// ```
/// use synoptic_core::visible_set::VisibleSet;
///
/// assert!(VisibleSet::parse("").is_empty());
///
/// let set = VisibleSet::parse("a,b,c");
/// assert_eq!(set.len(), 3);
/// assert_eq!(set.first().map(|id| id.as_str()), Some("a"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VisibleSet(Vec<ModelId>);

impl VisibleSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a comma-separated identifier list.
    ///
    /// Empty input yields the empty set, never a set containing one empty
    /// identifier. Empty items inside a non-empty list (`"a,,b"`) are kept as
    /// they are; the host decides how to treat them.
    pub fn parse(raw: &str) -> Self {
        if raw.is_empty() {
            return Self::new();
        }
        Self(raw.split(LIST_SEPARATOR).map(ModelId::from).collect())
    }

    /// Returns the first identifier, if any.
    pub fn first(&self) -> Option<&ModelId> {
        self.0.first()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|id| id == name)
    }

    pub fn iter(&self) -> slice::Iter<'_, ModelId> {
        self.0.iter()
    }

    /// Returns the identifiers as a slice.
    pub fn as_slice(&self) -> &[ModelId] {
        &self.0
    }

    /// Computes which identifiers appeared and disappeared relative to
    /// `previous`.
    ///
    /// Both lists keep the order in which identifiers occur in their source
    /// set, and duplicates are reported once.
    pub fn diff(&self, previous: &VisibleSet) -> VisibleSetDiff {
        let current: IndexSet<&ModelId> = self.0.iter().collect();
        let before: IndexSet<&ModelId> = previous.0.iter().collect();

        let added = current
            .difference(&before)
            .map(|id| (*id).clone())
            .collect();
        let removed = before
            .difference(&current)
            .map(|id| (*id).clone())
            .collect();

        VisibleSetDiff { added, removed }
    }
}

impl From<Vec<ModelId>> for VisibleSet {
    fn from(ids: Vec<ModelId>) -> Self {
        Self(ids)
    }
}

impl FromIterator<ModelId> for VisibleSet {
    fn from_iter<T: IntoIterator<Item = ModelId>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for VisibleSet {
    type Item = ModelId;
    type IntoIter = std::vec::IntoIter<ModelId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a VisibleSet {
    type Item = &'a ModelId;
    type IntoIter = slice::Iter<'a, ModelId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Change between two consecutive [`VisibleSet`]s.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VisibleSetDiff {
    /// Identifiers present now but not before.
    pub added: Vec<ModelId>,
    /// Identifiers present before but not now.
    pub removed: Vec<ModelId>,
}

impl VisibleSetDiff {
    /// Returns `true` if nothing was added or removed.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(set: &VisibleSet) -> Vec<&str> {
        set.iter().map(ModelId::as_str).collect()
    }

    #[test]
    fn test_parse_empty_is_empty_set() {
        let set = VisibleSet::parse("");
        assert!(set.is_empty());
        assert_eq!(set.first(), None);
    }

    #[test]
    fn test_parse_single() {
        assert_eq!(names(&VisibleSet::parse("a")), vec!["a"]);
    }

    #[test]
    fn test_parse_multiple_keeps_order() {
        assert_eq!(names(&VisibleSet::parse("a,b,c")), vec!["a", "b", "c"]);
        assert_eq!(names(&VisibleSet::parse("c,a,b")), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_parse_passes_inner_empty_items_through() {
        assert_eq!(names(&VisibleSet::parse("a,,b")), vec!["a", "", "b"]);
        assert_eq!(names(&VisibleSet::parse(",")), vec!["", ""]);
    }

    #[test]
    fn test_parse_does_not_trim() {
        assert_eq!(names(&VisibleSet::parse(" a, b")), vec![" a", " b"]);
    }

    #[test]
    fn test_contains() {
        let set = VisibleSet::parse("sys/a/1,sys/b/2");
        assert!(set.contains("sys/b/2"));
        assert!(!set.contains("sys/c/3"));
    }

    #[test]
    fn test_diff_added_and_removed() {
        let before = VisibleSet::parse("a,b,c");
        let now = VisibleSet::parse("b,d,c,e");
        let diff = now.diff(&before);

        assert_eq!(diff.added, vec![ModelId::new("d"), ModelId::new("e")]);
        assert_eq!(diff.removed, vec![ModelId::new("a")]);
    }

    #[test]
    fn test_diff_from_empty_adds_everything() {
        let now = VisibleSet::parse("x,y");
        let diff = now.diff(&VisibleSet::new());
        assert_eq!(diff.added.len(), 2);
        assert!(diff.removed.is_empty());
    }

    #[test]
    fn test_diff_to_empty_removes_everything() {
        let before = VisibleSet::parse("x,y");
        let diff = VisibleSet::new().diff(&before);
        assert!(diff.added.is_empty());
        assert_eq!(diff.removed.len(), 2);
    }

    #[test]
    fn test_diff_reports_duplicates_once() {
        let now = VisibleSet::parse("a,a,b");
        let diff = now.diff(&VisibleSet::new());
        assert_eq!(diff.added, vec![ModelId::new("a"), ModelId::new("b")]);
    }

    #[test]
    fn test_diff_identical_is_empty() {
        let set = VisibleSet::parse("a,b");
        assert!(set.diff(&set.clone()).is_empty());
    }
}

#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    // ===================
    // Strategies
    // ===================

    fn names_strategy() -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec("[a-z0-9/:._-]{1,12}", 0..8)
    }

    // ===================
    // Property Test Functions
    // ===================

    /// Joining non-empty, comma-free names and parsing them back yields the
    /// same names in the same order.
    fn check_parse_recovers_joined_names(names: Vec<String>) -> Result<(), TestCaseError> {
        let raw = names.join(",");
        let set = VisibleSet::parse(&raw);

        let parsed: Vec<&str> = set.iter().map(ModelId::as_str).collect();
        prop_assert_eq!(parsed, names.iter().map(String::as_str).collect::<Vec<_>>());
        Ok(())
    }

    /// Parsing never yields a set containing only one empty identifier.
    fn check_parse_never_yields_lone_empty(raw: String) -> Result<(), TestCaseError> {
        let set = VisibleSet::parse(&raw);
        prop_assert!(!(set.len() == 1 && set.first().is_some_and(|id| id.is_empty())));
        Ok(())
    }

    /// Applying a diff to the previous set yields the members of the current set.
    fn check_diff_applies(before: Vec<String>, now: Vec<String>) -> Result<(), TestCaseError> {
        let before: VisibleSet = before.into_iter().map(ModelId::from).collect();
        let now: VisibleSet = now.into_iter().map(ModelId::from).collect();
        let diff = now.diff(&before);

        for id in &diff.added {
            prop_assert!(now.contains(id) && !before.contains(id));
        }
        for id in &diff.removed {
            prop_assert!(before.contains(id) && !now.contains(id));
        }
        for id in &now {
            prop_assert!(before.contains(id) || diff.added.contains(id));
        }
        Ok(())
    }

    // ===================
    // Proptest Wrappers
    // ===================

    proptest! {
        #[test]
        fn parse_recovers_joined_names(names in names_strategy()) {
            check_parse_recovers_joined_names(names)?;
        }

        #[test]
        fn parse_never_yields_lone_empty(raw in "[a,]{0,6}") {
            check_parse_never_yields_lone_empty(raw)?;
        }

        #[test]
        fn diff_applies(before in names_strategy(), now in names_strategy()) {
            check_diff_applies(before, now)?;
        }
    }
}
