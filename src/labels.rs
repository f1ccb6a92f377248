//! Fixed sets of named constants for tagging pools

use crate::errors::LabelError;

/// One entry of a [`LabelSet`] before validation.
///
/// A bare name uses itself as the value; a pair sets both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    name: String,
    value: String,
}

impl From<&str> for Label {
    fn from(name: &str) -> Self {
        Self {
            name: name.to_string(),
            value: name.to_string(),
        }
    }
}

impl From<String> for Label {
    fn from(name: String) -> Self {
        Self {
            value: name.clone(),
            name,
        }
    }
}

impl From<(&str, &str)> for Label {
    fn from((name, value): (&str, &str)) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
        }
    }
}

impl From<(String, String)> for Label {
    fn from((name, value): (String, String)) -> Self {
        Self { name, value }
    }
}

/// Immutable, ordered set of distinct `(name, value)` constants.
///
/// Names have spaces and dashes turned into underscores. Two entries whose
/// names collide after that are rejected when the set is built, so a typo
/// in a name shows up as a failed lookup rather than a silently wrong value.
///
/// # Examples
///
/// ```
/// use esox_resourcepool::{Label, LabelSet};
///
/// let colors = LabelSet::new(["red", "green"]).unwrap();
/// assert_eq!(colors.get("red"), Some("red"));
///
/// let mixed = LabelSet::new([
///     Label::from(("a", "eh")),
///     Label::from("b"),
///     Label::from(("to-bee", "2 b")),
/// ]).unwrap();
/// assert_eq!(mixed.names(), vec!["a", "b", "to_bee"]);
/// assert_eq!(mixed.values(), vec!["eh", "b", "2 b"]);
/// assert_eq!(mixed.get("to bee"), Some("2 b"));
///
/// assert!(LabelSet::new(["x y", "x-y"]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LabelSet {
    entries: Vec<(String, String)>,
}

impl LabelSet {
    /// Build a set, validating every name.
    pub fn new<I>(items: I) -> Result<Self, LabelError>
    where
        I: IntoIterator,
        I::Item: Into<Label>,
    {
        let mut entries: Vec<(String, String)> = Vec::new();

        for item in items {
            let Label { name, value } = item.into();
            if name.is_empty() {
                return Err(LabelError::EmptyName);
            }

            let name = normalize(&name);
            if let Some((_, existing)) = entries.iter().find(|(n, _)| *n == name) {
                return Err(LabelError::Conflict {
                    name,
                    existing: existing.clone(),
                });
            }
            entries.push((name, value));
        }

        Ok(Self { entries })
    }

    /// Value for `name`, which is normalized before the lookup.
    pub fn get(&self, name: &str) -> Option<&str> {
        let name = normalize(name);
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Names in construction order
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Values in construction order
    pub fn values(&self) -> Vec<&str> {
        self.entries.iter().map(|(_, v)| v.as_str()).collect()
    }

    /// `(name, value)` pairs in construction order
    pub fn items(&self) -> Vec<(&str, &str)> {
        self.iter().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn normalize(name: &str) -> String {
    name.replace([' ', '-'], "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_names_use_themselves_as_values() {
        let set = LabelSet::new(["red", "green", "blue"]).unwrap();

        assert_eq!(set.len(), 3);
        assert_eq!(set.items(), vec![("red", "red"), ("green", "green"), ("blue", "blue")]);
    }

    #[test]
    fn test_order_is_preserved() {
        let set = LabelSet::new([("z", "1"), ("a", "2"), ("m", "3")]).unwrap();

        assert_eq!(set.names(), vec!["z", "a", "m"]);
        assert_eq!(set.values(), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_conflict_reports_existing_value() {
        let err = LabelSet::new([("read only", "ro"), ("read-only", "other")]).unwrap_err();

        assert_eq!(
            err,
            LabelError::Conflict {
                name: "read_only".to_string(),
                existing: "ro".to_string(),
            }
        );
    }

    #[test]
    fn test_empty_name_is_rejected() {
        assert_eq!(LabelSet::new([""]).unwrap_err(), LabelError::EmptyName);
    }

    #[test]
    fn test_lookup_of_unknown_name() {
        let set = LabelSet::new(["primary"]).unwrap();

        assert!(set.contains("primary"));
        assert!(!set.contains("primray"));
        assert_eq!(set.get("replica"), None);
    }

    #[test]
    fn test_empty_set() {
        let set = LabelSet::new(Vec::<Label>::new()).unwrap();
        assert!(set.is_empty());
        assert_eq!(set, LabelSet::default());
    }
}
