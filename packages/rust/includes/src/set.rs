use serde::{Deserialize, Serialize};

/// Ordered set of dot-separated include paths.
///
/// Insertion keeps the first occurrence of a path and drops later
/// duplicates. Paths compare as exact strings (case-sensitive, no
/// normalization).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct IncludePathSet {
    paths: Vec<String>,
}

impl IncludePathSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Deduplicated concatenation of `parts`, in order.
    pub fn concat<S: AsRef<str>>(parts: &[&[S]]) -> Self {
        let mut set = Self::new();
        for part in parts {
            set.extend(part.iter().map(|p| p.as_ref().to_string()));
        }
        set
    }

    /// Append `path` unless already present. Returns `true` if it was added.
    pub fn insert(&mut self, path: impl Into<String>) -> bool {
        let path = path.into();
        if self.contains(&path) {
            return false;
        }
        self.paths.push(path);
        true
    }

    /// Append every path of `other` not already present.
    pub fn merge(&mut self, other: &IncludePathSet) {
        self.extend(other.iter().map(str::to_string));
    }

    pub fn contains(&self, path: &str) -> bool {
        self.paths.iter().any(|p| p == path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.paths
    }
}

impl<S: Into<String>> Extend<S> for IncludePathSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for path in iter {
            self.insert(path);
        }
    }
}

impl<S: Into<String>> FromIterator<S> for IncludePathSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl From<Vec<String>> for IncludePathSet {
    fn from(paths: Vec<String>) -> Self {
        paths.into_iter().collect()
    }
}

impl From<IncludePathSet> for Vec<String> {
    fn from(set: IncludePathSet) -> Self {
        set.paths
    }
}

impl<'a> IntoIterator for &'a IncludePathSet {
    type Item = &'a str;
    type IntoIter = std::iter::Map<std::slice::Iter<'a, String>, fn(&'a String) -> &'a str>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.iter().map(String::as_str)
    }
}
