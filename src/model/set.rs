//! Named node and element sets

use serde::{Deserialize, Serialize};

/// A named, ordered collection of node or element tags.
///
/// Duplicate tags and empty sets are permitted; the deck writer handles
/// zero-length sets without emitting malformed syntax. Two reserved names,
/// `"all"` for nodes and elements, conventionally hold every tag in the
/// model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagSet {
    pub name: String,
    pub tags: Vec<usize>,
}

impl TagSet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tags: Vec::new(),
        }
    }

    pub fn with_tags(name: impl Into<String>, tags: Vec<usize>) -> Self {
        Self {
            name: name.into(),
            tags,
        }
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

/// Insertion-ordered collection of named sets with merge-on-name appends.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SetCollection {
    sets: Vec<TagSet>,
}

impl SetCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append tags to the named set, creating it if absent.
    pub fn append(&mut self, name: &str, tags: impl IntoIterator<Item = usize>) {
        match self.sets.iter_mut().find(|s| s.name == name) {
            Some(set) => set.tags.extend(tags),
            None => self
                .sets
                .push(TagSet::with_tags(name, tags.into_iter().collect())),
        }
    }

    /// Replace the named set's tags entirely.
    pub fn replace(&mut self, name: &str, tags: Vec<usize>) {
        match self.sets.iter_mut().find(|s| s.name == name) {
            Some(set) => set.tags = tags,
            None => self.sets.push(TagSet::with_tags(name, tags)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&TagSet> {
        self.sets.iter().find(|s| s.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TagSet> {
        self.sets.iter()
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_merges_on_name() {
        let mut sets = SetCollection::new();
        sets.append("top", [1, 2]);
        sets.append("bottom", [3]);
        sets.append("top", [4]);

        assert_eq!(sets.len(), 2);
        assert_eq!(sets.get("top").unwrap().tags, vec![1, 2, 4]);
        // Insertion order preserved
        let names: Vec<_> = sets.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["top", "bottom"]);
    }

    #[test]
    fn test_empty_and_duplicate_tags_allowed() {
        let mut sets = SetCollection::new();
        sets.append("empty", []);
        sets.append("dupes", [7, 7, 7]);
        assert!(sets.get("empty").unwrap().is_empty());
        assert_eq!(sets.get("dupes").unwrap().len(), 3);
    }
}
