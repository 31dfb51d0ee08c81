use std::collections::HashMap;

use serde::Serialize;

use crate::dataset::PointStore;
use crate::error::{Error, Result};
use crate::point::PointId;

/// Default number of autocomplete results.
pub const DEFAULT_SEARCH_LIMIT: usize = 5;

/// Minimum Jaro-Winkler similarity for a name to count as a suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// Name and id of a point, as returned by autocomplete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameMatch {
    pub id: PointId,
    pub name: String,
}

#[derive(Debug, Clone)]
struct NameEntry {
    id: PointId,
    name: String,
    folded: String,
}

/// Case-insensitive name lookup over a point store.
#[derive(Debug, Clone, Default)]
pub struct NameIndex {
    entries: Vec<NameEntry>,
    exact: HashMap<String, PointId>,
}

impl NameIndex {
    pub fn from_store(store: &PointStore) -> Self {
        let mut index = Self::default();
        store.for_each(|point| index.add(point.id, &point.name));
        index
    }

    pub fn add(&mut self, id: PointId, name: &str) {
        let folded = name.to_lowercase();
        self.exact.entry(folded.clone()).or_insert(id);
        self.entries.push(NameEntry {
            id,
            name: name.to_string(),
            folded,
        });
    }

    /// Up to `limit` names containing `fragment`, in store order.
    pub fn search(&self, fragment: &str, limit: usize) -> Vec<NameMatch> {
        let needle = fragment.to_lowercase();
        self.entries
            .iter()
            .filter(|entry| entry.folded.contains(&needle))
            .take(limit)
            .map(|entry| NameMatch {
                id: entry.id,
                name: entry.name.clone(),
            })
            .collect()
    }

    /// Resolve an exact (case-insensitive) name to its id.
    pub fn resolve(&self, name: &str) -> Result<PointId> {
        self.exact
            .get(&name.to_lowercase())
            .copied()
            .ok_or_else(|| Error::UnknownPointName {
                name: name.to_string(),
                suggestions: self.suggest(name, 3),
            })
    }

    /// Closest known names by Jaro-Winkler similarity, best first.
    pub fn suggest(&self, name: &str, limit: usize) -> Vec<String> {
        let needle = name.to_lowercase();
        let mut scored: Vec<(f64, &NameEntry)> = self
            .entries
            .iter()
            .map(|entry| (strsim::jaro_winkler(&needle, &entry.folded), entry))
            .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.name.cmp(&b.1.name)));
        scored
            .into_iter()
            .take(limit)
            .map(|(_, entry)| entry.name.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> NameIndex {
        let mut index = NameIndex::default();
        for (id, name) in [
            (1, "Sol"),
            (2, "Solati"),
            (3, "Achenar"),
            (4, "Consolidation"),
            (5, "SOLACE"),
        ] {
            index.add(id, name);
        }
        index
    }

    #[test]
    fn substring_search_is_case_insensitive_and_ordered() {
        let ids: Vec<PointId> = index().search("sOl", 10).iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 2, 4, 5]);
    }

    #[test]
    fn search_stops_at_limit() {
        let found = index().search("sol", 2);
        assert_eq!(
            found,
            vec![
                NameMatch {
                    id: 1,
                    name: "Sol".to_string()
                },
                NameMatch {
                    id: 2,
                    name: "Solati".to_string()
                },
            ]
        );
        assert!(index().search("sol", 0).is_empty());
    }

    #[test]
    fn resolve_suggests_close_names() {
        let index = index();
        assert_eq!(index.resolve("achenar").unwrap(), 3);

        match index.resolve("Achenr") {
            Err(Error::UnknownPointName { suggestions, .. }) => {
                assert_eq!(suggestions.first().map(String::as_str), Some("Achenar"));
            }
            other => panic!("expected unknown name error, got {other:?}"),
        }
    }
}
