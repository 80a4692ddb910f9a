use serde::Deserialize;
use serde_json::Value;

/// One entry of a company record's `representants` list
///
/// Only the two fields the relay interprets are modeled; everything else in
/// the record stays opaque JSON and is forwarded untouched.
#[derive(Debug, Clone, Deserialize)]
pub struct Representative {
    /// First name, absent for some individuals and for corporate entities
    pub prenom: Option<String>,
    /// True when the representative is itself a company rather than a person
    #[serde(default)]
    pub personne_morale: bool,
}

impl Representative {
    /// Whether this representative triggers a linked-company search:
    /// an individual with a known, non-empty first name
    pub fn qualifies_for_lookup(&self) -> bool {
        !self.personne_morale && self.prenom.as_deref().is_some_and(|p| !p.is_empty())
    }
}

/// Extract the representatives list from an opaque company record
///
/// A missing or non-array `representants` field yields an empty list.
/// Entries are parsed independently; a malformed entry is skipped without
/// affecting the others.
pub fn representatives_of(company: &Value) -> Vec<Representative> {
    match company.get("representants").and_then(Value::as_array) {
        Some(entries) => entries
            .iter()
            .filter_map(|entry| serde_json::from_value(entry.clone()).ok())
            .collect(),
        None => Vec::new(),
    }
}
