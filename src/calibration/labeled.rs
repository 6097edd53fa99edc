// Labeled ground truth for calibration.
//
// A small ordered set of terms, each marked politically sensitive (1) or
// neutral (0). The calibrator checks how well |projection| reproduces these
// labels.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Label {
    Neutral,
    Sensitive,
}

impl Label {
    /// The value |projection| is compared against.
    pub fn target(&self) -> f64 {
        match self {
            Label::Neutral => 0.0,
            Label::Sensitive => 1.0,
        }
    }

    pub fn from_number(n: i64) -> Option<Self> {
        match n {
            0 => Some(Label::Neutral),
            1 => Some(Label::Sensitive),
            _ => None,
        }
    }
}

/// Term → label, in a fixed order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabeledTestSet {
    entries: Vec<(String, Label)>,
}

impl LabeledTestSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a term, replacing its label if it's already present.
    pub fn insert(&mut self, term: impl Into<String>, label: Label) {
        let term = term.into();
        match self.entries.iter_mut().find(|(t, _)| *t == term) {
            Some(entry) => entry.1 = label,
            None => self.entries.push((term, label)),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Label)> {
        self.entries.iter().map(|(t, l)| (t.as_str(), *l))
    }

    /// The built-in set: ten politically loaded terms and ten everyday ones.
    pub fn builtin() -> Self {
        let mut set = Self::new();
        for term in [
            "fascism",
            "socialism",
            "impeachment",
            "referendum",
            "nationalism",
            "abortion",
            "censorship",
            "sanctions",
            "tariffs",
            "protest",
        ] {
            set.insert(term, Label::Sensitive);
        }
        for term in [
            "library",
            "restaurant",
            "mountain",
            "ocean",
            "piano",
            "calendar",
            "umbrella",
            "street",
            "plate",
            "window",
        ] {
            set.insert(term, Label::Neutral);
        }
        set
    }

    /// Parse a JSON object mapping terms to 0 or 1.
    pub fn from_json(value: Value) -> Result<Self> {
        let Value::Object(map) = value else {
            anyhow::bail!("Labeled set must be a JSON object of term → 0|1");
        };

        let mut set = Self::new();
        for (term, label) in map {
            let label = label
                .as_i64()
                .and_then(Label::from_number)
                .with_context(|| format!("Label for '{term}' must be 0 or 1, found {label}"))?;
            set.insert(term, label);
        }

        if set.is_empty() {
            anyhow::bail!("Labeled set is empty");
        }
        Ok(set)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read labeled set from {}", path.display()))?;
        let value: Value = serde_json::from_str(&text)
            .with_context(|| format!("{} is not valid JSON", path.display()))?;
        Self::from_json(value).with_context(|| format!("Invalid labeled set in {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builtin_is_balanced() {
        let set = LabeledTestSet::builtin();
        assert_eq!(set.len(), 20);
        let sensitive = set.iter().filter(|(_, l)| *l == Label::Sensitive).count();
        assert_eq!(sensitive, 10);
    }

    #[test]
    fn test_from_json_keeps_order() {
        let set = LabeledTestSet::from_json(json!({"war": 1, "spoon": 0, "vote": 1})).unwrap();
        let terms: Vec<&str> = set.iter().map(|(t, _)| t).collect();
        assert_eq!(terms, vec!["war", "spoon", "vote"]);
    }

    #[test]
    fn test_from_json_rejects_bad_label() {
        let err = LabeledTestSet::from_json(json!({"war": 2})).unwrap_err();
        assert!(err.to_string().contains("war"));
        assert!(LabeledTestSet::from_json(json!({"war": "yes"})).is_err());
        assert!(LabeledTestSet::from_json(json!(["war"])).is_err());
        assert!(LabeledTestSet::from_json(json!({})).is_err());
    }

    #[test]
    fn test_insert_replaces_label() {
        let mut set = LabeledTestSet::new();
        set.insert("vote", Label::Neutral);
        set.insert("vote", Label::Sensitive);
        assert_eq!(set.len(), 1);
        assert_eq!(set.iter().next(), Some(("vote", Label::Sensitive)));
    }
}
