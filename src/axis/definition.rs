// Axis definitions: two contrasting word lists naming a semantic dimension.
//
// Definitions arrive in a few shapes: an object of named definitions, an
// array of named definitions, or a single bare definition (the shape older
// calibration outputs used). Pole names also vary between "left"/"right" and
// "positive"/"negative". Everything is normalized here, at the boundary, so
// the rest of the crate only ever sees `AxisDefinition { name, left, right }`.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// A named pair of opposing word lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisDefinition {
    #[serde(default)]
    pub name: String,
    #[serde(alias = "positive")]
    pub left: Vec<String>,
    #[serde(alias = "negative")]
    pub right: Vec<String>,
}

impl AxisDefinition {
    pub fn new<L, R>(name: impl Into<String>, left: L, right: R) -> Self
    where
        L: IntoIterator,
        L::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        Self {
            name: name.into(),
            left: left.into_iter().map(Into::into).collect(),
            right: right.into_iter().map(Into::into).collect(),
        }
    }

    /// The same definition with poles swapped.
    pub fn reversed(&self) -> Self {
        Self {
            name: self.name.clone(),
            left: self.right.clone(),
            right: self.left.clone(),
        }
    }
}

/// Parse axis definitions from a JSON value in any of the accepted shapes.
///
/// Object entries keep their file order (serde_json is built with
/// `preserve_order`), which matters because calibration ties go to the
/// earliest definition.
pub fn parse_definitions(value: Value) -> Result<Vec<AxisDefinition>> {
    let definitions = match value {
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| {
                let mut def: AxisDefinition = serde_json::from_value(item)
                    .with_context(|| format!("Axis definition #{} is malformed", i + 1))?;
                if def.name.is_empty() {
                    def.name = format!("axis-{}", i + 1);
                }
                Ok(def)
            })
            .collect::<Result<Vec<_>>>()?,
        Value::Object(map) if is_single_definition(&map) => {
            let def: AxisDefinition = serde_json::from_value(Value::Object(map))
                .context("Axis definition is malformed")?;
            vec![def]
        }
        Value::Object(map) => map
            .into_iter()
            .map(|(name, item)| {
                let mut def: AxisDefinition = serde_json::from_value(item)
                    .with_context(|| format!("Axis definition '{name}' is malformed"))?;
                def.name = name;
                Ok(def)
            })
            .collect::<Result<Vec<_>>>()?,
        other => anyhow::bail!(
            "Expected an object or array of axis definitions, found {}",
            json_kind(&other)
        ),
    };

    if definitions.is_empty() {
        anyhow::bail!("No axis definitions found");
    }

    let mut seen = HashSet::new();
    for def in &definitions {
        if !seen.insert(def.name.as_str()) {
            warn!(axis = %def.name, "Duplicate axis definition name");
        }
    }

    Ok(definitions)
}

/// Load axis definitions from a JSON file.
pub fn load_definitions(path: &Path) -> Result<Vec<AxisDefinition>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read axis definitions from {}", path.display()))?;
    let value: Value = serde_json::from_str(&text)
        .with_context(|| format!("{} is not valid JSON", path.display()))?;
    parse_definitions(value).with_context(|| format!("Invalid axis definitions in {}", path.display()))
}

fn is_single_definition(map: &serde_json::Map<String, Value>) -> bool {
    ["left", "right", "positive", "negative"]
        .iter()
        .any(|k| map.get(*k).is_some_and(Value::is_array))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
