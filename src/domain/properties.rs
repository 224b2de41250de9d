use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use chrono::Local;
use regex::Regex;
use serde_json::Value as JsonValue;

use crate::domain::AppError;

/// A single value in the property store: either a leaf string or a nested map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    Text(String),
    Map(BTreeMap<String, PropertyValue>),
}

impl PropertyValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            PropertyValue::Text(s) => Some(s),
            PropertyValue::Map(_) => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, PropertyValue>> {
        match self {
            PropertyValue::Text(_) => None,
            PropertyValue::Map(m) => Some(m),
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Text(s) => write!(f, "{}", s),
            PropertyValue::Map(_) => write!(f, "<nested>"),
        }
    }
}

/// Installation properties: a nested string-to-string mapping with a flat
/// on-disk representation. One store instance per invocation; multi-host
/// deployments operate on independent `dup()` copies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyStore {
    root: BTreeMap<String, PropertyValue>,
}

fn flat_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([\w.\-]+)(?:\[([\w.\-]+)\])?\s*=\s*(.*)$").unwrap())
}

impl PropertyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    pub fn len(&self) -> usize {
        self.root.len()
    }

    /// Deep-independent copy for per-host expansion.
    pub fn dup(&self) -> Self {
        self.clone()
    }

    pub fn root(&self) -> &BTreeMap<String, PropertyValue> {
        &self.root
    }

    /// Walk a nested path. An absent segment is a miss, not an error.
    pub fn get_value(&self, path: &[&str]) -> Option<&PropertyValue> {
        let (first, rest) = path.split_first()?;
        let mut current = self.root.get(*first)?;
        for segment in rest {
            current = current.as_map()?.get(*segment)?;
        }
        Some(current)
    }

    pub fn get(&self, path: &[&str]) -> Option<&str> {
        self.get_value(path).and_then(PropertyValue::as_text)
    }

    pub fn get_or(&self, path: &[&str], default: &str) -> String {
        self.get(path).unwrap_or(default).to_string()
    }

    /// Required lookup for deployment steps; missing keys abort the step.
    pub fn require(&self, path: &[&str]) -> Result<String, AppError> {
        self.get(path).map(str::to_string).ok_or_else(|| AppError::StepFailed {
            step: "configuration lookup".to_string(),
            details: format!("required key '{}' is not set", path.join(".")),
        })
    }

    pub fn get_map(&self, path: &[&str]) -> Option<&BTreeMap<String, PropertyValue>> {
        self.get_value(path).and_then(PropertyValue::as_map)
    }

    /// Dotted single-key convenience used by transformer rule tables.
    pub fn get_key(&self, dotted: &str) -> Option<&str> {
        let segments: Vec<&str> = dotted.split('.').collect();
        self.get(&segments)
    }

    pub fn set(&mut self, path: &[&str], value: impl Into<String>) {
        let value = PropertyValue::Text(value.into());
        self.set_value(path, value);
    }

    pub fn set_value(&mut self, path: &[&str], value: PropertyValue) {
        let Some((last, parents)) = path.split_last() else {
            return;
        };
        let mut current = &mut self.root;
        for segment in parents {
            let entry = current
                .entry((*segment).to_string())
                .or_insert_with(|| PropertyValue::Map(BTreeMap::new()));
            if !matches!(entry, PropertyValue::Map(_)) {
                *entry = PropertyValue::Map(BTreeMap::new());
            }
            current = match entry {
                PropertyValue::Map(m) => m,
                PropertyValue::Text(_) => unreachable!(),
            };
        }
        current.insert((*last).to_string(), value);
    }

    pub fn remove(&mut self, path: &[&str]) -> Option<PropertyValue> {
        let (last, parents) = path.split_last()?;
        if parents.is_empty() {
            return self.root.remove(*last);
        }
        let mut current = &mut self.root;
        for segment in parents {
            current = match current.get_mut(*segment)? {
                PropertyValue::Map(m) => m,
                PropertyValue::Text(_) => return None,
            };
        }
        current.remove(*last)
    }

    /// Combine two stores; `other` wins on conflict, maps merge recursively.
    pub fn merged(&self, other: &PropertyStore) -> PropertyStore {
        let mut result = self.clone();
        merge_maps(&mut result.root, &other.root);
        result
    }

    /// Flattened `(key, value)` pairs in deterministic (sorted) order.
    /// One level of nesting renders as `key[sub]`; deeper paths join the
    /// trailing segments with dots inside the bracket.
    pub fn flat_entries(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        for (key, value) in &self.root {
            match value {
                PropertyValue::Text(text) => out.push((key.clone(), text.clone())),
                PropertyValue::Map(map) => {
                    let mut nested = Vec::new();
                    flatten_into(map, String::new(), &mut nested);
                    for (sub, text) in nested {
                        out.push((format!("{}[{}]", key, sub), text));
                    }
                }
            }
        }
        out
    }

    /// Read properties from a file. A missing file yields an empty store.
    /// The content may be a JSON object (a format older releases wrote);
    /// otherwise it is parsed as flat `key=value` lines.
    pub fn load(path: &Path) -> Result<PropertyStore, AppError> {
        if !path.exists() {
            return Ok(PropertyStore::new());
        }
        let content = fs::read_to_string(path)?;

        let stripped: String = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.starts_with('#'))
            .collect::<Vec<_>>()
            .join("\n");
        if let Ok(JsonValue::Object(map)) = serde_json::from_str::<JsonValue>(&stripped) {
            let mut store = PropertyStore::new();
            for (key, value) in map {
                store.root.insert(key, json_to_property(value));
            }
            return Ok(store);
        }

        let mut store = PropertyStore::new();
        for raw_line in content.lines() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let captures = flat_line_re().captures(line).ok_or_else(|| {
                AppError::MalformedProperties {
                    path: path.display().to_string(),
                    line: line.to_string(),
                }
            })?;
            let key = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
            let value = captures.get(3).map(|m| m.as_str().trim()).unwrap_or_default();
            match captures.get(2) {
                Some(sub) => {
                    let mut path_segments = vec![key];
                    path_segments.extend(sub.as_str().split('.'));
                    store.set(&path_segments, value);
                }
                None => store.set(&[key], value),
            }
        }
        Ok(store)
    }

    /// Write properties to a file in the flat format, keys sorted so the
    /// output is stable across runs.
    pub fn store(&self, path: &Path) -> Result<(), AppError> {
        let mut out = String::new();
        out.push_str("# clusterkit configuration properties\n");
        out.push_str(&format!("# Date: {}\n", Local::now().to_rfc3339()));
        for (key, value) in self.flat_entries() {
            out.push_str(&format!("{}={}\n", key, value));
        }
        fs::write(path, out)?;
        Ok(())
    }
}

fn merge_maps(base: &mut BTreeMap<String, PropertyValue>, other: &BTreeMap<String, PropertyValue>) {
    for (key, value) in other {
        match (base.get_mut(key), value) {
            (Some(PropertyValue::Map(existing)), PropertyValue::Map(incoming)) => {
                merge_maps(existing, incoming);
            }
            _ => {
                base.insert(key.clone(), value.clone());
            }
        }
    }
}

fn flatten_into(
    map: &BTreeMap<String, PropertyValue>,
    prefix: String,
    out: &mut Vec<(String, String)>,
) {
    for (key, value) in map {
        let path = if prefix.is_empty() { key.clone() } else { format!("{}.{}", prefix, key) };
        match value {
            PropertyValue::Text(text) => out.push((path, text.clone())),
            PropertyValue::Map(nested) => flatten_into(nested, path, out),
        }
    }
}

fn json_to_property(value: JsonValue) -> PropertyValue {
    match value {
        JsonValue::Object(map) => PropertyValue::Map(
            map.into_iter().map(|(k, v)| (k, json_to_property(v))).collect(),
        ),
        JsonValue::String(s) => PropertyValue::Text(s),
        other => PropertyValue::Text(other.to_string()),
    }
}
