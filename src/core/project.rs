//! # Projects
//!
//! A project is a named configuration unit: a target folder, a file name,
//! and a set of `KEY=VALUE` variables. The name is the identity and the
//! remote store key; it never changes once the project exists.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub file_name: String,
    pub target_folder: String,
    /// Storage order is irrelevant; display goes through `sorted_variables`.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub variables: HashMap<String, String>,
}

impl Project {
    pub fn new(
        name: impl Into<String>,
        target_folder: impl Into<String>,
        file_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            file_name: file_name.into(),
            target_folder: target_folder.into(),
            variables: HashMap::new(),
        }
    }

    pub fn with_variable(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(key.into(), value.into());
        self
    }

    /// Variables ordered by key, the way every list shows them.
    pub fn sorted_variables(&self) -> Vec<(&str, &str)> {
        let mut vars: Vec<(&str, &str)> = self
            .variables
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        vars.sort_unstable_by(|a, b| a.0.cmp(b.0));
        vars
    }

    pub fn set_variable(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(key.into(), value.into());
    }

    /// Rewrites `original` as `key = value`.
    ///
    /// Same key: the value is overwritten in place. Different key: the old
    /// entry is removed first, then the new one inserted (which also
    /// overwrites an existing entry under `key`).
    pub fn rename_variable(&mut self, original: &str, key: &str, value: impl Into<String>) {
        if original != key {
            self.variables.remove(original);
        }
        self.variables.insert(key.to_string(), value.into());
    }

    pub fn remove_variable(&mut self, key: &str) -> Option<String> {
        self.variables.remove(key)
    }
}

/// Documents written by older clients store an absent map as `null`.
fn null_as_empty<'de, D>(deserializer: D) -> Result<HashMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<HashMap<String, String>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rename_to_new_key_drops_old_entry() {
        let mut project = Project::new("web", "/w", ".env").with_variable("K1", "V");
        project.rename_variable("K1", "K2", "V");
        assert_eq!(project.variables.get("K2").map(String::as_str), Some("V"));
        assert!(!project.variables.contains_key("K1"));
        assert_eq!(project.variables.len(), 1);
    }

    #[test]
    fn test_rename_to_same_key_overwrites_in_place() {
        let mut project = Project::new("web", "/w", ".env").with_variable("K1", "V");
        project.rename_variable("K1", "K1", "V");
        assert_eq!(project.variables.len(), 1);
        assert_eq!(project.variables["K1"], "V");

        project.rename_variable("K1", "K1", "other");
        assert_eq!(project.variables["K1"], "other");
    }

    #[test]
    fn test_rename_onto_existing_key_replaces_it() {
        let mut project = Project::new("web", "/w", ".env")
            .with_variable("A", "1")
            .with_variable("B", "2");
        project.rename_variable("A", "B", "3");
        assert_eq!(project.variables.len(), 1);
        assert_eq!(project.variables["B"], "3");
    }

    #[test]
    fn test_sorted_variables_orders_by_key() {
        let project = Project::new("web", "/w", ".env")
            .with_variable("ZED", "z")
            .with_variable("ALPHA", "a")
            .with_variable("MID", "m");
        let keys: Vec<&str> = project.sorted_variables().iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec!["ALPHA", "MID", "ZED"]);
    }

    #[test]
    fn test_null_variables_decode_as_empty() {
        let json = r#"{"name":"api","file_name":".env","target_folder":"api","variables":null}"#;
        let project: Project = serde_json::from_str(json).unwrap();
        assert!(project.variables.is_empty());

        let json = r#"{"name":"api","file_name":".env","target_folder":"api"}"#;
        let project: Project = serde_json::from_str(json).unwrap();
        assert!(project.variables.is_empty());
    }

    #[test]
    fn test_json_field_names() {
        let project = Project::new("api", "services/api", ".env").with_variable("PORT", "80");
        let value = serde_json::to_value(&project).unwrap();
        assert_eq!(value["name"], "api");
        assert_eq!(value["file_name"], ".env");
        assert_eq!(value["target_folder"], "services/api");
        assert_eq!(value["variables"]["PORT"], "80");
    }
}
