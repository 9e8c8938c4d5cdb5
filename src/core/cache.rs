//! # Local Project Cache
//!
//! Name-keyed mirror of the remote project set. It only ever holds
//! acknowledged state: the controller writes to it after a store call
//! succeeds, never before.

use std::collections::{BTreeMap, HashMap};

use crate::core::project::Project;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ProjectCache {
    projects: BTreeMap<String, Project>,
}

impl ProjectCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in a freshly fetched project set.
    pub fn replace_all(&mut self, projects: HashMap<String, Project>) {
        self.projects = projects.into_iter().collect();
    }

    pub fn upsert(&mut self, name: &str, project: Project) {
        self.projects.insert(name.to_string(), project);
    }

    pub fn remove(&mut self, name: &str) -> Option<Project> {
        self.projects.remove(name)
    }

    /// All projects ordered by name.
    pub fn all(&self) -> Vec<&Project> {
        self.projects.values().collect()
    }

    pub fn get(&self, name: &str) -> Option<&Project> {
        self.projects.get(name)
    }

    /// Project at a row of the name-ordered list.
    pub fn nth(&self, index: usize) -> Option<&Project> {
        self.projects.values().nth(index)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.projects.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(name: &str) -> Project {
        Project::new(name, name, ".env")
    }

    #[test]
    fn test_all_is_ordered_by_name() {
        let mut cache = ProjectCache::new();
        cache.upsert("web", project("web"));
        cache.upsert("api", project("api"));
        cache.upsert("db", project("db"));
        let names: Vec<&str> = cache.all().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["api", "db", "web"]);
        assert_eq!(cache.nth(1).map(|p| p.name.as_str()), Some("db"));
    }

    #[test]
    fn test_net_effect_of_mutations() {
        let mut cache = ProjectCache::new();
        cache.upsert("web", project("web"));
        cache.upsert("api", project("api"));
        cache.upsert("web", project("web").with_variable("PORT", "8080"));
        cache.remove("api");
        cache.upsert("db", project("db"));
        cache.remove("missing");

        let all = cache.all();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "db");
        assert_eq!(all[1].name, "web");
        assert_eq!(all[1].variables["PORT"], "8080");
    }

    #[test]
    fn test_replace_all_discards_previous_entries() {
        let mut cache = ProjectCache::new();
        cache.upsert("stale", project("stale"));

        let fresh: HashMap<String, Project> =
            [("api".to_string(), project("api"))].into_iter().collect();
        cache.replace_all(fresh);

        assert!(!cache.contains("stale"));
        assert!(cache.contains("api"));
        assert_eq!(cache.len(), 1);
    }
}
