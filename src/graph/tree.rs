use serde::{Deserialize, Serialize};

use crate::models::{Identifier, Issue};

/// A project with its dependencies stored as one tree per scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: Identifier,
    #[serde(default)]
    pub scopes: Vec<Scope>,
}

/// A named group of dependencies, e.g. `compile` or `test`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scope {
    pub name: String,
    #[serde(default)]
    pub dependencies: Vec<PackageReference>,
}

/// A reference to a package and, recursively, the packages it depends on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageReference {
    pub id: Identifier,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<PackageReference>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<Issue>,
}

impl PackageReference {
    pub fn new(id: Identifier) -> Self {
        Self {
            id,
            dependencies: Vec::new(),
            issues: Vec::new(),
        }
    }

    pub fn with_dependencies(mut self, dependencies: Vec<PackageReference>) -> Self {
        self.dependencies = dependencies;
        self
    }

    pub fn with_issue(mut self, issue: Issue) -> Self {
        self.issues.push(issue);
        self
    }
}
