use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use super::tree::{PackageReference, Project};
use super::DependencyGraph;
use crate::models::{Identifier, Issue};

/// A scope of a specific project.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ScopeRef {
    pub project: Identifier,
    pub name: String,
}

impl ScopeRef {
    pub fn new(project: Identifier, name: impl Into<String>) -> Self {
        Self {
            project,
            name: name.into(),
        }
    }
}

impl fmt::Display for ScopeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.project, self.name)
    }
}

/// Walks project dependencies without exposing how they are stored.
///
/// Traversals keep an explicit visited set: every identifier is returned at
/// most once and cyclic input terminates.
pub trait DependencyNavigator: Send + Sync {
    /// The scopes of `project`, sorted by name. Empty for unknown projects.
    fn scopes_of(&self, project: &Identifier) -> Vec<ScopeRef>;

    /// Every package transitively reachable from `scope`, in depth-first
    /// pre-order.
    fn dependencies_of(&self, scope: &ScopeRef) -> Vec<Identifier>;

    /// Issues recorded for `id` while the dependency data was built.
    fn issues_of(&self, id: &Identifier) -> Vec<Issue>;

    /// The union of [`dependencies_of`](Self::dependencies_of) over all scopes.
    fn all_dependencies_of(&self, project: &Identifier) -> BTreeSet<Identifier> {
        self.scopes_of(project)
            .iter()
            .flat_map(|scope| self.dependencies_of(scope))
            .collect()
    }
}

/// Navigator over the legacy per-project reference trees.
#[derive(Debug, Clone, Default)]
pub struct TreeNavigator {
    projects: BTreeMap<Identifier, Project>,
}

impl TreeNavigator {
    pub fn new(projects: impl IntoIterator<Item = Project>) -> Self {
        Self {
            projects: projects.into_iter().map(|p| (p.id.clone(), p)).collect(),
        }
    }

    fn references(&self) -> impl Iterator<Item = &PackageReference> {
        let mut stack: Vec<&PackageReference> = self
            .projects
            .values()
            .flat_map(|p| p.scopes.iter())
            .flat_map(|s| s.dependencies.iter())
            .collect();
        std::iter::from_fn(move || {
            let next = stack.pop()?;
            stack.extend(next.dependencies.iter());
            Some(next)
        })
    }
}

impl DependencyNavigator for TreeNavigator {
    fn scopes_of(&self, project: &Identifier) -> Vec<ScopeRef> {
        let Some(project) = self.projects.get(project) else {
            return Vec::new();
        };
        let names: BTreeSet<&str> = project.scopes.iter().map(|s| s.name.as_str()).collect();
        names
            .into_iter()
            .map(|name| ScopeRef::new(project.id.clone(), name))
            .collect()
    }

    fn dependencies_of(&self, scope: &ScopeRef) -> Vec<Identifier> {
        let Some(project) = self.projects.get(&scope.project) else {
            return Vec::new();
        };

        let mut visited: HashSet<&Identifier> = HashSet::new();
        let mut order = Vec::new();
        let mut stack: Vec<&PackageReference> = project
            .scopes
            .iter()
            .filter(|s| s.name == scope.name)
            .flat_map(|s| s.dependencies.iter())
            .collect();
        stack.reverse();

        while let Some(reference) = stack.pop() {
            if !visited.insert(&reference.id) {
                continue;
            }
            order.push(reference.id.clone());
            stack.extend(reference.dependencies.iter().rev());
        }

        order
    }

    fn issues_of(&self, id: &Identifier) -> Vec<Issue> {
        let mut issues: Vec<Issue> = Vec::new();
        for reference in self.references().filter(|r| &r.id == id) {
            for issue in &reference.issues {
                if !issues.contains(issue) {
                    issues.push(issue.clone());
                }
            }
        }
        issues
    }
}

/// Navigator over a compact [`DependencyGraph`].
#[derive(Debug, Clone)]
pub struct GraphNavigator {
    graph: Arc<DependencyGraph>,
}

impl GraphNavigator {
    pub fn new(graph: Arc<DependencyGraph>) -> Self {
        Self { graph }
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }
}

impl DependencyNavigator for GraphNavigator {
    fn scopes_of(&self, project: &Identifier) -> Vec<ScopeRef> {
        self.graph.scopes_of(project).cloned().collect()
    }

    fn dependencies_of(&self, scope: &ScopeRef) -> Vec<Identifier> {
        let Some(roots) = self.graph.roots(scope) else {
            return Vec::new();
        };
        self.graph
            .reachable_from(roots)
            .into_iter()
            .filter_map(|index| self.graph.node(index).map(|n| n.id.clone()))
            .collect()
    }

    fn issues_of(&self, id: &Identifier) -> Vec<Issue> {
        self.graph
            .index_of(id)
            .and_then(|index| self.graph.node(index))
            .map(|node| node.issues.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::tree::Scope;
    use crate::graph::{DependencyEdge, DependencyNode};
    use crate::models::Severity;

    fn id(name: &str) -> Identifier {
        Identifier::new("NPM", "", name, "1.0.0")
    }

    fn project() -> Identifier {
        Identifier::new("NPM", "", "app", "0.1.0")
    }

    fn unresolved() -> Issue {
        Issue::new("NPM", "could not resolve version", Severity::Error)
    }

    /// app: compile -> a -> b -> c, a -> c; test -> d
    fn tree_navigator() -> TreeNavigator {
        let c = PackageReference::new(id("c"));
        let b = PackageReference::new(id("b")).with_dependencies(vec![c.clone()]);
        let a = PackageReference::new(id("a")).with_dependencies(vec![b, c]);
        let d = PackageReference::new(id("d")).with_issue(unresolved());
        TreeNavigator::new([Project {
            id: project(),
            scopes: vec![
                Scope {
                    name: "test".to_string(),
                    dependencies: vec![d],
                },
                Scope {
                    name: "compile".to_string(),
                    dependencies: vec![a],
                },
            ],
        }])
    }

    /// Same shape as [`tree_navigator`], plus a cycle c -> a.
    fn graph_navigator() -> GraphNavigator {
        let mut d = DependencyNode::new(id("d"));
        d.issues.push(unresolved());
        let nodes = vec![
            DependencyNode::new(id("a")),
            DependencyNode::new(id("b")),
            DependencyNode::new(id("c")),
            d,
        ];
        let edges = [(0, 1), (1, 2), (0, 2), (2, 0)]
            .into_iter()
            .map(|(from, to)| DependencyEdge { from, to })
            .collect();
        let scopes = [
            (ScopeRef::new(project(), "compile"), vec![0]),
            (ScopeRef::new(project(), "test"), vec![3]),
        ]
        .into_iter()
        .collect();
        GraphNavigator::new(Arc::new(DependencyGraph::new(nodes, edges, scopes).unwrap()))
    }

    fn navigators() -> Vec<Box<dyn DependencyNavigator>> {
        vec![Box::new(tree_navigator()), Box::new(graph_navigator())]
    }

    #[test]
    fn test_backings_agree_on_scopes() {
        for navigator in navigators() {
            let names: Vec<_> = navigator
                .scopes_of(&project())
                .into_iter()
                .map(|s| s.name)
                .collect();
            assert_eq!(names, vec!["compile", "test"]);
        }
    }

    #[test]
    fn test_backings_agree_on_dependencies() {
        for navigator in navigators() {
            let compile = ScopeRef::new(project(), "compile");
            assert_eq!(
                navigator.dependencies_of(&compile),
                vec![id("a"), id("b"), id("c")]
            );
        }
    }

    #[test]
    fn test_backings_agree_on_issues() {
        for navigator in navigators() {
            assert_eq!(navigator.issues_of(&id("d")), vec![unresolved()]);
            assert!(navigator.issues_of(&id("a")).is_empty());
        }
    }

    #[test]
    fn test_all_dependencies_of() {
        for navigator in navigators() {
            let all = navigator.all_dependencies_of(&project());
            assert_eq!(all.len(), 4);
        }
    }

    #[test]
    fn test_unknown_project_is_empty() {
        for navigator in navigators() {
            assert!(navigator.scopes_of(&id("nope")).is_empty());
            assert!(navigator
                .dependencies_of(&ScopeRef::new(id("nope"), "compile"))
                .is_empty());
        }
    }

    #[test]
    fn test_two_node_cycle_yields_each_once() {
        let nodes = vec![DependencyNode::new(id("a")), DependencyNode::new(id("b"))];
        let edges = vec![
            DependencyEdge { from: 0, to: 1 },
            DependencyEdge { from: 1, to: 0 },
        ];
        let scopes = [(ScopeRef::new(project(), "main"), vec![0])].into();
        let navigator =
            GraphNavigator::new(Arc::new(DependencyGraph::new(nodes, edges, scopes).unwrap()));

        let deps = navigator.dependencies_of(&ScopeRef::new(project(), "main"));
        assert_eq!(deps, vec![id("a"), id("b")]);
    }

    #[test]
    fn test_project_id_prefix_does_not_claim_scopes() {
        let short = Identifier::new("Debian", "", "libc", "2");
        let long = Identifier::new("Debian", "", "libc", "2:2.36");
        let scopes = [(ScopeRef::new(long.clone(), "main"), vec![0])].into();
        let graph = DependencyGraph::new(vec![DependencyNode::new(id("a"))], vec![], scopes).unwrap();
        let navigator = GraphNavigator::new(Arc::new(graph));

        assert!(navigator.scopes_of(&short).is_empty());
        assert!(navigator
            .dependencies_of(&ScopeRef::new(short, "main"))
            .is_empty());
        assert_eq!(navigator.scopes_of(&long), vec![ScopeRef::new(long, "main")]);
    }

    #[test]
    fn test_navigator_is_shareable_across_threads() {
        let navigator: Arc<dyn DependencyNavigator> = Arc::new(graph_navigator());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let navigator = Arc::clone(&navigator);
                std::thread::spawn(move || {
                    navigator.dependencies_of(&ScopeRef::new(project(), "compile"))
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap().len(), 3);
        }
    }
}
