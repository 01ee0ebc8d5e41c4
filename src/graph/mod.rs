//! Dependency structures and the navigator contract over them.
//!
//! - [`tree`]: the legacy per-project form, scopes holding nested
//!   [`tree::PackageReference`] trees.
//! - [`DependencyGraph`]: the compact form shared by many projects, nodes in
//!   a flat array and edges by index. May contain cycles.
//! - [`navigator`]: [`navigator::DependencyNavigator`] and one
//!   implementation per form.

pub mod navigator;
pub mod tree;

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Identifier, Issue};

pub use navigator::{DependencyNavigator, GraphNavigator, ScopeRef, TreeNavigator};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("edge {from} -> {to} points outside the {len} graph nodes")]
    EdgeOutOfBounds { from: usize, to: usize, len: usize },

    #[error("scope '{scope}' has root index {index} outside the {len} graph nodes")]
    RootOutOfBounds {
        scope: ScopeRef,
        index: usize,
        len: usize,
    },

    #[error("scope '{scope}' is declared but has no root nodes")]
    EmptyScopeRoots { scope: ScopeRef },

    #[error("scope '{scope}' is declared more than once")]
    DuplicateScope { scope: ScopeRef },

    #[error("package '{id}' appears more than once in the node array")]
    DuplicateNode { id: Identifier },
}

/// One package in the compact graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyNode {
    pub id: Identifier,
    /// Problems found while building this node, e.g. an unresolvable version.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<Issue>,
}

impl DependencyNode {
    pub fn new(id: Identifier) -> Self {
        Self {
            id,
            issues: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyEdge {
    pub from: usize,
    pub to: usize,
}

/// A compact, validated dependency graph.
///
/// Scopes are keyed by project and scope name, so one graph can hold the
/// dependencies of many projects. Immutable once built, so it can be
/// shared between threads freely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDependencyGraph", into = "RawDependencyGraph")]
pub struct DependencyGraph {
    nodes: Vec<DependencyNode>,
    edges: Vec<DependencyEdge>,
    scopes: BTreeMap<ScopeRef, Vec<usize>>,
    adjacency: Vec<Vec<usize>>,
    index: HashMap<Identifier, usize>,
}

/// The file form: scopes as a list of `{project, name, roots}` entries.
#[derive(Serialize, Deserialize)]
struct RawDependencyGraph {
    nodes: Vec<DependencyNode>,
    #[serde(default)]
    edges: Vec<DependencyEdge>,
    #[serde(default)]
    scopes: Vec<RawScope>,
}

#[derive(Serialize, Deserialize)]
struct RawScope {
    project: Identifier,
    name: String,
    roots: Vec<usize>,
}

impl TryFrom<RawDependencyGraph> for DependencyGraph {
    type Error = GraphError;

    fn try_from(raw: RawDependencyGraph) -> Result<Self, Self::Error> {
        let mut scopes = BTreeMap::new();
        for scope in raw.scopes {
            let key = ScopeRef::new(scope.project, scope.name);
            if scopes.contains_key(&key) {
                return Err(GraphError::DuplicateScope { scope: key });
            }
            scopes.insert(key, scope.roots);
        }
        DependencyGraph::new(raw.nodes, raw.edges, scopes)
    }
}

impl From<DependencyGraph> for RawDependencyGraph {
    fn from(graph: DependencyGraph) -> Self {
        RawDependencyGraph {
            nodes: graph.nodes,
            edges: graph.edges,
            scopes: graph
                .scopes
                .into_iter()
                .map(|(scope, roots)| RawScope {
                    project: scope.project,
                    name: scope.name,
                    roots,
                })
                .collect(),
        }
    }
}

impl DependencyGraph {
    /// Validate and index a graph.
    ///
    /// Fails on duplicate node ids, on an edge or root index outside
    /// `nodes`, and on a declared scope without roots.
    pub fn new(
        nodes: Vec<DependencyNode>,
        edges: Vec<DependencyEdge>,
        scopes: BTreeMap<ScopeRef, Vec<usize>>,
    ) -> Result<Self, GraphError> {
        let len = nodes.len();

        let mut index = HashMap::with_capacity(len);
        for (position, node) in nodes.iter().enumerate() {
            if index.insert(node.id.clone(), position).is_some() {
                return Err(GraphError::DuplicateNode {
                    id: node.id.clone(),
                });
            }
        }

        let mut adjacency = vec![Vec::new(); len];
        for edge in &edges {
            if edge.from >= len || edge.to >= len {
                return Err(GraphError::EdgeOutOfBounds {
                    from: edge.from,
                    to: edge.to,
                    len,
                });
            }
            adjacency[edge.from].push(edge.to);
        }

        for (scope, roots) in &scopes {
            if roots.is_empty() {
                return Err(GraphError::EmptyScopeRoots {
                    scope: scope.clone(),
                });
            }
            if let Some(&root) = roots.iter().find(|&&i| i >= len) {
                return Err(GraphError::RootOutOfBounds {
                    scope: scope.clone(),
                    index: root,
                    len,
                });
            }
        }

        tracing::debug!(
            nodes = len,
            edges = edges.len(),
            scopes = scopes.len(),
            "built dependency graph"
        );

        Ok(Self {
            nodes,
            edges,
            scopes,
            adjacency,
            index,
        })
    }

    pub fn nodes(&self) -> &[DependencyNode] {
        &self.nodes
    }

    pub fn node(&self, index: usize) -> Option<&DependencyNode> {
        self.nodes.get(index)
    }

    pub fn edges(&self) -> &[DependencyEdge] {
        &self.edges
    }

    /// All declared scopes, sorted by project, then name.
    pub fn scopes(&self) -> impl Iterator<Item = &ScopeRef> {
        self.scopes.keys()
    }

    /// The scopes of `project`, sorted by name.
    pub fn scopes_of<'a>(&'a self, project: &'a Identifier) -> impl Iterator<Item = &'a ScopeRef> {
        self.scopes.keys().filter(move |scope| &scope.project == project)
    }

    pub fn roots(&self, scope: &ScopeRef) -> Option<&[usize]> {
        self.scopes.get(scope).map(Vec::as_slice)
    }

    pub fn successors(&self, index: usize) -> &[usize] {
        self.adjacency.get(index).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn index_of(&self, id: &Identifier) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Every node reachable from `roots`, roots included, in depth-first
    /// pre-order. Each node is visited once, so cycles terminate.
    pub fn reachable_from(&self, roots: &[usize]) -> Vec<usize> {
        let mut visited = vec![false; self.nodes.len()];
        let mut order = Vec::new();
        let mut stack: Vec<usize> = roots.iter().rev().copied().collect();

        while let Some(index) = stack.pop() {
            if index >= visited.len() || visited[index] {
                continue;
            }
            visited[index] = true;
            order.push(index);
            stack.extend(self.successors(index).iter().rev().copied());
        }

        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(name: &str) -> Identifier {
        Identifier::new("Maven", "org.example", name, "1.0")
    }

    fn nodes(names: &[&str]) -> Vec<DependencyNode> {
        names.iter().map(|n| DependencyNode::new(id(n))).collect()
    }

    fn edge(from: usize, to: usize) -> DependencyEdge {
        DependencyEdge { from, to }
    }

    fn project() -> Identifier {
        Identifier::new("Maven", "org.example", "app", "2.0")
    }

    fn scopes(entries: &[(&str, &[usize])]) -> BTreeMap<ScopeRef, Vec<usize>> {
        entries
            .iter()
            .map(|(name, roots)| (ScopeRef::new(project(), *name), roots.to_vec()))
            .collect()
    }

    #[test]
    fn test_rejects_dangling_edge() {
        let err = DependencyGraph::new(nodes(&["a", "b"]), vec![edge(0, 2)], BTreeMap::new())
            .unwrap_err();
        assert_eq!(
            err,
            GraphError::EdgeOutOfBounds {
                from: 0,
                to: 2,
                len: 2
            }
        );
    }

    #[test]
    fn test_rejects_dangling_root() {
        let err = DependencyGraph::new(nodes(&["a"]), vec![], scopes(&[("compile", &[0, 1])]))
            .unwrap_err();
        assert!(matches!(err, GraphError::RootOutOfBounds { index: 1, .. }));
    }

    #[test]
    fn test_rejects_scope_without_roots() {
        let err = DependencyGraph::new(nodes(&["a"]), vec![], scopes(&[("test", &[])]))
            .unwrap_err();
        assert!(matches!(err, GraphError::EmptyScopeRoots { .. }));
    }

    #[test]
    fn test_rejects_duplicate_nodes() {
        let err = DependencyGraph::new(nodes(&["a", "a"]), vec![], BTreeMap::new()).unwrap_err();
        assert!(matches!(err, GraphError::DuplicateNode { .. }));
    }

    #[test]
    fn test_reachable_from_terminates_on_cycle() {
        let graph = DependencyGraph::new(
            nodes(&["a", "b", "c"]),
            vec![edge(0, 1), edge(1, 0), edge(1, 2), edge(2, 2)],
            scopes(&[("compile", &[0])]),
        )
        .unwrap();
        assert_eq!(graph.reachable_from(&[0]), vec![0, 1, 2]);
    }

    #[test]
    fn test_deserialization_validates() {
        let json = r#"{
            "nodes": [{"id": "Maven:org.example:a:1.0"}],
            "edges": [{"from": 0, "to": 5}],
            "scopes": []
        }"#;
        let err = serde_json::from_str::<DependencyGraph>(json).unwrap_err();
        assert!(err.to_string().contains("outside"));
    }

    #[test]
    fn test_rejects_duplicate_scope_entries() {
        let json = r#"{
            "nodes": [{"id": "Maven:org.example:a:1.0"}],
            "scopes": [
                {"project": "Maven:org.example:app:2.0", "name": "compile", "roots": [0]},
                {"project": "Maven:org.example:app:2.0", "name": "compile", "roots": [0]}
            ]
        }"#;
        let err = serde_json::from_str::<DependencyGraph>(json).unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn test_scopes_of_matches_whole_project_id() {
        let short = Identifier::new("Debian", "", "libc", "2");
        let long = Identifier::new("Debian", "", "libc", "2:2.36");
        let graph = DependencyGraph::new(
            nodes(&["a"]),
            vec![],
            [(ScopeRef::new(long.clone(), "main"), vec![0])].into(),
        )
        .unwrap();

        assert_eq!(graph.scopes_of(&short).count(), 0);
        let names: Vec<_> = graph.scopes_of(&long).map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["main"]);
    }

    #[test]
    fn test_serde_round_trip_keeps_scopes() {
        let graph = DependencyGraph::new(
            nodes(&["a", "b"]),
            vec![edge(0, 1)],
            scopes(&[("compile", &[0]), ("test", &[1])]),
        )
        .unwrap();
        let json = serde_json::to_string(&graph).unwrap();
        let back: DependencyGraph = serde_json::from_str(&json).unwrap();
        assert_eq!(back, graph);
        assert_eq!(back.index_of(&id("b")), Some(1));
    }

    #[test]
    fn test_index_of() {
        let graph = DependencyGraph::new(nodes(&["a", "b", "c"]), vec![], BTreeMap::new()).unwrap();
        assert_eq!(graph.index_of(&id("c")), Some(2));
        assert_eq!(graph.index_of(&id("zzz")), None);
    }
}
