//! Build-order graph for candidate projects.
//!
//! Models the constraints that a project must be built after its
//! dependencies and after its parent POM. Uses `petgraph` to perform
//! topological sorting; edges point from prerequisite to dependent.

use std::collections::{BTreeSet, HashMap};

use bod_core::artifact::ArtifactKey;
use bod_core::project::CandidateProject;
use bod_util::errors::BodError;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use tracing::debug;

/// A build graph over candidate projects, keyed by versionless identity.
pub struct DependencyGraph {
    graph: DiGraph<ArtifactKey, ()>,
    indices: HashMap<ArtifactKey, NodeIndex>,
    projects: HashMap<ArtifactKey, CandidateProject>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            indices: HashMap::new(),
            projects: HashMap::new(),
        }
    }

    /// Add a candidate project as a vertex.
    ///
    /// Two candidates with the same versionless key cannot both be built;
    /// this usually means version-range resolution produced more than one
    /// version of the same project.
    pub fn add_project(&mut self, project: CandidateProject) -> Result<(), BodError> {
        if self.indices.contains_key(&project.key) {
            return Err(BodError::DuplicateProject {
                key: project.key.to_string(),
            });
        }
        let idx = self.graph.add_node(project.key.clone());
        self.indices.insert(project.key.clone(), idx);
        self.projects.insert(project.key.clone(), project);
        Ok(())
    }

    /// Declare that `project` depends on `dependency`.
    ///
    /// Ignored when the dependency is not itself a candidate. A cycle here
    /// is bad input data: the candidate set genuinely contains circular
    /// dependencies.
    pub fn add_dependency_edge(
        &mut self,
        project: &ArtifactKey,
        dependency: &ArtifactKey,
    ) -> Result<(), BodError> {
        let (Some(&dep_idx), Some(&proj_idx)) =
            (self.indices.get(dependency), self.indices.get(project))
        else {
            return Ok(());
        };
        if self.creates_cycle(dep_idx, proj_idx) {
            return Err(BodError::CycleDetected {
                project: project.to_string(),
                dependency: dependency.to_string(),
                cycle: self.cycle_path(dep_idx, proj_idx),
            });
        }
        self.graph.add_edge(dep_idx, proj_idx, ());
        Ok(())
    }

    /// Declare that `project` must be built after its `parent` POM.
    ///
    /// A parent may also list the project among its own dependencies; the
    /// parent edge wins, so that dependency edge is removed first. After
    /// the removal no cycle can remain; one surfacing anyway is a defect
    /// in this graph builder, not bad user data.
    pub fn add_parent_edge(
        &mut self,
        project: &ArtifactKey,
        parent: &ArtifactKey,
    ) -> Result<(), BodError> {
        let (Some(&parent_idx), Some(&proj_idx)) =
            (self.indices.get(parent), self.indices.get(project))
        else {
            return Ok(());
        };
        if let Some(edge) = self.graph.find_edge(proj_idx, parent_idx) {
            debug!(%project, %parent, "dropping dependency edge in favour of parent edge");
            self.graph.remove_edge(edge);
        }
        if self.creates_cycle(parent_idx, proj_idx) {
            return Err(BodError::InternalInvariant {
                message: format!(
                    "cycle remained after replacing dependency edge with parent edge {parent} -> {project}"
                ),
            });
        }
        self.graph.add_edge(parent_idx, proj_idx, ());
        Ok(())
    }

    /// Whether adding edge `from -> to` would close a cycle, i.e. `from`
    /// is already reachable from `to`.
    fn creates_cycle(&self, from: NodeIndex, to: NodeIndex) -> bool {
        petgraph::algo::has_path_connecting(&self.graph, to, from, None)
    }

    /// Path `from -> ... -> to` rendered as keys, prefixed with `to` so the
    /// result reads as a closed cycle. Only called when such a path exists.
    fn cycle_path(&self, cycle_target: NodeIndex, start: NodeIndex) -> Vec<String> {
        let mut path = vec![self.graph[cycle_target].to_string()];
        let mut stack = vec![(start, vec![start])];
        let mut visited = std::collections::HashSet::new();
        while let Some((node, trail)) = stack.pop() {
            if node == cycle_target {
                path.extend(trail.iter().map(|&n| self.graph[n].to_string()));
                return path;
            }
            if !visited.insert(node) {
                continue;
            }
            for next in self.graph.neighbors(node) {
                let mut t = trail.clone();
                t.push(next);
                stack.push((next, t));
            }
        }
        path
    }

    /// Return candidate projects in build order (prerequisites first).
    ///
    /// Kahn's algorithm, always draining the lowest-index ready vertex.
    /// Node indices follow insertion order, so vertices without ordering
    /// constraints keep their insertion order.
    pub fn build_order(&self) -> Vec<CandidateProject> {
        let mut in_degree: Vec<usize> = self
            .graph
            .node_indices()
            .map(|idx| {
                self.graph
                    .neighbors_directed(idx, Direction::Incoming)
                    .count()
            })
            .collect();
        let mut ready: BTreeSet<NodeIndex> = self
            .graph
            .node_indices()
            .filter(|idx| in_degree[idx.index()] == 0)
            .collect();

        let mut ordered = Vec::with_capacity(self.graph.node_count());
        while let Some(&idx) = ready.iter().next() {
            ready.remove(&idx);
            if let Some(project) = self.projects.get(&self.graph[idx]) {
                ordered.push(project.clone());
            }
            for next in self.graph.neighbors(idx) {
                in_degree[next.index()] -= 1;
                if in_degree[next.index()] == 0 {
                    ready.insert(next);
                }
            }
        }
        ordered
    }
}

impl Default for DependencyGraph {
    fn default() -> Self {
        Self::new()
    }
}

/// Order candidate projects so that each is preceded by its dependencies
/// and its parent POM.
///
/// An empty candidate set yields an empty order. Dependency and parent
/// references outside the candidate set impose no constraint.
pub fn order_dependency_projects(
    projects: &[CandidateProject],
) -> miette::Result<Vec<CandidateProject>> {
    if projects.is_empty() {
        return Ok(Vec::new());
    }

    let mut graph = DependencyGraph::new();
    for project in projects {
        graph.add_project(project.clone())?;
    }
    for project in projects {
        for dependency in &project.dependencies {
            graph.add_dependency_edge(&project.key, dependency)?;
        }
    }
    for project in projects {
        if let Some(ref parent) = project.parent {
            graph.add_parent_edge(&project.key, parent)?;
        }
    }
    Ok(graph.build_order())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> ArtifactKey {
        ArtifactKey::parse(s).unwrap()
    }

    fn project(id: &str) -> CandidateProject {
        CandidateProject::new(key(id), "1.0")
    }

    fn project_with_deps(id: &str, deps: &[&str]) -> CandidateProject {
        let mut p = project(id);
        p.dependencies = deps.iter().map(|d| key(d)).collect();
        p
    }

    fn position(order: &[CandidateProject], id: &str) -> usize {
        let k = key(id);
        order.iter().position(|p| p.key == k).unwrap()
    }

    #[test]
    fn empty_input_yields_empty_order() {
        let order = order_dependency_projects(&[]).unwrap();
        assert!(order.is_empty());
    }

    #[test]
    fn unconstrained_projects_keep_insertion_order() {
        let projects = vec![project("g:a"), project("g:b"), project("g:c")];
        let order = order_dependency_projects(&projects).unwrap();
        let keys: Vec<_> = order.iter().map(|p| p.key.to_string()).collect();
        assert_eq!(keys, vec!["g:a", "g:b", "g:c"]);
    }

    #[test]
    fn freed_vertices_drain_in_insertion_order() {
        // g:tool waits on g:lib; once freed it sorts ahead of the
        // later-inserted g:z.
        let projects = vec![
            project_with_deps("g:tool", &["g:lib"]),
            project("g:a"),
            project("g:lib"),
            project("g:z"),
        ];
        let order = order_dependency_projects(&projects).unwrap();
        let keys: Vec<_> = order.iter().map(|p| p.key.to_string()).collect();
        assert_eq!(keys, vec!["g:a", "g:lib", "g:tool", "g:z"]);
    }

    #[test]
    fn dependencies_come_before_dependents() {
        let projects = vec![
            project_with_deps("g:app", &["g:lib", "g:util"]),
            project_with_deps("g:lib", &["g:util"]),
            project("g:util"),
        ];
        let order = order_dependency_projects(&projects).unwrap();
        assert!(position(&order, "g:util") < position(&order, "g:lib"));
        assert!(position(&order, "g:lib") < position(&order, "g:app"));
    }

    #[test]
    fn references_outside_candidate_set_are_ignored() {
        let mut p = project_with_deps("g:app", &["ext:lib"]);
        p.parent = Some(key("ext:parent"));
        let order = order_dependency_projects(&[p]).unwrap();
        assert_eq!(order.len(), 1);
        assert_eq!(order[0].key, key("g:app"));
    }

    #[test]
    fn duplicate_key_is_rejected() {
        let mut a = project("g:a");
        a.version = "1.0".into();
        let mut b = project("g:a");
        b.version = "2.0".into();
        let err = order_dependency_projects(&[a, b]).unwrap_err();
        assert!(err.to_string().contains("'g:a' is duplicated"));
    }

    #[test]
    fn parent_ordered_before_child() {
        let mut child = project("g:child");
        child.parent = Some(key("g:parent"));
        let projects = vec![child, project("g:parent")];
        let order = order_dependency_projects(&projects).unwrap();
        assert!(position(&order, "g:parent") < position(&order, "g:child"));
    }

    #[test]
    fn parent_edge_replaces_conflicting_dependency_edge() {
        // The parent lists the child among its own dependencies; the parent
        // edge must win without raising a cycle.
        let mut child = project("g:child");
        child.parent = Some(key("g:parent"));
        let parent = project_with_deps("g:parent", &["g:child"]);
        let order = order_dependency_projects(&[parent, child]).unwrap();
        assert!(position(&order, "g:parent") < position(&order, "g:child"));
    }

    #[test]
    fn dependency_cycle_is_reported_with_path() {
        let projects = vec![
            project_with_deps("g:a", &["g:b"]),
            project_with_deps("g:b", &["g:a"]),
        ];
        let err = order_dependency_projects(&projects).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Cycle detected with dependency:"));
        assert!(message.contains("Cycle:"));
        assert!(message.contains(" -> "));
    }

    #[test]
    fn self_dependency_is_a_cycle() {
        let projects = vec![project_with_deps("g:a", &["g:a"])];
        let err = order_dependency_projects(&projects).unwrap_err();
        assert!(err
            .to_string()
            .contains("Cycle detected with dependency: g:a of project: g:a"));
    }

    #[test]
    fn three_node_cycle_path_mentions_all_members() {
        let projects = vec![
            project_with_deps("g:a", &["g:c"]),
            project_with_deps("g:b", &["g:a"]),
            project_with_deps("g:c", &["g:b"]),
        ];
        let err = order_dependency_projects(&projects).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("g:a"));
        assert!(message.contains("g:b"));
        assert!(message.contains("g:c"));
    }
}
