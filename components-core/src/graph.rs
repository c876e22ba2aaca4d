//! Component dependency graph.
//!
//! ## Edge Direction
//!
//! An edge `A → B` means "B depends on A": A must be built before B. For a
//! `component.yaml` in `B` listing `dependencies: [A]` we insert edge `A → B`.
//!
//! ## Construction
//!
//! [`DependencyGraph::build`] is all-or-nothing. Every registered component
//! becomes a node; every declared dependency must name a registered
//! component; the finished edge set must be acyclic. Any failure returns an
//! error and no graph. A built graph is never mutated afterwards.

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Bfs;
use petgraph::Direction;

use crate::error::ComponentError;
use crate::registry::Registry;
use crate::types::ComponentName;

/// An acyclic dependency graph over every registered component.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    graph: DiGraph<ComponentName, ()>,
    node_map: HashMap<ComponentName, NodeIndex>,
}

impl DependencyGraph {
    /// Build the graph from the registry, reading each component's config.
    pub fn build(registry: &Registry) -> Result<Self, ComponentError> {
        let mut declared = Vec::with_capacity(registry.len());
        for component in registry.list() {
            let config = registry.load_config(component)?;
            declared.push((component.clone(), config.dependencies));
        }
        Self::from_declared(registry.list(), declared)
    }

    /// Build the graph from an explicit node set and per-component dependency
    /// lists. Components missing from `declared` have no dependencies.
    pub fn from_declared<I>(components: &[ComponentName], declared: I) -> Result<Self, ComponentError>
    where
        I: IntoIterator<Item = (ComponentName, Vec<ComponentName>)>,
    {
        let mut graph = DiGraph::<ComponentName, ()>::with_capacity(components.len(), 0);
        let mut node_map = HashMap::with_capacity(components.len());
        for component in components {
            if node_map.contains_key(component) {
                continue;
            }
            let idx = graph.add_node(component.clone());
            node_map.insert(component.clone(), idx);
        }

        for (dependent, dependencies) in declared {
            let Some(&dependent_idx) = node_map.get(&dependent) else {
                return Err(ComponentError::UnknownComponent { name: dependent.0 });
            };
            for dependency in dependencies {
                let Some(&dependency_idx) = node_map.get(&dependency) else {
                    return Err(ComponentError::UnknownDependency {
                        component: dependent,
                        missing: dependency.0,
                    });
                };
                if !graph.contains_edge(dependency_idx, dependent_idx) {
                    graph.add_edge(dependency_idx, dependent_idx, ());
                }
            }
        }

        let built = Self { graph, node_map };
        let all: HashSet<NodeIndex> = built.graph.node_indices().collect();
        if let Some(cycle) = built.find_cycle(&all) {
            return Err(ComponentError::CyclicDependency { cycle });
        }

        tracing::debug!(
            nodes = built.node_count(),
            edges = built.edge_count(),
            "built component dependency graph"
        );
        Ok(built)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Every node, sorted by name.
    pub fn components(&self) -> Vec<ComponentName> {
        let mut names: Vec<ComponentName> = self.node_map.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn contains(&self, component: &ComponentName) -> bool {
        self.node_map.contains_key(component)
    }

    /// Whether `dependent` directly depends on `dependency` (edge `dependency → dependent`).
    pub fn has_edge(&self, dependency: &ComponentName, dependent: &ComponentName) -> bool {
        match (self.node_map.get(dependency), self.node_map.get(dependent)) {
            (Some(&from), Some(&to)) => self.graph.contains_edge(from, to),
            _ => false,
        }
    }

    /// Direct dependencies of `component`, sorted by name.
    pub fn dependencies_of(
        &self,
        component: &ComponentName,
    ) -> Result<Vec<ComponentName>, ComponentError> {
        let idx = self.index(component)?;
        let mut names: Vec<ComponentName> = self
            .graph
            .neighbors_directed(idx, Direction::Incoming)
            .map(|n| self.graph[n].clone())
            .collect();
        names.sort();
        names.dedup();
        Ok(names)
    }

    /// Everything that directly or transitively depends on `component`.
    ///
    /// Does not include `component` itself.
    pub fn descendants_of(
        &self,
        component: &ComponentName,
    ) -> Result<BTreeSet<ComponentName>, ComponentError> {
        let start = self.index(component)?;
        let mut descendants = BTreeSet::new();
        let mut bfs = Bfs::new(&self.graph, start);
        while let Some(node) = bfs.next(&self.graph) {
            if node != start {
                descendants.insert(self.graph[node].clone());
            }
        }
        Ok(descendants)
    }

    /// Order `subset` so that for every edge `A → B` inside the subset, A
    /// comes first.
    ///
    /// Kahn's algorithm over the induced subgraph. Ties are broken by name,
    /// so the result is deterministic. Fails with
    /// [`ComponentError::CyclicDependency`] if the subset cannot be ordered.
    pub fn topological_order<'a, I>(&self, subset: I) -> Result<Vec<ComponentName>, ComponentError>
    where
        I: IntoIterator<Item = &'a ComponentName>,
    {
        let mut members: HashSet<NodeIndex> = HashSet::new();
        for component in subset {
            members.insert(self.index(component)?);
        }

        let mut in_degree: HashMap<NodeIndex, usize> = members
            .iter()
            .map(|&idx| {
                let parents = self
                    .graph
                    .neighbors_directed(idx, Direction::Incoming)
                    .filter(|p| members.contains(p))
                    .count();
                (idx, parents)
            })
            .collect();

        let mut ready: BTreeSet<(ComponentName, NodeIndex)> = in_degree
            .iter()
            .filter(|(_, deg)| **deg == 0)
            .map(|(&idx, _)| (self.graph[idx].clone(), idx))
            .collect();

        let mut order = Vec::with_capacity(members.len());
        while let Some((name, idx)) = ready.pop_first() {
            order.push(name);
            for child in self.graph.neighbors_directed(idx, Direction::Outgoing) {
                if let Some(deg) = in_degree.get_mut(&child) {
                    *deg = deg.saturating_sub(1);
                    if *deg == 0 {
                        ready.insert((self.graph[child].clone(), child));
                    }
                }
            }
        }

        if order.len() < members.len() {
            let remaining: HashSet<NodeIndex> = in_degree
                .into_iter()
                .filter(|(_, deg)| *deg > 0)
                .map(|(idx, _)| idx)
                .collect();
            let cycle = self.find_cycle(&remaining).unwrap_or_else(|| {
                let mut names: Vec<_> = remaining.iter().map(|i| self.graph[*i].clone()).collect();
                names.sort();
                names
            });
            return Err(ComponentError::CyclicDependency { cycle });
        }
        Ok(order)
    }

    /// The components to rebuild after `component` changes, in build order.
    pub fn dependents_for(
        &self,
        component: &ComponentName,
    ) -> Result<Vec<ComponentName>, ComponentError> {
        let descendants = self.descendants_of(component)?;
        self.topological_order(&descendants)
    }

    fn index(&self, component: &ComponentName) -> Result<NodeIndex, ComponentError> {
        self.node_map
            .get(component)
            .copied()
            .ok_or_else(|| ComponentError::UnknownComponent {
                name: component.0.clone(),
            })
    }

    /// A cycle among `members`, as a closed path `a -> b -> ... -> a`.
    ///
    /// Strongly connected components of the induced subgraph with more than
    /// one node, or with a self-loop, hold the cycles. A self dependency comes
    /// back as `[a, a]`. When several cycles exist the one starting at the
    /// smallest name is reported.
    fn find_cycle(&self, members: &HashSet<NodeIndex>) -> Option<Vec<ComponentName>> {
        // Node weights of the induced graph are indices into `self.graph`.
        let induced: DiGraph<NodeIndex, ()> = self.graph.filter_map(
            |idx, _| members.contains(&idx).then_some(idx),
            |_, _| Some(()),
        );

        tarjan_scc(&induced)
            .into_iter()
            .filter(|scc| {
                scc.len() > 1 || scc.first().is_some_and(|n| induced.find_edge(*n, *n).is_some())
            })
            .map(|scc| self.cycle_within(&induced, &scc))
            .min()
    }

    /// Closed path through the smallest-named node of a cyclic `scc`.
    ///
    /// BFS inside the component from that node until an edge leads back to
    /// it, then walk the parent links.
    fn cycle_within(&self, induced: &DiGraph<NodeIndex, ()>, scc: &[NodeIndex]) -> Vec<ComponentName> {
        let name = |n: NodeIndex| self.graph[induced[n]].clone();
        let in_scc: HashSet<NodeIndex> = scc.iter().copied().collect();

        let mut sorted = scc.to_vec();
        sorted.sort_by_key(|n| name(*n));
        let Some(&start) = sorted.first() else {
            return Vec::new();
        };
        if induced.find_edge(start, start).is_some() {
            return vec![name(start), name(start)];
        }

        let mut parent: HashMap<NodeIndex, NodeIndex> = HashMap::new();
        let mut seen: HashSet<NodeIndex> = HashSet::from([start]);
        let mut queue: VecDeque<NodeIndex> = VecDeque::from([start]);
        while let Some(current) = queue.pop_front() {
            let mut next: Vec<NodeIndex> = induced
                .neighbors(current)
                .filter(|n| in_scc.contains(n))
                .collect();
            next.sort_by_key(|n| name(*n));
            for child in next {
                if child == start {
                    let mut path = vec![current];
                    let mut cursor = current;
                    while let Some(&p) = parent.get(&cursor) {
                        path.push(p);
                        cursor = p;
                    }
                    path.reverse();
                    let mut cycle: Vec<ComponentName> = path.into_iter().map(name).collect();
                    cycle.push(name(start));
                    return cycle;
                }
                if seen.insert(child) {
                    parent.insert(child, current);
                    queue.push_back(child);
                }
            }
        }

        // A strongly connected component always leads back to its start.
        sorted.into_iter().map(name).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<ComponentName> {
        list.iter().map(|n| ComponentName::from(*n)).collect()
    }

    fn graph(components: &[&str], deps: &[(&str, &[&str])]) -> Result<DependencyGraph, ComponentError> {
        DependencyGraph::from_declared(
            &names(components),
            deps.iter().map(|(c, d)| (ComponentName::from(*c), names(d))),
        )
    }

    #[test]
    fn every_component_is_a_node() {
        let g = graph(&["a", "b", "c"], &[]).expect("graph");
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn edges_point_from_dependency_to_dependent() {
        let g = graph(&["api", "shared"], &[("api", &["shared"])]).expect("graph");
        assert!(g.has_edge(&"shared".into(), &"api".into()));
        assert!(!g.has_edge(&"api".into(), &"shared".into()));
        assert_eq!(g.dependencies_of(&"api".into()).expect("deps"), names(&["shared"]));
    }

    #[test]
    fn duplicate_declarations_collapse() {
        let g = graph(&["a", "b"], &[("b", &["a", "a"])]).expect("graph");
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn self_dependency_is_a_cycle() {
        let err = graph(&["a"], &[("a", &["a"])]).unwrap_err();
        match err {
            ComponentError::CyclicDependency { cycle } => assert_eq!(cycle, names(&["a", "a"])),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn cycle_leaves_out_nodes_hanging_off_it() {
        let err = graph(
            &["a", "b", "c", "d"],
            &[("b", &["a"]), ("a", &["b"]), ("d", &["a"]), ("c", &["d"])],
        )
        .unwrap_err();
        match err {
            ComponentError::CyclicDependency { cycle } => assert_eq!(cycle, names(&["a", "b", "a"])),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn smallest_cycle_start_is_reported() {
        let err = graph(
            &["p", "q", "x", "y"],
            &[("x", &["y"]), ("y", &["x"]), ("q", &["p"]), ("p", &["q"])],
        )
        .unwrap_err();
        match err {
            ComponentError::CyclicDependency { cycle } => assert_eq!(cycle, names(&["p", "q", "p"])),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn descendants_follow_every_path_once() {
        let g = graph(
            &["base", "left", "right", "top"],
            &[("left", &["base"]), ("right", &["base"]), ("top", &["left", "right"])],
        )
        .expect("graph");
        let expected: BTreeSet<ComponentName> = names(&["left", "right", "top"]).into_iter().collect();
        assert_eq!(g.descendants_of(&"base".into()).expect("descendants"), expected);
        assert!(g.descendants_of(&"top".into()).expect("descendants").is_empty());
    }

    #[test]
    fn topological_order_breaks_ties_by_name() {
        let g = graph(&["c", "b", "a"], &[]).expect("graph");
        let all = g.components();
        assert_eq!(g.topological_order(&all).expect("order"), names(&["a", "b", "c"]));
    }

    #[test]
    fn topological_order_of_empty_subset_is_empty() {
        let g = graph(&["a"], &[]).expect("graph");
        let none: Vec<ComponentName> = Vec::new();
        assert!(g.topological_order(&none).expect("order").is_empty());
    }

    #[test]
    fn topological_order_rejects_unknown_members() {
        let g = graph(&["a"], &[]).expect("graph");
        let err = g.topological_order(&names(&["zzz"])).unwrap_err();
        assert!(matches!(err, ComponentError::UnknownComponent { .. }));
    }

    #[test]
    fn find_cycle_reports_closed_path() {
        // Bypass construction checks to exercise the defensive path.
        let mut g = graph(&["a", "b", "c"], &[("b", &["a"]), ("c", &["b"])]).expect("graph");
        let a = g.node_map[&ComponentName::from("a")];
        let c = g.node_map[&ComponentName::from("c")];
        g.graph.add_edge(c, a, ());

        let err = g.topological_order(&names(&["a", "b", "c"])).unwrap_err();
        match err {
            ComponentError::CyclicDependency { cycle } => {
                assert_eq!(cycle.first(), cycle.last());
                assert_eq!(cycle.len(), 4);
            }
            other => panic!("unexpected error: {other}"),
        }
        // A subset that avoids the closing edge still orders.
        assert_eq!(
            g.topological_order(&names(&["b", "c"])).expect("order"),
            names(&["b", "c"])
        );
    }
}
