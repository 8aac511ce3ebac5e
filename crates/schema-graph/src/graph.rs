use crate::error::{Result, SchemaGraphError};
use crate::types::DependencyMap;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Dfs;
use petgraph::Direction;
use std::collections::{HashMap, HashSet};

/// Directed schema reference graph; an edge `A → B` means A references B
#[derive(Debug, Clone, Default)]
pub struct SchemaGraph {
    graph: DiGraph<String, ()>,
    index: HashMap<String, NodeIndex>,
}

impl SchemaGraph {
    pub fn from_dependencies(dependencies: &DependencyMap) -> Self {
        let mut graph = Self::default();
        for name in dependencies.keys() {
            graph.ensure_node(name);
        }
        for (from, targets) in dependencies {
            let from = graph.ensure_node(from);
            for target in targets {
                let to = graph.ensure_node(target);
                graph.graph.update_edge(from, to, ());
            }
        }
        log::debug!(
            "schema graph: {} nodes, {} edges",
            graph.graph.node_count(),
            graph.graph.edge_count()
        );
        graph
    }

    fn ensure_node(&mut self, name: &str) -> NodeIndex {
        if let Some(&idx) = self.index.get(name) {
            return idx;
        }
        let idx = self.graph.add_node(name.to_string());
        self.index.insert(name.to_string(), idx);
        idx
    }

    fn node(&self, name: &str) -> Result<NodeIndex> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| SchemaGraphError::SchemaNotFound(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Schemas `name` references directly, sorted
    pub fn dependencies(&self, name: &str) -> Result<Vec<String>> {
        Ok(self.neighbors(self.node(name)?, Direction::Outgoing))
    }

    /// Schemas that reference `name` directly, sorted
    pub fn dependents(&self, name: &str) -> Result<Vec<String>> {
        Ok(self.neighbors(self.node(name)?, Direction::Incoming))
    }

    /// Everything reachable from `name`, excluding itself unless on a cycle
    pub fn transitive_dependencies(&self, name: &str) -> Result<Vec<String>> {
        let start = self.node(name)?;
        let mut dfs = Dfs::new(&self.graph, start);
        let mut visited = HashSet::new();
        while let Some(idx) = dfs.next(&self.graph) {
            visited.insert(idx);
        }
        let on_cycle = self
            .graph
            .neighbors_directed(start, Direction::Incoming)
            .any(|src| visited.contains(&src));
        let mut reached: Vec<String> = visited
            .into_iter()
            .filter(|&idx| idx != start || on_cycle)
            .map(|idx| self.graph[idx].clone())
            .collect();
        reached.sort();
        Ok(reached)
    }

    /// Number of schemas referencing `name`
    pub fn reference_count(&self, name: &str) -> usize {
        self.index.get(name).map_or(0, |&idx| {
            self.graph
                .neighbors_directed(idx, Direction::Incoming)
                .count()
        })
    }

    /// Schemas with at least one referrer, most referenced first
    pub fn most_referenced(&self, limit: usize) -> Vec<(String, usize)> {
        let mut counts: Vec<(String, usize)> = self
            .graph
            .node_indices()
            .map(|idx| {
                let count = self
                    .graph
                    .neighbors_directed(idx, Direction::Incoming)
                    .count();
                (self.graph[idx].clone(), count)
            })
            .filter(|(_, count)| *count > 0)
            .collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        counts.truncate(limit);
        counts
    }

    /// Strongly connected groups of two or more schemas, each sorted
    pub fn cycles(&self) -> Vec<Vec<String>> {
        let mut groups: Vec<Vec<String>> = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|component| component.len() > 1)
            .map(|component| {
                let mut names: Vec<String> = component
                    .into_iter()
                    .map(|idx| self.graph[idx].clone())
                    .collect();
                names.sort();
                names
            })
            .collect();
        groups.sort();
        groups
    }

    fn neighbors(&self, idx: NodeIndex, direction: Direction) -> Vec<String> {
        let mut names: Vec<String> = self
            .graph
            .neighbors_directed(idx, direction)
            .map(|n| self.graph[n].clone())
            .collect();
        names.sort();
        names.dedup();
        names
    }
}
