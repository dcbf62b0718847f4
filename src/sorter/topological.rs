use crate::error::{DdlSortError, DdlSortResult};
use crate::types::DependencyGraph;
use std::collections::VecDeque;
use tracing::{debug, error, info};

/// Kahn's algorithm over a [`DependencyGraph`]
#[derive(Debug, Default)]
pub struct TopologicalSorter;

impl TopologicalSorter {
    pub fn new() -> Self {
        Self
    }

    /// Order every table in the graph so that each parent precedes its dependents.
    ///
    /// The graph is consumed: its in-degree counts are drained while sorting.
    /// Tables that become ready at the same time keep their source order.
    pub fn sort(&self, graph: DependencyGraph) -> DdlSortResult<Vec<String>> {
        let seed = graph.seed_order();
        let DependencyGraph {
            graph: edges,
            mut in_degree,
            ..
        } = graph;

        let mut queue: VecDeque<String> = seed
            .into_iter()
            .filter(|table| in_degree.get(table).copied() == Some(0))
            .collect();
        debug!("Seeded sort queue with {} independent tables", queue.len());

        let mut sorted = Vec::with_capacity(edges.len());
        while let Some(table) = queue.pop_front() {
            if let Some(dependents) = edges.get(&table) {
                for dependent in dependents {
                    if let Some(count) = in_degree.get_mut(dependent) {
                        if *count > 0 {
                            *count -= 1;
                            if *count == 0 {
                                queue.push_back(dependent.clone());
                            }
                        }
                    }
                }
            }
            sorted.push(table);
        }

        if sorted.len() != edges.len() {
            let unresolved: Vec<String> = in_degree
                .into_iter()
                .filter(|(_, count)| *count > 0)
                .map(|(table, _)| table)
                .collect();
            error!(
                "Cycle detected: {} of {} tables could not be ordered",
                edges.len() - sorted.len(),
                edges.len()
            );
            return Err(DdlSortError::cycle(unresolved));
        }

        info!("Sorted {} tables", sorted.len());
        Ok(sorted)
    }
}
