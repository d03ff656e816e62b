use std::collections::{BTreeMap, BTreeSet};

use crate::catalog::TableDef;
use crate::error::{Error, Result};

/// Order tables so every referenced table comes before its dependents.
///
/// Ties are broken alphabetically to keep the order deterministic. A cycle
/// yields `Error::InvalidDataset` naming the tables involved.
pub fn load_order(tables: &[TableDef]) -> Result<Vec<&'static str>> {
    let graph = build_adjacency(tables);
    toposort(&graph).map_err(|cycle| {
        Error::InvalidDataset(format!(
            "foreign key cycle between tables: {}",
            cycle.join(", ")
        ))
    })
}

/// Parent table -> dependent tables.
fn build_adjacency(tables: &[TableDef]) -> BTreeMap<&'static str, BTreeSet<&'static str>> {
    let mut graph: BTreeMap<&'static str, BTreeSet<&'static str>> = BTreeMap::new();

    for table in tables {
        graph.entry(table.name).or_default();
        for key in table.foreign_keys {
            if key.referenced_table == table.name {
                continue;
            }
            graph
                .entry(key.referenced_table)
                .or_default()
                .insert(table.name);
        }
    }

    graph
}

fn toposort(
    graph: &BTreeMap<&'static str, BTreeSet<&'static str>>,
) -> std::result::Result<Vec<&'static str>, Vec<&'static str>> {
    let mut indegree: BTreeMap<&'static str, usize> =
        graph.keys().map(|node| (*node, 0)).collect();

    for targets in graph.values() {
        for target in targets {
            *indegree.entry(*target).or_insert(0) += 1;
        }
    }

    let mut ready: BTreeSet<&'static str> = indegree
        .iter()
        .filter(|(_, count)| **count == 0)
        .map(|(node, _)| *node)
        .collect();

    let mut order = Vec::with_capacity(indegree.len());

    while let Some(node) = ready.pop_first() {
        order.push(node);

        if let Some(targets) = graph.get(node) {
            for target in targets {
                if let Some(count) = indegree.get_mut(target) {
                    *count = count.saturating_sub(1);
                    if *count == 0 {
                        ready.insert(*target);
                    }
                }
            }
        }
    }

    if order.len() == indegree.len() {
        Ok(order)
    } else {
        Err(indegree
            .into_iter()
            .filter(|(_, count)| *count > 0)
            .map(|(node, _)| node)
            .collect())
    }
}
