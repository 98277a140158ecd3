//! Property tests for reachability over generated FROM lists
//!
//! Each case builds `n` single-column tables, lists them all in the FROM
//! clause and links pairs of them with WHERE equality predicates.

use std::collections::BTreeSet;

use cartesian_lint::linter::{build_graph, components, find_unmatching_froms_from};
use cartesian_lint::query::{Select, Table};
use proptest::prelude::*;

fn tables(n: usize) -> Vec<Table> {
    (0..n)
        .map(|i| Table::new(format!("t{}", i), ["id"]))
        .collect()
}

fn query(tables: &[Table], edges: &[(usize, usize)]) -> Select {
    let mut select = Select::new();
    for table in tables {
        select = select.all_from(table);
    }
    for (x, y) in edges {
        let lhs = tables[*x].column("id").unwrap();
        let rhs = tables[*y].column("id").unwrap();
        select = select.where_(lhs.equals(rhs));
    }
    select
}

fn unmatched(query: &Select, start: &Table) -> BTreeSet<String> {
    find_unmatching_froms_from(query, start)
        .unwrap()
        .unmatched()
        .iter()
        .map(|s| s.name().to_string())
        .collect()
}

fn reachable(query: &Select, tables: &[Table], start: &Table) -> BTreeSet<String> {
    let missing = unmatched(query, start);
    tables
        .iter()
        .map(|t| t.name().to_string())
        .filter(|name| !missing.contains(name))
        .collect()
}

fn graph_case() -> impl Strategy<Value = (usize, Vec<(usize, usize)>)> {
    (1usize..8).prop_flat_map(|n| {
        let edges = prop::collection::vec((0..n, 0..n), 0..12);
        (Just(n), edges)
    })
}

proptest! {
    #[test]
    fn no_edges_leaves_everything_else_unmatched(n in 1usize..8) {
        let tables = tables(n);
        let query = query(&tables, &[]);
        for start in &tables {
            let missing = unmatched(&query, start);
            prop_assert_eq!(missing.len(), n - 1);
            prop_assert!(!missing.contains(start.name()));
        }
    }

    #[test]
    fn chain_of_edges_connects_everything(n in 1usize..8) {
        let tables = tables(n);
        let edges: Vec<(usize, usize)> = (1..n).map(|i| (i - 1, i)).collect();
        let query = query(&tables, &edges);
        for start in &tables {
            prop_assert!(unmatched(&query, start).is_empty());
        }
    }

    #[test]
    fn reachability_is_symmetric((n, edges) in graph_case()) {
        let tables = tables(n);
        let query = query(&tables, &edges);
        for x in &tables {
            let from_x = unmatched(&query, x);
            for y in &tables {
                let from_y = unmatched(&query, y);
                prop_assert_eq!(
                    from_x.contains(y.name()),
                    from_y.contains(x.name())
                );
            }
        }
    }

    #[test]
    fn analysis_is_repeatable((n, edges) in graph_case()) {
        let tables = tables(n);
        let query = query(&tables, &edges);
        for start in &tables {
            let first = find_unmatching_froms_from(&query, start).unwrap();
            let second = find_unmatching_froms_from(&query, start).unwrap();
            prop_assert_eq!(first, second);
        }
    }

    #[test]
    fn reachability_is_transitive((n, edges) in graph_case()) {
        let tables = tables(n);
        let query = query(&tables, &edges);
        for x in &tables {
            let from_x = reachable(&query, &tables, x);
            for y in tables.iter().filter(|t| from_x.contains(t.name())) {
                prop_assert_eq!(&reachable(&query, &tables, y), &from_x);
            }
        }
    }

    #[test]
    fn components_partition_the_froms((n, edges) in graph_case()) {
        let tables = tables(n);
        let query = query(&tables, &edges);
        let parts = components(&build_graph(&query));

        let mut seen = BTreeSet::new();
        for part in &parts {
            for source in part {
                prop_assert!(seen.insert(source.name().to_string()));
            }
        }
        prop_assert_eq!(seen.len(), n);

        for part in &parts {
            let first = tables.iter().find(|t| t.name() == part[0].name()).unwrap();
            let expected: BTreeSet<String> =
                part.iter().map(|s| s.name().to_string()).collect();
            prop_assert_eq!(reachable(&query, &tables, first), expected);
        }
    }
}
