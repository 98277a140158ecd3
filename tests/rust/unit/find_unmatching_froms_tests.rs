//! Scenario tests for `find_unmatching_froms`
//!
//! Four single-column tables, joined up (or not) in various shapes.

use std::collections::BTreeSet;

use cartesian_lint::linter::{find_unmatching_froms, find_unmatching_froms_from, LintError};
use cartesian_lint::query::{Expr, Joinable, Select, SourceRef, Subquery, Table};
use test_case::test_case;

struct Tables {
    a: Table,
    b: Table,
    c: Table,
    d: Table,
}

impl Tables {
    fn new() -> Self {
        Tables {
            a: Table::new("table_a", ["col_a"]),
            b: Table::new("table_b", ["col_b"]),
            c: Table::new("table_c", ["col_c"]),
            d: Table::new("table_d", ["col_d"]),
        }
    }

    fn get(&self, name: &str) -> &Table {
        match name {
            "table_a" => &self.a,
            "table_b" => &self.b,
            "table_c" => &self.c,
            "table_d" => &self.d,
            other => panic!("no fixture table named {}", other),
        }
    }
}

fn col(table: &Table) -> Expr {
    let name = table.columns()[0].clone();
    table.column(&name).unwrap()
}

fn names(sources: &[SourceRef]) -> BTreeSet<String> {
    sources.iter().map(|s| s.name().to_string()).collect()
}

fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn unmatched_from(query: &Select, start: &Table) -> (BTreeSet<String>, String) {
    let result = find_unmatching_froms_from(query, start).unwrap();
    let start = result.start().map(|s| s.name().to_string()).unwrap();
    (names(result.unmatched()), start)
}

fn everything_connected(t: &Tables) -> Select {
    Select::new()
        .all_from(&t.a)
        .select_from(t.a.join(&t.b, col(&t.a).equals(col(&t.b))))
        .select_from(&t.c)
        .select_from(&t.d)
        .where_(col(&t.d).equals(col(&t.b)))
        .where_(col(&t.c).equals(col(&t.d)))
        .where_(col(&t.c).equals(5))
}

#[test]
fn test_everything_is_connected_default_start() {
    let t = Tables::new();
    let result = find_unmatching_froms(&everything_connected(&t)).unwrap();
    assert!(result.is_connected());
    assert_eq!(result.start().map(|s| s.name()), Some("table_a"));
}

#[test_case("table_a")]
#[test_case("table_b")]
#[test_case("table_c")]
#[test_case("table_d")]
fn test_everything_is_connected_from(start: &str) {
    let t = Tables::new();
    let (unmatched, reported) = unmatched_from(&everything_connected(&t), t.get(start));
    assert!(unmatched.is_empty());
    assert_eq!(reported, start);
}

#[test_case("table_a", &["table_b"]; "from table_a")]
#[test_case("table_b", &["table_a"]; "from table_b")]
fn test_plain_cartesian(start: &str, expected: &[&str]) {
    let t = Tables::new();
    let query = Select::new()
        .all_from(&t.a)
        .where_(col(&t.b).equals(5));

    let (unmatched, reported) = unmatched_from(&query, t.get(start));
    assert_eq!(reported, start);
    assert_eq!(unmatched, set(expected));
}

#[test_case("table_a", &["table_c", "table_d"]; "from table_a")]
#[test_case("table_b", &["table_c", "table_d"]; "from table_b")]
#[test_case("table_c", &["table_a", "table_b"]; "from table_c")]
#[test_case("table_d", &["table_a", "table_b"]; "from table_d")]
fn test_disconnect_between_ab_cd(start: &str, expected: &[&str]) {
    let t = Tables::new();
    let query = Select::new()
        .all_from(&t.a)
        .select_from(t.a.join(&t.b, col(&t.a).equals(col(&t.b))))
        .select_from(&t.c)
        .select_from(&t.d)
        .where_(col(&t.c).equals(col(&t.d)))
        .where_(col(&t.c).equals(5));

    let (unmatched, reported) = unmatched_from(&query, t.get(start));
    assert_eq!(reported, start);
    assert_eq!(unmatched, set(expected));
}

#[test_case("table_a", &["table_c", "table_d"]; "from table_a")]
#[test_case("table_b", &["table_c", "table_d"]; "from table_b")]
#[test_case("table_c", &["table_a", "table_b", "table_d"]; "from table_c")]
#[test_case("table_d", &["table_a", "table_b", "table_c"]; "from table_d")]
fn test_c_and_d_both_disconnected(start: &str, expected: &[&str]) {
    let t = Tables::new();
    let query = Select::new()
        .all_from(&t.a)
        .select_from(t.a.join(&t.b, col(&t.a).equals(col(&t.b))))
        .where_(col(&t.c).equals(5))
        .where_(col(&t.d).equals(10));

    let (unmatched, reported) = unmatched_from(&query, t.get(start));
    assert_eq!(reported, start);
    assert_eq!(unmatched, set(expected));
}

#[test]
fn test_c_and_d_disconnected_in_canonical_order() {
    let t = Tables::new();
    let query = Select::new()
        .all_from(&t.a)
        .select_from(t.a.join(&t.b, col(&t.a).equals(col(&t.b))))
        .where_(col(&t.c).equals(5))
        .where_(col(&t.d).equals(10));

    let result = find_unmatching_froms(&query).unwrap();
    let ordered: Vec<&str> = result.unmatched().iter().map(|s| s.name()).collect();
    assert_eq!(ordered, vec!["table_c", "table_d"]);
}

#[test_case("table_a")]
#[test_case("table_b")]
#[test_case("table_c")]
#[test_case("table_d")]
fn test_now_connected(start: &str) {
    let t = Tables::new();
    let query = Select::new()
        .all_from(&t.a)
        .select_from(t.a.join(&t.b, col(&t.a).equals(col(&t.b))))
        .select_from(t.c.join(&t.d, col(&t.c).equals(col(&t.d))))
        .where_(col(&t.c).equals(col(&t.b)))
        .where_(col(&t.c).equals(5))
        .where_(col(&t.d).equals(10));

    assert!(find_unmatching_froms(&query).unwrap().is_connected());
    let (unmatched, _) = unmatched_from(&query, t.get(start));
    assert!(unmatched.is_empty());
}

fn a_b_subquery(t: &Tables) -> Subquery {
    Select::new()
        .all_from(&t.a)
        .where_(col(&t.a).equals(col(&t.b)))
        .subquery("subq")
}

#[test]
fn test_disconnected_subquery() {
    let t = Tables::new();
    let subq = a_b_subquery(&t);
    let stmt = Select::new().all_from(&t.c).select_from(&subq);

    let (unmatched, reported) = unmatched_from(&stmt, &t.c);
    assert_eq!(reported, "table_c");
    assert_eq!(unmatched, set(&["subq"]));

    let result = find_unmatching_froms_from(&stmt, &subq).unwrap();
    assert_eq!(result.start(), Some(&SourceRef::from(&subq)));
    assert_eq!(names(result.unmatched()), set(&["table_c"]));
}

#[test]
fn test_now_connect_it() {
    let t = Tables::new();
    let subq = a_b_subquery(&t);
    let stmt = Select::new()
        .all_from(&t.c)
        .select_from(&subq)
        .where_(col(&t.c).equals(subq.column("col_a").unwrap()));

    assert!(find_unmatching_froms(&stmt).unwrap().is_connected());
    assert!(find_unmatching_froms_from(&stmt, &t.c)
        .unwrap()
        .is_connected());
    assert!(find_unmatching_froms_from(&stmt, &subq)
        .unwrap()
        .is_connected());
}

fn right_nested(t: &Tables) -> Select {
    Select::new().all_from(&t.a).select_from(t.a.join(
        t.b.join(&t.c, col(&t.b).equals(col(&t.c))),
        col(&t.a).equals(col(&t.b)),
    ))
}

#[test_case("table_a")]
#[test_case("table_b")]
#[test_case("table_c")]
fn test_right_nested_join_without_issue(start: &str) {
    let t = Tables::new();
    let query = right_nested(&t);
    assert!(find_unmatching_froms(&query).unwrap().is_connected());
    let (unmatched, _) = unmatched_from(&query, t.get(start));
    assert!(unmatched.is_empty());
}

#[test_case("table_a", &["table_d"]; "from table_a")]
#[test_case("table_b", &["table_d"]; "from table_b")]
#[test_case("table_c", &["table_d"]; "from table_c")]
#[test_case("table_d", &["table_a", "table_b", "table_c"]; "from table_d")]
fn test_right_nested_join_with_an_issue(start: &str, expected: &[&str]) {
    let t = Tables::new();
    let query = right_nested(&t).where_(col(&t.d).equals(5));

    let (unmatched, reported) = unmatched_from(&query, t.get(start));
    assert_eq!(reported, start);
    assert_eq!(unmatched, set(expected));
}

#[test]
fn test_no_froms() {
    let query = Select::new().column(Expr::literal(1));
    let result = find_unmatching_froms(&query).unwrap();
    assert!(result.unmatched().is_empty());
    assert!(result.start().is_none());
}

#[test]
fn test_no_froms_keeps_given_start() {
    let t = Tables::new();
    let query = Select::new().column(Expr::literal(1));
    let result = find_unmatching_froms_from(&query, &t.a).unwrap();
    assert!(result.unmatched().is_empty());
    assert_eq!(result.start(), Some(&SourceRef::from(&t.a)));
}

#[test]
fn test_start_outside_froms_is_rejected() {
    let t = Tables::new();
    let query = Select::new()
        .all_from(&t.a)
        .where_(col(&t.b).equals(5));

    assert_eq!(
        find_unmatching_froms_from(&query, &t.d),
        Err(LintError::StartNotInFroms("table_d".to_string()))
    );
}

#[test]
fn test_alias_is_its_own_element() {
    let t = Tables::new();
    let a2 = t.a.alias("a2");
    let query = Select::new()
        .all_from(&t.a)
        .all_from(&a2)
        .where_(col(&t.a).equals(5));

    let result = find_unmatching_froms(&query).unwrap();
    assert_eq!(names(result.unmatched()), set(&["a2"]));
}

#[test]
fn test_or_group_connects_its_tables() {
    let t = Tables::new();
    let query = Select::new()
        .all_from(&t.a)
        .where_(
            col(&t.a)
                .equals(col(&t.b))
                .or(col(&t.a).equals(col(&t.c))),
        );

    assert!(find_unmatching_froms(&query).unwrap().is_connected());
}
