// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use budgetree::error::IntegrityError;
use budgetree::models::{CategoryRecord, Kind};
use budgetree::tree::{MAX_DEPTH, build_tree, collect_subtree_ids, flatten_tree, resolve_target};

fn cat(id: &str, parent: Option<&str>) -> CategoryRecord {
    CategoryRecord {
        id: id.into(),
        user_id: "u1".into(),
        name: format!("{} name", id),
        kind: Kind::Expense,
        color: Some("#ef4444".into()),
        parent_id: parent.map(Into::into),
    }
}

fn sorted(mut v: Vec<CategoryRecord>) -> Vec<CategoryRecord> {
    v.sort_by(|a, b| a.id.cmp(&b.id));
    v
}

/// Housing > (Rent, Utilities > Power), Food
fn household() -> Vec<CategoryRecord> {
    vec![
        cat("power", Some("utilities")),
        cat("housing", None),
        cat("food", None),
        cat("rent", Some("housing")),
        cat("utilities", Some("housing")),
    ]
}

#[test]
fn build_places_every_record_once() {
    let forest = build_tree(household());
    assert_eq!(forest.len(), 5);
    let roots: Vec<&str> = forest.roots().map(|r| r.id.as_str()).collect();
    assert_eq!(roots, ["housing", "food"]);
    let kids: Vec<&str> = forest.children_of("housing").map(|r| r.id.as_str()).collect();
    assert_eq!(kids, ["rent", "utilities"]);
    assert_eq!(forest.parent_of("power").unwrap().id, "utilities");
    assert!(forest.has_children("utilities"));
    assert!(!forest.has_children("power"));
}

#[test]
fn dangling_parent_becomes_root() {
    let forest = build_tree(vec![cat("a", None), cat("orphan", Some("gone"))]);
    let roots: Vec<&str> = forest.roots().map(|r| r.id.as_str()).collect();
    assert_eq!(roots, ["a", "orphan"]);
    assert!(forest.parent_of("orphan").is_none());
    let dangling: Vec<&str> = forest.dangling().map(|r| r.id.as_str()).collect();
    assert_eq!(dangling, ["orphan"]);
    // The stored reference is kept as-is
    assert_eq!(forest.get("orphan").unwrap().parent_id.as_deref(), Some("gone"));
}

#[test]
fn flatten_is_inverse_of_build() {
    let mut input = household();
    input.push(cat("orphan", Some("gone")));
    let flat = flatten_tree(&build_tree(input.clone())).unwrap();
    assert_eq!(sorted(flat), sorted(input));
}

#[test]
fn flatten_is_depth_first_and_deterministic() {
    let forest = build_tree(household());
    let ids: Vec<String> = flatten_tree(&forest)
        .unwrap()
        .into_iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(ids, ["housing", "rent", "utilities", "power", "food"]);
    assert_eq!(flatten_tree(&forest).unwrap(), flatten_tree(&forest).unwrap());
}

#[test]
fn flatten_rejects_cycles() {
    let forest = build_tree(vec![cat("root", None), cat("a", Some("b")), cat("b", Some("a"))]);
    assert!(matches!(
        flatten_tree(&forest),
        Err(IntegrityError::Cycle { .. })
    ));
}

#[test]
fn subtree_of_branch_and_leaf() {
    let records = vec![
        cat("p", None),
        cat("c1", Some("p")),
        cat("c2", Some("p")),
        cat("g1", Some("c1")),
        cat("other", None),
    ];
    let forest = build_tree(records);
    let ids = collect_subtree_ids("p", &forest).unwrap();
    assert_eq!(ids.len(), 4);
    assert!(ids.contains("g1"));
    assert!(!ids.contains("other"));

    let leaf = collect_subtree_ids("g1", &forest).unwrap();
    assert_eq!(leaf.len(), 1);
    assert!(leaf.contains("g1"));
}

#[test]
fn subtree_of_unknown_id_is_itself() {
    let forest = build_tree(household());
    let ids = collect_subtree_ids("nope", &forest).unwrap();
    assert_eq!(ids.into_iter().collect::<Vec<_>>(), ["nope"]);
}

#[test]
fn two_node_cycle_is_reported() {
    let forest = build_tree(vec![cat("a", Some("b")), cat("b", Some("a"))]);
    assert_eq!(forest.roots().count(), 0);
    assert!(matches!(
        collect_subtree_ids("a", &forest),
        Err(IntegrityError::Cycle { .. })
    ));
    assert!(forest.check_integrity().is_err());
}

#[test]
fn self_parent_is_a_cycle() {
    let forest = build_tree(vec![cat("a", Some("a"))]);
    assert_eq!(
        forest.check_integrity(),
        Err(IntegrityError::Cycle { id: "a".into() })
    );
}

fn chain(len: usize) -> Vec<CategoryRecord> {
    (0..len)
        .map(|i| {
            let parent = if i == 0 { None } else { Some(format!("n{}", i - 1)) };
            cat(&format!("n{}", i), parent.as_deref())
        })
        .collect()
}

#[test]
fn depth_limit_is_enforced() {
    let ok = build_tree(chain(MAX_DEPTH));
    assert!(ok.check_integrity().is_ok());
    assert_eq!(
        ok.depth_of(&format!("n{}", MAX_DEPTH - 1)).unwrap(),
        Some(MAX_DEPTH - 1)
    );

    let deep = build_tree(chain(MAX_DEPTH + 6));
    assert!(matches!(
        deep.check_integrity(),
        Err(IntegrityError::TooDeep { limit: MAX_DEPTH, .. })
    ));
    assert!(matches!(
        collect_subtree_ids("n0", &deep),
        Err(IntegrityError::TooDeep { .. })
    ));
}

#[test]
fn duplicate_ids_keep_last_record() {
    let mut renamed = cat("food", None);
    renamed.name = "Groceries".into();
    let forest = build_tree(vec![cat("food", None), renamed]);
    assert_eq!(forest.len(), 1);
    assert_eq!(forest.get("food").unwrap().name, "Groceries");
}

#[test]
fn nodes_nest_children() {
    let nodes = build_tree(household()).to_nodes().unwrap();
    assert_eq!(nodes.len(), 2);
    assert_eq!(nodes[0].record.id, "housing");
    assert_eq!(nodes[0].children.len(), 2);
    assert_eq!(nodes[0].children[1].children[0].record.id, "power");
    assert!(nodes[1].children.is_empty());
}

#[test]
fn path_lists_names_from_root() {
    let forest = build_tree(household());
    assert_eq!(
        forest.path_of("power").unwrap(),
        ["housing name", "utilities name", "power name"]
    );
}

#[test]
fn reparenting_under_descendant_is_caught() {
    let forest = build_tree(household());
    let mut moved = forest.get("housing").unwrap().clone();
    moved.parent_id = Some("power".into());
    let next = forest.with_record(moved);
    assert!(matches!(
        next.check_integrity(),
        Err(IntegrityError::Cycle { .. })
    ));
    // The source forest is untouched
    assert!(forest.check_integrity().is_ok());
    assert!(forest.parent_of("housing").is_none());
}

#[test]
fn removing_a_parent_promotes_children() {
    let forest = build_tree(household()).without("utilities");
    assert_eq!(forest.len(), 4);
    let roots: Vec<&str> = forest.roots().map(|r| r.id.as_str()).collect();
    assert_eq!(roots, ["power", "housing", "food"]);
}

#[test]
fn lineage_check_ignores_unrelated_cycles() {
    let mut records = household();
    records.push(cat("a", Some("b")));
    records.push(cat("b", Some("a")));
    let forest = build_tree(records);
    assert!(forest.check_integrity().is_err());

    let mut moved = forest.get("power").unwrap().clone();
    moved.parent_id = Some("housing".into());
    assert!(forest.with_record(moved).check_lineage("power").is_ok());

    let mut into_cycle = forest.get("food").unwrap().clone();
    into_cycle.parent_id = Some("a".into());
    assert_eq!(
        forest.with_record(into_cycle).check_lineage("food"),
        Err(IntegrityError::Cycle { id: "a".into() })
    );
}

#[test]
fn lineage_check_counts_the_moved_subtree() {
    // n0..n39 and a separate m0..m29 chain
    let mut records = chain(40);
    records.extend((0..30).map(|i| {
        let parent = if i == 0 { None } else { Some(format!("m{}", i - 1)) };
        cat(&format!("m{}", i), parent.as_deref())
    }));
    let forest = build_tree(records);
    assert!(forest.check_lineage("m0").is_ok());

    let mut moved = forest.get("m0").unwrap().clone();
    moved.parent_id = Some("n39".into());
    assert_eq!(
        forest.with_record(moved).check_lineage("m0"),
        Err(IntegrityError::TooDeep {
            id: format!("m{}", MAX_DEPTH - 40),
            limit: MAX_DEPTH
        })
    );
}

#[test]
fn long_cycle_fails_within_a_time_bound() {
    use std::sync::mpsc;
    use std::time::Duration;

    let (done, finished) = mpsc::channel();
    std::thread::spawn(move || {
        // n0 -> n1 -> ... -> n999 -> n0
        let records: Vec<CategoryRecord> = (0..1000)
            .map(|i| cat(&format!("n{}", i), Some(format!("n{}", (i + 1) % 1000).as_str())))
            .collect();
        let forest = build_tree(records);
        let outcome = (
            forest.check_integrity().is_err(),
            collect_subtree_ids("n0", &forest).is_err(),
            flatten_tree(&forest).is_err(),
            resolve_target("n500", &forest, None).is_err(),
        );
        let _ = done.send(outcome);
    });
    let outcome = finished
        .recv_timeout(Duration::from_secs(10))
        .expect("walks over a cyclic forest did not finish");
    assert_eq!(outcome, (true, true, true, true));
}
