// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use budgetree::commands::doctor;
use budgetree::models::Kind;
use budgetree::store;
use budgetree::tree::build_tree;
use common::{empty, household, run};
use rusqlite::params;

#[test]
fn subcategories_inherit_kind_and_link_to_parent() {
    let conn = household();
    let housing = store::find_category(&conn, "local", "Housing").unwrap();
    let power = store::find_category(&conn, "local", "Power").unwrap();
    assert_eq!(power.kind, Kind::Expense);
    assert_eq!(power.color, None);

    let forest = build_tree(store::list_categories(&conn, "local").unwrap());
    assert_eq!(
        forest.path_of(&power.id).unwrap(),
        ["Housing", "Utilities", "Power"]
    );
    assert_eq!(forest.children_of(&housing.id).count(), 2);
}

#[test]
fn colors_are_normalised() {
    let conn = household();
    let food = store::find_category(&conn, "local", "Food").unwrap();
    assert_eq!(food.color.as_deref(), Some("#3b82f6"));
    assert!(run(&conn, &["category", "add", "Bad", "--kind", "expense", "--color", "blue"]).is_err());
}

#[test]
fn top_level_needs_a_kind_and_children_must_match() {
    let conn = household();
    assert!(run(&conn, &["category", "add", "Misc"]).is_err());
    let err = run(
        &conn,
        &["category", "add", "Bonus", "--kind", "income", "--parent", "Housing"],
    )
    .unwrap_err();
    assert!(err.to_string().contains("subcategories must be too"));
}

#[test]
fn delete_refused_while_children_exist() {
    let conn = household();
    let err = run(&conn, &["category", "rm", "Utilities"]).unwrap_err();
    assert!(format!("{:#}", err).contains("child categor"));
    assert!(store::find_category(&conn, "local", "Utilities").is_ok());
}

#[test]
fn delete_refused_while_transactions_exist() {
    let conn = household();
    let err = run(&conn, &["category", "rm", "Power"]).unwrap_err();
    assert!(format!("{:#}", err).contains("transaction"));
}

#[test]
fn unused_leaf_can_be_deleted() {
    let conn = household();
    run(&conn, &["category", "add", "Water", "--parent", "Utilities"]).unwrap();
    let water = store::find_category(&conn, "local", "Water").unwrap();
    assert!(store::category_usage(&conn, "local", &water.id).unwrap().is_unused());
    run(&conn, &["category", "rm", "Water"]).unwrap();
    assert!(store::find_category(&conn, "local", "Water").is_err());
}

#[test]
fn moving_under_own_descendant_is_refused() {
    let conn = household();
    let err = run(&conn, &["category", "edit", "Housing", "--parent", "Power"]).unwrap_err();
    assert!(err.to_string().contains("own subcategories"));
    let housing = store::find_category(&conn, "local", "Housing").unwrap();
    assert_eq!(housing.parent_id, None);

    assert!(run(&conn, &["category", "edit", "Housing", "--parent", "Housing"]).is_err());
}

#[test]
fn edit_moves_renames_and_recolors() {
    let conn = household();
    run(&conn, &["category", "edit", "Power", "--parent", "Housing", "--rename", "Electricity"]).unwrap();
    let housing = store::find_category(&conn, "local", "Housing").unwrap();
    let moved = store::find_category(&conn, "local", "Electricity").unwrap();
    assert_eq!(moved.parent_id.as_deref(), Some(housing.id.as_str()));

    run(&conn, &["category", "edit", "Electricity", "--root", "--color", "#FACC15"]).unwrap();
    let moved = store::find_category(&conn, "local", "Electricity").unwrap();
    assert_eq!(moved.parent_id, None);
    assert_eq!(moved.color.as_deref(), Some("#facc15"));

    run(&conn, &["category", "edit", "Electricity", "--no-color"]).unwrap();
    let moved = store::find_category(&conn, "local", "Electricity").unwrap();
    assert_eq!(moved.color, None);
}

#[test]
fn categories_are_scoped_per_user() {
    let conn = household();
    budgetree::utils::set_current_user(&conn, "someone-else").unwrap();
    assert!(store::list_categories(&conn, "someone-else").unwrap().is_empty());
    run(&conn, &["category", "add", "Housing", "--kind", "expense"]).unwrap();
    assert_eq!(store::list_categories(&conn, "local").unwrap().len(), 6);
}

#[test]
fn doctor_is_quiet_on_clean_data() {
    let conn = household();
    assert!(doctor::diagnose(&conn).unwrap().is_empty());
}

#[test]
fn doctor_reports_cycles_and_dangling_parents() {
    let conn = empty();
    conn.execute_batch(
        r#"
        INSERT INTO categories(id,user_id,name,type,parent_id) VALUES
            ('a','local','Left','expense','b'),
            ('b','local','Right','expense','a'),
            ('c','local','Orphan','expense','gone'),
            ('d','local','Pay','income',NULL),
            ('e','local','Tips','expense','d');
        "#,
    )
    .unwrap();
    let rows = doctor::diagnose(&conn).unwrap();
    let issues: Vec<&str> = rows.iter().map(|r| r[0].as_str()).collect();
    assert!(issues.contains(&"category_cycle"));
    assert!(issues.contains(&"dangling_parent"));
    assert!(issues.contains(&"kind_mismatch"));
    assert!(rows.iter().any(|r| r[1] == "Orphan -> gone"));
}

#[test]
fn cyclic_data_fails_chart_instead_of_hanging() {
    let conn = empty();
    conn.execute_batch(
        r#"
        INSERT INTO accounts(id,user_id,name,type,currency) VALUES ('acct','local','Cash','cash','USD');
        INSERT INTO categories(id,user_id,name,type,parent_id) VALUES
            ('a','local','Left','expense','b'),
            ('b','local','Right','expense','a');
        "#,
    )
    .unwrap();
    conn.execute(
        "INSERT INTO transactions(id,user_id,account_id,category_id,amount,type,date) VALUES ('t1','local','acct',?1,'5','expense','2025-01-01')",
        params!["a"],
    )
    .unwrap();
    let err = run(&conn, &["report", "chart"]).unwrap_err();
    assert!(format!("{:#}", err).contains("Cycle"));
}

#[test]
fn names_repeat_across_branches_and_kinds() {
    let conn = household();
    run(&conn, &["category", "add", "Other", "--parent", "Housing"]).unwrap();
    run(&conn, &["category", "add", "Other", "--parent", "Food"]).unwrap();
    run(&conn, &["category", "add", "Food", "--kind", "income"]).unwrap();

    // Siblings still need distinct names
    assert!(run(&conn, &["category", "add", "Other", "--parent", "Housing"]).is_err());
    assert!(run(&conn, &["category", "add", "Rent/Extra", "--parent", "Housing"]).is_err());

    let err = store::find_category(&conn, "local", "Other").unwrap_err();
    assert!(err.to_string().contains("ambiguous"));
    assert!(err.to_string().contains("Housing/Other"));
    assert!(store::find_category(&conn, "local", "Food").is_err());

    let food = store::find_category(&conn, "local", "Food/Other").unwrap();
    let parent = store::find_category(&conn, "local", food.parent_id.as_deref().unwrap()).unwrap();
    assert_eq!(parent.kind, Kind::Expense);
    assert_eq!(parent.name, "Food");

    run(
        &conn,
        &["tx", "add", "--date", "2025-02-11", "--account", "Checking", "--category", "Housing/Other", "--amount", "12"],
    )
    .unwrap();
    let housing_other = store::find_category(&conn, "local", "Housing/Other").unwrap();
    let txs = store::list_transactions(&conn, "local").unwrap();
    assert_eq!(txs[0].category_id, housing_other.id);
}

#[test]
fn move_succeeds_despite_unrelated_cycle() {
    let conn = household();
    conn.execute_batch(
        r#"
        INSERT INTO categories(id,user_id,name,type,parent_id) VALUES
            ('a','local','Left','expense','b'),
            ('b','local','Right','expense','a');
        "#,
    )
    .unwrap();
    run(&conn, &["category", "edit", "Power", "--parent", "Housing"]).unwrap();
    let housing = store::find_category(&conn, "local", "Housing").unwrap();
    let power = store::find_category(&conn, "local", "Housing/Power").unwrap();
    assert_eq!(power.parent_id.as_deref(), Some(housing.id.as_str()));

    let err = run(&conn, &["category", "edit", "Power", "--parent", "Left"]).unwrap_err();
    assert!(err.to_string().contains("lineage has a cycle"));

    // The broken rows can still be repaired by name
    run(&conn, &["category", "edit", "Left", "--root"]).unwrap();
    assert!(doctor::diagnose(&conn).unwrap().is_empty());
}
