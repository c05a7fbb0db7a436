// Shared test helpers for integration tests
#![allow(dead_code)]

use suite_tally::core::column::{Fragment, ResultsColumn, Style};
use suite_tally::core::tree::{NodeId, TestTree};

/// A started suite with no children yet, under a fresh tree root.
pub fn started_suite() -> (TestTree, NodeId) {
    let mut tree = TestTree::new("run");
    let root = tree.root();
    let suite = tree.add_suite(root, "suite").unwrap();
    tree.start(suite).unwrap();
    (tree, suite)
}

pub fn add_passed(tree: &mut TestTree, parent: NodeId, name: &str) -> NodeId {
    let id = tree.add_test(parent, name).unwrap();
    tree.start(id).unwrap();
    tree.finish(id).unwrap();
    id
}

pub fn add_failed(tree: &mut TestTree, parent: NodeId, name: &str, is_error: bool) -> NodeId {
    let id = tree.add_test(parent, name).unwrap();
    tree.start(id).unwrap();
    tree.fail(id, "", "", is_error).unwrap();
    tree.finish(id).unwrap();
    id
}

pub fn add_running(tree: &mut TestTree, parent: NodeId, name: &str) -> NodeId {
    let id = tree.add_test(parent, name).unwrap();
    tree.start(id).unwrap();
    id
}

pub fn render(tree: &TestTree, id: NodeId) -> Vec<Fragment> {
    ResultsColumn.present(tree, id)
}

pub fn frag(text: &str, style: Style) -> Fragment {
    Fragment::new(text, style)
}
