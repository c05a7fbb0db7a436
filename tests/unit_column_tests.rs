//! # Results Column Unit Tests / 结果列单元测试
//!
//! Covers the presentation of single tests in each lifecycle state and the
//! aggregated `F:/E:/P:` presentation of suites.
//!
//! 覆盖单个测试在各生命周期状态下的展示，以及套件聚合后的 `F:/E:/P:` 展示。

mod common;

use common::*;
use suite_tally::core::column::{ResultsColumn, Style};
use suite_tally::core::tree::TestTree;

#[cfg(test)]
mod test_presentation_tests {
    use super::*;

    fn single_test() -> (TestTree, suite_tally::core::tree::NodeId) {
        let mut tree = TestTree::new("run");
        let root = tree.root();
        let test = tree.add_test(root, "test").unwrap();
        (tree, test)
    }

    #[test]
    fn test_not_run() {
        let (tree, test) = single_test();
        assert_eq!(render(&tree, test), vec![frag("Not run", Style::NotRun)]);
    }

    #[test]
    fn test_in_progress() {
        let (mut tree, test) = single_test();
        tree.start(test).unwrap();
        assert_eq!(render(&tree, test), vec![frag("Running...", Style::Running)]);
    }

    #[test]
    fn test_assertion_failure() {
        let (mut tree, test) = single_test();
        tree.start(test).unwrap();
        tree.fail(test, "", "", false).unwrap();
        assert_eq!(render(&tree, test), vec![frag("Assertion failed", Style::Defect)]);
    }

    #[test]
    fn test_error() {
        let (mut tree, test) = single_test();
        tree.start(test).unwrap();
        tree.fail(test, "", "", true).unwrap();
        assert_eq!(render(&tree, test), vec![frag("Error", Style::Defect)]);
    }

    #[test]
    fn test_passed() {
        let (mut tree, test) = single_test();
        tree.start(test).unwrap();
        tree.finish(test).unwrap();
        assert_eq!(render(&tree, test), vec![frag("Passed", Style::Passed)]);
    }

    #[test]
    fn test_terminated() {
        let (mut tree, test) = single_test();
        tree.start(test).unwrap();
        tree.terminate(test).unwrap();
        assert_eq!(render(&tree, test), vec![frag("Terminated", Style::Terminated)]);
    }

    #[test]
    fn test_failure_survives_finish() {
        let (mut tree, test) = single_test();
        tree.start(test).unwrap();
        tree.fail(test, "boom", "", false).unwrap();
        tree.finish(test).unwrap();
        assert_eq!(render(&tree, test), vec![frag("Assertion failed", Style::Defect)]);
    }
}

#[cfg(test)]
mod suite_presentation_tests {
    use super::*;

    #[test]
    fn test_suite_not_run() {
        let mut tree = TestTree::new("run");
        let root = tree.root();
        let suite = tree.add_suite(root, "suite").unwrap();
        assert_eq!(render(&tree, suite), vec![frag("<NO TESTS>", Style::Defect)]);
    }

    #[test]
    fn test_empty_suite_in_every_state() {
        let mut tree = TestTree::new("run");
        let root = tree.root();
        let suite = tree.add_suite(root, "suite").unwrap();
        let expected = vec![frag("<NO TESTS>", Style::Defect)];

        assert_eq!(render(&tree, suite), expected);
        tree.start(suite).unwrap();
        assert_eq!(render(&tree, suite), expected);
        tree.finish(suite).unwrap();
        assert_eq!(render(&tree, suite), expected);
    }

    #[test]
    fn test_suite_with_unresolved_children_is_empty() {
        let (mut tree, suite) = started_suite();
        let test = tree.add_test(suite, "test").unwrap();
        assert!(render(&tree, suite).is_empty());

        tree.start(test).unwrap();
        assert!(render(&tree, suite).is_empty());
    }

    #[test]
    fn test_suite_test_passed() {
        let (mut tree, suite) = started_suite();
        let test = tree.add_test(suite, "test").unwrap();
        assert!(render(&tree, suite).is_empty());

        tree.start(test).unwrap();
        tree.finish(test).unwrap();
        assert_eq!(render(&tree, suite), vec![frag("P:1", Style::Passed)]);
    }

    #[test]
    fn test_suite_test_failed() {
        let (mut tree, suite) = started_suite();
        let test = tree.add_test(suite, "test").unwrap();
        tree.start(test).unwrap();
        tree.fail(test, "", "", false).unwrap();
        assert_eq!(render(&tree, suite), vec![frag("F:1 ", Style::Defect)]);
    }

    #[test]
    fn test_suite_test_error() {
        let (mut tree, suite) = started_suite();
        let test = tree.add_test(suite, "test").unwrap();
        tree.start(test).unwrap();
        tree.fail(test, "", "", true).unwrap();
        assert_eq!(render(&tree, suite), vec![frag("E:1 ", Style::Defect)]);
    }

    #[test]
    fn test_suite_terminated_with_unresolved_child() {
        let (mut tree, suite) = started_suite();
        let test = tree.add_test(suite, "test").unwrap();
        tree.start(test).unwrap();
        tree.terminate(suite).unwrap();

        assert!(tree[suite].is_terminated());
        assert!(render(&tree, suite).is_empty());
    }

    #[test]
    fn test_suite_terminated_with_results() {
        let (mut tree, suite) = started_suite();
        add_passed(&mut tree, suite, "passed");
        add_failed(&mut tree, suite, "failed", false);
        add_failed(&mut tree, suite, "error", true);
        add_running(&mut tree, suite, "in-progress");
        tree.terminate(suite).unwrap();

        assert_eq!(
            render(&tree, suite),
            vec![
                frag("F:1 ", Style::Defect),
                frag("E:1 ", Style::Defect),
                frag("P:1", Style::Passed),
            ]
        );
    }

    #[test]
    fn test_order_is_independent_of_insertion_order() {
        let (mut tree, suite) = started_suite();
        add_running(&mut tree, suite, "in-progress");
        add_failed(&mut tree, suite, "error", true);
        add_passed(&mut tree, suite, "passed");
        add_failed(&mut tree, suite, "failed", false);

        assert_eq!(
            render(&tree, suite),
            vec![
                frag("F:1 ", Style::Defect),
                frag("E:1 ", Style::Defect),
                frag("P:1", Style::Passed),
            ]
        );
    }

    #[test]
    fn test_second_error_only_changes_error_count() {
        let (mut tree, suite) = started_suite();
        add_passed(&mut tree, suite, "passed");
        add_failed(&mut tree, suite, "failed", false);
        add_failed(&mut tree, suite, "error1", true);
        add_running(&mut tree, suite, "in-progress");
        let before = render(&tree, suite);

        add_failed(&mut tree, suite, "error2", true);
        let after = render(&tree, suite);

        assert_eq!(before[0], after[0]);
        assert_eq!(after[1], frag("E:2 ", Style::Defect));
        assert_eq!(before[2], after[2]);
    }

    #[test]
    fn test_suite_started_different_results() {
        let (mut tree, suite) = started_suite();
        for name in ["p1", "p2", "p3"] {
            add_passed(&mut tree, suite, name);
        }
        add_failed(&mut tree, suite, "f1", false);
        add_failed(&mut tree, suite, "e1", true);
        add_failed(&mut tree, suite, "e2", true);
        add_running(&mut tree, suite, "in-progress");

        assert_eq!(
            render(&tree, suite),
            vec![
                frag("F:1 ", Style::Defect),
                frag("E:2 ", Style::Defect),
                frag("P:3", Style::Passed),
            ]
        );
    }

    #[test]
    fn test_suite_passed_ignores_not_started_child() {
        let (mut tree, suite) = started_suite();
        add_passed(&mut tree, suite, "passed");
        tree.add_test(suite, "never-started").unwrap();
        tree.finish(suite).unwrap();

        assert_eq!(render(&tree, suite), vec![frag("P:1", Style::Passed)]);
    }

    #[test]
    fn test_suite_failed() {
        let (mut tree, suite) = started_suite();
        add_passed(&mut tree, suite, "passed");
        add_failed(&mut tree, suite, "failed", false);
        tree.finish(suite).unwrap();

        assert_eq!(
            render(&tree, suite),
            vec![frag("F:1 ", Style::Defect), frag("P:1", Style::Passed)]
        );
    }

    #[test]
    fn test_suite_error() {
        let (mut tree, suite) = started_suite();
        add_passed(&mut tree, suite, "passed");
        add_failed(&mut tree, suite, "error", true);
        tree.finish(suite).unwrap();

        assert_eq!(
            render(&tree, suite),
            vec![frag("E:1 ", Style::Defect), frag("P:1", Style::Passed)]
        );
    }

    #[test]
    fn test_nested_suites_are_counted_transitively() {
        let (mut tree, suite) = started_suite();
        let inner = tree.add_suite(suite, "inner").unwrap();
        tree.start(inner).unwrap();
        add_passed(&mut tree, inner, "deep-pass");
        add_failed(&mut tree, inner, "deep-fail", false);
        add_passed(&mut tree, suite, "shallow-pass");

        assert_eq!(
            render(&tree, suite),
            vec![frag("F:1 ", Style::Defect), frag("P:2", Style::Passed)]
        );
        assert_eq!(
            render(&tree, inner),
            vec![frag("F:1 ", Style::Defect), frag("P:1", Style::Passed)]
        );
    }

    #[test]
    fn test_presentation_is_idempotent() {
        let (mut tree, suite) = started_suite();
        add_passed(&mut tree, suite, "passed");
        add_failed(&mut tree, suite, "error", true);

        let first = render(&tree, suite);
        let second = render(&tree, suite);
        assert_eq!(first, second);
    }
}

#[cfg(test)]
mod column_helpers_tests {
    use super::*;

    #[test]
    fn test_title_and_plain_text() {
        let (mut tree, suite) = started_suite();
        add_passed(&mut tree, suite, "passed");
        add_failed(&mut tree, suite, "failed", false);

        assert_eq!(ResultsColumn.title(), "Results");
        assert_eq!(ResultsColumn.plain_text(&tree, suite), "F:1 P:1");
    }

    #[test]
    fn test_has_defects() {
        let (mut tree, suite) = started_suite();
        add_passed(&mut tree, suite, "passed");
        assert!(!ResultsColumn.has_defects(&tree, suite));

        add_failed(&mut tree, suite, "error", true);
        assert!(ResultsColumn.has_defects(&tree, suite));
    }

    #[test]
    fn test_empty_nested_suite_is_a_defect() {
        let (mut tree, suite) = started_suite();
        add_passed(&mut tree, suite, "passed");
        tree.add_suite(suite, "empty").unwrap();
        assert!(ResultsColumn.has_defects(&tree, suite));
    }

    #[test]
    fn test_style_names() {
        assert_eq!(Style::NotRun.as_str(), "not-run");
        assert_eq!(Style::Defect.as_str(), "defect");
        assert_eq!(Style::Terminated.as_str(), "terminated");
    }
}
