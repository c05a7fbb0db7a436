//! # Reporting Unit Tests / 报告单元测试
//!
//! Console line formatting and HTML rendering of a replayed run.
//! 重放运行的控制台行格式化以及 HTML 渲染。

use chrono::{Local, TimeZone};
use suite_tally::core::events::TestRun;
use suite_tally::reporting::console::{
    collect_failures, format_node_line, format_progress, format_summary, tree_lines,
};
use suite_tally::reporting::html::{generate_html_report, render_html_report};
use suite_tally::core::counts::ResultCounts;
use tempfile::tempdir;

const LOG: &str = r#"{"event":"suite_started","name":"math"}
{"event":"test_started","name":"adds","parent":"math"}
{"event":"test_finished","name":"adds"}
{"event":"test_started","name":"divides","parent":"math"}
{"event":"test_failed","name":"divides","message":"expected <script>alert(1)</script>","details":"a & b","error":false}
{"event":"suite_finished","name":"math"}"#;

fn replayed() -> TestRun {
    colored::control::set_override(false);
    let (run, errors) = TestRun::replay("run", LOG);
    assert!(errors.is_empty());
    run
}

#[cfg(test)]
mod console_tests {
    use super::*;

    #[test]
    fn test_node_lines_are_indented_by_depth() {
        let run = replayed();
        let lines = tree_lines(run.tree(), false);
        assert_eq!(
            lines,
            vec![
                "run  F:1 P:1",
                "  math  F:1 P:1",
                "    adds  Passed",
                "    divides  Assertion failed",
            ]
        );
    }

    #[test]
    fn test_suites_only_hides_tests() {
        let run = replayed();
        let lines = tree_lines(run.tree(), true);
        assert_eq!(lines, vec!["run  F:1 P:1", "  math  F:1 P:1"]);
    }

    #[test]
    fn test_line_without_fragments_has_no_padding() {
        colored::control::set_override(false);
        let mut run = TestRun::new("run");
        run.apply_line(1, r#"{"event":"suite_started","name":"math"}"#).unwrap();
        run.apply_line(2, r#"{"event":"test_started","name":"adds","parent":"math"}"#).unwrap();
        let math = run.lookup("math").unwrap();
        assert_eq!(format_node_line(run.tree(), math), "  math");
    }

    #[test]
    fn test_collect_failures() {
        let run = replayed();
        let failures = collect_failures(run.tree());
        assert_eq!(failures, vec![run.lookup("divides").unwrap()]);
    }

    #[test]
    fn test_progress_line_shows_root_column() {
        let run = replayed();
        assert_eq!(format_progress(run.tree(), "en"), "[run] F:1 P:1");

        let live = TestRun::new("live");
        assert_eq!(format_progress(live.tree(), "en"), "[live] <NO TESTS>");
    }

    #[test]
    fn test_summary_line() {
        let run = replayed();
        let counts = ResultCounts::of(run.tree(), run.tree().root());
        assert_eq!(
            format_summary(&counts, "en"),
            "Total: 2, passed: 1, failed: 1, errors: 0, not run: 0"
        );
    }
}

#[cfg(test)]
mod html_tests {
    use super::*;

    #[test]
    fn test_html_contains_fragments_and_escapes_text() {
        let run = replayed();
        let generated_at = Local.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        let html = render_html_report(run.tree(), "en", generated_at).into_string();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<span class=\"fragment style-defect\">F:1 </span>"));
        assert!(html.contains("<span class=\"fragment style-passed\">P:1</span>"));
        assert!(html.contains("Assertion failed"));
        assert!(html.contains("expected &lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(html.contains("a &amp; b"));
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("2026-01-02 03:04:05"));
    }

    #[test]
    fn test_generate_html_report_writes_file() {
        let run = replayed();
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.html");

        generate_html_report(run.tree(), &path, "en").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("Test Results"));
        assert!(content.contains("divides"));
    }

    #[test]
    fn test_generate_html_report_bad_path() {
        let run = replayed();
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("report.html");
        assert!(generate_html_report(run.tree(), &path, "en").is_err());
    }
}
