use crate::model::{EntryResult, RunSummary, TestStatus};
use crate::report::{counts, StatusCounts};

fn status_label(status: TestStatus) -> &'static str {
    match status {
        TestStatus::Pass => "PASS",
        TestStatus::Fail => "FAIL",
        TestStatus::Error => "ERROR",
        TestStatus::Skipped => "SKIP",
    }
}

/// One result line. Deterministic, unit-testable.
#[must_use]
pub fn format_result_line(result: &EntryResult) -> String {
    format!(
        "  [{}] {} ({} ms) {}",
        status_label(result.status),
        result.name,
        result.duration_ms,
        result.message
    )
}

#[must_use]
pub fn format_totals_line(counts: &StatusCounts) -> String {
    format!(
        "Total: {}, passed: {}, failed: {}, errored: {}, skipped (unimplemented): {}",
        counts.total(),
        counts.passed,
        counts.failed,
        counts.errored,
        counts.skipped
    )
}

pub fn print_summary(summaries: &[RunSummary]) {
    for summary in summaries {
        println!("=== {} ({}) ===", summary.header, summary.prefix);
        if let Some(err) = &summary.mount_error {
            println!("  mount: {}", err);
        }
        for result in &summary.results {
            println!("{}", format_result_line(result));
            // Failed and Errored entries get their captured output so
            // operators can tell "system under test broken" from "harness
            // broken" without rerunning.
            if matches!(result.status, TestStatus::Fail | TestStatus::Error) {
                for line in &result.output {
                    println!("    | {}", line);
                }
            }
        }
        if let Some(err) = &summary.unmount_error {
            println!("  unmount: {}", err);
        }
        if summary.partial {
            println!("  !! run aborted; summary is partial");
        }
    }
    println!("{}", format_totals_line(&counts(summaries)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_line_carries_status_name_and_message() {
        let line = format_result_line(&EntryResult {
            name: "romio_testsuite".into(),
            status: TestStatus::Fail,
            exit_code: Some(3),
            output: vec!["2 tests failed".into()],
            message: "exit code 3".into(),
            duration_ms: 1200,
        });
        assert_eq!("  [FAIL] romio_testsuite (1200 ms) exit code 3", line);
    }

    #[test]
    fn totals_line_calls_out_unimplemented_skips() {
        let line = format_totals_line(&StatusCounts {
            passed: 1,
            failed: 0,
            errored: 1,
            skipped: 16,
        });
        assert!(line.contains("skipped (unimplemented): 16"));
        assert!(line.contains("Total: 18"));
    }
}
