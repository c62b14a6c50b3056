//! Track execution

use checkrun_common::{RunConfig, RunSummary, Track};

use crate::output::{print_summary, OutputFormat};

/// All cases passed
pub const EXIT_OK: i32 = 0;
/// At least one case failed
pub const EXIT_FAILED: i32 = 1;
/// The run could not start or finish
pub const EXIT_FATAL: i32 = 2;

pub fn exit_code(summary: &RunSummary) -> i32 {
    if summary.success() {
        EXIT_OK
    } else {
        EXIT_FAILED
    }
}

/// Run one track and print its summary
pub async fn execute(track: Track, config: &RunConfig, format: OutputFormat) -> anyhow::Result<i32> {
    tracing::info!("Starting {} run, artifacts in {}", track, config.artifacts_dir.display());

    let summary = match track {
        Track::Api => checkrun_api::run_api(config).await?,
        Track::Ui => checkrun_ui::run_ui(config).await?,
    };

    print_summary(&summary, format)?;
    Ok(exit_code(&summary))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(passed: usize, failed: usize) -> RunSummary {
        RunSummary {
            track: Track::Api,
            run_id: "run".into(),
            total: passed + failed,
            passed,
            failed,
            duration_ms: 0,
            records: Vec::new(),
            report_path: None,
            log_path: None,
        }
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_code(&summary(3, 0)), EXIT_OK);
        assert_eq!(exit_code(&summary(0, 0)), EXIT_OK);
        assert_eq!(exit_code(&summary(2, 1)), EXIT_FAILED);
    }
}
