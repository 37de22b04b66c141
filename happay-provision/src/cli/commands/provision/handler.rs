//! Provision command handler: load the sheet, then map, send and report each row in turn

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::{DEFAULT_INPUT_FILE, ProvisionArgs};
use crate::api::ProvisioningClient;
use crate::config::Config;
use crate::input::{self, LoadError, Row};
use crate::mapping::RecordMapper;
use crate::report::{self, RowResult, RunReport};

/// Handle the provision command with configuration from file and environment
pub async fn handle_provision_command(args: ProvisionArgs) -> Result<RunReport> {
    if args.no_color {
        colored::control::set_override(false);
    }

    let config = Config::load(args.config.as_deref())?;
    log::debug!("Using {:?}", config);

    run(&config, &args).await
}

/// Run one provisioning pass
///
/// File-level problems (unsupported extension, unreadable sheet) are errors and
/// stop the run before any call is made. A missing file is reported and yields
/// an empty report. Row-level failures are recorded and the run continues.
pub async fn run(config: &Config, args: &ProvisionArgs) -> Result<RunReport> {
    if !args.dry_run {
        config.require_token()?;
    }

    let path = resolve_input_path(args.file.as_deref());

    let rows = match input::load_rows(&path) {
        Ok(rows) => rows,
        Err(LoadError::MissingFile { path }) => {
            report::print_missing_file(&path);
            return Ok(RunReport::default());
        }
        Err(e) => return Err(e.into()),
    };

    let mapper = RecordMapper::new(config.email_domain.as_str());

    if args.dry_run {
        print_payloads(&rows, &mapper)?;
        return Ok(RunReport::default());
    }

    let client = ProvisioningClient::new(
        config.endpoint.as_str(),
        config.require_token()?,
        config.timeout,
    )?;
    log::info!("Provisioning {} rows against {}", rows.len(), client.endpoint());

    let report = provision_rows(&rows, &mapper, &client).await;
    report::print_summary(&report);

    if let Some(report_path) = &args.report {
        report::write_csv_report(&report, report_path)?;
    }

    Ok(report)
}

/// Send rows one at a time, in file order
async fn provision_rows(
    rows: &[Row],
    mapper: &RecordMapper,
    client: &ProvisioningClient,
) -> RunReport {
    let mut run_report = RunReport::default();

    for row in rows {
        let request = mapper.map(row);
        report::print_progress(&request);

        let outcome = client.provision(&request).await;
        report::print_outcome(&outcome);

        if !outcome.is_success() {
            log::warn!("Line {}: {} ({})", row.line, outcome.label(), request.email_id);
        }

        run_report.push(RowResult::new(row.line, &request, outcome));
    }

    run_report
}

fn print_payloads(rows: &[Row], mapper: &RecordMapper) -> Result<()> {
    for row in rows {
        let request = mapper.map(row);
        report::print_progress(&request);
        let payload =
            serde_json::to_string_pretty(&request).context("Failed to format request payload")?;
        println!("{}", payload);
    }
    println!("Dry run: {} payloads built, nothing sent", rows.len());
    Ok(())
}

/// Use the given path, or `sample_file.csv` in the working directory when none is given
fn resolve_input_path(file: Option<&Path>) -> PathBuf {
    match file {
        Some(path) if !path.as_os_str().is_empty() => path.to_path_buf(),
        _ => {
            let path = std::env::current_dir()
                .map(|dir| dir.join(DEFAULT_INPUT_FILE))
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_INPUT_FILE));
            report::print_default_path(&path);
            path
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ProvisionOutcome;
    use httpmock::prelude::*;
    use serde_json::json;
    use std::fs;

    const PATH: &str = "/auth/v1/cards/add_user/";

    fn config_for(endpoint: String) -> Config {
        Config {
            api_token: Some("test-token".to_string()),
            endpoint,
            ..Default::default()
        }
    }

    fn args_for(file: PathBuf) -> ProvisionArgs {
        ProvisionArgs {
            file: Some(file),
            no_color: true,
            ..Default::default()
        }
    }

    fn write_input(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[tokio::test]
    async fn test_failed_row_does_not_stop_the_run() {
        let server = MockServer::start_async().await;
        let rejected = server
            .mock_async(|when, then| {
                when.method(Method::POST)
                    .path(PATH)
                    .body_includes("\"firstName\":\"Asha\"");
                then.status(500).body("internal error");
            })
            .await;
        let accepted = server
            .mock_async(|when, then| {
                when.method(Method::POST)
                    .path(PATH)
                    .header("authorization", "Bearer test-token")
                    .body_includes("\"firstName\":\"Vikram\"")
                    .body_includes("\"emailId\":\"vikram.shah@happay.in\"")
                    .body_includes("\"title\":\"Mr.\"");
                then.status(200).json_body(json!({"userId": "abc123"}));
            })
            .await;

        let dir = tempfile::tempdir().unwrap();
        let file = write_input(
            &dir,
            "users.csv",
            "First Name,Last Name,Email,Gender\n\
             Asha,Rao,asha@corp.in,Female\n\
             Vikram,Shah,,male\n",
        );
        let report_path = dir.path().join("results.csv");

        let mut args = args_for(file);
        args.report = Some(report_path.clone());

        let report = run(&config_for(server.url(PATH)), &args).await.unwrap();

        rejected.assert_calls_async(1).await;
        accepted.assert_calls_async(1).await;

        assert_eq!(report.total(), 2);
        assert_eq!(report.results[0].line, 2);
        assert_eq!(
            report.results[0].outcome,
            ProvisionOutcome::Rejected {
                status_code: 500,
                body: "internal error".to_string()
            }
        );
        assert_eq!(report.results[1].email, "vikram.shah@happay.in");
        assert_eq!(report.results[1].outcome.user_id(), Some("abc123"));
        assert_ne!(report.results[0].request_id, report.results[1].request_id);

        let written = fs::read_to_string(&report_path).unwrap();
        assert_eq!(written.lines().count(), 3);
    }

    #[tokio::test]
    async fn test_zero_rows_makes_no_calls() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(Method::POST).path(PATH);
                then.status(200).json_body(json!({"userId": "abc123"}));
            })
            .await;

        let dir = tempfile::tempdir().unwrap();
        let file = write_input(&dir, "users.csv", "First Name,Last Name\n");

        let report = run(&config_for(server.url(PATH)), &args_for(file))
            .await
            .unwrap();

        mock.assert_calls_async(0).await;
        assert_eq!(report, RunReport::default());
    }

    #[tokio::test]
    async fn test_unsupported_format_aborts_before_any_call() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(Method::POST).path(PATH);
                then.status(200).json_body(json!({"userId": "abc123"}));
            })
            .await;

        let dir = tempfile::tempdir().unwrap();
        let file = write_input(&dir, "users.txt", "First Name,Last Name\nAsha,Rao\n");

        let err = run(&config_for(server.url(PATH)), &args_for(file))
            .await
            .unwrap_err();

        mock.assert_calls_async(0).await;
        assert!(matches!(
            err.downcast_ref::<LoadError>(),
            Some(LoadError::UnsupportedFormat { .. })
        ));
    }

    #[tokio::test]
    async fn test_missing_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let args = args_for(dir.path().join("absent.csv"));

        let report = run(&config_for("http://127.0.0.1:9/".to_string()), &args)
            .await
            .unwrap();

        assert_eq!(report.total(), 0);
    }

    #[tokio::test]
    async fn test_transport_failure_is_recorded_per_row() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_input(
            &dir,
            "users.csv",
            "First Name,Last Name\nAsha,Rao\nVikram,Shah\n",
        );

        // Nothing listens on the discard port
        let report = run(
            &config_for("http://127.0.0.1:9/add_user/".to_string()),
            &args_for(file),
        )
        .await
        .unwrap();

        assert_eq!(report.total(), 2);
        assert_eq!(report.failed(), 2);
        assert!(
            report
                .results
                .iter()
                .all(|r| matches!(r.outcome, ProvisionOutcome::Failed { .. }))
        );
    }

    #[tokio::test]
    async fn test_live_run_requires_token() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_input(&dir, "users.csv", "First Name\nAsha\n");
        let config = Config::default();

        let err = run(&config, &args_for(file.clone())).await.unwrap_err();
        assert!(err.to_string().contains("HAPPAY_API_TOKEN"));

        let mut dry = args_for(file);
        dry.dry_run = true;
        let report = run(&config, &dry).await.unwrap();
        assert_eq!(report.total(), 0);
    }

    #[test]
    fn test_resolve_input_path() {
        assert_eq!(
            resolve_input_path(Some(Path::new("users.xlsx"))),
            PathBuf::from("users.xlsx")
        );

        let default = resolve_input_path(Some(Path::new("")));
        assert!(default.ends_with(DEFAULT_INPUT_FILE));
        assert_eq!(resolve_input_path(None), default);
    }
}
