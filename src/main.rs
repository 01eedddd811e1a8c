//! Sighting Report CLI
//!
//! Loads the sighting schema, applies a draft of field values, runs the
//! required-field and terms checks and hands passing reports to the
//! submission transport.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use sighting_report::config::ReportConfig;
use sighting_report::schema::SightingSchema;
use sighting_report::state::{FormSession, ReportDraft, SubmitOutcome};
use sighting_report::summary;
use sighting_report::transport::LoggingTransport;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(
    name = "sighting-report",
    about = "Validate a wildlife sighting draft and submit it",
    subcommand_negates_reqs = true
)]
struct Cli {
    /// Schema document; defaults to the path saved by `init`
    #[arg(long, env = "SIGHTING_SCHEMA_PATH")]
    schema: Option<PathBuf>,

    /// Draft of field values and checkbox states
    #[arg(required = true)]
    draft: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check a schema and remember its path
    Init { schema: PathBuf },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sighting_report=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    let result = match (cli.command, cli.draft) {
        (Some(Command::Init { schema }), _) => init(&schema),
        (None, Some(draft)) => report(cli.schema, &draft).await,
        (None, None) => Err(anyhow::anyhow!("No draft given")),
    };

    // Handle any errors
    match result {
        Ok(true) => Ok(()),
        Ok(false) => std::process::exit(1),
        Err(err) => {
            eprintln!("Error: {err:?}");
            std::process::exit(1);
        }
    }
}

/// Check a schema and remember its path in the user configuration
fn init(schema_path: &Path) -> Result<bool> {
    let schema = SightingSchema::load(schema_path)?;

    // A broken config file is rewritten from defaults
    let mut config = ReportConfig::load_or_default();

    let absolute = schema_path
        .canonicalize()
        .unwrap_or_else(|_| PathBuf::from(schema_path));
    config.schema_path = Some(absolute.clone());
    config.save()?;
    tracing::info!(
        "Using schema {} ({} fields)",
        absolute.display(),
        schema.fields().len()
    );
    Ok(true)
}

/// Apply a draft and try to submit it; returns whether it went through
async fn report(schema_override: Option<PathBuf>, draft_path: &Path) -> Result<bool> {
    let config = ReportConfig::load()?;
    let Some(schema_path) = config.resolve_schema_path(schema_override) else {
        bail!("No schema configured; run `sighting-report init <schema.json>` or pass --schema");
    };
    let schema = Arc::new(SightingSchema::load(&schema_path)?);

    let content = std::fs::read_to_string(draft_path)
        .with_context(|| format!("Failed to read draft {}", draft_path.display()))?;
    let draft: ReportDraft = serde_json::from_str(&content)
        .with_context(|| format!("Invalid draft {}", draft_path.display()))?;

    let mut session =
        FormSession::new(schema, config.variant()).with_max_file_size(config.max_file_size());
    session.apply_draft(&draft)?;

    print!("{}", summary::outline(&session));
    for line in summary::consent_lines(&session, config.site_name()) {
        println!("{line}");
    }

    let mut transport = LoggingTransport::new(config.submit_delay());
    match session.submit(&mut transport).await? {
        SubmitOutcome::Submitted(receipt) => {
            println!("{}", summary::receipt_line(&receipt));
            Ok(true)
        }
        SubmitOutcome::Blocked(feedback) => {
            for line in summary::feedback_lines(&feedback) {
                eprintln!("{line}");
            }
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_draft() {
        let cli = Cli::try_parse_from(["sighting-report", "draft.json"]).unwrap();
        assert_eq!(cli.draft, Some(PathBuf::from("draft.json")));
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_parse_schema_flag() {
        let cli = Cli::try_parse_from([
            "sighting-report",
            "--schema",
            "demos/schema.json",
            "demos/draft.json",
        ])
        .unwrap();
        assert_eq!(cli.schema, Some(PathBuf::from("demos/schema.json")));
        assert_eq!(cli.draft, Some(PathBuf::from("demos/draft.json")));
    }

    #[test]
    fn test_parse_init() {
        let cli = Cli::try_parse_from(["sighting-report", "init", "schema.json"]).unwrap();
        let Some(Command::Init { schema }) = cli.command else {
            panic!("expected init");
        };
        assert_eq!(schema, PathBuf::from("schema.json"));
    }

    #[test]
    fn test_draft_is_required_without_subcommand() {
        assert!(Cli::try_parse_from(["sighting-report"]).is_err());
    }
}
