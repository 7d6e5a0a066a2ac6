//! sponsorcheck command-line interface.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use sponsorcheck_cli::{serve, AnalyzeResponse, AppConfig, AppState};
use sponsorcheck_core::VerificationRequest;
use sponsorcheck_runtime::{build_pipeline, ProviderRegistry};

#[derive(Parser)]
#[command(name = "sponsorcheck")]
#[command(about = "Verify sponsored blog posts against their advertising contracts")]
#[command(version)]
struct Cli {
    /// YAML configuration file
    #[arg(short, long, global = true, env = "SPONSORCHECK_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP service
    Serve {
        /// Override the configured bind address
        #[arg(long)]
        bind: Option<String>,

        /// Override the configured port
        #[arg(short, long, env = "SPONSORCHECK_PORT")]
        port: Option<u16>,
    },

    /// Verify one request file (JSON or YAML) and print the report
    Check {
        /// Path to the request file
        request: PathBuf,
    },

    /// Validate a request file without fetching anything
    Validate {
        /// Path to the request file
        request: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // A missing .env file is fine
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Commands::Serve { bind, port } => {
            let mut server = config.server.clone();
            if let Some(bind) = bind {
                server.bind_address = bind;
            }
            if let Some(port) = port {
                server.port = port;
            }

            let pipeline = build_pipeline(&config.runtime, &ProviderRegistry::with_defaults())
                .context("Failed to initialize verification pipeline")?;

            serve(
                &server.bind_addr(),
                AppState {
                    pipeline: Arc::new(pipeline),
                },
            )
            .await
            .with_context(|| format!("Server on {} stopped", server.bind_addr()))?;

            Ok(ExitCode::SUCCESS)
        }

        Commands::Check { request } => {
            let request = VerificationRequest::from_file(&request)
                .with_context(|| format!("Failed to load request {}", request.display()))?;

            let pipeline = build_pipeline(&config.runtime, &ProviderRegistry::with_defaults())
                .context("Failed to initialize verification pipeline")?;
            let outcome = pipeline.verify(&request).await?;

            let compliant = outcome.report.is_compliant();
            let response = AnalyzeResponse {
                report: outcome.report,
                pdf_url: outcome.artifact.path.display().to_string(),
            };
            println!("{}", serde_json::to_string_pretty(&response)?);

            Ok(if compliant {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            })
        }

        Commands::Validate { request } => {
            match VerificationRequest::from_file(&request) {
                Ok(parsed) => {
                    println!(
                        "✓ {} is valid ({} keywords, {} conditions)",
                        request.display(),
                        parsed.keywords.len(),
                        parsed.conditions.len()
                    );
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => {
                    eprintln!("✗ {}: {}", request.display(), e);
                    Ok(ExitCode::from(2))
                }
            }
        }
    }
}
