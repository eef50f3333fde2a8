//! News verdict proxy
//!
//! Forwards news text to Gemini or Perplexity through a single HTTP endpoint
//! and classifies the returned analysis as real, fake or uncertain. The same
//! binary can run one analysis from the command line.

mod api;
mod core;
mod models;
mod presentation;
mod verdict;

use crate::api::endpoints::{AppState, create_router};
use crate::core::config::Config;
use crate::core::gateway::{Analyzer, Gateway};
use crate::core::logging::init_logging;
use crate::core::provider::ProviderKind;
use crate::presentation::view::{EMPTY_INPUT_MESSAGE, failure_message};
use crate::presentation::{Page, Status, ViewState};
use crate::verdict::Classifier;
use clap::{Parser, Subcommand, ValueEnum};
use std::sync::Arc;
use tracing::{error, info};

/// News verdict proxy
#[derive(Parser, Debug)]
#[command(
    version,
    about = "Forward news text to Gemini or Perplexity and classify the analysis",
    after_help = "Environment variables:\n  \
        GEMINI_API_KEY      Gemini API key\n  \
        PERPLEXITY_API_KEY  Perplexity API key\n  \
        CONFIG_PATH         TOML configuration file (default: config.toml, optional)\n  \
        HOST                Server host (default: 0.0.0.0)\n  \
        PORT                Server port (default: 8082)\n  \
        LOG_LEVEL           Logging level (default: info)\n  \
        RUST_LOG            Tracing filter, overrides LOG_LEVEL\n\n\
        A .env file in the working directory is loaded if present."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Command {
    /// Run the HTTP proxy (default)
    Serve,
    /// Analyze one piece of news text and print the verdict
    Analyze {
        /// Provider to send the text to
        #[arg(short, long, value_enum, default_value = "gemini")]
        provider: ProviderArg,
        /// News text; every remaining word is part of it
        #[arg(trailing_var_arg = true)]
        text: Vec<String>,
    },
}

/// Provider names accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ProviderArg {
    Gemini,
    Perplexity,
}

impl From<ProviderArg> for ProviderKind {
    fn from(arg: ProviderArg) -> Self {
        match arg {
            ProviderArg::Gemini => ProviderKind::Gemini,
            ProviderArg::Perplexity => ProviderKind::Perplexity,
        }
    }
}

/// Drive one analysis through the detector view state
async fn run_analysis(
    analyzer: &dyn Analyzer,
    classifier: &Classifier,
    provider: ProviderKind,
    text: &str,
) -> ViewState {
    let state = ViewState::new().show_page(Page::Detector);
    if text.trim().is_empty() {
        return state.show_error(EMPTY_INPUT_MESSAGE);
    }

    let state = state.show_loading();
    eprintln!("{state}");

    match analyzer.analyze(text, provider).await {
        Ok(analysis) => {
            let verdict = classifier.classify(&analysis);
            state.show_result(verdict, analysis)
        }
        Err(e) => state.show_error(failure_message(&e.to_string())),
    }
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    let command = Cli::parse().command.unwrap_or(Command::Serve);

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => Arc::new(cfg),
        Err(e) => {
            eprintln!("Configuration Error: {:#}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config.log_level);

    let gateway = match Gateway::new(&config) {
        Ok(gateway) => Arc::new(gateway),
        Err(e) => {
            error!("Failed to initialise gateway: {:#}", e);
            std::process::exit(1);
        }
    };
    let classifier = Arc::new(Classifier::new(config.confidence_ranges));

    match command {
        Command::Analyze { provider, text } => {
            let text = text.join(" ");
            let state = run_analysis(&*gateway, &classifier, provider.into(), &text).await;
            println!("{state}");
            if matches!(state.status, Status::Error { .. }) {
                std::process::exit(1);
            }
        }
        Command::Serve => serve(config, gateway, classifier).await,
    }
}

async fn serve(config: Arc<Config>, gateway: Arc<Gateway>, classifier: Arc<Classifier>) {
    print_startup_banner(&config);

    for kind in ProviderKind::ALL {
        if !config.is_configured(kind) {
            tracing::warn!(
                "{} API key not set; {} requests will fail until it is configured",
                kind.display_name(),
                kind
            );
        }
    }

    let app = create_router(AppState {
        config: config.clone(),
        analyzer: gateway,
        classifier,
    });

    let addr = format!("{}:{}", config.host, config.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    info!("Server listening on http://{}", addr);

    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Print startup banner with configuration
fn print_startup_banner(config: &Config) {
    let configured = |kind| {
        if config.is_configured(kind) {
            "configured"
        } else {
            "missing"
        }
    };

    println!("🚀 News Verdict Proxy v{}", env!("CARGO_PKG_VERSION"));
    println!("✅ Configuration loaded successfully");
    println!(
        "   Gemini: model {} ({} key)",
        config.gemini.model,
        configured(ProviderKind::Gemini)
    );
    println!(
        "   Perplexity: model {} ({} key)",
        config.perplexity.model,
        configured(ProviderKind::Perplexity)
    );
    println!("   Request Timeout: {}s", config.request_timeout);
    println!("   Attach Verdict: {}", config.attach_verdict);
    println!("   Server: {}:{}", config.host, config.port);
    println!();
}
