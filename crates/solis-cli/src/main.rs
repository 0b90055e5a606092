//! Solis Games SDK tool
//!
//! - `solis inject <page>`: add the SDK script tag to an HTML page
//! - `solis post-build <dir>`: inject into a web build and check its compression
//! - `solis demo`: run a short session against mocks or a relay

use anyhow::{Context, Result, anyhow, bail};
use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use solis_bridge::SocketRuntimeConfig;
use solis_build::{BuildOptions, Compression, FileInjection, ScriptTag, inject_file, post_build};
use solis_core::{ExecutionMode, SdkConfig};
use solis_sdk::SolisSdk;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "solis", version, about = "Solis Games SDK tooling")]
struct Cli {
    /// Debug logging (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Inject the SDK script tag into an HTML page
    Inject {
        /// Page to rewrite in place
        page: PathBuf,
        #[command(flatten)]
        keys: KeyArgs,
    },
    /// Post-process a web build directory
    PostBuild {
        /// Build output directory containing index.html
        output: PathBuf,
        /// none, gzip or brotli
        #[arg(long, default_value = "none")]
        compression: Compression,
        /// The build is a development build
        #[arg(long)]
        development: bool,
        #[command(flatten)]
        keys: KeyArgs,
    },
    /// Run a demo session and log each result
    Demo {
        /// JSON config file
        #[arg(long)]
        config: Option<PathBuf>,
        /// Relay address (host:port); runs in production mode when given
        #[arg(long)]
        connect: Option<String>,
        /// Multiplier for simulated mock delays (overrides the config file)
        #[arg(long)]
        latency_scale: Option<f64>,
    },
}

#[derive(Args)]
struct KeyArgs {
    /// JSON config file providing api_key / game_id
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    api_key: Option<String>,
    #[arg(long)]
    game_id: Option<String>,
}

#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
struct DemoSave {
    level: u32,
    coins: u64,
}

fn load_config(path: Option<&Path>) -> Result<SdkConfig> {
    let mut config = match path {
        Some(path) => SdkConfig::from_json_file(path)?,
        None => SdkConfig::default(),
    };
    config.apply_process_env()?;
    Ok(config)
}

fn script_tag(keys: &KeyArgs) -> Result<ScriptTag> {
    let mut config = load_config(keys.config.as_deref())?;
    if let Some(api_key) = &keys.api_key {
        config.api_key = api_key.clone();
    }
    if let Some(game_id) = &keys.game_id {
        config.game_id = Some(game_id.clone());
    }
    if config.api_key.trim().is_empty() {
        bail!("An API key is required (--api-key, config file or SOLIS_API_KEY)");
    }
    Ok(ScriptTag::from_config(&config))
}

/// Config for `solis demo`; `--latency-scale` wins over the file when given
fn demo_config(path: Option<&Path>, latency_scale: Option<f64>) -> Result<SdkConfig> {
    let mut config = load_config(path)?;
    if let Some(scale) = latency_scale {
        config.mock_latency_scale = scale;
    }
    if config.api_key.is_empty() {
        config.api_key = "pk_demo".into();
    }
    Ok(config)
}

async fn demo(
    config: Option<&Path>,
    connect: Option<&str>,
    latency_scale: Option<f64>,
) -> Result<()> {
    let mut config = demo_config(config, latency_scale)?;

    let sdk = match connect {
        Some(address) => {
            let socket = SocketRuntimeConfig::from_address(address)
                .ok_or_else(|| anyhow!("Invalid relay address '{}', expected host:port", address))?;
            config.mode = ExecutionMode::Production;
            SolisSdk::connect(config, &socket)
                .await
                .with_context(|| format!("Failed to reach relay at {}", address))?
        }
        None => {
            config.mode = ExecutionMode::Development;
            SolisSdk::development(config)
        }
    };
    info!("Demo running in {:?} mode", sdk.mode());

    if let Err(e) = sdk.user().get_user().await {
        info!("Before initialize: {}", e);
    }
    if sdk.initialize_with("", None).await {
        warn!("Empty API key was accepted");
    }
    if !sdk.initialize().await {
        bail!("Initialization failed");
    }

    let user = sdk.user().get_user().await?;
    info!("Signed in as {} ({})", user.shown_name(), user.id);

    let submitted = sdk.leaderboards().submit_score("high_scores", 9500).await?;
    info!(
        "Submitted 9500 to high_scores: rank {}, new best {}, flagged {}",
        submitted.rank, submitted.is_new_best, submitted.flagged
    );

    let page = sdk.leaderboards().get_scores("high_scores", 10, 0).await?;
    for entry in &page.entries {
        info!("  #{:<3} {:<12} {}", entry.rank, entry.username, entry.score);
    }

    let save = DemoSave { level: 5, coins: 120 };
    let saved = sdk.cloud_save().save("slot1", &save).await?;
    let loaded: DemoSave = sdk.cloud_save().load("slot1").await?;
    info!("Saved slot1: {}, loaded back: {:?}", saved, loaded);

    match sdk.ads().show_rewarded().await {
        Ok(watched) => info!("Rewarded ad watched: {}", watched),
        Err(e) => warn!("Rewarded ad unavailable: {}", e),
    }

    if sdk.pending_requests() > 0 {
        warn!("{} requests still pending at shutdown", sdk.pending_requests());
    }
    sdk.shutdown();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Command::Inject { page, keys } => {
            let tag = script_tag(&keys)?;
            match inject_file(&page, &tag)? {
                FileInjection::Written => info!("Updated {}", page.display()),
                FileInjection::AlreadyPresent => info!("{} already loads the SDK", page.display()),
            }
        }
        Command::PostBuild {
            output,
            compression,
            development,
            keys,
        } => {
            let tag = script_tag(&keys)?;
            let options = BuildOptions {
                output_path: output,
                compression,
                development,
            };
            let report = post_build(&options, &tag)?;
            if !report.mismatched.is_empty() {
                error!(
                    "{} artifacts do not match {} compression; check the server's Content-Encoding setup",
                    report.mismatched.len(),
                    options.compression
                );
            }
        }
        Command::Demo {
            config,
            connect,
            latency_scale,
        } => demo(config.as_deref(), connect.as_deref(), latency_scale).await?,
    }

    Ok(())
}
