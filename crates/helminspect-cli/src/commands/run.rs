//! Detect / calibrate run command

use chrono::Utc;
use clap::{Args, ValueEnum};
use helminspect_core::RunIdentity;
use helminspect_core_types::Sensitive;
use helminspect_engine::config::{SLACK_CHANNEL_ENV, SLACK_TOKEN_ENV};
use helminspect_engine::notify::SlackNotifier;
use helminspect_engine::{
    apply_engine_command, check_prerequisites, cluster_name, EngineCommandResult, EngineContext,
    HelmManifestSource, KubectlLiveSource, NoopNotifier, Notifier, RunConfig, SystemRunner,
};
use helminspect_store::layout::BASE_DIR_ENV;
use helminspect_store::StoreLayout;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Helm release name
    #[arg(short = 'r', long)]
    pub release: String,

    /// Kubernetes namespace of the release
    #[arg(short = 'n', long)]
    pub namespace: String,

    /// Learn drift-prone keys from a fresh install instead of detecting drift
    #[arg(short = 'c', long)]
    pub calibrate: bool,

    /// Compare without ignoring any keys
    #[arg(short = 'I', long)]
    pub no_ignore: bool,

    /// Debug-level logging
    #[arg(short = 'v', long)]
    pub verbose: bool,

    #[arg(long, env = SLACK_CHANNEL_ENV)]
    pub slack_channel: Option<String>,

    #[arg(long, env = SLACK_TOKEN_ENV, hide_env_values = true)]
    pub slack_token: Option<String>,

    /// Store root (defaults to ~/.helminspect)
    #[arg(long, env = BASE_DIR_ENV)]
    pub base_dir: Option<PathBuf>,

    #[arg(long, value_enum, default_value = "text")]
    pub log_format: LogFormat,
}

impl RunArgs {
    fn into_config(self) -> RunConfig {
        RunConfig {
            release: self.release,
            namespace: self.namespace,
            calibrate: self.calibrate,
            no_ignore: self.no_ignore,
            slack_channel: self.slack_channel,
            slack_token: self.slack_token.map(Sensitive::new),
            base_dir: self.base_dir,
        }
    }
}

pub fn execute(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = args.into_config();
    config.validate()?;
    check_prerequisites()?;

    let cluster = cluster_name(&SystemRunner);
    let identity = RunIdentity::new(&config.release, &config.namespace, cluster);
    let layout = StoreLayout::resolve(config.base_dir.as_deref())?;

    let notifier: Box<dyn Notifier> = match config.slack() {
        Some(slack) => Box::new(SlackNotifier::new(slack)?),
        None => Box::new(NoopNotifier),
    };
    let manifest = HelmManifestSource::new(SystemRunner);
    let live = KubectlLiveSource::new(SystemRunner);
    let ctx = EngineContext {
        layout: &layout,
        manifest: &manifest,
        live: &live,
        notifier: notifier.as_ref(),
    };

    match apply_engine_command(config.command(), &identity, &ctx, Utc::now())? {
        EngineCommandResult::Calibrate(outcome) => {
            tracing::info!(
                path = %outcome.snapshot_path.display(),
                "✨ Calibration complete: {} resources analysed, {} ignorable keys learned.",
                outcome.analyzed,
                outcome.snapshot.ignorable_keys.len()
            );
        }
        EngineCommandResult::Detect(outcome) => {
            tracing::debug!(
                drift_count = outcome.report.drift_summary.total_drifts as u64,
                ignore_source = ?outcome.ignore_source,
                "detect finished"
            );
        }
    }

    Ok(())
}
