//! helm-inspect engine - orchestration layer
//!
//! Connects the drift core to the outside world:
//! - `helm`/`kubectl` subprocess sources and prerequisite checks
//! - Run configuration and validation
//! - Slack notification
//! - `detect` and `calibrate` command orchestration over the store

pub mod cluster;
pub mod commands;
pub mod config;
pub mod notify;

pub use cluster::{check_prerequisites, cluster_name, HelmManifestSource, KubectlLiveSource, SystemRunner};
pub use commands::engine_command::{apply_engine_command, EngineCommand, EngineCommandResult, EngineContext};
pub use config::{RunConfig, SlackConfig};
pub use notify::{NoopNotifier, Notifier};
