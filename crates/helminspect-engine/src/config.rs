//! Run configuration assembled from command-line flags and environment.

#![allow(clippy::result_large_err)]

use crate::commands::engine_command::EngineCommand;
use helminspect_core::errors::{DriftError, Result};
use helminspect_core_types::Sensitive;
use std::path::PathBuf;

/// Environment variable holding the Slack channel
pub const SLACK_CHANNEL_ENV: &str = "HI_SLACK_CHANNEL";
/// Environment variable holding the Slack bot token
pub const SLACK_TOKEN_ENV: &str = "HI_SLACK_BOT_TOKEN";

/// Complete Slack destination
#[derive(Debug, Clone, PartialEq)]
pub struct SlackConfig {
    pub channel: String,
    pub token: Sensitive<String>,
}

/// Everything one invocation needs to know
#[derive(Debug, Clone, Default)]
pub struct RunConfig {
    pub release: String,
    pub namespace: String,
    /// Learn and persist a new ignore set instead of detecting drift
    pub calibrate: bool,
    /// Bypass every ignore rule
    pub no_ignore: bool,
    pub slack_channel: Option<String>,
    pub slack_token: Option<Sensitive<String>>,
    /// Store root; `None` falls back to `HI_BASE_DIR` or `~/.helminspect`
    pub base_dir: Option<PathBuf>,
}

impl RunConfig {
    pub fn new(release: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            release: release.into(),
            namespace: namespace.into(),
            ..Self::default()
        }
    }

    /// Check option combinations; runs before anything is fetched
    ///
    /// # Errors
    ///
    /// Returns `ExErrorKind::ConfigConflict` when `calibrate` and
    /// `no_ignore` are both set, or when only half of the Slack
    /// destination is configured.
    pub fn validate(&self) -> Result<()> {
        if self.calibrate && self.no_ignore {
            return Err(DriftError::ConflictingFlags {
                first: "no-ignore".to_string(),
                second: "calibrate".to_string(),
            }
            .into());
        }

        match (self.channel(), self.token()) {
            (Some(_), None) => Err(DriftError::IncompleteNotifyConfig {
                missing: "--slack-token".to_string(),
            }
            .into()),
            (None, Some(_)) => Err(DriftError::IncompleteNotifyConfig {
                missing: "--slack-channel".to_string(),
            }
            .into()),
            _ => Ok(()),
        }
    }

    /// The engine command this configuration asks for
    pub fn command(&self) -> EngineCommand {
        if self.calibrate {
            EngineCommand::Calibrate
        } else {
            EngineCommand::Detect {
                no_ignore: self.no_ignore,
            }
        }
    }

    /// Slack destination when both halves are present
    pub fn slack(&self) -> Option<SlackConfig> {
        match (self.channel(), self.token()) {
            (Some(channel), Some(token)) => Some(SlackConfig {
                channel: channel.to_string(),
                token: Sensitive::new(token.to_string()),
            }),
            _ => None,
        }
    }

    fn channel(&self) -> Option<&str> {
        self.slack_channel.as_deref().filter(|c| !c.is_empty())
    }

    fn token(&self) -> Option<&str> {
        self.slack_token
            .as_ref()
            .map(|t| t.expose().as_str())
            .filter(|t| !t.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use helminspect_core::errors::ExErrorKind;

    #[test]
    fn test_calibrate_with_no_ignore_conflicts() {
        let mut config = RunConfig::new("web", "prod");
        config.calibrate = true;
        config.no_ignore = true;
        let err = config.validate().unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::ConfigConflict);
        assert!(err.message().contains("Cannot use --no-ignore with --calibrate"));
    }

    #[test]
    fn test_half_slack_config_conflicts() {
        let mut config = RunConfig::new("web", "prod");
        config.slack_channel = Some("#drift".to_string());
        assert_eq!(
            config.validate().unwrap_err().kind(),
            ExErrorKind::ConfigConflict
        );

        let mut config = RunConfig::new("web", "prod");
        config.slack_token = Some(Sensitive::new("xoxb".to_string()));
        assert_eq!(
            config.validate().unwrap_err().kind(),
            ExErrorKind::ConfigConflict
        );
    }

    #[test]
    fn test_empty_values_count_as_absent() {
        let mut config = RunConfig::new("web", "prod");
        config.slack_channel = Some(String::new());
        config.slack_token = Some(Sensitive::new(String::new()));
        assert!(config.validate().is_ok());
        assert!(config.slack().is_none());
    }

    #[test]
    fn test_complete_slack_config() {
        let mut config = RunConfig::new("web", "prod");
        config.slack_channel = Some("#drift".to_string());
        config.slack_token = Some(Sensitive::new("xoxb-1".to_string()));
        config.validate().unwrap();
        let slack = config.slack().unwrap();
        assert_eq!(slack.channel, "#drift");
        assert_eq!(slack.token.expose(), "xoxb-1");
        assert!(!format!("{:?}", config).contains("xoxb-1"));
    }

    #[test]
    fn test_command_selection() {
        let mut config = RunConfig::new("web", "prod");
        assert_eq!(config.command(), EngineCommand::Detect { no_ignore: false });
        config.calibrate = true;
        assert_eq!(config.command(), EngineCommand::Calibrate);
    }
}
