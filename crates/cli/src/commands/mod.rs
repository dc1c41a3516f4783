pub mod config;
pub mod departments;
pub mod diversify;
pub mod doctor;
pub mod seed;
pub mod similar;
pub mod top;
pub mod trending;

use serde::Serialize;
use shelfscope_core::{
    config::{AppConfig, LoadOptions},
    dashboard::Dashboard,
    errors::{ApplicationError, InterfaceError},
};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
    correlation_id: Option<String>,
}

impl CommandResult {
    pub fn success(command: &str, message: impl Into<String>) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
            correlation_id: None,
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
            correlation_id: None,
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    /// Plain text output with a zero exit code.
    pub fn text(output: impl Into<String>) -> Self {
        Self { exit_code: 0, output: output.into() }
    }

    /// Pretty JSON output with a zero exit code.
    pub fn json<T: Serialize>(command: &str, value: &T) -> Self {
        match serde_json::to_string_pretty(value) {
            Ok(output) => Self { exit_code: 0, output },
            Err(error) => Self::failure(command, "serialization", error.to_string(), 1),
        }
    }

    /// Maps an analytic failure onto the user-safe interface contract.
    pub fn from_application_error(
        command: &str,
        error: ApplicationError,
        correlation_id: &str,
    ) -> Self {
        let detail = error.to_string();
        let interface = error.into_interface(correlation_id);
        let (error_class, exit_code) = match interface {
            InterfaceError::ServiceUnavailable { .. } => ("data_unavailable", 3),
            InterfaceError::Internal { .. } => ("internal", 5),
        };
        tracing::warn!(
            event_name = "cli.command.failed",
            command,
            error_class,
            correlation_id,
            error = %detail,
            "command failed"
        );

        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: format!("{} ({detail})", interface.user_message()),
            correlation_id: Some(interface.correlation_id().to_string()),
        };
        Self { exit_code, output: serialize_payload(payload) }
    }
}

/// Per-invocation inputs shared by every command.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub options: LoadOptions,
    pub correlation_id: String,
}

impl Default for CommandContext {
    fn default() -> Self {
        Self::new(LoadOptions::default())
    }
}

impl CommandContext {
    pub fn new(options: LoadOptions) -> Self {
        Self { options, correlation_id: Uuid::new_v4().to_string() }
    }

    pub fn load_config(&self, command: &str) -> Result<AppConfig, CommandResult> {
        AppConfig::load(self.options.clone()).map_err(|error| {
            CommandResult::failure(
                command,
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            )
        })
    }

    /// Loads config and data. A data failure still yields a dashboard, in the
    /// unavailable state.
    pub fn open_dashboard(&self, command: &str) -> Result<Dashboard, CommandResult> {
        let config = self.load_config(command)?;
        tracing::info!(
            event_name = "cli.command.start",
            command,
            correlation_id = %self.correlation_id,
            data_dir = %config.data.dir.display(),
            "opening dashboard"
        );
        Ok(shelfscope_data::open_dashboard(&config.data, config.analytics))
    }
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}
