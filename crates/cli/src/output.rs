//! Structured output handling for CLI commands.

use serde::Serialize;

#[derive(clap::ValueEnum, Clone, Debug, Default, PartialEq, Eq, Copy)]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
    Yaml,
}

impl OutputFormat {
    /// Returns true if the output format is intended for machine consumption
    pub fn is_machine_readable(&self) -> bool {
        match self {
            OutputFormat::Human => false,
            OutputFormat::Json | OutputFormat::Yaml => true,
        }
    }
}

/// Envelope around every machine-readable response.
#[derive(Serialize)]
pub struct CommandResponse<T> {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    pub exit_code: i32,
    #[serde(flatten)]
    pub data: T,
}

impl<T> CommandResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: "success".to_string(),
            message: None,
            hint: None,
            exit_code: 0,
            data,
        }
    }
}

impl CommandResponse<serde_json::Map<String, serde_json::Value>> {
    pub fn error(message: String, hint: Option<String>, exit_code: i32) -> Self {
        Self {
            status: "error".to_string(),
            message: Some(message),
            hint,
            exit_code,
            data: serde_json::Map::new(),
        }
    }
}

pub fn render<T: Serialize>(format: OutputFormat, data: &T) -> anyhow::Result<Option<String>> {
    Ok(match format {
        OutputFormat::Human => None,
        OutputFormat::Json => Some(serde_json::to_string_pretty(data)?),
        OutputFormat::Yaml => Some(serde_yaml::to_string(data)?),
    })
}

/// Print a structured success response for machine outputs.
///
/// Human output is printed by the command itself.
pub fn print_success<T: Serialize>(format: OutputFormat, data: T) -> anyhow::Result<()> {
    if let Some(text) = render(format, &CommandResponse::success(data))? {
        println!("{}", text);
    }
    Ok(())
}

/// Print a structured error response for machine outputs.
/// In human mode errors are printed to stderr by main's error handler.
pub fn print_error(
    format: OutputFormat,
    message: &str,
    hint: Option<&str>,
    exit_code: i32,
) -> anyhow::Result<()> {
    let response = CommandResponse::error(message.to_string(), hint.map(str::to_string), exit_code);
    if let Some(text) = render(format, &response)? {
        println!("{}", text);
    }
    Ok(())
}
