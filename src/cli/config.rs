use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::transport::http::Credentials;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_CONFIG_PATH: &str = "psycho-client.yaml";
pub const BASE_URL_ENV: &str = "PSYCHO_BASE_URL";

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "psycho-client",
    version,
    about = "Headless client for the psychological profile site"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Server base URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Basic auth user name
    #[arg(long, global = true)]
    pub user: Option<String>,

    /// Basic auth password
    #[arg(long, global = true)]
    pub password: Option<String>,

    /// Append a JSONL trace of every action to this file
    #[arg(long, global = true)]
    pub trace: Option<String>,

    /// Write the resulting page as HTML to this file instead of printing its text
    #[arg(long, global = true)]
    pub save_page: Option<String>,

    /// Path to config file (default: psycho-client.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the questionnaire
    Form,

    /// Submit answers (without --answers, submits with no form on the page)
    Submit {
        /// YAML or JSON file mapping field names to a value or list of values
        #[arg(long)]
        answers: Option<String>,
    },

    /// Ask the server to analyse the submitted answers
    Analyze,

    /// Show the submitted answers in a locked form
    Review,

    /// Show the profile built by the analysis
    Profile,

    /// Load the home page
    Home,

    /// Run session scripts from YAML/JSON files
    Run {
        /// Script file or directory of script files
        #[arg(long)]
        script: String,

        /// Output format: console, html
        #[arg(long, default_value = "console")]
        format: String,

        /// Report file path (default: stdout)
        #[arg(short, long)]
        output: Option<String>,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `psycho-client.yaml`
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default)]
    pub trace_path: Option<String>,

    #[serde(default)]
    pub auth: Option<AuthConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthConfig {
    pub username: String,
    #[serde(default)]
    pub password: String,
}

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or(DEFAULT_CONFIG_PATH);
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!("ignoring malformed config '{}': {}", config_path, e);
            AppConfig::default()
        }),
        Err(_) => AppConfig::default(),
    }
}

// ============================================================================
// Setting resolution: CLI > config > env > defaults
// ============================================================================

pub fn resolve_base_url(cli: Option<&str>, config: &AppConfig, env: Option<&str>) -> String {
    cli.or(config.base_url.as_deref())
        .or(env)
        .unwrap_or(DEFAULT_BASE_URL)
        .to_string()
}

pub fn resolve_credentials(
    user: Option<&str>,
    password: Option<&str>,
    config: &AppConfig,
) -> Option<Credentials> {
    match (user, &config.auth) {
        (Some(u), _) => Some(Credentials {
            username: u.to_string(),
            password: password
                .map(|p| p.to_string())
                .or_else(|| config.auth.as_ref().map(|a| a.password.clone()))
                .unwrap_or_default(),
        }),
        (None, Some(auth)) => Some(Credentials {
            username: auth.username.clone(),
            password: password.map(|p| p.to_string()).unwrap_or_else(|| auth.password.clone()),
        }),
        (None, None) => None,
    }
}

pub fn resolve_trace_path(cli: Option<&str>, config: &AppConfig) -> Option<String> {
    cli.map(|p| p.to_string()).or_else(|| config.trace_path.clone())
}
