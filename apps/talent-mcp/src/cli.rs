use clap::{Parser, Subcommand};
use reqwest::Url;

use crate::config::Config;

#[derive(Parser, Debug)]
#[command(name = "talent-mcp")]
#[command(about = "Talent profile MCP server over stdio", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Serve MCP on stdin/stdout (default)
    Serve,
    /// Report whether the Supabase variables are set, with secrets masked
    CheckEnv,
}

/// Prints the masked Supabase settings. Writes to stdout: this runs instead
/// of the server, never alongside it. An invalid configuration is reported,
/// not raised.
pub fn check_env() {
    dotenvy::dotenv().ok();
    for line in env_report(|key| std::env::var(key).ok()) {
        println!("{line}");
    }
}

fn env_report<F>(lookup: F) -> Vec<String>
where
    F: Fn(&str) -> Option<String>,
{
    let rule = "-".repeat(40);
    let mut lines = vec!["Testing Supabase environment variables:".to_string(), rule.clone()];
    let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    lines.push(match non_empty("SUPABASE_URL") {
        Some(url) => format!("SUPABASE_URL is set: {}", mask_url(&url)),
        None => "SUPABASE_URL is not set".to_string(),
    });
    lines.push(match non_empty("SUPABASE_KEY") {
        Some(key) => format!("SUPABASE_KEY is set: {}", mask_key(&key)),
        None => "SUPABASE_KEY is not set".to_string(),
    });
    lines.push(match Config::from_lookup(&lookup) {
        Ok(config) => format!("SUPABASE_TABLE: {}", config.supabase_table),
        Err(e) => format!("Configuration error: {e}"),
    });

    lines.push(rule);
    lines
}

/// Keeps the scheme and project ref, hides the rest of the host.
pub fn mask_url(url: &str) -> String {
    let Ok(parsed) = Url::parse(url) else {
        return "Invalid URL format".to_string();
    };
    match parsed.host_str().and_then(|h| h.split('.').next()) {
        Some(project) if !project.is_empty() => {
            format!("{}://{project}.***.supabase.co", parsed.scheme())
        }
        _ => "Invalid URL format".to_string(),
    }
}

/// First and last three characters; short keys are fully hidden.
pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() < 10 {
        return "***".to_string();
    }
    let head: String = chars[..3].iter().collect();
    let tail: String = chars[chars.len() - 3..].iter().collect();
    format!("{head}...{tail}")
}
