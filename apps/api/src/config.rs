use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub rust_log: String,
    /// Origin used to build links to generated files, e.g. `http://localhost:3000`.
    pub public_app_url: String,
    /// Root directory holding one sub-directory of generated documents per user.
    pub generated_dir: PathBuf,
    /// Root directory holding `<template_id>/{resume,cover}.hbs`.
    pub templates_dir: PathBuf,
    /// Explicit Chrome/Chromium binary; auto-detected when unset.
    pub chrome_path: Option<PathBuf>,
    /// Program and arguments of the external tailoring agent, whitespace separated.
    pub tailor_command: Option<String>,
    /// HTTP endpoint of a tailoring service. Takes precedence over `tailor_command`.
    pub tailor_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            public_app_url: std::env::var("PUBLIC_APP_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string())
                .trim_end_matches('/')
                .to_string(),
            generated_dir: env_path("GENERATED_DIR", "generated"),
            templates_dir: env_path("TEMPLATES_DIR", "templates"),
            chrome_path: optional_env("CHROME_PATH").map(PathBuf::from),
            tailor_command: optional_env("TAILOR_COMMAND"),
            tailor_url: optional_env("TAILOR_URL"),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_path(key: &str, default: &str) -> PathBuf {
    PathBuf::from(optional_env(key).unwrap_or_else(|| default.to_string()))
}
