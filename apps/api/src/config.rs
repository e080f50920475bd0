use anyhow::{Context, Result};
use sqlx::postgres::PgConnectOptions;

const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000,http://localhost:5173";

/// Application configuration loaded from environment variables.
/// Startup fails if `GEMINI_API_KEY` is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database: PgConnectOptions,
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let database = match std::env::var("DATABASE_URL") {
            Ok(url) if !url.trim().is_empty() => url
                .parse::<PgConnectOptions>()
                .context("DATABASE_URL is not a valid PostgreSQL URL")?,
            _ => connect_options_from_parts(
                &env_or("DB_HOST", "localhost"),
                env_or("DB_PORT", "5432")
                    .parse::<u16>()
                    .context("DB_PORT must be a valid port number")?,
                &env_or("DB_USER", "interviewer"),
                &env_or("DB_PASSWORD", "interviewerpass"),
                &env_or("DB_NAME", "ai_interviewer"),
            ),
        };

        Ok(Config {
            database,
            gemini_api_key: require_env("GEMINI_API_KEY")?,
            gemini_model: env_or("GEMINI_MODEL", crate::llm_client::DEFAULT_MODEL),
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            allowed_origins: parse_origins(&env_or("ALLOWED_ORIGINS", DEFAULT_ALLOWED_ORIGINS)),
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Builds options field by field, so credentials need no URL escaping.
fn connect_options_from_parts(
    host: &str,
    port: u16,
    user: &str,
    password: &str,
    name: &str,
) -> PgConnectOptions {
    PgConnectOptions::new()
        .host(host)
        .port(port)
        .username(user)
        .password(password)
        .database(name)
}

/// Splits a comma-separated origin list, dropping blanks.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
