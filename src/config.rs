//! Application configuration structure
use std::{env, net::SocketAddr, time::Duration};

use anyhow::{Context, Result, bail};
use axum_extra::extract::cookie::Key;
use chrono::TimeDelta;
use secrecy::SecretString;
use tracing::{info, warn};

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";
const DEFAULT_API_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

#[derive(Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub cookie_secret: Key,
    pub cookie_secure: bool,
    pub break_interval: TimeDelta,
    pub assistant: AssistantConfig,
}

#[derive(Clone)]
pub struct AssistantConfig {
    pub api_key: Option<SecretString>,
    pub api_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.5,
            max_tokens: 500,
            timeout: Duration::from_secs(60),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let bind_addr = var_or("BIND_ADDR", DEFAULT_BIND_ADDR)
            .parse()
            .context("BIND_ADDR is not a valid socket address")?;

        let cookie_secret = match env::var("COOKIE_SECRET") {
            Ok(secret) => {
                if secret.len() < 64 {
                    bail!("COOKIE_SECRET must be at least 64 bytes long");
                }
                Key::from(secret.as_bytes())
            }
            Err(_) => {
                info!("COOKIE_SECRET not set, sessions will not survive a restart");
                Key::generate()
            }
        };
        let cookie_secure = parse_var("COOKIE_SECURE", false)?;

        let break_minutes: i64 = parse_var("BREAK_INTERVAL_MINUTES", 30)?;
        let timeout_secs: u64 = parse_var("ASSISTANT_TIMEOUT_SECS", 60)?;

        let api_key = env::var("OPENAI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .map(SecretString::from);
        if api_key.is_none() {
            warn!("OPENAI_API_KEY not set, the assistant will answer with an error");
        }

        Ok(Self {
            bind_addr,
            cookie_secret,
            cookie_secure,
            break_interval: TimeDelta::minutes(break_minutes),
            assistant: AssistantConfig {
                api_key,
                api_url: var_or("OPENAI_API_URL", DEFAULT_API_URL),
                model: var_or("OPENAI_MODEL", DEFAULT_MODEL),
                timeout: Duration::from_secs(timeout_secs),
                ..AssistantConfig::default()
            },
        })
    }
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{name} has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}
