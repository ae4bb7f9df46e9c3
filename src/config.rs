use anyhow::{Context, Result};
use url::Url;

use crate::history::DEFAULT_CHART_LIMIT;

pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:8000";

#[derive(Clone, Debug)]
pub struct Config {
    /// Base URL of the prediction and contact backend
    pub api_base: Url,
    pub db_path: String,
    pub chart_limit: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let raw_base = std::env::var("INTAKE_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string());
        let api_base = Url::parse(&raw_base).with_context(|| format!("invalid INTAKE_API_BASE: {}", raw_base))?;
        Ok(Self {
            api_base,
            db_path: std::env::var("INTAKE_DB_PATH").unwrap_or_else(|_| "./intake.sqlite".to_string()),
            chart_limit: std::env::var("INTAKE_CHART_LIMIT").ok().and_then(|v| v.parse().ok()).unwrap_or(DEFAULT_CHART_LIMIT),
        })
    }
}
