use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::contact::service::EmailConfig;

/// Application configuration loaded from environment variables.
/// Startup fails if the email provider identifiers are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub emailjs_service_id: String,
    pub emailjs_template_id: String,
    pub emailjs_public_key: String,
    pub contact_to_email: String,
    pub content_dir: PathBuf,
    pub submission_log_path: PathBuf,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            emailjs_service_id: require_env("EMAILJS_SERVICE_ID")?,
            emailjs_template_id: require_env("EMAILJS_TEMPLATE_ID")?,
            emailjs_public_key: require_env("EMAILJS_PUBLIC_KEY")?,
            contact_to_email: env_or("CONTACT_TO_EMAIL", "your-email@example.com"),
            content_dir: env_or("CONTENT_DIR", "content").into(),
            submission_log_path: env_or("SUBMISSION_LOG_PATH", "data/contact_submissions.json")
                .into(),
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }

    pub fn email(&self) -> EmailConfig {
        EmailConfig {
            service_id: self.emailjs_service_id.clone(),
            template_id: self.emailjs_template_id.clone(),
            public_key: self.emailjs_public_key.clone(),
            to_email: self.contact_to_email.clone(),
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
