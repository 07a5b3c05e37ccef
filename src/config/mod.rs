use anyhow::{Context, Result};
use fs_err as fs;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::cli::Args;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_url: String,
    pub model: String,
    pub api_key_env: String,
    pub timeout_secs: u64,
    pub out_dir: String,
    pub csv_file_name: String,
    pub preview_file_name: String,
    pub default_topic: String,
    pub save_transcripts: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "https://api.deepseek.com/v1/chat/completions".into(),
            model: "deepseek-chat".into(),
            api_key_env: "DEEPSEEK_API_KEY".into(),
            timeout_secs: 60,
            out_dir: ".".into(),
            csv_file_name: "linkedin_posts_history_web.csv".into(),
            preview_file_name: "preview_latest.html".into(),
            default_topic: "Why AI-powered content matters in 2025".into(),
            save_transcripts: false,
        }
    }
}

impl Config {
    /// Read a TOML config file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        toml::from_str(&raw).with_context(|| format!("invalid config file {}", path.display()))
    }

    /// Defaults, then the optional config file, then CLI flags.
    pub fn resolve(args: &Args) -> Result<Self> {
        let mut cfg = match &args.config {
            Some(p) => Self::from_file(Path::new(p))?,
            None => Self::default(),
        };
        if let Some(url) = &args.api_url { cfg.api_url = url.clone(); }
        if let Some(model) = &args.model { cfg.model = model.clone(); }
        if let Some(secs) = args.timeout_secs { cfg.timeout_secs = secs; }
        if let Some(dir) = &args.out_dir { cfg.out_dir = dir.clone(); }
        if args.save_transcripts { cfg.save_transcripts = true; }
        Ok(cfg)
    }

    /// Looks up the API key once; an empty value counts as missing.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
    }
}
