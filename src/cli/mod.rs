use anyhow::{Context, Result};
use clap::Parser;
use fs_err as fs;

use crate::settings::{Language, Mode, Niche, MAX_POSTS, MIN_POSTS};
use crate::ux::shell::ShellState;

#[derive(Parser, Debug)]
#[command(name = "content_studio", version, about = "Generate LinkedIn post drafts with a chat-completion model")]
pub struct Args {
    /// Topic source: model-suggested trending topics, or one manual topic
    #[arg(long, value_enum)]
    pub mode: Option<Mode>,

    /// Manual topic (single mode only)
    #[arg(long)]
    pub topic: Option<String>,

    /// Number of posts to generate
    #[arg(long, value_parser = clap::value_parser!(u8).range(MIN_POSTS as i64..=MAX_POSTS as i64))]
    pub count: Option<u8>,

    /// e.g. "Career & Jobs" or just "career"
    #[arg(long)]
    pub niche: Option<String>,

    /// Output language; unknown names fall back to English
    #[arg(long)]
    pub language: Option<String>,

    /// Sample text whose tone the posts should match
    #[arg(long, conflicts_with = "brand_voice_file")]
    pub brand_voice: Option<String>,

    #[arg(long)]
    pub brand_voice_file: Option<String>,

    /// TOML config file
    #[arg(long)]
    pub config: Option<String>,

    #[arg(long)]
    pub model: Option<String>,

    #[arg(long)]
    pub api_url: Option<String>,

    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Where the CSV export, preview page and transcripts go
    #[arg(long)]
    pub out_dir: Option<String>,

    /// Generate once from the flags, write preview and CSV, then exit
    #[arg(long, default_value_t = false)]
    pub batch: bool,

    #[arg(long, default_value_t = false)]
    pub save_transcripts: bool,

    #[arg(long, default_value_t = false)]
    pub debug: bool,
}

impl Args {
    /// Initial shell settings: defaults overlaid with whatever flags were given.
    pub fn shell_state(&self) -> Result<ShellState> {
        let mut state = ShellState::default();
        if let Some(mode) = self.mode { state.mode = mode; }
        if let Some(topic) = &self.topic { state.topic = topic.clone(); }
        if let Some(count) = self.count { state.post_count = count as usize; }
        if let Some(niche) = &self.niche { state.niche = niche.parse::<Niche>()?; }
        if let Some(lang) = &self.language { state.language = Language::from_name(lang); }
        if let Some(voice) = &self.brand_voice { state.brand_voice = voice.clone(); }
        if let Some(path) = &self.brand_voice_file {
            state.brand_voice = fs::read_to_string(path)
                .with_context(|| format!("failed to read brand voice sample {path}"))?;
        }
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_shell() {
        let args = Args::parse_from(["content_studio"]);
        assert_eq!(args.shell_state().unwrap(), ShellState::default());
    }

    #[test]
    fn flags_override_settings() {
        let args = Args::parse_from([
            "content_studio", "--mode", "single", "--topic", "Layoffs", "--count", "7",
            "--niche", "leadership", "--language", "french", "--brand-voice", "Warm and direct.",
        ]);
        let state = args.shell_state().unwrap();
        assert_eq!(state.mode, Mode::Single);
        assert_eq!(state.topic, "Layoffs");
        assert_eq!(state.post_count, 7);
        assert_eq!(state.niche, Niche::LeadershipManagement);
        assert_eq!(state.language, Language::French);
        assert_eq!(state.brand_voice, "Warm and direct.");
    }

    #[test]
    fn count_outside_range_is_rejected() {
        assert!(Args::try_parse_from(["content_studio", "--count", "0"]).is_err());
        assert!(Args::try_parse_from(["content_studio", "--count", "11"]).is_err());
    }

    #[test]
    fn unknown_niche_is_an_error() {
        let args = Args::parse_from(["content_studio", "--niche", "gardening"]);
        assert!(args.shell_state().is_err());
    }

    #[test]
    fn brand_voice_can_come_from_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut f, "Line one.\nLine two.".as_bytes()).unwrap();
        let path = f.path().to_string_lossy().to_string();
        let args = Args::parse_from(["content_studio", "--brand-voice-file", path.as_str()]);
        assert_eq!(args.shell_state().unwrap().brand_voice, "Line one.\nLine two.");
    }
}
