use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::StudioError;

pub const MIN_POSTS: usize = 1;
pub const MAX_POSTS: usize = 10;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[value(alias = "auto-trending", alias = "trending")]
    Auto,
    #[value(alias = "single-topic", alias = "manual")]
    Single,
}

impl Mode {
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Auto => "Auto Trending (No Input)",
            Mode::Single => "Single Topic (Manual)",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Niche {
    MixedGeneral,
    AiAutomation,
    BusinessStartups,
    CareerJobs,
    FreelancingClients,
    LeadershipManagement,
    PersonalBranding,
    ProductivityFocus,
}

impl Niche {
    pub const ALL: [Niche; 8] = [
        Niche::MixedGeneral,
        Niche::AiAutomation,
        Niche::BusinessStartups,
        Niche::CareerJobs,
        Niche::FreelancingClients,
        Niche::LeadershipManagement,
        Niche::PersonalBranding,
        Niche::ProductivityFocus,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Niche::MixedGeneral => "Mixed / General",
            Niche::AiAutomation => "AI & Automation",
            Niche::BusinessStartups => "Business & Startups",
            Niche::CareerJobs => "Career & Jobs",
            Niche::FreelancingClients => "Freelancing & Clients",
            Niche::LeadershipManagement => "Leadership & Management",
            Niche::PersonalBranding => "Personal Branding & Content",
            Niche::ProductivityFocus => "Productivity & Focus",
        }
    }

    /// The niche to steer topic generation towards; `None` for the general mix.
    pub fn focus(&self) -> Option<&'static str> {
        match self {
            Niche::MixedGeneral => None,
            other => Some(other.label()),
        }
    }
}

impl fmt::Display for Niche {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Niche {
    type Err = StudioError;

    /// Accepts the full label or its first word ("career", "ai", "mixed").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Niche::ALL
            .iter()
            .copied()
            .find(|n| {
                let label = n.label().to_lowercase();
                label == wanted || label.split_whitespace().next() == Some(wanted.as_str())
            })
            .ok_or_else(|| StudioError::InvalidSetting(format!("unknown niche: {s}")))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    English,
    Urdu,
    Hindi,
    Arabic,
    Chinese,
    Japanese,
    Spanish,
    French,
}

impl Language {
    pub const ALL: [Language; 8] = [
        Language::English,
        Language::Urdu,
        Language::Hindi,
        Language::Arabic,
        Language::Chinese,
        Language::Japanese,
        Language::Spanish,
        Language::French,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Urdu => "Urdu",
            Language::Hindi => "Hindi",
            Language::Arabic => "Arabic",
            Language::Chinese => "Chinese",
            Language::Japanese => "Japanese",
            Language::Spanish => "Spanish",
            Language::French => "French",
        }
    }

    pub fn instruction(&self) -> &'static str {
        match self {
            Language::English => "Write in English.",
            Language::Urdu => "Write in natural Urdu.",
            Language::Hindi => "Write in natural Hindi.",
            Language::Arabic => "Write in Modern Standard Arabic.",
            Language::Chinese => "Write in simplified Chinese.",
            Language::Japanese => "Write in Japanese.",
            Language::Spanish => "Write in Spanish.",
            Language::French => "Write in French.",
        }
    }

    /// Unrecognised names fall back to English.
    pub fn from_name(name: &str) -> Self {
        let wanted = name.trim();
        Language::ALL
            .iter()
            .copied()
            .find(|l| l.label().eq_ignore_ascii_case(wanted))
            .unwrap_or(Language::English)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Snapshot of the shell state taken when a run is triggered.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    pub mode: Mode,
    pub topic: String,
    pub post_count: usize,
    pub niche: Niche,
    pub language: Language,
    pub brand_voice: Option<String>,
}

impl GenerationSettings {
    pub fn new(
        mode: Mode,
        topic: impl Into<String>,
        post_count: usize,
        niche: Niche,
        language: Language,
        brand_voice: Option<String>,
    ) -> Result<Self, StudioError> {
        if !(MIN_POSTS..=MAX_POSTS).contains(&post_count) {
            return Err(StudioError::InvalidSetting(format!(
                "post count must be between {MIN_POSTS} and {MAX_POSTS}, got {post_count}"
            )));
        }
        Ok(Self {
            mode,
            topic: topic.into(),
            post_count,
            niche,
            language,
            brand_voice: brand_voice.filter(|v| !v.trim().is_empty()),
        })
    }

    pub fn brand_voice_used(&self) -> bool {
        self.brand_voice.is_some()
    }

    pub fn brand_voice_text(&self) -> &str {
        self.brand_voice.as_deref().unwrap_or("")
    }
}
