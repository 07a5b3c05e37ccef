use crate::settings::{Language, Niche};

pub const TOPIC_TEMPERATURE: f32 = 0.9;
pub const WRITER_TEMPERATURE: f32 = 0.7;

pub fn system_prompt_topics(niche: Niche) -> String {
    let niche_part = match niche.focus() {
        Some(focus) => format!("\nFocus niche: {focus}\n"),
        None => String::new(),
    };
    format!(
r#"You generate ONLY a numbered list of trending LinkedIn topics.

STRICT RULES:
- Max 18 words each
- No explanations
- No markdown
- Output must be:
1. Topic
2. Topic
...
{niche_part}"#
    )
}

pub fn user_prompt_topics(count: usize) -> String {
    format!("Generate {count} trending LinkedIn topics.")
}

fn brand_voice_block(brand_voice: &str) -> String {
    if brand_voice.trim().is_empty() {
        return String::new();
    }
    format!(
r#"
Match this tone:
--- START ---
{brand_voice}
--- END ---
"#
    )
}

pub fn system_prompt_writer(language: Language, brand_voice: &str) -> String {
    format!(
r#"You output EXACT LinkedIn posts in this format:

LinkedIn Post:
[post]

Suggested Posting Times:
Primary: [day, time, timezone or “global audience”] – [reason]
Backup: [day, time, timezone or “global audience”] – [reason]
------------------------------------------------------------

Rules:
- 120–230 words
- Hook in 1–2 lines
- Short paragraphs
- 1–3 emojis allowed
- 6–10 hashtags at end
- No markdown, no explanations
- {lang}
{brand}"#,
        lang = language.instruction(),
        brand = brand_voice_block(brand_voice),
    )
}

pub fn user_prompt_writer(topic: &str) -> String {
    format!("Topic: {topic}\nCreate one LinkedIn post package that follows ALL rules and exact format.")
}
