use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

use crate::errors::StudioError;
use crate::prompt;
use crate::provider::Completion;
use crate::settings::Niche;

fn numbering() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{1,4}\s*[.)]\s*").expect("static regex"))
}

/// Parse a numbered list into topics.
/// - blank lines are dropped
/// - a leading "12." / "12)" prefix is stripped
/// - lines without a number are kept as they are
pub fn parse_topic_list(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(|l| numbering().replace(l, "").trim().to_string())
        .filter(|l| !l.is_empty())
        .collect()
}

/// Ask the model for `count` trending topics. Returns fewer when the model
/// does; never pads.
pub async fn generate_topics(
    client: &dyn Completion,
    count: usize,
    niche: Niche,
) -> Result<Vec<String>, StudioError> {
    let system = prompt::system_prompt_topics(niche);
    let user = prompt::user_prompt_topics(count);
    let raw = client.complete(&system, &user, prompt::TOPIC_TEMPERATURE).await?;

    let mut topics = parse_topic_list(&raw);
    topics.truncate(count);
    debug!(requested = count, parsed = topics.len(), "topics generated");
    Ok(topics)
}
