use std::time::Instant;
use tracing::{info, warn};

use crate::errors::StudioError;
use crate::history::{HistoryRecord, HistoryStore};
use crate::provider::Completion;
use crate::settings::{GenerationSettings, Mode};
use crate::topics::generate_topics;
use crate::writer::write_post;

/// What one generation run produced, in topic order.
#[derive(Debug, Clone, Default)]
pub struct RunOutput {
    pub topics: Vec<String>,
    pub posts: Vec<String>,
}

impl RunOutput {
    pub fn latest_post(&self) -> Option<&str> {
        self.posts.last().map(String::as_str)
    }

    /// All posts, each under a `=== Post N (Topic: ...) ===` header.
    pub fn raw_output(&self) -> String {
        self.topics
            .iter()
            .zip(&self.posts)
            .enumerate()
            .map(|(i, (t, p))| format!("=== Post {} (Topic: {}) ===\n{}", i + 1, t, p))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Topics to write about: asked from the model in auto mode, otherwise the
/// manual topic repeated `post_count` times.
pub async fn resolve_topics(
    client: &dyn Completion,
    settings: &GenerationSettings,
    default_topic: &str,
) -> Result<Vec<String>, StudioError> {
    match settings.mode {
        Mode::Auto => generate_topics(client, settings.post_count, settings.niche).await,
        Mode::Single => {
            let base = match settings.topic.trim() {
                "" => default_topic.trim(),
                t => t,
            };
            Ok(vec![base.to_string(); settings.post_count])
        }
    }
}

/// Runs topics → posts sequentially and commits history only when every post
/// succeeded. On error the store is left untouched.
pub async fn run_generation(
    client: &dyn Completion,
    settings: &GenerationSettings,
    default_topic: &str,
    store: &mut HistoryStore,
) -> Result<RunOutput, StudioError> {
    client.ready()?;
    let started = Instant::now();
    info!(mode = ?settings.mode, count = settings.post_count, niche = %settings.niche, language = %settings.language, "generation started");

    let topics = resolve_topics(client, settings, default_topic).await?;

    let mut posts = Vec::with_capacity(topics.len());
    let mut records = Vec::with_capacity(topics.len());
    for (idx, topic) in topics.iter().enumerate() {
        let post = write_post(client, topic, settings.language, settings.brand_voice_text())
            .await
            .inspect_err(|e| warn!(post = idx + 1, error = %e, "post generation failed; run discarded"))?;
        records.push(HistoryRecord::new(settings, topic, &post));
        posts.push(post);
    }

    for record in records {
        store.append(record);
    }
    info!(posts = posts.len(), elapsed_ms = started.elapsed().as_millis() as u64, "generation finished");
    Ok(RunOutput { topics, posts })
}
