use crate::errors::StudioError;
use crate::prompt;
use crate::provider::Completion;
use crate::settings::Language;

/// Ask the model for one post package. The text comes back exactly as the
/// model produced it; the template is not checked here.
pub async fn write_post(
    client: &dyn Completion,
    topic: &str,
    language: Language,
    brand_voice: &str,
) -> Result<String, StudioError> {
    let system = prompt::system_prompt_writer(language, brand_voice);
    let user = prompt::user_prompt_writer(topic);
    client.complete(&system, &user, prompt::WRITER_TEMPERATURE).await
}
