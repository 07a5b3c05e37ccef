use async_trait::async_trait;

use crate::config::Config;
use crate::errors::StudioError;

pub mod chat;

/// One system/user exchange with a text-generation backend.
#[async_trait]
pub trait Completion: Send + Sync {
    async fn complete(&self, system: &str, user: &str, temperature: f32) -> Result<String, StudioError>;

    /// Fails when the backend cannot be called at all (e.g. no credential).
    fn ready(&self) -> Result<(), StudioError> {
        Ok(())
    }
}

pub type DynCompletion = Box<dyn Completion + Send + Sync>;

pub fn make_client(cfg: &Config, api_key: Option<String>) -> Result<DynCompletion, StudioError> {
    Ok(Box::new(chat::ChatClient::new(cfg, api_key)?))
}
