use thiserror::Error;

#[derive(Error, Debug)]
pub enum StudioError {
    #[error("missing API key: set the {0} environment variable")] Auth(String),
    #[error("upstream error: {0}")] Upstream(String),
    #[error("no response from the completion endpoint within {0}s")] Timeout(u64),
    #[error("no history to export yet")] EmptyExport,
    #[error("export failed: {0}")] Export(String),
    #[error("invalid setting: {0}")] InvalidSetting(String),
}
