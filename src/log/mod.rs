use async_trait::async_trait;
use fs_err as fs;
use serde::Serialize;
use serde_json::to_string_pretty;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, warn};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};
use uuid::Uuid;

use crate::errors::StudioError;
use crate::provider::Completion;

/// Stderr logging. `RUST_LOG` wins over the `--debug` switch.
pub fn init_tracing(debug: bool) {
    let fallback = if debug { "content_studio=debug,warn" } else { "content_studio=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

pub fn run_dir(root: &Path, run: Uuid) -> PathBuf {
    root.join(".studio").join("runs").join(run.to_string())
}

#[derive(Serialize)]
struct Exchange<'a> {
    system: &'a str,
    user: &'a str,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

pub fn save_stage(
    dir: &Path,
    stage: &str,
    system: &str,
    user: &str,
    temperature: f32,
    outcome: &Result<String, StudioError>,
) -> anyhow::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let exchange = Exchange {
        system,
        user,
        temperature,
        response: outcome.as_ref().ok().map(String::as_str),
        error: outcome.as_ref().err().map(|e| e.to_string()),
    };
    let p = dir.join(format!("{stage}.json"));
    fs::write(&p, to_string_pretty(&exchange)?)?;
    Ok(p)
}

/// Wraps a client and writes every exchange of one run to disk.
pub struct Recorder<'a> {
    inner: &'a dyn Completion,
    dir: PathBuf,
    seq: AtomicUsize,
}

impl<'a> Recorder<'a> {
    pub fn new(inner: &'a dyn Completion, dir: PathBuf) -> Self {
        Self { inner, dir, seq: AtomicUsize::new(0) }
    }
}

#[async_trait]
impl<'a> Completion for Recorder<'a> {
    async fn complete(&self, system: &str, user: &str, temperature: f32) -> Result<String, StudioError> {
        let n = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        let outcome = self.inner.complete(system, user, temperature).await;
        let stage = format!("call-{n:02}");
        match save_stage(&self.dir, &stage, system, user, temperature, &outcome) {
            Ok(p) => debug!(path = %p.display(), "transcript saved"),
            // A transcript failure must not fail the run.
            Err(e) => warn!(error = %e, "could not save transcript"),
        }
        outcome
    }

    fn ready(&self) -> Result<(), StudioError> {
        self.inner.ready()
    }
}
