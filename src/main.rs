use anyhow::{bail, Context};
use clap::Parser;
use colored::Colorize;
use std::io::{self, IsTerminal, Write};
use std::path::Path;
use tracing::info;
use uuid::Uuid;

mod cli;
mod config;
mod errors;
mod export;
mod history;
mod log;
mod preview;
mod prompt;
mod provider;
mod session;
mod settings;
mod topics;
mod ux;
mod wire;
mod writer;

use history::HistoryStore;
use provider::Completion;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = cli::Args::parse();
    log::init_tracing(args.debug);

    let cfg = config::Config::resolve(&args)?;
    let state = args.shell_state()?;

    // Read once; a missing key only disables generation.
    let api_key = cfg.api_key();
    if api_key.is_none() {
        ux::missing_key_banner(&mut io::stderr(), &cfg.api_key_env)?;
    }
    let client = provider::make_client(&cfg, api_key)?;
    info!(url = %cfg.api_url, model = %cfg.model, out_dir = %cfg.out_dir, "studio starting");

    let mut store = HistoryStore::new();

    if args.batch {
        return run_batch(client.as_ref(), &cfg, &state, &mut store).await;
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    let progress = stdout.is_terminal();
    let mut shell = ux::shell::Shell::new(client.as_ref(), &cfg, &mut store, stdin.lock(), stdout.lock())
        .with_state(state)
        .with_progress(progress);
    shell.run().await
}

/// One generation from the command-line settings, then exit.
async fn run_batch(
    client: &dyn Completion,
    cfg: &config::Config,
    state: &ux::shell::ShellState,
    store: &mut HistoryStore,
) -> anyhow::Result<()> {
    let settings = state.to_settings()?;
    let run = if cfg.save_transcripts {
        let recorder = log::Recorder::new(client, log::run_dir(Path::new(&cfg.out_dir), Uuid::new_v4()));
        session::run_generation(&recorder, &settings, &cfg.default_topic, store).await
    } else {
        session::run_generation(client, &settings, &cfg.default_topic, store).await
    }
    .context("generation failed")?;

    let mut out = io::stdout().lock();
    ux::render_all(&mut out, Some(&run), store)?;

    let Some(post) = run.latest_post() else {
        bail!("the model returned no topics; nothing was generated");
    };
    let preview = export::save_preview(cfg, post)?;
    let csv = export::save_history_csv(cfg, store)?;
    writeln!(out, "\n{} {}", "Preview:".bold(), preview.display())?;
    writeln!(out, "{} {}", "History CSV:".bold(), csv.display())?;
    Ok(())
}
