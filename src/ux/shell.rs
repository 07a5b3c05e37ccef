use anyhow::Result;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{BufRead, Write};
use std::path::Path;
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

use crate::config::Config;
use crate::errors::StudioError;
use crate::export;
use crate::history::HistoryStore;
use crate::log::{run_dir, Recorder};
use crate::provider::Completion;
use crate::session::{run_generation, RunOutput};
use crate::settings::{GenerationSettings, Language, Mode, Niche, MAX_POSTS, MIN_POSTS};

/// User-adjustable settings as the shell holds them between runs.
#[derive(Debug, Clone, PartialEq)]
pub struct ShellState {
    pub mode: Mode,
    pub topic: String,
    pub post_count: usize,
    pub niche: Niche,
    pub language: Language,
    pub brand_voice: String,
}

impl Default for ShellState {
    fn default() -> Self {
        Self {
            mode: Mode::Auto,
            topic: "Why getting jobs is harder day by day".into(),
            post_count: 3,
            niche: Niche::MixedGeneral,
            language: Language::English,
            brand_voice: String::new(),
        }
    }
}

impl ShellState {
    pub fn to_settings(&self) -> Result<GenerationSettings, StudioError> {
        GenerationSettings::new(
            self.mode,
            self.topic.clone(),
            self.post_count,
            self.niche,
            self.language,
            Some(self.brand_voice.clone()),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Generate,
    Settings,
    View,
    Export,
    Clear,
    Help,
    Quit,
}

fn parse_command(line: &str) -> Option<Command> {
    match line.trim().to_lowercase().as_str() {
        "g" | "gen" | "generate" => Some(Command::Generate),
        "s" | "settings" => Some(Command::Settings),
        "v" | "view" => Some(Command::View),
        "e" | "export" => Some(Command::Export),
        "c" | "clear" => Some(Command::Clear),
        "h" | "help" | "?" => Some(Command::Help),
        "q" | "quit" | "exit" => Some(Command::Quit),
        _ => None,
    }
}

/// Interactive control surface. The history store is borrowed so the caller
/// owns its lifetime.
pub struct Shell<'a, R, W> {
    client: &'a dyn Completion,
    cfg: &'a Config,
    store: &'a mut HistoryStore,
    input: R,
    out: W,
    pub state: ShellState,
    last_run: Option<RunOutput>,
    progress: bool,
}

impl<'a, R: BufRead, W: Write> Shell<'a, R, W> {
    pub fn new(
        client: &'a dyn Completion,
        cfg: &'a Config,
        store: &'a mut HistoryStore,
        input: R,
        out: W,
    ) -> Self {
        Self {
            client,
            cfg,
            store,
            input,
            out,
            state: ShellState::default(),
            last_run: None,
            progress: false,
        }
    }

    pub fn with_state(mut self, state: ShellState) -> Self {
        self.state = state;
        self
    }

    /// Show a spinner while a run is in flight.
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        let mut s = String::new();
        if self.input.read_line(&mut s)? == 0 {
            return Ok(None);
        }
        Ok(Some(s.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn ask(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.out, "{prompt}: ")?;
        self.out.flush()?;
        self.read_line()
    }

    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        let ans = self.ask(&format!("{prompt} [y/N]"))?.unwrap_or_default();
        let ans = ans.trim().to_lowercase();
        Ok(ans == "y" || ans == "yes")
    }

    fn print_menu(&mut self) -> Result<()> {
        writeln!(
            self.out,
            "\n{}  {}  {}  {}  {}  {}",
            "[g]enerate".green().bold(),
            "[s]ettings".cyan(),
            "[v]iew".cyan(),
            "[e]xport CSV".cyan(),
            "[c]lear history".red(),
            "[q]uit".dimmed()
        )?;
        Ok(())
    }

    fn print_help(&mut self) -> Result<()> {
        writeln!(self.out, "\n{}", "Commands".bold())?;
        for (keys, what) in [
            ("g, generate", "run a generation with the current settings"),
            ("s, settings", "edit mode, topic, post count, niche, language and brand voice"),
            ("v, view", "show topics, raw output, preview and history"),
            ("e, export", "write the session history to CSV"),
            ("c, clear", "clear the session history (asks first)"),
            ("h, help, ?", "show this list"),
            ("q, quit", "leave the studio"),
        ] {
            writeln!(self.out, "  {} {}", format!("{keys:<14}").cyan(), what)?;
        }
        Ok(())
    }

    fn print_settings(&mut self) -> Result<()> {
        let s = &self.state;
        let voice = if s.brand_voice.trim().is_empty() { "(none)".to_string() } else { format!("{} chars", s.brand_voice.chars().count()) };
        writeln!(self.out, "\n{}", "⚙️ Settings".bold())?;
        writeln!(self.out, "  Mode:        {}", s.mode)?;
        let topic = if s.topic.trim().is_empty() { "(default)" } else { s.topic.as_str() };
        writeln!(self.out, "  Topic:       {}", topic)?;
        writeln!(self.out, "  Posts:       {}", s.post_count)?;
        writeln!(self.out, "  Niche:       {}", s.niche)?;
        writeln!(self.out, "  Language:    {}", s.language)?;
        writeln!(self.out, "  Brand voice: {}", voice)?;
        Ok(())
    }

    /// Runs until `quit` or end of input.
    pub async fn run(&mut self) -> Result<()> {
        writeln!(self.out, "{}", "💼 Multi-Agent LinkedIn Content Studio".bold())?;
        self.print_settings()?;
        loop {
            self.print_menu()?;
            let Some(line) = self.ask(">")? else { break };
            if line.trim().is_empty() {
                continue;
            }
            match parse_command(&line) {
                Some(Command::Generate) => self.generate().await?,
                Some(Command::Settings) => self.edit_settings()?,
                Some(Command::View) => self.render_views()?,
                Some(Command::Export) => self.export()?,
                Some(Command::Clear) => self.clear()?,
                Some(Command::Help) => self.print_help()?,
                Some(Command::Quit) => break,
                None => super::warn(&mut self.out, &format!("unknown command: {}", line.trim()))?,
            }
        }
        Ok(())
    }

    fn render_views(&mut self) -> Result<()> {
        super::render_all(&mut self.out, self.last_run.as_ref(), &*self.store)?;
        Ok(())
    }

    pub async fn generate(&mut self) -> Result<()> {
        let settings = match self.state.to_settings() {
            Ok(s) => s,
            Err(e) => {
                super::error(&mut self.out, &e.to_string())?;
                return Ok(());
            }
        };

        let spinner = self.progress.then(|| {
            let pb = ProgressBar::new_spinner();
            pb.set_style(ProgressStyle::with_template("{spinner} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()));
            pb.set_message("Generating content...");
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        });

        let result = if self.cfg.save_transcripts {
            let dir = run_dir(Path::new(&self.cfg.out_dir), Uuid::new_v4());
            debug!(dir = %dir.display(), "recording transcripts");
            let recorder = Recorder::new(self.client, dir);
            run_generation(&recorder, &settings, &self.cfg.default_topic, &mut *self.store).await
        } else {
            run_generation(self.client, &settings, &self.cfg.default_topic, &mut *self.store).await
        };

        if let Some(pb) = spinner {
            pb.finish_and_clear();
        }

        match result {
            Ok(run) => {
                if let Some(post) = run.latest_post() {
                    match export::save_preview(self.cfg, post) {
                        Ok(p) => writeln!(self.out, "Preview saved to {}", p.display())?,
                        Err(e) => super::warn(&mut self.out, &format!("could not save preview: {e:#}"))?,
                    }
                }
                self.last_run = Some(run);
                self.render_views()?;
            }
            Err(e) => super::error(&mut self.out, &e.to_string())?,
        }
        Ok(())
    }

    fn export(&mut self) -> Result<()> {
        match export::save_history_csv(self.cfg, &*self.store) {
            Ok(p) => writeln!(self.out, "{} {}", "⬇️ History exported to".green(), p.display())?,
            Err(e) => match e.downcast_ref::<StudioError>() {
                Some(StudioError::EmptyExport) => super::warn(&mut self.out, "No history to export yet.")?,
                _ => super::error(&mut self.out, &format!("{e:#}"))?,
            },
        }
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        if !self.confirm("Clear all history for this session?")? {
            writeln!(self.out, "Kept history.")?;
            return Ok(());
        }
        self.store.clear();
        self.last_run = None;
        writeln!(self.out, "🧹 History cleared.")?;
        self.render_views()
    }

    fn edit_settings(&mut self) -> Result<()> {
        writeln!(self.out, "(press Enter to keep the current value)")?;

        if let Some(v) = self.ask(&format!("Mode [auto/single] ({})", self.state.mode))? {
            match v.trim().to_lowercase().as_str() {
                "" => {}
                "a" | "auto" => self.state.mode = Mode::Auto,
                "s" | "single" => self.state.mode = Mode::Single,
                other => super::warn(&mut self.out, &format!("unknown mode '{other}', keeping {}", self.state.mode))?,
            }
        }

        if let Some(v) = self.ask(&format!("Topic, used only in Single Topic mode, '-' clears ({})", self.state.topic))? {
            match v.trim() {
                "" => {}
                "-" => self.state.topic.clear(),
                t => self.state.topic = t.to_string(),
            }
        }

        if let Some(v) = self.ask(&format!("Number of posts {MIN_POSTS}-{MAX_POSTS} ({})", self.state.post_count))? {
            if !v.trim().is_empty() {
                match v.trim().parse::<usize>() {
                    Ok(n) => {
                        let clamped = n.clamp(MIN_POSTS, MAX_POSTS);
                        if clamped != n {
                            super::warn(&mut self.out, &format!("post count limited to {clamped}"))?;
                        }
                        self.state.post_count = clamped;
                    }
                    Err(_) => super::warn(&mut self.out, &format!("not a number: {}", v.trim()))?,
                }
            }
        }

        for (i, n) in Niche::ALL.iter().enumerate() {
            writeln!(self.out, "  {}. {}", i + 1, n)?;
        }
        if let Some(v) = self.ask(&format!("Niche ({})", self.state.niche))? {
            let v = v.trim();
            if !v.is_empty() {
                match pick(v, &Niche::ALL).map(Ok).unwrap_or_else(|| v.parse::<Niche>()) {
                    Ok(n) => self.state.niche = n,
                    Err(e) => super::warn(&mut self.out, &e.to_string())?,
                }
            }
        }

        for (i, l) in Language::ALL.iter().enumerate() {
            writeln!(self.out, "  {}. {}", i + 1, l)?;
        }
        if let Some(v) = self.ask(&format!("Language ({})", self.state.language))? {
            let v = v.trim();
            if !v.is_empty() {
                self.state.language = pick(v, &Language::ALL).unwrap_or_else(|| Language::from_name(v));
            }
        }

        writeln!(self.out, "Brand voice: paste 1–3 of your posts, finish with a line containing only '.'")?;
        writeln!(self.out, "(Enter keeps the current sample, '-' clears it)")?;
        if let Some(first) = self.ask("Brand voice")? {
            match first.trim() {
                "" => {}
                "-" => self.state.brand_voice.clear(),
                _ => {
                    let mut lines = vec![first.clone()];
                    while let Some(l) = self.read_line()? {
                        if l.trim() == "." {
                            break;
                        }
                        lines.push(l);
                    }
                    self.state.brand_voice = lines.join("\n");
                }
            }
        }

        self.print_settings()
    }
}

/// 1-based pick from a numbered list.
fn pick<T: Copy>(answer: &str, options: &[T]) -> Option<T> {
    let n = answer.parse::<usize>().ok()?;
    n.checked_sub(1).and_then(|i| options.get(i)).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::testing::ScriptedCompletion;

    const TEMPLATE: &str = "LinkedIn Post:\nRemote teams win on trust.\n\n#remote\n\nSuggested Posting Times:\nPrimary: Tue 9AM – commute\nBackup: Thu 12PM – lunch";

    fn cfg_in(dir: &Path) -> Config {
        Config { out_dir: dir.to_string_lossy().to_string(), ..Config::default() }
    }

    async fn drive(
        client: &dyn Completion,
        cfg: &Config,
        store: &mut HistoryStore,
        state: ShellState,
        script: &str,
    ) -> (String, ShellState) {
        let mut out = Vec::new();
        let mut shell = Shell::new(client, cfg, store, script.as_bytes(), &mut out).with_state(state);
        shell.run().await.unwrap();
        let state = shell.state.clone();
        drop(shell);
        (String::from_utf8(out).unwrap(), state)
    }

    fn manual(topic: &str, count: usize) -> ShellState {
        ShellState { mode: Mode::Single, topic: topic.into(), post_count: count, ..ShellState::default() }
    }

    #[test]
    fn commands_parse_short_and_long_forms() {
        assert_eq!(parse_command("g"), Some(Command::Generate));
        assert_eq!(parse_command(" EXPORT "), Some(Command::Export));
        assert_eq!(parse_command("quit"), Some(Command::Quit));
        assert_eq!(parse_command("dance"), None);
    }

    #[test]
    fn pick_is_one_based() {
        assert_eq!(pick("1", &Niche::ALL), Some(Niche::MixedGeneral));
        assert_eq!(pick("8", &Niche::ALL), Some(Niche::ProductivityFocus));
        assert_eq!(pick("0", &Niche::ALL), None);
        assert_eq!(pick("9", &Niche::ALL), None);
        assert_eq!(pick("career", &Niche::ALL), None);
    }

    #[tokio::test]
    async fn generate_renders_views_and_records_history() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = cfg_in(tmp.path());
        let client = ScriptedCompletion::ok([TEMPLATE, TEMPLATE]);
        let mut store = HistoryStore::new();

        let (out, _) = drive(&client, &cfg, &mut store, manual("Future of remote work", 2), "g\nq\n").await;

        assert_eq!(store.len(), 2);
        assert!(out.contains("1. Future of remote work\n2. Future of remote work"));
        assert!(out.contains("=== Post 2 (Topic: Future of remote work) ==="));
        assert!(out.contains("Remote teams win on trust."));
        assert!(out.contains("Primary: Tue 9AM"));
        assert!(tmp.path().join(&cfg.preview_file_name).exists());
    }

    #[tokio::test]
    async fn generate_without_key_reports_auth_error() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = cfg_in(tmp.path());
        let client = ScriptedCompletion::unauthenticated();
        let mut store = HistoryStore::new();

        let (out, _) = drive(&client, &cfg, &mut store, ShellState::default(), "g\nq\n").await;

        assert!(out.contains("missing API key"));
        assert!(client.calls().is_empty());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn export_then_clear_then_export_warns() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = cfg_in(tmp.path());
        let client = ScriptedCompletion::ok([TEMPLATE]);
        let mut store = HistoryStore::new();

        let (out, _) = drive(&client, &cfg, &mut store, manual("t", 1), "g\ne\nc\ny\ne\nq\n").await;

        let csv = std::fs::read_to_string(tmp.path().join(&cfg.csv_file_name)).unwrap();
        assert_eq!(csv::Reader::from_reader(csv.as_bytes()).records().count(), 1);
        assert!(out.contains("History exported to"));
        assert!(out.contains("History cleared."));
        assert!(out.contains("No posts generated yet in this session."));
        assert!(out.contains("No history to export yet."));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn declined_clear_keeps_history() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = cfg_in(tmp.path());
        let client = ScriptedCompletion::ok([TEMPLATE]);
        let mut store = HistoryStore::new();

        drive(&client, &cfg, &mut store, manual("t", 1), "g\nc\nn\nq\n").await;
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn failed_run_keeps_previous_history() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = cfg_in(tmp.path());
        let client = ScriptedCompletion::new(vec![
            Ok(TEMPLATE.into()),
            Ok(TEMPLATE.into()),
            Err(StudioError::Timeout(60)),
        ]);
        let mut store = HistoryStore::new();

        let (out, _) = drive(&client, &cfg, &mut store, manual("t", 1), "g\ns\n\n\n2\n\n\n\ng\nq\n").await;

        assert_eq!(store.len(), 1);
        assert!(out.contains("within 60s"));
    }

    #[tokio::test]
    async fn settings_editor_updates_every_field() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = cfg_in(tmp.path());
        let client = ScriptedCompletion::ok(Vec::<String>::new());
        let mut store = HistoryStore::new();

        let script = "s\nsingle\nHiring in 2025\n42\n4\nspanish\nWe write short.\nNo jargon.\n.\nq\n";
        let (out, state) = drive(&client, &cfg, &mut store, ShellState::default(), script).await;

        assert_eq!(
            state,
            ShellState {
                mode: Mode::Single,
                topic: "Hiring in 2025".into(),
                post_count: MAX_POSTS,
                niche: Niche::CareerJobs,
                language: Language::Spanish,
                brand_voice: "We write short.\nNo jargon.".into(),
            }
        );
        assert!(out.contains("post count limited to 10"));
    }

    #[tokio::test]
    async fn brand_voice_can_be_cleared() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = cfg_in(tmp.path());
        let client = ScriptedCompletion::ok(Vec::<String>::new());
        let mut store = HistoryStore::new();
        let start = ShellState { brand_voice: "old voice".into(), ..ShellState::default() };

        let (_, state) = drive(&client, &cfg, &mut store, start, "s\n\n\n\n\n\n-\nq\n").await;
        assert!(state.brand_voice.is_empty());
    }

    #[tokio::test]
    async fn cleared_topic_falls_back_to_default_topic() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = cfg_in(tmp.path());
        let client = ScriptedCompletion::ok([TEMPLATE]);
        let mut store = HistoryStore::new();

        let (out, state) = drive(&client, &cfg, &mut store, manual("t", 1), "s\n\n-\n\n\n\n\ng\nq\n").await;

        assert!(state.topic.is_empty());
        assert!(out.contains(&format!("1. {}", cfg.default_topic)));
        assert_eq!(store.all()[0].topic, cfg.default_topic);
        assert!(client.calls()[0].user.contains(&cfg.default_topic));
    }

    #[tokio::test]
    async fn help_lists_every_command() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = cfg_in(tmp.path());
        let client = ScriptedCompletion::ok(Vec::<String>::new());
        let mut store = HistoryStore::new();

        let (out, _) = drive(&client, &cfg, &mut store, ShellState::default(), "?\nq\n").await;

        for cmd in ["generate", "settings", "view", "export", "clear", "quit"] {
            assert!(out.contains(cmd), "missing {cmd}");
        }
        assert!(out.contains("write the session history to CSV"));
    }

    #[tokio::test]
    async fn end_of_input_exits_cleanly() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = cfg_in(tmp.path());
        let client = ScriptedCompletion::ok(Vec::<String>::new());
        let mut store = HistoryStore::new();
        let (out, _) = drive(&client, &cfg, &mut store, ShellState::default(), "v\n").await;
        assert!(out.contains("No posts generated yet in this session."));
    }
}
