use colored::Colorize;
use std::io::{self, Write};

use crate::history::HistoryStore;
use crate::preview;
use crate::session::RunOutput;

pub mod shell;

pub const CARD_WIDTH: usize = 72;

fn section(w: &mut impl Write, title: &str) -> io::Result<()> {
    writeln!(w, "\n{}", format!("=== {title} ===").bold())
}

pub fn show_topics(w: &mut impl Write, topics: &[String]) -> io::Result<()> {
    section(w, "📌 Topics")?;
    if topics.is_empty() {
        return writeln!(w, "(no topics yet)");
    }
    for (i, t) in topics.iter().enumerate() {
        writeln!(w, "{}. {}", i + 1, t)?;
    }
    Ok(())
}

pub fn show_raw_output(w: &mut impl Write, run: &RunOutput) -> io::Result<()> {
    section(w, "📝 Raw Output (All Posts)")?;
    if run.posts.is_empty() {
        return writeln!(w, "(nothing generated yet)");
    }
    writeln!(w, "{}", run.raw_output())
}

pub fn show_preview(w: &mut impl Write, post: Option<&str>) -> io::Result<()> {
    section(w, "👀 LinkedIn-style Preview (Latest Post)")?;
    let Some(post) = post else {
        return writeln!(w, "(nothing to preview yet)");
    };
    writeln!(w, "{}", preview::render_text_card(post, CARD_WIDTH))?;
    let times = preview::extract_posting_times(post);
    if !times.is_empty() {
        writeln!(w, "{}", "Suggested Posting Times:".bold())?;
        for t in times {
            writeln!(w, "  {}", t)?;
        }
    }
    Ok(())
}

fn clip(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

/// History table without the post body.
pub fn show_history(w: &mut impl Write, store: &HistoryStore) -> io::Result<()> {
    section(w, "📜 History")?;
    if store.is_empty() {
        return writeln!(w, "{}", "No posts generated yet in this session.".dimmed());
    }
    writeln!(
        w,
        "{}",
        format!("{:<3} {:<19}  {:<24}  {:<40}  {:<27}  {}", "#", "time", "mode", "topic", "niche", "language").bold()
    )?;
    for (i, r) in store.all().iter().enumerate() {
        writeln!(
            w,
            "{:<3} {:<19}  {:<24}  {:<40}  {:<27}  {}",
            i + 1,
            r.timestamp(),
            r.mode.label(),
            clip(&r.topic, 40),
            r.niche.label(),
            r.language.label()
        )?;
    }
    writeln!(w, "{} record(s)", store.len())
}

/// Every view at once; used after a run and after clearing history.
pub fn render_all(w: &mut impl Write, run: Option<&RunOutput>, store: &HistoryStore) -> io::Result<()> {
    let empty = RunOutput::default();
    let run = run.unwrap_or(&empty);
    show_topics(w, &run.topics)?;
    show_raw_output(w, run)?;
    show_preview(w, run.latest_post())?;
    show_history(w, store)
}

pub fn warn(w: &mut impl Write, msg: &str) -> io::Result<()> {
    writeln!(w, "{} {}", "⚠️".yellow(), msg.yellow())
}

pub fn error(w: &mut impl Write, msg: &str) -> io::Result<()> {
    writeln!(w, "{} {}", "error:".red().bold(), msg)
}

/// Startup banner when no API key is configured; generation stays disabled
/// but the rest of the shell works.
pub fn missing_key_banner(w: &mut impl Write, var: &str) -> io::Result<()> {
    warn(w, &format!("Environment variable {var} is not set."))?;
    writeln!(w, "   Set it before generating, e.g.")?;
    writeln!(w, "     Windows:     set {var}=your_key_here")?;
    writeln!(w, "     Linux/Mac:   export {var}=your_key_here")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::HistoryRecord;
    use crate::settings::{GenerationSettings, Language, Mode, Niche};

    fn text(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn empty_history_shows_notice() {
        let out = text(|w| show_history(w, &HistoryStore::new()));
        assert!(out.contains("No posts generated yet in this session."));
    }

    #[test]
    fn history_table_omits_post_body() {
        let settings =
            GenerationSettings::new(Mode::Auto, "", 1, Niche::CareerJobs, Language::Japanese, None).unwrap();
        let mut store = HistoryStore::new();
        store.append(HistoryRecord::new(&settings, "Quiet quitting", "SECRET BODY TEXT"));
        let out = text(|w| show_history(w, &store));
        assert!(out.contains("Quiet quitting"));
        assert!(out.contains("Career & Jobs"));
        assert!(out.contains("Japanese"));
        assert!(out.contains("Auto Trending (No Input)"));
        assert!(!out.contains("SECRET BODY TEXT"));
        assert!(out.contains("1 record(s)"));
    }

    #[test]
    fn topics_are_numbered() {
        let out = text(|w| show_topics(w, &["a".to_string(), "b".to_string()]));
        assert!(out.contains("1. a\n2. b\n"));
    }

    #[test]
    fn preview_lists_posting_times() {
        let post = "LinkedIn Post:\nHello\n\nSuggested Posting Times:\nPrimary: Mon 9AM\nBackup: Wed 1PM";
        let out = text(|w| show_preview(w, Some(post)));
        assert!(out.contains("Hello"));
        assert!(out.contains("  Primary: Mon 9AM"));
        assert!(out.contains("  Backup: Wed 1PM"));
    }

    #[test]
    fn long_topics_are_clipped() {
        assert_eq!(clip("abcdef", 4), "abc…");
        assert_eq!(clip("abc", 4), "abc");
    }
}
