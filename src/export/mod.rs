use anyhow::{Context, Result};
use fs_err as fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::info;

use crate::config::Config;
use crate::history::HistoryStore;
use crate::preview;

/// Write through a temp file in the target directory so readers never see a
/// half-written file.
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;
    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("failed to create temp file in {}", dir.display()))?;
    tmp.write_all(data)?;
    tmp.flush()?;
    tmp.persist(path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

/// Export the history as CSV into the output directory.
/// Fails with `StudioError::EmptyExport` (wrapped) when there is nothing to export.
pub fn save_history_csv(cfg: &Config, store: &HistoryStore) -> Result<PathBuf> {
    let bytes = store.export_csv()?;
    let path = Path::new(&cfg.out_dir).join(&cfg.csv_file_name);
    write_atomic(&path, &bytes)?;
    info!(path = %path.display(), rows = store.len(), "history exported");
    Ok(path)
}

pub fn save_preview(cfg: &Config, post: &str) -> Result<PathBuf> {
    let path = Path::new(&cfg.out_dir).join(&cfg.preview_file_name);
    write_atomic(&path, preview::render_preview_page(post).as_bytes())?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::StudioError;
    use crate::history::HistoryRecord;
    use crate::settings::{GenerationSettings, Language, Mode, Niche};

    fn cfg_in(dir: &Path) -> Config {
        Config { out_dir: dir.to_string_lossy().to_string(), ..Config::default() }
    }

    #[test]
    fn empty_history_writes_no_file() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = cfg_in(tmp.path());
        let err = save_history_csv(&cfg, &HistoryStore::new()).unwrap_err();
        assert!(matches!(err.downcast_ref::<StudioError>(), Some(StudioError::EmptyExport)));
        assert!(!tmp.path().join(&cfg.csv_file_name).exists());
    }

    #[test]
    fn csv_lands_in_out_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = cfg_in(&tmp.path().join("nested"));
        let settings =
            GenerationSettings::new(Mode::Auto, "", 1, Niche::CareerJobs, Language::Spanish, None).unwrap();
        let mut store = HistoryStore::new();
        store.append(HistoryRecord::new(&settings, "topic", "post"));

        let path = save_history_csv(&cfg, &store).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("time,mode,topic,niche,language,brand_voice,post\n"));
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn preview_page_is_written() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = cfg_in(tmp.path());
        let path = save_preview(&cfg, "LinkedIn Post:\nHi <there>").unwrap();
        let html = fs::read_to_string(path).unwrap();
        assert!(html.contains("Hi &lt;there&gt;"));
        assert!(html.starts_with("<!DOCTYPE html>"));
    }
}
