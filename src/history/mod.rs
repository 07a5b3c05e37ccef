use chrono::{Local, NaiveDateTime};
use serde::Serialize;

use crate::errors::StudioError;
use crate::settings::{GenerationSettings, Language, Mode, Niche};

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRecord {
    pub time: NaiveDateTime,
    pub mode: Mode,
    pub topic: String,
    pub niche: Niche,
    pub language: Language,
    pub brand_voice_used: bool,
    pub post: String,
}

impl HistoryRecord {
    pub fn new(settings: &GenerationSettings, topic: &str, post: &str) -> Self {
        Self {
            time: Local::now().naive_local(),
            mode: settings.mode,
            topic: topic.to_string(),
            niche: settings.niche,
            language: settings.language,
            brand_voice_used: settings.brand_voice_used(),
            post: post.to_string(),
        }
    }

    /// ISO-8601, seconds precision.
    pub fn timestamp(&self) -> String {
        self.time.format("%Y-%m-%dT%H:%M:%S").to_string()
    }
}

/// One CSV row; field order is the header order.
#[derive(Serialize)]
struct CsvRow<'a> {
    time: String,
    mode: &'static str,
    topic: &'a str,
    niche: &'static str,
    language: &'static str,
    brand_voice: &'static str,
    post: &'a str,
}

impl<'a> From<&'a HistoryRecord> for CsvRow<'a> {
    fn from(r: &'a HistoryRecord) -> Self {
        Self {
            time: r.timestamp(),
            mode: r.mode.label(),
            topic: &r.topic,
            niche: r.niche.label(),
            language: r.language.label(),
            brand_voice: if r.brand_voice_used { "yes" } else { "no" },
            post: &r.post,
        }
    }
}

/// Append-only record of what was generated in this session.
#[derive(Debug, Default)]
pub struct HistoryStore {
    records: Vec<HistoryRecord>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, record: HistoryRecord) {
        self.records.push(record);
    }

    pub fn all(&self) -> &[HistoryRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// UTF-8 CSV with a header row. An empty store is an error, not an empty file.
    pub fn export_csv(&self) -> Result<Vec<u8>, StudioError> {
        if self.records.is_empty() {
            return Err(StudioError::EmptyExport);
        }
        let mut w = csv::Writer::from_writer(Vec::new());
        for r in &self.records {
            w.serialize(CsvRow::from(r))
                .map_err(|e| StudioError::Export(format!("csv encoding failed: {e}")))?;
        }
        w.into_inner()
            .map_err(|e| StudioError::Export(format!("csv flush failed: {e}")))
    }
}
