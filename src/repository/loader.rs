use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use rust_embed::Embed;
use serde_json::Value;
use thiserror::Error;

use crate::repository::question::{Coercion, Question, normalize};

#[derive(Embed)]
#[folder = "assets/data/"]
struct BundledAssets;

const BUNDLED_FILE: &str = "questions.json";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("HTTP {status}")]
    HttpStatus { status: u16 },
    #[error("invalid questions format: expected a JSON array")]
    InvalidFormat,
    #[error("request failed: {0}")]
    Network(String),
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("questions are not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

impl LoadError {
    /// Stable machine-readable kind.
    pub fn reason(&self) -> &'static str {
        match self {
            LoadError::HttpStatus { .. } => "http_status",
            LoadError::InvalidFormat => "invalid_format",
            LoadError::Network(_) => "network",
            LoadError::Io { .. } => "io",
            LoadError::Parse(_) => "parse",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuestionSource {
    Bundled,
    File(PathBuf),
    Url(String),
}

impl QuestionSource {
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case("bundled") {
            QuestionSource::Bundled
        } else if value.starts_with("http://") || value.starts_with("https://") {
            QuestionSource::Url(value.to_string())
        } else {
            QuestionSource::File(PathBuf::from(value))
        }
    }
}

impl fmt::Display for QuestionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionSource::Bundled => write!(f, "bundled {BUNDLED_FILE}"),
            QuestionSource::File(path) => write!(f, "{}", path.display()),
            QuestionSource::Url(url) => write!(f, "{url}"),
        }
    }
}

/// Result of a successful load, including what normalization had to fix.
#[derive(Clone, Debug, Default)]
pub struct LoadReport {
    pub questions: Vec<Question>,
    pub coercions: Vec<Coercion>,
}

pub fn load(source: &QuestionSource) -> Result<Vec<Question>, LoadError> {
    load_with_report(source).map(|report| report.questions)
}

pub fn load_with_report(source: &QuestionSource) -> Result<LoadReport, LoadError> {
    let body = read_source(source)?;
    let report = parse_questions(&body)?;
    log::info!(
        "loaded {} questions from {source} ({} fields coerced)",
        report.questions.len(),
        report.coercions.len()
    );
    Ok(report)
}

/// Parse a questions document. The top level must be an array; each
/// element is normalized on its own so one bad record never aborts the rest.
pub fn parse_questions(body: &str) -> Result<LoadReport, LoadError> {
    let json: Value = serde_json::from_str(body)?;
    let Value::Array(items) = json else {
        return Err(LoadError::InvalidFormat);
    };

    let mut coercions = Vec::new();
    let questions = items
        .iter()
        .enumerate()
        .map(|(i, raw)| normalize(i, raw, &mut coercions))
        .collect();
    for c in &coercions {
        log::debug!("question #{}: {} {}", c.position, c.field, c.detail);
    }
    Ok(LoadReport {
        questions,
        coercions,
    })
}

fn read_source(source: &QuestionSource) -> Result<String, LoadError> {
    match source {
        QuestionSource::Bundled => {
            let file = BundledAssets::get(BUNDLED_FILE).ok_or_else(|| LoadError::Io {
                path: PathBuf::from(BUNDLED_FILE),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not bundled"),
            })?;
            Ok(String::from_utf8_lossy(file.data.as_ref()).into_owned())
        }
        QuestionSource::File(path) => fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.clone(),
            source,
        }),
        QuestionSource::Url(url) => fetch_url(url),
    }
}

#[cfg(feature = "network")]
fn fetch_url(url: &str) -> Result<String, LoadError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(None::<std::time::Duration>)
        .build()
        .map_err(|e| LoadError::Network(e.to_string()))?;
    let response = client
        .get(url)
        .header(reqwest::header::CACHE_CONTROL, "no-store")
        .send()
        .map_err(|e| LoadError::Network(e.to_string()))?;
    let status = response.status();
    if !status.is_success() {
        return Err(LoadError::HttpStatus {
            status: status.as_u16(),
        });
    }
    response
        .text()
        .map_err(|e| LoadError::Network(e.to_string()))
}

#[cfg(not(feature = "network"))]
fn fetch_url(url: &str) -> Result<String, LoadError> {
    Err(LoadError::Network(format!(
        "cannot fetch {url}: built without network support"
    )))
}

/// A question load running on a worker thread.
///
/// Cancellation is cooperative: the load itself is never interrupted, but
/// once cancelled its result is dropped instead of being delivered.
pub struct LoadHandle {
    cancelled: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl LoadHandle {
    pub fn spawn<F>(source: QuestionSource, deliver: F) -> Self
    where
        F: FnOnce(Result<Vec<Question>, LoadError>) + Send + 'static,
    {
        Self::spawn_with(move || load(&source), deliver)
    }

    pub fn spawn_with<L, F>(load_fn: L, deliver: F) -> Self
    where
        L: FnOnce() -> Result<Vec<Question>, LoadError> + Send + 'static,
        F: FnOnce(Result<Vec<Question>, LoadError>) + Send + 'static,
    {
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);
        let thread = thread::spawn(move || {
            let result = load_fn();
            if flag.load(Ordering::SeqCst) {
                log::debug!("question load finished after cancellation, discarding");
                return;
            }
            deliver(result);
        });
        Self {
            cancelled,
            thread: Some(thread),
        }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Block until the worker thread exits.
    pub fn wait(mut self) {
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn object_payload_is_invalid_format() {
        let err = parse_questions("{}").unwrap_err();
        assert!(matches!(err, LoadError::InvalidFormat));
        assert_eq!(err.reason(), "invalid_format");
    }

    #[test]
    fn garbage_payload_is_parse_error() {
        let err = parse_questions("<html>").unwrap_err();
        assert_eq!(err.reason(), "parse");
    }

    #[test]
    fn http_status_reason() {
        let err = LoadError::HttpStatus { status: 404 };
        assert_eq!(err.reason(), "http_status");
        assert_eq!(err.to_string(), "HTTP 404");
    }

    #[test]
    fn malformed_record_does_not_abort_batch() {
        let body = r#"[
            {"id": "a", "category": "Signs", "prompt": "p", "options": ["x", "y"], "answerIndex": 1},
            42,
            {"id": "c", "options": "nope", "answerIndex": "zero"}
        ]"#;
        let report = parse_questions(body).unwrap();
        assert_eq!(report.questions.len(), 3);
        assert_eq!(report.questions[0].answer_index, 1);
        assert_eq!(report.questions[1].id, "");
        assert_eq!(report.questions[2].id, "c");
        assert!(report.questions[2].options.is_empty());
        assert!(report.coercions.iter().any(|c| c.position == 1));
        assert!(report.coercions.iter().any(|c| c.position == 2));
        assert!(report.coercions.iter().all(|c| c.position != 0));
    }

    #[test]
    fn source_parsing() {
        assert_eq!(QuestionSource::parse("bundled"), QuestionSource::Bundled);
        assert_eq!(QuestionSource::parse(""), QuestionSource::Bundled);
        assert_eq!(
            QuestionSource::parse("https://example.com/questions.json"),
            QuestionSource::Url("https://example.com/questions.json".to_string())
        );
        assert_eq!(
            QuestionSource::parse("data/q.json"),
            QuestionSource::File(PathBuf::from("data/q.json"))
        );
    }

    #[test]
    fn bundled_questions_load() {
        let questions = load(&QuestionSource::Bundled).unwrap();
        assert!(questions.len() >= 15);
        assert!(questions.iter().all(|q| !q.id.is_empty()));
        assert!(
            questions
                .iter()
                .all(|q| q.answer_index < q.options.len())
        );
    }

    #[test]
    fn missing_file_is_io_error() {
        let source = QuestionSource::File(PathBuf::from("/definitely/not/here.json"));
        let err = load(&source).unwrap_err();
        assert_eq!(err.reason(), "io");
    }

    #[test]
    fn handle_delivers_result() {
        let (tx, rx) = mpsc::channel();
        let handle = LoadHandle::spawn_with(
            || Ok(Vec::new()),
            move |result| {
                tx.send(result.is_ok()).unwrap();
            },
        );
        handle.wait();
        assert_eq!(rx.recv().unwrap(), true);
    }

    #[test]
    fn cancelled_handle_discards_result() {
        let (gate_tx, gate_rx) = mpsc::channel::<()>();
        let (tx, rx) = mpsc::channel();
        let handle = LoadHandle::spawn_with(
            move || {
                gate_rx.recv().unwrap();
                Ok(Vec::new())
            },
            move |result| {
                let _ = tx.send(result.is_ok());
            },
        );
        handle.cancel();
        assert!(handle.is_cancelled());
        gate_tx.send(()).unwrap();
        handle.wait();
        assert!(rx.try_recv().is_err());
    }
}
