//! Native data access: platform directories and the one-shot question fetch.

use crate::app_core::indexing::{QuestionsIndex, build_questions_index};
use crate::decode::EntityDecoder;
use crate::model::{ApiResponse, Question};
use anyhow::Result;
use std::fs;
use std::io::Read;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use thiserror::Error;

/// Largest response body accepted. One batch of 50 questions is a few tens of KiB.
pub const MAX_BODY_BYTES: u64 = 4 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server responded with {0}")]
    Status(reqwest::StatusCode),

    #[error("Failed to read response body: {0}")]
    Body(#[from] std::io::Error),

    #[error("Malformed response body: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Response body of {0} bytes exceeds the limit of {limit} bytes", limit = MAX_BODY_BYTES)]
    TooLarge(u64),

    #[error("Fetch worker stopped without a result")]
    WorkerLost,
}

/// Messages from the fetch worker to the event loop.
#[derive(Debug)]
pub enum LoadEvent {
    Progress(DownloadProgress),
    Finished(Result<Vec<Question>, FetchError>),
}

#[derive(Debug, Clone, Copy)]
pub struct DownloadProgress {
    pub downloaded: u64,
    pub total: Option<u64>,
}

fn project_dirs() -> Result<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "survey-visualizer", "survey-tui")
        .ok_or_else(|| anyhow::anyhow!("Could not determine application directories"))
}

pub fn get_config_dir() -> Result<PathBuf> {
    Ok(project_dirs()?.config_dir().to_path_buf())
}

pub fn get_data_dir() -> Result<PathBuf> {
    let data_dir = project_dirs()?.data_dir().to_path_buf();
    fs::create_dir_all(&data_dir)?;
    Ok(data_dir)
}

/// Fraction of the download completed. Without a content length the ratio
/// creeps towards 1 as bytes arrive.
pub fn progress_ratio(progress: DownloadProgress) -> f64 {
    if let Some(t) = progress.total
        && t > 0
    {
        return progress.downloaded as f64 / t as f64;
    }

    let d = progress.downloaded as f64;
    d / (d + 64_000.0)
}

/// Parses an API body into its question records.
///
/// A non-zero `response_code` is logged but the `results` array is used as-is.
pub fn parse_response(body: &[u8]) -> Result<Vec<Question>, FetchError> {
    let response: ApiResponse = serde_json::from_slice(body)?;
    if response.response_code != 0 {
        tracing::warn!(
            response_code = response.response_code,
            "API reported a non-zero response code"
        );
    }
    Ok(response.results)
}

/// Downloads and parses one batch of questions from `url`.
pub fn fetch_questions_with_progress<F>(
    url: &str,
    mut on_progress: F,
) -> Result<Vec<Question>, FetchError>
where
    F: FnMut(DownloadProgress),
{
    let client = reqwest::blocking::Client::builder()
        .user_agent(concat!("survey-tui/", env!("CARGO_PKG_VERSION")))
        .build()?;
    let mut response = client.get(url).send()?;
    if !response.status().is_success() {
        return Err(FetchError::Status(response.status()));
    }

    let total = response.content_length();
    if let Some(len) = total
        && len > MAX_BODY_BYTES
    {
        return Err(FetchError::TooLarge(len));
    }
    let mut body = Vec::new();
    let mut downloaded = 0u64;
    let mut buffer = [0u8; 16384];

    on_progress(DownloadProgress { downloaded, total });
    loop {
        let read = response.read(&mut buffer)?;
        if read == 0 {
            break;
        }
        downloaded += read as u64;
        if downloaded > MAX_BODY_BYTES {
            return Err(FetchError::TooLarge(downloaded));
        }
        body.extend_from_slice(&buffer[..read]);
        on_progress(DownloadProgress { downloaded, total });
    }

    parse_response(&body)
}

/// Starts the single question fetch on a worker thread.
///
/// Progress is throttled to 1% steps; the final message is always `Finished`
/// unless the worker dies, which [`next_load_event`] reports as a failure.
pub fn spawn_fetch(url: String) -> Receiver<LoadEvent> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        tracing::info!(url = %url, "fetching questions");
        let progress_tx = tx.clone();
        let mut last_ratio = -1.0;
        let result = fetch_questions_with_progress(&url, |progress| {
            let ratio = progress_ratio(progress);
            if (ratio - last_ratio).abs() >= 0.01 {
                last_ratio = ratio;
                let _ = progress_tx.send(LoadEvent::Progress(progress));
            }
        });
        // The receiver is gone only if the UI already quit.
        let _ = tx.send(LoadEvent::Finished(result));
    });
    rx
}

/// Non-blocking read of the next worker message.
///
/// A disconnected channel means the worker exited without reporting, so it is
/// turned into `Finished(Err(WorkerLost))` and the caller can still install an
/// empty index.
pub fn next_load_event(rx: &Receiver<LoadEvent>) -> Option<LoadEvent> {
    match rx.try_recv() {
        Ok(event) => Some(event),
        Err(TryRecvError::Empty) => None,
        Err(TryRecvError::Disconnected) => {
            Some(LoadEvent::Finished(Err(FetchError::WorkerLost)))
        }
    }
}

/// Builds the index for a finished fetch. A failure is logged and yields an
/// empty index.
pub fn index_fetch_result<D>(
    result: Result<Vec<Question>, FetchError>,
    decoder: &D,
) -> QuestionsIndex
where
    D: EntityDecoder + ?Sized,
{
    let raw = match result {
        Ok(raw) => {
            tracing::info!(count = raw.len(), "fetched questions");
            raw
        }
        Err(err) => {
            tracing::warn!(error = %err, "failed to fetch questions");
            Vec::new()
        }
    };
    build_questions_index(raw, decoder)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_core::state::{AppState, LoadStatus};
    use crate::decode::HtmlEntityDecoder;
    use crate::theme::Theme;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use std::net::TcpListener;

    /// Serves `head` (status line and headers) plus `body` to one connection
    /// and returns the URL to request.
    fn serve_once(head: String, body: &'static [u8]) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut request = [0u8; 4096];
                let _ = stream.read(&mut request);
                let _ = stream.write_all(head.as_bytes());
                let _ = stream.write_all(body);
                let _ = stream.flush();
            }
        });
        format!("http://{}/api.php?amount=50", addr)
    }

    #[test]
    fn test_parse_response_reads_results() {
        let body = r#"{
            "response_code": 0,
            "results": [
                {"type": "multiple", "difficulty": "easy", "category": "Art",
                 "question": "Who painted &quot;Guernica&quot;?",
                 "correct_answer": "Pablo Picasso",
                 "incorrect_answers": ["Dali", "Miro", "Goya"]}
            ]
        }"#;
        let questions = parse_response(body.as_bytes()).unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].category, "Art");
        assert_eq!(questions[0].kind, "multiple");
        // decoding happens at indexing time
        assert_eq!(questions[0].question, "Who painted &quot;Guernica&quot;?");
    }

    #[test]
    fn test_parse_response_tolerates_non_zero_code() {
        let questions = parse_response(br#"{"response_code": 5, "results": []}"#).unwrap();
        assert!(questions.is_empty());
    }

    #[test]
    fn test_parse_response_missing_results_is_empty() {
        assert!(parse_response(br#"{"response_code": 0}"#).unwrap().is_empty());
    }

    #[test]
    fn test_parse_response_rejects_garbage() {
        let err = parse_response(b"<html>rate limited</html>").unwrap_err();
        assert!(matches!(err, FetchError::Parse(_)));
    }

    #[test]
    fn test_progress_ratio() {
        let known = DownloadProgress {
            downloaded: 50,
            total: Some(200),
        };
        assert_eq!(progress_ratio(known), 0.25);

        let unknown = DownloadProgress {
            downloaded: 64_000,
            total: None,
        };
        assert_eq!(progress_ratio(unknown), 0.5);
        assert_eq!(
            progress_ratio(DownloadProgress {
                downloaded: 0,
                total: Some(0)
            }),
            0.0
        );
    }

    #[test]
    fn test_parse_response_rejects_invalid_utf8() {
        let body = b"{\"response_code\": 0, \"results\": [{\"question\": \"\xff\"}]}";
        assert!(matches!(parse_response(body), Err(FetchError::Parse(_))));
    }

    #[test]
    fn test_fetch_reads_local_server() {
        let body: &[u8] = br#"{"response_code": 0, "results": [{"category": "Art", "difficulty": "easy", "question": "Q"}]}"#;
        let head = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            body.len()
        );
        let url = serve_once(head, body);
        let mut last = None;
        let questions = fetch_questions_with_progress(&url, |p| last = Some(p)).unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(last.map(|p| p.downloaded), Some(body.len() as u64));
    }

    #[test]
    fn test_fetch_rejects_inflated_content_length() {
        for declared in [1_000_000_000_000_000u64, 9_300_000_000_000_000_000] {
            let head = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                declared
            );
            let url = serve_once(head, b"{}");
            let result = fetch_questions_with_progress(&url, |_| {});
            assert!(
                matches!(result, Err(FetchError::TooLarge(len)) if len == declared),
                "declared {declared}: {result:?}"
            );
        }
    }

    #[test]
    fn test_fetch_server_error_status() {
        let head = "HTTP/1.1 503 Service Unavailable\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
            .to_string();
        let url = serve_once(head, b"");
        let result = fetch_questions_with_progress(&url, |_| {});
        assert!(matches!(result, Err(FetchError::Status(status)) if status.as_u16() == 503));
    }

    #[test]
    fn test_next_load_event_reports_lost_worker() {
        let (tx, rx) = mpsc::channel::<LoadEvent>();
        assert!(next_load_event(&rx).is_none());

        tx.send(LoadEvent::Progress(DownloadProgress {
            downloaded: 1,
            total: None,
        }))
        .unwrap();
        drop(tx);
        assert!(matches!(next_load_event(&rx), Some(LoadEvent::Progress(_))));

        let Some(LoadEvent::Finished(result)) = next_load_event(&rx) else {
            panic!("expected a finished event after the sender dropped");
        };
        assert!(matches!(result, Err(FetchError::WorkerLost)));

        let mut app = AppState::new(
            Theme::Dracula.config(),
            "v0".to_string(),
            Box::new(HtmlEntityDecoder),
        );
        let index = index_fetch_result(result, app.decoder.as_ref());
        assert!(index.is_empty());
        app.install_index(index, 0.0);
        assert_eq!(app.load_status, LoadStatus::Ready);
        assert!(app.filtered.is_empty());
    }

    #[test]
    fn test_index_fetch_result_builds_on_success() {
        let raw = parse_response(
            br#"{"results": [{"category": "Science &amp; Nature", "difficulty": "hard", "question": "Q"}]}"#,
        )
        .unwrap();
        let index = index_fetch_result(Ok(raw), &HtmlEntityDecoder);
        assert_eq!(index.total_questions(), 1);
        assert!(index.categories.contains_key("Science & Nature"));
    }
}
