//! Data loader
//!
//! One fetch per view, run on a background thread and reported over a
//! channel. The view owns the receiving end; once it is gone a late response
//! has nowhere to land and is dropped.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError};
use tracing::{debug, info, warn};

use crate::advocate::{Advocate, AdvocatesResponse};
use crate::error::{DirectoryError, Result};

/// Default endpoint of the advocate API
pub const DEFAULT_ENDPOINT: &str = "http://localhost:3000/api/advocates";

/// Where advocate records come from
pub trait AdvocateSource: Send + Sync {
    fn fetch(&self) -> Result<Vec<Advocate>>;

    /// Human-readable origin, used in logs and status lines
    fn describe(&self) -> String;
}

/// `GET <endpoint>` returning `{ "data": [...] }`
pub struct HttpSource {
    endpoint: String,
    timeout: Duration,
}

impl HttpSource {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl AdvocateSource for HttpSource {
    fn fetch(&self) -> Result<Vec<Advocate>> {
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()?;

        let response = client.get(&self.endpoint).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(DirectoryError::Status {
                status: status.as_u16(),
                url: self.endpoint.clone(),
            });
        }

        let body = response.bytes()?;
        let payload: AdvocatesResponse = serde_json::from_slice(&body)?;
        Ok(payload.data)
    }

    fn describe(&self) -> String {
        self.endpoint.clone()
    }
}

/// Same envelope, read from disk
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl AdvocateSource for FileSource {
    fn fetch(&self) -> Result<Vec<Advocate>> {
        let raw = fs::read(&self.path)?;
        let payload: AdvocatesResponse = serde_json::from_slice(&raw)?;
        Ok(payload.data)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Messages from the loader thread
#[derive(Debug)]
pub enum LoadEvent {
    Loaded(Vec<Advocate>),
    Failed(String),
}

/// Receiving side of a fetch in flight
pub struct LoadHandle {
    receiver: Receiver<LoadEvent>,
}

impl LoadHandle {
    /// Non-blocking check for the outcome. A loader that vanished without
    /// reporting is turned into a failure.
    pub fn try_recv(&self) -> Option<LoadEvent> {
        match self.receiver.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(LoadEvent::Failed(
                DirectoryError::LoaderDisconnected.reason(),
            )),
        }
    }

    /// Block until the loader reports.
    pub fn wait(self) -> Result<Vec<Advocate>> {
        match self.receiver.recv() {
            Ok(LoadEvent::Loaded(list)) => Ok(list),
            Ok(LoadEvent::Failed(reason)) => Err(DirectoryError::FetchFailed(reason)),
            Err(_) => Err(DirectoryError::LoaderDisconnected),
        }
    }
}

/// Start the one fetch on a background thread.
pub fn spawn(source: Arc<dyn AdvocateSource>) -> LoadHandle {
    let (tx, rx) = bounded(1);

    thread::spawn(move || {
        run_fetch(source.as_ref(), &tx);
    });

    LoadHandle { receiver: rx }
}

/// Fetch once and report. Returns whether anyone was still listening.
pub fn run_fetch(source: &dyn AdvocateSource, tx: &Sender<LoadEvent>) -> bool {
    let origin = source.describe();
    info!("Fetching advocates from {origin}");

    let event = match source.fetch() {
        Ok(list) => {
            info!("Fetched {} advocates from {origin}", list.len());
            LoadEvent::Loaded(list)
        }
        Err(e) => {
            warn!("Fetching advocates from {origin} failed: {e}");
            LoadEvent::Failed(e.reason())
        }
    };

    if tx.send(event).is_err() {
        debug!("View was torn down before the fetch from {origin} completed; discarding response");
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::tests::jane_and_bob;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    struct Fixed(Vec<Advocate>);

    impl AdvocateSource for Fixed {
        fn fetch(&self) -> Result<Vec<Advocate>> {
            Ok(self.0.clone())
        }

        fn describe(&self) -> String {
            "fixed".to_string()
        }
    }

    struct Broken;

    impl AdvocateSource for Broken {
        fn fetch(&self) -> Result<Vec<Advocate>> {
            Err(DirectoryError::Status {
                status: 500,
                url: "http://example.invalid".to_string(),
            })
        }

        fn describe(&self) -> String {
            "broken".to_string()
        }
    }

    #[test]
    fn spawned_fetch_delivers_list() {
        let handle = spawn(Arc::new(Fixed(jane_and_bob())));
        assert_eq!(handle.wait().unwrap(), jane_and_bob());
    }

    #[test]
    fn failure_is_reported_as_event() {
        let (tx, rx) = bounded(1);
        assert!(run_fetch(&Broken, &tx));
        match rx.recv().unwrap() {
            LoadEvent::Failed(reason) => assert!(reason.contains("500"), "{reason}"),
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn response_after_teardown_is_discarded() {
        let (tx, rx) = bounded(1);
        drop(rx);
        assert!(!run_fetch(&Fixed(jane_and_bob()), &tx));
    }

    #[test]
    fn file_source_reads_envelope() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let body = serde_json::to_string(&AdvocatesResponse { data: jane_and_bob() }).unwrap();
        file.write_all(body.as_bytes()).unwrap();

        let source = FileSource::new(file.path());
        assert_eq!(source.fetch().unwrap(), jane_and_bob());
    }

    #[test]
    fn file_source_rejects_bare_array() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"[]").unwrap();

        let err = FileSource::new(file.path()).fetch().unwrap_err();
        assert!(matches!(err, DirectoryError::Decode(_)));
    }
}
