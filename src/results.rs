//! Win/loss destinations and the result fetch contract
//!
//! The result endpoint answers with `{ "winner": "...", "loser": "..." }`.
//! Fetching is modeled as a polled [`ResultSource`]; whatever performs the
//! actual HTTP request lives outside this crate.

use std::cell::RefCell;
use std::fmt;
use std::path::PathBuf;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::sim::{Outcome, OutcomeReporter};

/// Destination pair served by the result endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destinations {
    pub winner: String,
    pub loser: String,
}

impl Destinations {
    /// Decode an endpoint response body
    pub fn from_json(body: &[u8]) -> Result<Self, FetchError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(FetchError::NoData);
        }
        Ok(serde_json::from_slice(body)?)
    }

    pub fn for_outcome(&self, outcome: Outcome) -> &str {
        match outcome {
            Outcome::Win => &self.winner,
            Outcome::Loss => &self.loser,
        }
    }
}

/// Errors from the result fetch
#[derive(Debug)]
pub enum FetchError {
    /// Request never produced a response
    Transport(String),
    /// Response carried no body
    NoData,
    /// Body was not a destination pair
    Decode(serde_json::Error),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Transport(msg) => write!(f, "result request failed: {}", msg),
            FetchError::NoData => write!(f, "result response was empty"),
            FetchError::Decode(e) => write!(f, "failed to decode results: {}", e),
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FetchError::Decode(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::Decode(e)
    }
}

/// Something that can fetch the destination pair
pub trait ResultSource {
    /// Begin fetching from `endpoint`
    fn request(&mut self, endpoint: &str);

    /// Completed result, yielded once
    fn poll(&mut self) -> Option<Result<Destinations, FetchError>>;
}

/// Presents a destination full-screen
pub trait Navigator {
    fn open(&mut self, destination: &str);
}

impl<F: FnMut(&str)> Navigator for F {
    fn open(&mut self, destination: &str) {
        self(destination)
    }
}

/// Destination pair shared between the host and the scene's reporter
pub type SharedDestinations = Rc<RefCell<Option<Destinations>>>;

/// Turns round outcomes into navigation
pub struct NavigationReporter<N: Navigator> {
    destinations: SharedDestinations,
    navigator: N,
}

impl<N: Navigator> NavigationReporter<N> {
    pub fn new(destinations: SharedDestinations, navigator: N) -> Self {
        Self {
            destinations,
            navigator,
        }
    }
}

impl<N: Navigator> OutcomeReporter for NavigationReporter<N> {
    fn round_ended(&mut self, outcome: Outcome) {
        let destinations = self.destinations.borrow();
        match destinations.as_ref() {
            Some(d) => self.navigator.open(d.for_outcome(outcome)),
            None => log::warn!("No destinations for {:?}; staying on the game", outcome),
        }
    }
}

/// Serves a response body from memory or disk, for headless runs and tests
#[derive(Debug)]
pub struct PayloadSource {
    payload: Payload,
    pending: Option<Result<Destinations, FetchError>>,
}

#[derive(Debug)]
enum Payload {
    Bytes(Vec<u8>),
    File(PathBuf),
    Unreachable(String),
}

impl PayloadSource {
    pub fn from_bytes(body: impl Into<Vec<u8>>) -> Self {
        Self::with(Payload::Bytes(body.into()))
    }

    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self::with(Payload::File(path.into()))
    }

    /// A source whose every request fails at the transport level
    pub fn unreachable(reason: impl Into<String>) -> Self {
        Self::with(Payload::Unreachable(reason.into()))
    }

    fn with(payload: Payload) -> Self {
        Self {
            payload,
            pending: None,
        }
    }
}

impl ResultSource for PayloadSource {
    fn request(&mut self, endpoint: &str) {
        log::debug!("Requesting results from {}", endpoint);
        let result = match &self.payload {
            Payload::Bytes(body) => Destinations::from_json(body),
            Payload::File(path) => std::fs::read(path)
                .map_err(|e| FetchError::Transport(format!("{}: {}", path.display(), e)))
                .and_then(|body| Destinations::from_json(&body)),
            Payload::Unreachable(reason) => Err(FetchError::Transport(reason.clone())),
        };
        self.pending = Some(result);
    }

    fn poll(&mut self) -> Option<Result<Destinations, FetchError>> {
        self.pending.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"{"winner":"https://example.com/win","loser":"https://example.com/lose"}"#;

    #[test]
    fn test_decode_destinations() {
        let d = Destinations::from_json(BODY.as_bytes()).unwrap();
        assert_eq!(d.for_outcome(Outcome::Win), "https://example.com/win");
        assert_eq!(d.for_outcome(Outcome::Loss), "https://example.com/lose");
    }

    #[test]
    fn test_decode_failures() {
        assert!(matches!(Destinations::from_json(b""), Err(FetchError::NoData)));
        assert!(matches!(
            Destinations::from_json(br#"{"winner":"a"}"#),
            Err(FetchError::Decode(_))
        ));
        assert!(matches!(
            Destinations::from_json(b"<html>"),
            Err(FetchError::Decode(_))
        ));
    }

    #[test]
    fn test_payload_source_yields_once() {
        let mut source = PayloadSource::from_bytes(BODY);
        assert!(source.poll().is_none());
        source.request("https://example.com");
        assert!(matches!(source.poll(), Some(Ok(_))));
        assert!(source.poll().is_none());
    }

    #[test]
    fn test_missing_file_is_transport_error() {
        let mut source = PayloadSource::from_file("/nonexistent/tilt-gap/results.json");
        source.request("https://example.com");
        assert!(matches!(source.poll(), Some(Err(FetchError::Transport(_)))));
    }

    #[test]
    fn test_reporter_without_destinations_does_nothing() {
        let opened = Rc::new(RefCell::new(Vec::<String>::new()));
        let sink = Rc::clone(&opened);
        let shared: SharedDestinations = Rc::new(RefCell::new(None));
        let mut reporter =
            NavigationReporter::new(Rc::clone(&shared), move |d: &str| sink.borrow_mut().push(d.to_string()));

        reporter.round_ended(Outcome::Win);
        assert!(opened.borrow().is_empty());

        *shared.borrow_mut() = Some(Destinations::from_json(BODY.as_bytes()).unwrap());
        reporter.round_ended(Outcome::Loss);
        assert_eq!(*opened.borrow(), vec!["https://example.com/lose".to_string()]);
    }
}
