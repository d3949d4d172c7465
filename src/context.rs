//! Service context bundling all port trait objects.

use std::path::Path;
use std::sync::Arc;

use crate::adapters::live::{FirestoreDocumentStore, LiveClock, LiveIdGenerator, LocalDocumentStore};
use crate::adapters::recording::{RecordingClock, RecordingDocumentStore, RecordingIdGenerator};
use crate::adapters::replaying::{ReplayingClock, ReplayingDocumentStore, ReplayingIdGenerator};
use crate::cassette::config::CassetteConfig;
use crate::cassette::format::Cassette;
use crate::cassette::replayer::CassetteReplayer;
use crate::cassette::session::RecordingSession;
use crate::config::Backend;
use crate::ports::{
    Clock, Document, DocumentFuture, DocumentStore, Fields, IdGenerator, RangeQuery,
};

/// Bundles all port trait objects into a single context.
///
/// Each field provides access to one external boundary. Constructors
/// wire up different adapter implementations (live, recording, replaying).
pub struct ServiceContext {
    /// Clock for `createdAt` stamps and default years.
    pub clock: Box<dyn Clock>,
    /// Generator for new certificate IDs.
    pub id_gen: Box<dyn IdGenerator>,
    /// The certificate document database.
    pub documents: Box<dyn DocumentStore>,
}

impl ServiceContext {
    /// Creates a context from explicit adapters.
    #[must_use]
    pub fn new(
        clock: Box<dyn Clock>,
        id_gen: Box<dyn IdGenerator>,
        documents: Box<dyn DocumentStore>,
    ) -> Self {
        Self { clock, id_gen, documents }
    }

    /// Creates a live context against the configured backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the local store file exists but cannot be loaded.
    pub fn live(backend: &Backend) -> Result<Self, String> {
        Ok(Self::new(
            Box::new(LiveClock),
            Box::new(LiveIdGenerator::new()),
            open_documents(backend)?,
        ))
    }

    /// Creates a live context whose port calls are captured by a new
    /// [`RecordingSession`] under `base`.
    ///
    /// The context must be dropped before the session is finished.
    ///
    /// # Errors
    ///
    /// Returns an error if the session directory or the store cannot be opened.
    pub fn recording_at(backend: &Backend, base: &Path) -> Result<(Self, RecordingSession), String> {
        let session = RecordingSession::new(base)?;
        let ctx = Self::new(
            Box::new(RecordingClock::new(Box::new(LiveClock), Arc::clone(&session.clock))),
            Box::new(RecordingIdGenerator::new(
                Box::new(LiveIdGenerator::new()),
                Arc::clone(&session.id_gen),
            )),
            Box::new(RecordingDocumentStore::new(
                open_documents(backend)?,
                Arc::clone(&session.documents),
            )),
        );
        Ok((ctx, session))
    }

    /// Creates a replaying context from a single cassette holding every port.
    ///
    /// Each port gets its own replayer so per-port cursors are independent.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be read or parsed.
    pub fn replaying(path: &Path) -> Result<Self, String> {
        let cassette = Cassette::load(path)?;
        Ok(Self::new(
            Box::new(ReplayingClock::new(CassetteReplayer::new(&cassette))),
            Box::new(ReplayingIdGenerator::new(CassetteReplayer::new(&cassette))),
            Box::new(ReplayingDocumentStore::new(CassetteReplayer::new(&cassette))),
        ))
    }

    /// Creates a replaying context from per-port cassette files.
    ///
    /// Ports without a configured cassette panic with a clear message when
    /// called.
    ///
    /// # Errors
    ///
    /// Returns an error if any configured cassette file cannot be read or parsed.
    pub fn replaying_from(config: &CassetteConfig) -> Result<Self, String> {
        let replayers = config.load_all()?;
        Ok(Self {
            clock: match replayers.clock {
                Some(r) => Box::new(ReplayingClock::new(r)),
                None => Box::new(PanickingClock),
            },
            id_gen: match replayers.id_gen {
                Some(r) => Box::new(ReplayingIdGenerator::new(r)),
                None => Box::new(PanickingIdGenerator),
            },
            documents: match replayers.documents {
                Some(r) => Box::new(ReplayingDocumentStore::new(r)),
                None => Box::new(PanickingDocumentStore),
            },
        })
    }
}

fn open_documents(backend: &Backend) -> Result<Box<dyn DocumentStore>, String> {
    match backend {
        Backend::Local { path } => LocalDocumentStore::open(path)
            .map(|store| Box::new(store) as Box<dyn DocumentStore>)
            .map_err(|e| format!("Failed to open local certificate store: {e}")),
        Backend::Firestore(config) => Ok(Box::new(FirestoreDocumentStore::new(config.clone()))),
    }
}

// --- Panicking adapters for unconfigured ports ---

struct PanickingClock;
impl Clock for PanickingClock {
    fn now(&self) -> chrono::DateTime<chrono::Utc> {
        panic!("Clock port not configured in CassetteConfig: no cassette loaded for clock");
    }
}

struct PanickingIdGenerator;
impl IdGenerator for PanickingIdGenerator {
    fn generate_id(&self) -> String {
        panic!("IdGenerator port not configured in CassetteConfig: no cassette loaded for id_gen");
    }
}

struct PanickingDocumentStore;
impl PanickingDocumentStore {
    fn unconfigured() -> ! {
        panic!(
            "DocumentStore port not configured in CassetteConfig: no cassette loaded for documents"
        );
    }
}
impl DocumentStore for PanickingDocumentStore {
    fn get<'a>(&'a self, _: &'a str, _: &'a str) -> DocumentFuture<'a, Option<Document>> {
        Self::unconfigured()
    }
    fn merge<'a>(&'a self, _: &'a str, _: &'a str, _: &'a Fields) -> DocumentFuture<'a, ()> {
        Self::unconfigured()
    }
    fn query_range<'a>(
        &'a self,
        _: &'a str,
        _: &'a RangeQuery,
    ) -> DocumentFuture<'a, Vec<Document>> {
        Self::unconfigured()
    }
}
