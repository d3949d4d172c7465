//! Replaying adapters that serve recorded interactions.

pub mod clock;
pub mod documents;
pub mod id_gen;

pub use clock::ReplayingClock;
pub use documents::ReplayingDocumentStore;
pub use id_gen::ReplayingIdGenerator;

use std::sync::Mutex;

use serde::de::DeserializeOwned;

use crate::cassette::replayer::CassetteReplayer;
use crate::ports::DocumentError;

/// Take the output of the next `port::method` interaction.
///
/// Mirror of `recording::record_interaction`.
pub(crate) fn next_output(
    replayer: &Mutex<CassetteReplayer>,
    port: &str,
    method: &str,
) -> serde_json::Value {
    let mut replayer = replayer.lock().expect("replayer lock poisoned");
    replayer.next_interaction(port, method).output.clone()
}

/// Decode an `{"ok": v}` / `{"err": e}` output back into a `Result`.
///
/// Mirror of `recording::record_result`. Outputs that fit neither shape
/// surface as [`DocumentError::Malformed`].
pub(crate) fn replay_result<T: DeserializeOwned>(
    output: serde_json::Value,
    context: &str,
) -> Result<T, DocumentError> {
    let serde_json::Value::Object(mut map) = output else {
        return Err(DocumentError::Malformed(format!("{context}: expected ok/err object")));
    };
    if let Some(err) = map.remove("err") {
        return Err(serde_json::from_value(err).unwrap_or_else(|e| {
            DocumentError::Malformed(format!("{context}: undecodable recorded error: {e}"))
        }));
    }
    let value = map
        .remove("ok")
        .ok_or_else(|| DocumentError::Malformed(format!("{context}: missing ok/err key")))?;
    serde_json::from_value(value)
        .map_err(|e| DocumentError::Malformed(format!("{context}: failed to deserialize: {e}")))
}
