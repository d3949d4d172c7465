//! Live adapters for real external interactions.

pub mod clock;
pub mod firestore;
pub mod id_gen;
pub mod local;

pub use clock::LiveClock;
pub use firestore::FirestoreDocumentStore;
pub use id_gen::LiveIdGenerator;
pub use local::LocalDocumentStore;
