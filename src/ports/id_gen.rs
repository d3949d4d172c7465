//! ID generator port for certificate identifiers.

/// Produces human-shareable certificate identifiers.
///
/// Live generation is random, so replay substitutes a recorded sequence.
pub trait IdGenerator: Send + Sync {
    /// Generates a new certificate identifier.
    fn generate_id(&self) -> String;
}
