//! Core trait definitions shared across the Aequorea crates.

/// A type whose identity can be derived from its content via cryptographic hash.
///
/// Implementations must be order-independent where the underlying data is a
/// set or graph, so that two equivalent values hash identically.
pub trait ContentAddressable {
    /// Return the content hash as a hex string (e.g. SHA-256).
    fn content_hash(&self) -> String;
}

/// A type that carries annotations (names, identifiers, metadata).
pub trait Annotated {
    /// A human-readable name or identifier.
    fn name(&self) -> &str;

    /// An optional description.
    fn description(&self) -> Option<&str> {
        None
    }
}

/// A type that can produce a summary of its contents.
pub trait Summarizable {
    /// A one-line summary suitable for display.
    fn summary(&self) -> String;
}
