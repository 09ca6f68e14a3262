pub mod memento;
pub mod timestamp;
pub mod wayback;

/// Identifier sent as the `User-Agent` when the caller doesn't supply one.
pub const VERSION: &str = concat!("wayback-probe/", env!("CARGO_PKG_VERSION"));
