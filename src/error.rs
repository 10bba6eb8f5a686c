use alloc::collections::TryReserveError;

/// Failure outcomes of [`StrMap`](crate::StrMap) operations.
///
/// Every variant describes a data condition, not misuse: the table is left
/// exactly as it was before the failing call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The key is absent where the operation requires it to be present.
    #[error("key not found")]
    NotFound,
    /// The key is present where a strict insert requires it to be absent.
    #[error("key already present")]
    Duplicate,
    /// The table had to grow to place a new key and could not.
    #[error("map is full and could not grow")]
    MapFull,
    /// The slot array could not be allocated.
    #[error("slot array allocation failed")]
    Alloc(#[from] TryReserveError),
    /// The requested capacity does not fit in `usize`.
    #[error("requested capacity overflows usize")]
    CapacityOverflow,
}
