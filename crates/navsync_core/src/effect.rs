use crate::CachedSnapshot;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Read the snapshot slot of the local cache.
    ReadCache,
    /// Call the remote snapshot endpoint.
    FetchSnapshot,
    /// Replace the cached snapshot as a whole.
    WriteCache(CachedSnapshot),
}
