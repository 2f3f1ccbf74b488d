use crate::CachedSnapshot;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Panel instance came up. `force_refresh` skips the cache.
    Opened { force_refresh: bool },
    /// Result of reading the local cache (`None` on a miss).
    CacheRead(Option<CachedSnapshot>),
    /// User clicked the refresh (or retry) control.
    RefreshClicked,
    /// Background asked every open panel to refetch.
    RefreshBroadcast,
    /// Snapshot endpoint answered.
    FetchSucceeded(CachedSnapshot),
    /// Snapshot endpoint failed; the string is shown next to the retry control.
    FetchFailed(String),
    /// User edited the search box.
    QueryChanged(String),
    /// User clicked a category header.
    CategoryToggled(String),
}
