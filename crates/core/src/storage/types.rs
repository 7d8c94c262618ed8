use serde::Serialize;

/// Landing-page counters, produced by a single transactional read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SiteStats {
    pub recipes: u64,
    pub users: u64,
    pub visits: u64,
}
