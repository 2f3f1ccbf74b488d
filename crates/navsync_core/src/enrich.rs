use crate::Link;

/// `(completed, total)` for a running enrichment job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EnrichmentProgress {
    pub completed: usize,
    pub total: usize,
}

impl EnrichmentProgress {
    pub fn is_finished(&self) -> bool {
        self.completed >= self.total
    }
}

/// Links to enrich, fixed at job start and in their original order.
pub fn working_set<F>(links: &[Link], is_missing: F) -> Vec<Link>
where
    F: Fn(&Link) -> bool,
{
    links.iter().filter(|link| is_missing(link)).cloned().collect()
}
