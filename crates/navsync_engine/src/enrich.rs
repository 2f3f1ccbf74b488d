//! Sequential, cooperatively cancellable description enrichment.

use navsync_core::{with_description, working_set, EnrichmentProgress, Link};
use navsync_logging::{nav_info, nav_warn};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::generate::DescriptionGenerator;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnrichError {
    #[error("description generator is not configured")]
    NotConfigured,
}

/// Receives job progress. Called on the job's task, between items.
pub trait EnrichmentSink: Send + Sync {
    /// Full link list after one more item got its description.
    fn on_partial_result(&self, links: &[Link]);

    fn on_progress(&self, progress: EnrichmentProgress);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichmentReport {
    pub progress: EnrichmentProgress,
    pub succeeded: usize,
    pub failed: usize,
    /// Link list including every description generated so far.
    pub links: Vec<Link>,
}

impl EnrichmentReport {
    pub fn nothing_to_do(&self) -> bool {
        self.progress.total == 0
    }
}

/// One enrichment run. The target list is fixed when the job is planned.
#[derive(Debug, Clone)]
pub struct EnrichmentJob {
    links: Vec<Link>,
    targets: Vec<Link>,
    cursor: usize,
}

impl EnrichmentJob {
    pub fn plan<F>(links: &[Link], is_missing: F) -> Self
    where
        F: Fn(&Link) -> bool,
    {
        Self {
            links: links.to_vec(),
            targets: working_set(links, is_missing),
            cursor: 0,
        }
    }

    pub fn targets(&self) -> &[Link] {
        &self.targets
    }

    pub async fn run(
        mut self,
        generator: &dyn DescriptionGenerator,
        sink: &dyn EnrichmentSink,
        cancel: &CancellationToken,
    ) -> Result<EnrichmentReport, EnrichError> {
        if !generator.is_configured() {
            return Err(EnrichError::NotConfigured);
        }

        let total = self.targets.len();
        let mut report = EnrichmentReport {
            progress: EnrichmentProgress {
                completed: 0,
                total,
            },
            succeeded: 0,
            failed: 0,
            links: Vec::new(),
        };
        if total == 0 {
            nav_info!("Every link already has a description");
            report.links = self.links;
            return Ok(report);
        }

        while self.cursor < total {
            if cancel.is_cancelled() {
                nav_info!("Enrichment stopped at {}/{}", self.cursor, total);
                break;
            }

            let target = &self.targets[self.cursor];
            match generator.generate(&target.title, &target.url).await {
                Ok(description) => {
                    self.links = with_description(&self.links, &target.id, &description);
                    report.succeeded += 1;
                    sink.on_partial_result(&self.links);
                }
                Err(err) => {
                    report.failed += 1;
                    nav_warn!("Failed to generate for {}: {}", target.title, err);
                }
            }

            self.cursor += 1;
            report.progress.completed = self.cursor;
            sink.on_progress(report.progress);
        }

        report.links = self.links;
        Ok(report)
    }
}

/// Fills missing descriptions in `links`, one item at a time.
pub async fn run_enrichment<F>(
    links: &[Link],
    is_missing: F,
    generator: &dyn DescriptionGenerator,
    sink: &dyn EnrichmentSink,
    cancel: &CancellationToken,
) -> Result<EnrichmentReport, EnrichError>
where
    F: Fn(&Link) -> bool,
{
    EnrichmentJob::plan(links, is_missing)
        .run(generator, sink, cancel)
        .await
}
