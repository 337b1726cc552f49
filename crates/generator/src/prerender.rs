use crate::plan::{OutputPlan, PlanError, PlannedPage, plan};
use crate::sink::OutputSink;
use crate::template::{RenderOptions, Template};
use prerender_kit_core::MetadataTable;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// Result of writing one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageStatus {
    Saved,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageOutcome {
    pub index: usize,
    pub url: String,
    pub file_name: String,
    /// Hex SHA-256 of the rendered page
    pub sha256: String,
    pub status: PageStatus,
}

impl PageOutcome {
    pub fn is_saved(&self) -> bool {
        self.status == PageStatus::Saved
    }
}

/// A page rendered in memory but not written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    pub url: String,
    pub file_name: String,
    pub html: String,
}

/// Per-page outcomes of a run, in table order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrerenderReport {
    pub pages: Vec<PageOutcome>,
}

impl PrerenderReport {
    pub fn saved_count(&self) -> usize {
        self.pages.iter().filter(|p| p.is_saved()).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &PageOutcome> {
        self.pages.iter().filter(|p| !p.is_saved())
    }

    /// True when every planned page was written
    pub fn is_success(&self) -> bool {
        self.pages.iter().all(PageOutcome::is_saved)
    }
}

/// Renders a shared template once per route
#[derive(Debug, Clone)]
pub struct Prerenderer {
    template: Template,
    options: Arc<RenderOptions>,
}

impl Prerenderer {
    pub fn new(template: Template, options: RenderOptions) -> Self {
        Self {
            template,
            options: Arc::new(options),
        }
    }

    /// Render every planned page without writing anything
    pub fn render_all(&self, plan: &OutputPlan) -> Vec<RenderedPage> {
        plan.pages
            .iter()
            .map(|page| RenderedPage {
                url: page.entry.url.clone(),
                file_name: page.file_name.clone(),
                html: self.template.render(&page.entry, &self.options),
            })
            .collect()
    }

    /// Render and write every planned page concurrently.
    ///
    /// A failed write only marks its own page as failed; the other pages are
    /// still written. Outcomes come back in table order.
    pub async fn write_all<S>(&self, plan: &OutputPlan, sink: Arc<S>) -> PrerenderReport
    where
        S: OutputSink + ?Sized + 'static,
    {
        let mut tasks = JoinSet::new();

        for page in plan.pages.iter().cloned() {
            let template = self.template.clone();
            let options = Arc::clone(&self.options);
            let sink = Arc::clone(&sink);

            tasks.spawn(async move {
                let html = template.render(&page.entry, &options);
                let sha256 = content_digest(&html);
                let status = match sink.write(&page.file_name, &html).await {
                    Ok(()) => {
                        debug!(file = %page.file_name, url = %page.entry.url, "page written");
                        PageStatus::Saved
                    }
                    Err(err) => {
                        debug!(file = %page.file_name, error = %err, "page write failed");
                        PageStatus::Failed(err.to_string())
                    }
                };

                PageOutcome {
                    index: page.index,
                    url: page.entry.url,
                    file_name: page.file_name,
                    sha256,
                    status,
                }
            });
        }

        let mut slots: Vec<Option<PageOutcome>> = (0..plan.len()).map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(outcome) => {
                    let index = outcome.index;
                    slots[index] = Some(outcome);
                }
                Err(err) => warn!(error = %err, "page write task did not complete"),
            }
        }

        let pages = slots
            .into_iter()
            .zip(&plan.pages)
            .map(|(slot, page)| slot.unwrap_or_else(|| aborted(page)))
            .collect();

        PrerenderReport { pages }
    }
}

fn aborted(page: &PlannedPage) -> PageOutcome {
    PageOutcome {
        index: page.index,
        url: page.entry.url.clone(),
        file_name: page.file_name.clone(),
        sha256: String::new(),
        status: PageStatus::Failed("write task aborted".to_string()),
    }
}

/// Hex SHA-256 of a rendered page
pub fn content_digest(html: &str) -> String {
    format!("{:x}", Sha256::digest(html.as_bytes()))
}

/// Plan, render and write a whole metadata table.
///
/// Collisions are rejected before any page is written.
pub async fn prerender<S>(
    template: Template,
    options: RenderOptions,
    table: &MetadataTable,
    sink: Arc<S>,
) -> Result<PrerenderReport, PlanError>
where
    S: OutputSink + ?Sized + 'static,
{
    let plan = plan(table)?;
    let prerenderer = Prerenderer::new(template, options);
    Ok(prerenderer.write_all(&plan, sink).await)
}
