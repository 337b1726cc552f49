// Per-route static HTML generation from a single built template

pub mod manifest;
pub mod plan;
pub mod prerender;
pub mod sink;
pub mod template;

pub use manifest::{MANIFEST_FILE, Manifest, write_manifest};
pub use plan::{Collision, OutputPlan, PlanError, find_collisions, plan};
pub use prerender::{PageOutcome, PageStatus, PrerenderReport, Prerenderer, RenderedPage, prerender};
pub use sink::{FsSink, OutputSink};
pub use template::{RenderOptions, Template, TemplateError, html_escape};
