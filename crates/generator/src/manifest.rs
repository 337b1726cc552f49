use crate::prerender::{PageStatus, PrerenderReport};
use crate::sink::OutputSink;
use serde::{Deserialize, Serialize};

pub const MANIFEST_FILE: &str = "prerender-manifest.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ManifestStatus {
    Saved,
    Failed,
}

/// Record of one route in the manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestRoute {
    pub url: String,
    pub file: String,
    pub sha256: String,
    pub status: ManifestStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Summary of a run written next to the pages, so CI can check which routes
/// carry their metadata without parsing console output.
///
/// Contents depend only on the template and table, never on timing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub routes: Vec<ManifestRoute>,
}

impl Manifest {
    pub fn from_report(report: &PrerenderReport) -> Self {
        let routes = report
            .pages
            .iter()
            .map(|page| {
                let (status, error) = match &page.status {
                    PageStatus::Saved => (ManifestStatus::Saved, None),
                    PageStatus::Failed(msg) => (ManifestStatus::Failed, Some(msg.clone())),
                };
                ManifestRoute {
                    url: page.url.clone(),
                    file: page.file_name.clone(),
                    sha256: page.sha256.clone(),
                    status,
                    error,
                }
            })
            .collect();

        Self { routes }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

pub async fn write_manifest<S>(report: &PrerenderReport, sink: &S) -> std::io::Result<()>
where
    S: OutputSink + ?Sized,
{
    let json = Manifest::from_report(report).to_json()?;
    sink.write(MANIFEST_FILE, &json).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prerender::PageOutcome;

    fn report() -> PrerenderReport {
        PrerenderReport {
            pages: vec![
                PageOutcome {
                    index: 0,
                    url: "/".to_string(),
                    file_name: "index.html".to_string(),
                    sha256: "abc".to_string(),
                    status: PageStatus::Saved,
                },
                PageOutcome {
                    index: 1,
                    url: "/albania-tool".to_string(),
                    file_name: "albania-tool.html".to_string(),
                    sha256: "def".to_string(),
                    status: PageStatus::Failed("disk full".to_string()),
                },
            ],
        }
    }

    #[test]
    fn test_manifest_from_report() {
        let manifest = Manifest::from_report(&report());
        assert_eq!(manifest.routes.len(), 2);
        assert_eq!(manifest.routes[0].status, ManifestStatus::Saved);
        assert_eq!(manifest.routes[0].error, None);
        assert_eq!(manifest.routes[1].status, ManifestStatus::Failed);
        assert_eq!(manifest.routes[1].error.as_deref(), Some("disk full"));
    }

    #[test]
    fn test_manifest_json_shape() {
        let json = Manifest::from_report(&report()).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["routes"][0]["file"], "index.html");
        assert_eq!(value["routes"][0]["status"], "saved");
        assert!(value["routes"][0].get("error").is_none());
        assert_eq!(value["routes"][1]["status"], "failed");
    }

    #[test]
    fn test_manifest_is_deterministic() {
        let first = Manifest::from_report(&report()).to_json().unwrap();
        let second = Manifest::from_report(&report()).to_json().unwrap();
        assert_eq!(first, second);
    }
}
