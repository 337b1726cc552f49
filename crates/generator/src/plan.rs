use prerender_kit_core::{MetadataEntry, MetadataTable};
use std::collections::HashMap;
use std::fmt;

/// Two routes that would write the same output file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
    pub file_name: String,
    pub first_url: String,
    pub second_url: String,
}

impl fmt::Display for Collision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' and '{}' both map to {}",
            self.first_url, self.second_url, self.file_name
        )
    }
}

#[derive(Debug)]
pub enum PlanError {
    Collision(Vec<Collision>),
}

impl fmt::Display for PlanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanError::Collision(collisions) => {
                write!(f, "Output file name collision: ")?;
                let described: Vec<String> = collisions.iter().map(|c| c.to_string()).collect();
                write!(f, "{}", described.join("; "))
            }
        }
    }
}

impl std::error::Error for PlanError {}

/// One route paired with the file it renders to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedPage {
    /// Position in the metadata table
    pub index: usize,
    pub file_name: String,
    pub entry: MetadataEntry,
}

/// Every output file of a run, in table order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputPlan {
    pub pages: Vec<PlannedPage>,
}

impl OutputPlan {
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// Find every pair of routes whose derived file names are equal.
///
/// Each later route is reported against the first route that claimed the name.
pub fn find_collisions(table: &MetadataTable) -> Vec<Collision> {
    let mut claimed: HashMap<String, &str> = HashMap::new();
    let mut collisions = Vec::new();

    for entry in table {
        let file_name = entry.output_file_name();
        match claimed.get(&file_name) {
            Some(first_url) => collisions.push(Collision {
                file_name,
                first_url: first_url.to_string(),
                second_url: entry.url.clone(),
            }),
            None => {
                claimed.insert(file_name, &entry.url);
            }
        }
    }

    collisions
}

/// Derive the output file of every route, refusing tables where two routes
/// would overwrite each other.
pub fn plan(table: &MetadataTable) -> Result<OutputPlan, PlanError> {
    let collisions = find_collisions(table);
    if !collisions.is_empty() {
        return Err(PlanError::Collision(collisions));
    }

    let pages = table
        .iter()
        .enumerate()
        .map(|(index, entry)| PlannedPage {
            index,
            file_name: entry.output_file_name(),
            entry: entry.clone(),
        })
        .collect();

    Ok(OutputPlan { pages })
}
