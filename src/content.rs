//! Article body resolution for the modal.
//!
//! Bodies come from a static table keyed by exact category and exact title.
//! The table is an external YAML asset (a list of [`ContentRecord`]s); the
//! default one ships inside the binary and a replacement can be loaded from
//! disk at start.
//!
//! # Lookup policy
//!
//! Matching is byte-exact on both keys. Anything that misses, including an
//! unknown category, gets a generic body built from the lower-cased
//! category. There is no fuzzy matching and no error path.

use crate::models::{is_known_category, ContentRecord};
use std::collections::HashMap;
use std::error::Error;
use tokio::fs;
use tracing::{debug, info, instrument, warn};

/// Default table embedded at compile time.
pub const BUILTIN_CONTENT_YAML: &str = include_str!("../assets/content.yaml");

/// Section headings every fallback body carries.
pub const FALLBACK_HEADINGS: [&str; 4] = [
    "Background and Context",
    "Key Developments",
    "Community Impact",
    "Looking Ahead",
];

/// Immutable category → title → HTML mapping.
#[derive(Debug, Clone, Default)]
pub struct ContentTable {
    entries: HashMap<String, HashMap<String, String>>,
}

impl ContentTable {
    /// Build a table from records. A later record replaces an earlier one
    /// with the same category and title.
    pub fn from_records(records: Vec<ContentRecord>) -> Self {
        let mut entries: HashMap<String, HashMap<String, String>> = HashMap::new();
        for record in records {
            if !is_known_category(&record.category) {
                debug!(category = %record.category, "Content record outside the printed sections");
            }
            let titles = entries.entry(record.category.clone()).or_default();
            if titles.insert(record.title.clone(), record.body).is_some() {
                warn!(
                    category = %record.category,
                    title = %record.title,
                    "Duplicate content record; later entry wins"
                );
            }
        }
        Self { entries }
    }

    /// Parse a YAML list of records.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, serde_yaml::Error> {
        let records: Vec<ContentRecord> = serde_yaml::from_str(yaml)?;
        Ok(Self::from_records(records))
    }

    /// The table compiled into the crate.
    pub fn builtin() -> Result<Self, serde_yaml::Error> {
        Self::from_yaml_str(BUILTIN_CONTENT_YAML)
    }

    /// Load a table from a YAML file on disk.
    #[instrument(level = "info", skip_all, fields(%path))]
    pub async fn load(path: &str) -> Result<Self, Box<dyn Error>> {
        let yaml = fs::read_to_string(path).await?;
        let table = Self::from_yaml_str(&yaml)?;
        info!(records = table.len(), "Loaded content table");
        Ok(table)
    }

    /// Total number of (category, title) entries.
    pub fn len(&self) -> usize {
        self.entries.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Exact lookup without fallback.
    pub fn get(&self, category: &str, title: &str) -> Option<&str> {
        self.entries
            .get(category)
            .and_then(|titles| titles.get(title))
            .map(String::as_str)
    }

    /// Resolve the modal body for a card. Never fails.
    pub fn resolve(&self, title: &str, category: &str) -> String {
        match self.get(category, title) {
            Some(body) => {
                debug!(%category, %title, "Resolved prewritten article body");
                body.to_string()
            }
            None => {
                debug!(%category, %title, "No prewritten body; using fallback");
                fallback_content(category)
            }
        }
    }
}

/// Generic article body parameterized only by the lower-cased category.
pub fn fallback_content(category: &str) -> String {
    let topic = category.to_lowercase();
    format!(
        r#"
<p>This comprehensive article explores the latest developments in {topic} and their impact on our community. Our detailed coverage provides in-depth analysis and insights into this important topic.</p>

<h3>{background}</h3>
<p>The current situation represents a significant development that affects various aspects of our society. Understanding the full scope of this issue requires examining multiple perspectives and considering long-term implications.</p>

<h3>{developments}</h3>
<p>Recent events have brought this topic to the forefront of public discussion. Stakeholders from various sectors are actively engaged in addressing the challenges and opportunities presented by these changes.</p>

<h3>{impact}</h3>
<p>The implications for our local community are substantial and multifaceted. From economic considerations to social dynamics, these developments will shape our future in meaningful ways.</p>

<h3>{ahead}</h3>
<p>As we move forward, continued monitoring and adaptive strategies will be essential. The coming months will be crucial in determining the ultimate trajectory of these important developments.</p>

<p><em>For more detailed coverage and updates, stay tuned to EDEN Newspaper.</em></p>
"#,
        background = FALLBACK_HEADINGS[0],
        developments = FALLBACK_HEADINGS[1],
        impact = FALLBACK_HEADINGS[2],
        ahead = FALLBACK_HEADINGS[3],
    )
}
