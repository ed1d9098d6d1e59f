use std::collections::BTreeMap;

use serde::Deserialize;

// On-disk phrasebook format
#[derive(Debug, Deserialize)]
pub(crate) struct PhrasebookJson {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub version: String,
    pub pairs: Vec<PairJson>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PairJson {
    pub source: String,
    pub target: String,
    /// Also register every entry in the opposite direction
    #[serde(default)]
    pub symmetric: bool,
    pub entries: BTreeMap<String, String>,
}

fn default_name() -> String {
    "phrasebook".to_string()
}
