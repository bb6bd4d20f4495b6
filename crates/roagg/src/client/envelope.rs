//! Response envelopes of the registry APIs.
//!
//! Only pagination and lookup fields are typed; records stay raw JSON so the
//! core can parse them per registry and skip what fails.

use serde::Deserialize;
use serde_json::Value;

/// DataCite JSON:API page.
#[derive(Debug, Default, Deserialize)]
pub struct DataCitePage {
    #[serde(default)]
    pub data: Vec<Value>,
    #[serde(default)]
    pub meta: DataCiteMeta,
    #[serde(default)]
    pub links: DataCiteLinks,
}

#[derive(Debug, Default, Deserialize)]
pub struct DataCiteMeta {
    pub total: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DataCiteLinks {
    pub next: Option<String>,
}

/// OpenAIRE Graph list response (`organizations`, `researchProducts`).
#[derive(Debug, Default, Deserialize)]
pub struct OpenAirePage {
    #[serde(default)]
    pub header: OpenAireHeader,
    #[serde(default)]
    pub results: Vec<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenAireHeader {
    pub num_found: Option<u64>,
    pub next_cursor: Option<String>,
}

/// OpenAlex list response.
#[derive(Debug, Default, Deserialize)]
pub struct OpenAlexPage {
    #[serde(default)]
    pub meta: OpenAlexMeta,
    #[serde(default)]
    pub results: Vec<Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct OpenAlexMeta {
    pub count: Option<u64>,
    pub next_cursor: Option<String>,
}

/// Any entity that carries an `id`.
#[derive(Debug, Default, Deserialize)]
pub struct Identified {
    pub id: Option<String>,
}
