//! Records exchanged with the store and produced by extraction

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::utils::UNTITLED_PDF;

/// A page to scrape, owned by the entity source
///
/// A null or missing `url` decodes as an empty string; the batch then treats
/// the entity as unrenderable instead of failing the whole listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub url: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl Entity {
    pub fn new(id: i64, name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id,
            name: Some(name.into()),
            url: url.into(),
        }
    }
}

/// Anchor as read from the live DOM
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RawAnchor {
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub text: String,
}

impl RawAnchor {
    pub fn new(href: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            href: Some(href.into()),
            text: text.into(),
        }
    }
}

/// A PDF link resolved to an absolute http(s) URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedLink {
    pub title: String,
    pub link: String,
}

impl NormalizedLink {
    pub(crate) fn new(text: &str, link: String) -> Self {
        let text = text.trim();
        let title = if text.is_empty() {
            UNTITLED_PDF.to_string()
        } else {
            text.to_string()
        };
        Self { title, link }
    }
}

/// One row per entity; each run replaces the previous row wholesale
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationRecord {
    pub stock_id: i64,
    pub stock_name: Option<String>,
    pub stock_url: String,
    pub title: Option<String>,
    pub pdf_links: Vec<String>,
    pub scraped_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ReconciliationRecord {
    /// Build the record for `entity` from this run's links, stamped `now`
    #[must_use]
    pub fn from_links(entity: &Entity, links: &[NormalizedLink], now: DateTime<Utc>) -> Self {
        Self {
            stock_id: entity.id,
            stock_name: entity.name.clone(),
            stock_url: entity.url.clone(),
            title: entity.name.clone(),
            pdf_links: links.iter().map(|l| l.link.clone()).collect(),
            scraped_at: now,
            updated_at: now,
        }
    }
}
