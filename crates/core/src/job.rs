//! Job ad model and the card projection served to the UI.
//!
//! `JobAd` mirrors the subset of the JobSearch ad payload that jobswipe reads.
//! Every other field is kept in `extra` so the payload stored in the `jobs`
//! table round-trips without loss.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::Error;

/// Maximum excerpt length in characters, ellipsis included.
pub const EXCERPT_MAX_CHARS: usize = 280;

const ELLIPSIS: &str = "...";

/// A job ad as returned by the upstream API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobAd {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employer: Option<Employer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Description>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workplace_address: Option<WorkplaceAddress>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webpage_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_deadline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publication_date: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Employer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Description {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkplaceAddress {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub municipality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Vec<f64>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl JobAd {
    /// Minimal ad with only an id, mostly useful for tests and fixtures.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            headline: None,
            employer: None,
            description: None,
            workplace_address: None,
            logo_url: None,
            webpage_url: None,
            application_deadline: None,
            publication_date: None,
            extra: Map::new(),
        }
    }

    pub fn employer_name(&self) -> Option<&str> {
        self.employer.as_ref().and_then(|e| e.name.as_deref())
    }

    /// Human readable location: city, municipality, region, country.
    ///
    /// Missing and empty parts are skipped; `None` when nothing is left.
    pub fn location_label(&self) -> Option<String> {
        let address = self.workplace_address.as_ref()?;
        let parts: Vec<&str> = [&address.city, &address.municipality, &address.region, &address.country]
            .into_iter()
            .filter_map(|part| part.as_deref())
            .filter(|part| !part.is_empty())
            .collect();

        if parts.is_empty() { None } else { Some(parts.join(", ")) }
    }

    /// Project this ad into a UI card.
    pub fn to_card(&self, swipe: Option<SwipeDirection>) -> JobCard {
        JobCard {
            id: self.id.clone(),
            headline: self.headline.clone(),
            employer: self.employer.as_ref().map(|e| CardEmployer { name: e.name.clone() }),
            location: self.workplace_address.as_ref().map(|a| CardLocation {
                municipality: a.municipality.clone(),
                region: a.region.clone(),
                country: a.country.clone(),
                city: a.city.clone(),
                street_address: a.street_address.clone(),
                coordinates: a.coordinates.clone(),
            }),
            logo_url: self.logo_url.clone(),
            url: self.webpage_url.clone(),
            application_deadline: self.application_deadline.clone(),
            published_at: self.publication_date.clone(),
            excerpt: build_excerpt(self.description.as_ref().and_then(|d| d.text.as_deref())),
            swipe,
        }
    }
}

/// Collapse whitespace and cut the text to [`EXCERPT_MAX_CHARS`].
pub fn build_excerpt(text: Option<&str>) -> Option<String> {
    let normalized = text?.split_whitespace().collect::<Vec<_>>().join(" ");
    if normalized.is_empty() {
        return None;
    }

    if normalized.chars().count() <= EXCERPT_MAX_CHARS {
        return Some(normalized);
    }

    let mut cut: String = normalized.chars().take(EXCERPT_MAX_CHARS - ELLIPSIS.len()).collect();
    cut.push_str(ELLIPSIS);
    Some(cut)
}

/// A left or right swipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwipeDirection {
    Left,
    Right,
}

impl SwipeDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SwipeDirection::Left => "left",
            SwipeDirection::Right => "right",
        }
    }
}

impl fmt::Display for SwipeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SwipeDirection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(SwipeDirection::Left),
            "right" => Ok(SwipeDirection::Right),
            _ => Err(Error::InvalidInput("direction must be 'left' or 'right'".into())),
        }
    }
}

/// UI-facing projection of a job ad plus its swipe state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobCard {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employer: Option<CardEmployer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<CardLocation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_deadline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    pub swipe: Option<SwipeDirection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardEmployer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardLocation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub municipality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Vec<f64>>,
}
