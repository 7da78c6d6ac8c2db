use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::FetchError;

/// One user row from the dataset.
///
/// Field names follow the CSV header so that records serialize back to the
/// same shape the browser page reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Headshot", default)]
    pub headshot: String,
    #[serde(rename = "Country")]
    pub country: String,
    #[serde(rename = "Field of Study")]
    pub field_of_study: String,
    #[serde(rename = "Interests")]
    pub interests: String,
    #[serde(rename = "Impact")]
    pub impact: String,
}

impl Record {
    /// Extracts the image URL from an attachment string such as
    /// `photo.png (https://host/path)`.
    pub fn image_url(&self) -> Option<&str> {
        static ATTACHMENT_URL: OnceLock<Regex> = OnceLock::new();
        let re = ATTACHMENT_URL
            .get_or_init(|| Regex::new(r"\((https?://[^)]+)\)").expect("valid attachment regex"));
        re.captures(&self.headshot)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
    }

    pub fn attribute(&self, criteria: Criteria) -> &str {
        match criteria {
            Criteria::Country => &self.country,
            Criteria::FieldOfStudy => &self.field_of_study,
            Criteria::Interests => &self.interests,
            Criteria::Impact => &self.impact,
        }
    }
}

/// The record attribute that drives which text gets embedded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Criteria {
    #[default]
    Country,
    #[serde(rename = "Field of Study")]
    FieldOfStudy,
    Interests,
    Impact,
}

impl Criteria {
    pub const ALL: [Self; 4] = [
        Self::Country,
        Self::FieldOfStudy,
        Self::Interests,
        Self::Impact,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Country => "Country",
            Self::FieldOfStudy => "Field of Study",
            Self::Interests => "Interests",
            Self::Impact => "Impact",
        }
    }

    pub fn valid_names() -> Vec<String> {
        Self::ALL.iter().map(|c| c.name().to_string()).collect()
    }
}

impl fmt::Display for Criteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Criteria {
    type Err = FetchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.name() == s)
            .ok_or_else(|| FetchError::InvalidCriteria {
                requested: s.to_string(),
                valid: Self::valid_names(),
            })
    }
}

/// A record with the provider's vector for the selected attribute attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddedRecord {
    #[serde(flatten)]
    pub record: Record,
    pub embedding: Vec<f32>,
}

/// A record placed in the scene. `position` is `[x, y, z]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedRecord {
    #[serde(flatten)]
    pub record: Record,
    pub embedding: Vec<f32>,
    pub position: [f32; 3],
}
