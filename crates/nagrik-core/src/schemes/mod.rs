//! Government scheme entities, their localisation, and the bundled sample dataset.

mod card;
mod language;

pub use card::SchemeCard;
pub use language::{Language, LanguageOption, language_options};

use crate::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const PORTAL_HOME_URL: &str = "https://www.myscheme.gov.in";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemeTranslation {
    pub name: String,
    pub description: String,
    pub eligibility_summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scheme {
    pub id: String,
    pub name: String,
    pub description: String,
    pub eligibility_summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub simple_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub simple_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub simple_eligibility: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translations: Option<IndexMap<Language, SchemeTranslation>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
}

/// The three fields a scheme card shows, resolved for one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemeContent {
    pub name: String,
    pub description: String,
    pub eligibility_summary: String,
}

impl Scheme {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        eligibility_summary: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            eligibility_summary: eligibility_summary.into(),
            simple_name: None,
            simple_description: None,
            simple_eligibility: None,
            translations: None,
            source_url: None,
        }
    }

    /// Plain-language English content, falling back to the formal wording per field.
    pub fn simple_content(&self) -> SchemeContent {
        SchemeContent {
            name: self.simple_name.clone().unwrap_or_else(|| self.name.clone()),
            description: self
                .simple_description
                .clone()
                .unwrap_or_else(|| self.description.clone()),
            eligibility_summary: self
                .simple_eligibility
                .clone()
                .unwrap_or_else(|| self.eligibility_summary.clone()),
        }
    }

    pub fn translation(&self, lang: Language) -> Option<&SchemeTranslation> {
        self.translations.as_ref()?.get(&lang)
    }

    /// Content for `lang`; languages without a translation show the English simplified text.
    pub fn content_in(&self, lang: Language) -> SchemeContent {
        if lang == Language::En {
            return self.simple_content();
        }
        match self.translation(lang) {
            Some(t) => SchemeContent {
                name: t.name.clone(),
                description: t.description.clone(),
                eligibility_summary: t.eligibility_summary.clone(),
            },
            None => self.simple_content(),
        }
    }

    pub fn link(&self) -> &str {
        self.source_url.as_deref().unwrap_or(PORTAL_HOME_URL)
    }
}

/// Where a scheme list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SchemeSource {
    #[serde(rename = "myscheme-api")]
    PortalApi,
    #[serde(rename = "myscheme-html")]
    PortalHtml,
    #[serde(rename = "fallback")]
    Fallback,
}

impl SchemeSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PortalApi => "myscheme-api",
            Self::PortalHtml => "myscheme-html",
            Self::Fallback => "fallback",
        }
    }

    pub fn is_live(self) -> bool {
        !matches!(self, Self::Fallback)
    }
}

impl fmt::Display for SchemeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemesResponse {
    pub success: bool,
    pub schemes: Vec<Scheme>,
    pub source: SchemeSource,
    pub message: String,
}

const MOCK_SCHEMES_JSON: &str = include_str!("../../assets/mock_schemes.json");

/// The bundled sample schemes (PM-KISAN, NSAP, Post-Matric Scholarship).
pub fn mock_schemes() -> Result<Vec<Scheme>> {
    serde_json::from_str(MOCK_SCHEMES_JSON).map_err(|source| Error::Asset {
        name: "mock_schemes.json",
        source,
    })
}
