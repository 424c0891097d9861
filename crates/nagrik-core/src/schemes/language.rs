use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Languages scheme content is offered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Hi,
    Ta,
    Te,
    Bn,
    Mr,
}

impl Language {
    pub const ALL: [Language; 6] = [
        Language::En,
        Language::Hi,
        Language::Ta,
        Language::Te,
        Language::Bn,
        Language::Mr,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Hi => "hi",
            Self::Ta => "ta",
            Self::Te => "te",
            Self::Bn => "bn",
            Self::Mr => "mr",
        }
    }

    /// English name of the language.
    pub fn label(self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Hi => "Hindi",
            Self::Ta => "Tamil",
            Self::Te => "Telugu",
            Self::Bn => "Bengali",
            Self::Mr => "Marathi",
        }
    }

    /// Name of the language in its own script.
    pub fn native(self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Hi => "हिंदी",
            Self::Ta => "தமிழ்",
            Self::Te => "తెలుగు",
            Self::Bn => "বাংলা",
            Self::Mr => "मराठी",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|l| l.code() == code)
            .ok_or(Error::UnsupportedLanguage { code })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LanguageOption {
    pub code: Language,
    pub label: &'static str,
    pub native: &'static str,
}

pub fn language_options() -> Vec<LanguageOption> {
    Language::ALL
        .into_iter()
        .map(|code| LanguageOption {
            code,
            label: code.label(),
            native: code.native(),
        })
        .collect()
}
