use super::{Language, Scheme};
use serde::Serialize;
use std::fmt;

pub const SIMPLE_BADGE: &str = "In simple language";

/// What a scheme card displays: always the simplified wording, in the chosen language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemeCard {
    pub scheme_id: String,
    pub language: Language,
    pub badge: &'static str,
    pub name: String,
    pub description: String,
    pub who_can_apply: String,
    pub link: String,
}

impl SchemeCard {
    pub fn new(scheme: &Scheme, language: Language) -> Self {
        let content = scheme.content_in(language);
        Self {
            scheme_id: scheme.id.clone(),
            language,
            badge: SIMPLE_BADGE,
            name: content.name,
            description: content.description,
            who_can_apply: format!("Who can apply: {}", content.eligibility_summary),
            link: scheme.link().to_string(),
        }
    }
}

impl fmt::Display for SchemeCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[{}]", self.badge)?;
        writeln!(f, "{}", self.name)?;
        writeln!(f, "{}", self.description)?;
        writeln!(f, "{}", self.who_can_apply)?;
        write!(f, "View details: {}", self.link)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemes::mock_schemes;

    #[test]
    fn card_uses_translation_and_eligibility_prefix() {
        let schemes = mock_schemes().unwrap();
        let card = SchemeCard::new(&schemes[1], Language::Ta);
        assert!(card.name.starts_with("NSAP"));
        assert!(card.who_can_apply.starts_with("Who can apply: 60+"));
        assert_eq!(card.badge, SIMPLE_BADGE);
        let text = card.to_string();
        assert!(text.ends_with("View details: https://www.myscheme.gov.in"));
    }

    #[test]
    fn card_links_to_portal_when_source_missing() {
        let scheme = Scheme::new("9", "Name", "Desc", "All");
        let card = SchemeCard::new(&scheme, Language::Mr);
        assert_eq!(card.link, "https://www.myscheme.gov.in");
        assert_eq!(card.name, "Name");
    }
}
