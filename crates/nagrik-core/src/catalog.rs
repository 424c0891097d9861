//! Bundled study chapters, each carrying one mind map.

use crate::tree::TreeNode;
use crate::{Error, Result};
use indexmap::IndexMap;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip)]
    pub mind_map: TreeNode,
}

impl Chapter {
    pub fn display_title(&self) -> String {
        match &self.subject {
            Some(subject) => format!("{} ({subject})", self.title),
            None => self.title.clone(),
        }
    }
}

struct BundledChapter {
    id: &'static str,
    title: &'static str,
    subject: &'static str,
    asset: &'static str,
    json: &'static str,
}

const BUNDLED: &[BundledChapter] = &[
    BundledChapter {
        id: "federal-system",
        title: "Federal System",
        subject: "Polity",
        asset: "mindmaps/federal-system.json",
        json: include_str!("../assets/mindmaps/federal-system.json"),
    },
    BundledChapter {
        id: "union-and-its-territory",
        title: "Union and Its Territory",
        subject: "Polity",
        asset: "mindmaps/union-and-its-territory.json",
        json: include_str!("../assets/mindmaps/union-and-its-territory.json"),
    },
    BundledChapter {
        id: "citizenship-in-india",
        title: "Citizenship in India",
        subject: "Polity",
        asset: "mindmaps/citizenship-in-india.json",
        json: include_str!("../assets/mindmaps/citizenship-in-india.json"),
    },
    BundledChapter {
        id: "dpsp",
        title: "Directive Principles of State Policy (DPSP)",
        subject: "Polity",
        asset: "mindmaps/dpsp.json",
        json: include_str!("../assets/mindmaps/dpsp.json"),
    },
    BundledChapter {
        id: "parliamentary-system",
        title: "Parliamentary System",
        subject: "Polity",
        asset: "mindmaps/parliamentary-system.json",
        json: include_str!("../assets/mindmaps/parliamentary-system.json"),
    },
];

/// Topic id -> chapter lookup, kept in presentation order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    chapters: IndexMap<String, Chapter>,
}

impl Catalog {
    pub fn builtin() -> Result<Self> {
        let mut catalog = Self::default();
        for bundled in BUNDLED {
            let mind_map: TreeNode =
                serde_json::from_str(bundled.json).map_err(|source| Error::Asset {
                    name: bundled.asset,
                    source,
                })?;
            catalog.insert(Chapter {
                id: bundled.id.to_string(),
                title: bundled.title.to_string(),
                subject: Some(bundled.subject.to_string()),
                mind_map,
            })?;
        }
        Ok(catalog)
    }

    /// Adds or replaces a chapter after validating its tree.
    pub fn insert(&mut self, chapter: Chapter) -> Result<()> {
        chapter.mind_map.validate()?;
        self.chapters.insert(chapter.id.clone(), chapter);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Chapter> {
        self.chapters.get(id)
    }

    pub fn require(&self, id: &str) -> Result<&Chapter> {
        self.get(id).ok_or_else(|| Error::UnknownChapter { id: id.to_string() })
    }

    pub fn chapters(&self) -> impl Iterator<Item = &Chapter> {
        self.chapters.values()
    }

    pub fn default_chapter(&self) -> Option<&Chapter> {
        self.chapters.first().map(|(_, c)| c)
    }

    pub fn len(&self) -> usize {
        self.chapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }
}
