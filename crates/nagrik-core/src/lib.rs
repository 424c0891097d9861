#![forbid(unsafe_code)]

//! Content and state model for the civics study site (headless).
//!
//! Design goals:
//! - mind map trees with collapsible branches, independent of any renderer
//! - scheme data, localisation and the plain-language helpers as plain values
//! - no I/O beyond reading bundled assets and an optional config file

pub mod catalog;
pub mod config;
pub mod error;
pub mod expansion;
pub mod flowchart;
pub mod schemes;
pub mod simplify;
pub mod tree;
pub mod wizard;

pub use catalog::{Catalog, Chapter};
pub use config::SiteConfig;
pub use error::{Error, Result};
pub use expansion::{ExpansionState, VisibleNode, visible_nodes};
pub use tree::{TreeIndex, TreeNode};
