//! Reader for the small flowchart markup subset produced by the simplifier.
//!
//! Supported: a `flowchart`/`graph` header with a direction, then statements (one per line or
//! `;`-separated) chaining node references with `-->`, `---`, `-.->` or `==>`, each edge
//! optionally labelled `|text|`. Node shapes `[..]`, `(..)` and `{..}` only carry a label.

use indexmap::IndexMap;
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

pub const RENDER_FAILURE_NOTICE: &str = "Could not render flowchart. Showing raw steps instead.";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FlowchartError {
    #[error("missing `flowchart`/`graph` header")]
    MissingHeader,
    #[error("unknown direction `{0}`")]
    UnknownDirection(String),
    #[error("line {line}: unexpected input `{rest}`")]
    Unexpected { line: usize, rest: String },
    #[error("diagram has no nodes")]
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Direction {
    #[serde(rename = "TB")]
    TopToBottom,
    #[serde(rename = "BT")]
    BottomToTop,
    #[serde(rename = "LR")]
    LeftToRight,
    #[serde(rename = "RL")]
    RightToLeft,
}

impl Direction {
    fn parse(token: &str) -> Option<Self> {
        match token {
            "TD" | "TB" => Some(Self::TopToBottom),
            "BT" => Some(Self::BottomToTop),
            "LR" => Some(Self::LeftToRight),
            "RL" => Some(Self::RightToLeft),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlowEdge {
    pub from: String,
    pub to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Flowchart {
    pub direction: Direction,
    /// Node id -> label, in first-appearance order. Unlabelled nodes use their id.
    pub nodes: IndexMap<String, String>,
    pub edges: Vec<FlowEdge>,
}

fn node_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^([A-Za-z0-9_]+)\s*(?:\[([^\]]*)\]|\(([^)]*)\)|\{([^}]*)\})?")
            .expect("valid regex")
    })
}

fn edge_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:-->|---|-\.->|==>)\s*(?:\|([^|]*)\|)?").expect("valid regex")
    })
}

fn bracket_label_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[([^\]\n]+)\]").expect("valid regex"))
}

impl Flowchart {
    pub fn parse(text: &str) -> Result<Self, FlowchartError> {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(i, l)| (i + 1, l.trim()))
            .filter(|(_, l)| !l.is_empty() && !l.starts_with("%%"));

        let Some((_, header)) = lines.next() else {
            return Err(FlowchartError::MissingHeader);
        };
        let mut header_parts = header.split_whitespace();
        match header_parts.next() {
            Some("flowchart" | "graph") => {}
            _ => return Err(FlowchartError::MissingHeader),
        }
        let direction = match header_parts.next().map(|d| d.trim_end_matches(';')) {
            None => Direction::TopToBottom,
            Some(token) => Direction::parse(token)
                .ok_or_else(|| FlowchartError::UnknownDirection(token.to_string()))?,
        };

        let mut chart = Flowchart {
            direction,
            nodes: IndexMap::new(),
            edges: Vec::new(),
        };
        for (line_no, line) in lines {
            for statement in line.split(';').map(str::trim).filter(|s| !s.is_empty()) {
                chart.parse_statement(line_no, statement)?;
            }
        }

        if chart.nodes.is_empty() {
            return Err(FlowchartError::Empty);
        }
        Ok(chart)
    }

    fn parse_statement(&mut self, line: usize, statement: &str) -> Result<(), FlowchartError> {
        let mut rest = statement;
        let mut prev = self.parse_node(line, &mut rest)?;
        loop {
            rest = rest.trim_start();
            if rest.is_empty() {
                return Ok(());
            }
            let Some(edge) = edge_regex().captures(rest) else {
                return Err(FlowchartError::Unexpected {
                    line,
                    rest: rest.to_string(),
                });
            };
            let label = edge
                .get(1)
                .map(|m| m.as_str().trim().to_string())
                .filter(|s| !s.is_empty());
            rest = rest[edge.get(0).map_or(0, |m| m.end())..].trim_start();
            let next = self.parse_node(line, &mut rest)?;
            self.edges.push(FlowEdge {
                from: prev,
                to: next.clone(),
                label,
            });
            prev = next;
        }
    }

    fn parse_node(&mut self, line: usize, rest: &mut &str) -> Result<String, FlowchartError> {
        let Some(caps) = node_regex().captures(rest) else {
            return Err(FlowchartError::Unexpected {
                line,
                rest: rest.to_string(),
            });
        };
        let id = caps.get(1).map_or("", |m| m.as_str()).to_string();
        let label = (2..=4)
            .find_map(|i| caps.get(i))
            .map(|m| m.as_str().trim().to_string());
        *rest = &rest[caps.get(0).map_or(0, |m| m.end())..];

        match label {
            Some(label) => {
                self.nodes.insert(id.clone(), label);
            }
            None => {
                self.nodes.entry(id.clone()).or_insert_with(|| id.clone());
            }
        }
        Ok(id)
    }

    /// Node labels in first-appearance order.
    pub fn steps(&self) -> Vec<&str> {
        self.nodes.values().map(String::as_str).collect()
    }
}

/// What the simplify screen shows for a flowchart string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DiagramView {
    Rendered { chart: Flowchart },
    Notice { message: String, steps: Vec<String> },
}

impl DiagramView {
    pub fn from_markup(text: &str) -> Self {
        match Flowchart::parse(text) {
            Ok(chart) => Self::Rendered { chart },
            Err(err) => {
                tracing::warn!(error = %err, "flowchart markup could not be read");
                Self::Notice {
                    message: RENDER_FAILURE_NOTICE.to_string(),
                    steps: raw_steps(text),
                }
            }
        }
    }
}

/// Bracketed labels recovered from markup that did not parse, without duplicates.
pub fn raw_steps(text: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for caps in bracket_label_regex().captures_iter(text) {
        let Some(m) = caps.get(1) else { continue };
        let step = m.as_str().trim().to_string();
        if !step.is_empty() && !out.contains(&step) {
            out.push(step);
        }
    }
    out
}
