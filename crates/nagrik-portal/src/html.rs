//! Scheme extraction from portal HTML.
//!
//! Two passes over one streaming parse: elements matching the generic scheme selectors (in
//! selector order, each in document order), then `application/ld+json` blocks. Names are
//! de-duplicated across both passes and the result is capped.

use lol_html::html_content::EndTag;
use lol_html::{RewriteStrSettings, doc_text, element, rewrite_str};
use nagrik_core::schemes::Scheme;
use rustc_hash::FxHashSet;
use serde_json::Value;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::debug;
use url::Url;

pub const SCHEME_SELECTORS: [&str; 5] = [
    "a[href*='scheme']",
    "[data-scheme-name]",
    ".scheme-card",
    ".scheme-item",
    "[class*='scheme']",
];
const TITLE_SELECTOR: &str = "[class*='title'], [class*='name']";
const DESC_SELECTOR: &str = "[class*='desc'], [class*='summary']";
const LD_JSON_SELECTOR: &str = "script[type='application/ld+json']";

pub const DEFAULT_DESCRIPTION: &str = "Government scheme - view details for more info.";
pub const DEFAULT_ELIGIBILITY: &str = "Check official myScheme portal for eligibility criteria.";
pub const LD_DEFAULT_ELIGIBILITY: &str = "Check official portal.";
const MAX_DESCRIPTION_CHARS: usize = 300;

#[derive(Debug, Default)]
struct Candidate {
    selector: usize,
    element: u64,
    href: Option<String>,
    data_name: Option<String>,
    text: String,
    title: Option<String>,
    desc: Option<String>,
}

#[derive(Debug, Default)]
struct ScanState {
    element_seq: u64,
    candidates: Vec<Candidate>,
    /// Indices of candidates whose element is still open.
    open: Vec<usize>,
    /// Active descendant captures: (candidate index, is_title).
    captures: Vec<(usize, bool)>,
    ld_blocks: Vec<String>,
    ld_open: Option<String>,
}

impl ScanState {
    fn push_text(&mut self, chunk: &str) {
        if let Some(ld) = self.ld_open.as_mut() {
            ld.push_str(chunk);
        }
        for &i in &self.open {
            self.candidates[i].text.push_str(chunk);
        }
        for &(i, is_title) in &self.captures {
            let cand = &mut self.candidates[i];
            let slot = if is_title { &mut cand.title } else { &mut cand.desc };
            if let Some(text) = slot.as_mut() {
                text.push_str(chunk);
            }
        }
    }
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn decoded(raw: &str) -> String {
    htmlize::unescape(raw).into_owned()
}

fn resolve_href(href: Option<&str>, base: Option<&Url>) -> Option<String> {
    let href = href?.trim();
    if href.is_empty() {
        return None;
    }
    if href.starts_with("http") {
        return Some(href.to_string());
    }
    base?.join(href).ok().map(String::from)
}

fn scan(html: &str) -> ScanState {
    let state = Rc::new(RefCell::new(ScanState::default()));

    let mut handlers = vec![element!("*", {
        let state = Rc::clone(&state);
        move |_el| {
            state.borrow_mut().element_seq += 1;
            Ok(())
        }
    })];

    for (selector_idx, selector) in SCHEME_SELECTORS.iter().enumerate() {
        let state = Rc::clone(&state);
        handlers.push(element!(*selector, move |el| {
            let idx = {
                let mut s = state.borrow_mut();
                let element = s.element_seq;
                s.candidates.push(Candidate {
                    selector: selector_idx,
                    element,
                    href: el.get_attribute("href"),
                    data_name: el.get_attribute("data-scheme-name"),
                    ..Default::default()
                });
                s.candidates.len() - 1
            };
            if let Some(end_handlers) = el.end_tag_handlers() {
                state.borrow_mut().open.push(idx);
                let state = Rc::clone(&state);
                end_handlers.push(Box::new(move |_: &mut EndTag<'_>| {
                    state.borrow_mut().open.retain(|&i| i != idx);
                    Ok(())
                }) as lol_html::EndTagHandler<'static>);
            }
            Ok(())
        }));
    }

    for (selector, is_title) in [(TITLE_SELECTOR, true), (DESC_SELECTOR, false)] {
        let state = Rc::clone(&state);
        handlers.push(element!(selector, move |el| {
            let started: Vec<usize> = {
                let mut s = state.borrow_mut();
                let current = s.element_seq;
                let open = s.open.clone();
                let mut started = Vec::new();
                for i in open {
                    let cand = &mut s.candidates[i];
                    // Descendants only, and only the first match.
                    if cand.element >= current {
                        continue;
                    }
                    let slot = if is_title { &mut cand.title } else { &mut cand.desc };
                    if slot.is_none() {
                        *slot = Some(String::new());
                        started.push(i);
                    }
                }
                s.captures.extend(started.iter().map(|&i| (i, is_title)));
                started
            };
            if started.is_empty() {
                return Ok(());
            }
            let state = Rc::clone(&state);
            let finish = move |s: &mut ScanState| {
                s.captures
                    .retain(|(i, t)| !(*t == is_title && started.contains(i)));
            };
            match el.end_tag_handlers() {
                Some(end_handlers) => end_handlers.push(Box::new(move |_: &mut EndTag<'_>| {
                    finish(&mut state.borrow_mut());
                    Ok(())
                }) as lol_html::EndTagHandler<'static>),
                None => finish(&mut state.borrow_mut()),
            }
            Ok(())
        }));
    }

    {
        let state = Rc::clone(&state);
        handlers.push(element!(LD_JSON_SELECTOR, move |el| {
            state.borrow_mut().ld_open = Some(String::new());
            if let Some(end_handlers) = el.end_tag_handlers() {
                let state = Rc::clone(&state);
                end_handlers.push(Box::new(move |_: &mut EndTag<'_>| {
                    let mut s = state.borrow_mut();
                    if let Some(block) = s.ld_open.take() {
                        s.ld_blocks.push(block);
                    }
                    Ok(())
                }) as lol_html::EndTagHandler<'static>);
            }
            Ok(())
        }));
    }

    let text_state = Rc::clone(&state);
    let result = rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: handlers,
            document_content_handlers: vec![doc_text!(move |chunk| {
                text_state.borrow_mut().push_text(chunk.as_str());
                Ok(())
            })],
            ..RewriteStrSettings::new()
        },
    );
    if let Err(err) = result {
        debug!(error = %err, "HTML scan stopped early");
    }

    let mut s = state.borrow_mut();
    std::mem::take(&mut *s)
}

fn push_unique(
    out: &mut Vec<Scheme>,
    seen: &mut FxHashSet<String>,
    name: String,
    description: String,
    eligibility: String,
    source_url: Option<String>,
) {
    if !seen.insert(name.clone()) {
        return;
    }
    let mut scheme = Scheme::new(
        format!("myscheme-{}", out.len() + 1),
        name,
        description,
        eligibility,
    );
    scheme.source_url = source_url;
    out.push(scheme);
}

fn ld_items(json: Value) -> Vec<Value> {
    match json {
        Value::Array(items) => items,
        Value::Object(mut obj) => match obj.remove("@graph") {
            Some(Value::Array(items)) => items,
            Some(other) => vec![other],
            None => vec![Value::Object(obj)],
        },
        other => vec![other],
    }
}

fn ld_text(item: &Value, key: &str) -> Option<String> {
    match item.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// Extracts at most `cap` schemes from `html`; relative links resolve against `base_url`.
pub fn parse_schemes_from_html(html: &str, base_url: &str, cap: usize) -> Vec<Scheme> {
    let base = Url::parse(base_url).ok();
    let mut state = scan(html);
    // Selector order first, document order within a selector.
    state.candidates.sort_by_key(|c| c.selector);

    let mut out = Vec::new();
    let mut seen = FxHashSet::default();

    for cand in &state.candidates {
        let title = cand
            .title
            .as_ref()
            .map(|t| decoded(t.trim()))
            .filter(|t| !t.trim().is_empty());
        let raw_name = cand
            .data_name
            .as_deref()
            .map(decoded)
            .filter(|n| !n.trim().is_empty())
            .or(title)
            .unwrap_or_else(|| decoded(cand.text.trim()));
        let name = collapse_whitespace(&raw_name);
        let len = name.chars().count();
        if len <= 3 || len >= 200 {
            continue;
        }

        let description = cand
            .desc
            .as_ref()
            .map(|d| decoded(d.trim()))
            .map(|d| d.trim().chars().take(MAX_DESCRIPTION_CHARS).collect::<String>())
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string());

        push_unique(
            &mut out,
            &mut seen,
            name,
            description,
            DEFAULT_ELIGIBILITY.to_string(),
            resolve_href(cand.href.as_deref(), base.as_ref()),
        );
    }

    for block in &state.ld_blocks {
        let json: Value = match serde_json::from_str(block.trim()) {
            Ok(v) => v,
            Err(err) => {
                debug!(error = %err, "skipping unreadable JSON-LD block");
                continue;
            }
        };
        for item in ld_items(json) {
            let is_service = item.get("@type").and_then(Value::as_str) == Some("GovernmentService");
            let has_name = item.get("name").is_some_and(|v| !v.is_null());
            if !is_service && !has_name {
                continue;
            }
            let Some(name) = ld_text(&item, "name").or_else(|| ld_text(&item, "title")) else {
                continue;
            };
            if name.is_empty() {
                continue;
            }
            push_unique(
                &mut out,
                &mut seen,
                name,
                ld_text(&item, "description").unwrap_or_default(),
                ld_text(&item, "eligibility").unwrap_or_else(|| LD_DEFAULT_ELIGIBILITY.to_string()),
                ld_text(&item, "url"),
            );
        }
    }

    out.truncate(cap);
    out
}
