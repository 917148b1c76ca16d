//! Ordered selector cascades: rules are tried in order and the first one that
//! yields something usable wins.

use std::collections::HashSet;

use scraper::{ElementRef, Html, Selector};

/// Parse a selector known at compile time.
pub fn sel(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("bad selector {css:?}: {e:?}"))
}

/// Element text with whitespace runs collapsed to single spaces.
pub fn text_of(el: ElementRef) -> String {
    normalize(&el.text().collect::<String>())
}

pub fn normalize(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// First non-empty element text across the rules.
pub fn first_text(doc: &Html, rules: &[&Selector]) -> Option<String> {
    first_matching_text(doc, rules, |_| true)
}

/// First non-empty element text accepted by `accept`.
pub fn first_matching_text(
    doc: &Html,
    rules: &[&Selector],
    accept: impl Fn(&str) -> bool,
) -> Option<String> {
    rules.iter().find_map(|rule| {
        doc.select(rule)
            .map(text_of)
            .find(|t| !t.is_empty() && accept(t.as_str()))
    })
}

/// First non-empty attribute value across the rules.
pub fn first_attr(doc: &Html, rules: &[&Selector], attr: &str) -> Option<String> {
    rules.iter().find_map(|rule| {
        doc.select(rule)
            .filter_map(|el| el.value().attr(attr))
            .map(str::trim)
            .find(|v| !v.is_empty())
            .map(str::to_string)
    })
}

/// A rule in a list cascade.
pub enum ListRule<'a> {
    /// Class-name heuristic. A match wrapping `<li>` items stands for those items;
    /// matches inside an already kept element are dropped.
    Class(&'a Selector),
    /// Every match is an item.
    Items(&'a Selector),
}

/// Texts of every element matched by the first rule with at least one match.
pub fn first_list(doc: &Html, rules: &[ListRule]) -> Vec<String> {
    for rule in rules {
        let items: Vec<ElementRef> = match rule {
            ListRule::Items(s) => doc.select(s).collect(),
            ListRule::Class(s) => outermost_leaves(doc, s),
        };
        if !items.is_empty() {
            return items.into_iter().map(text_of).collect();
        }
    }
    Vec::new()
}

fn outermost_leaves<'a>(doc: &'a Html, selector: &Selector) -> Vec<ElementRef<'a>> {
    let mut kept = Vec::new();
    let mut kept_ids = HashSet::new();
    for el in doc.select(selector) {
        let items = list_items(el);
        let candidates = if items.is_empty() { vec![el] } else { items };
        for c in candidates {
            if kept_ids.contains(&c.id()) || c.ancestors().any(|a| kept_ids.contains(&a.id())) {
                continue;
            }
            kept_ids.insert(c.id());
            kept.push(c);
        }
    }
    kept
}

/// `<li>` descendants of a container, excluding `el` itself.
fn list_items(el: ElementRef) -> Vec<ElementRef> {
    el.descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .filter(|d| d.value().name() == "li")
        .collect()
}
