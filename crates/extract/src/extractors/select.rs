// ABOUTME: Selector and tree-navigation helpers shared by the field extractors.
// ABOUTME: Text/attribute lookup, separator-joined text, and document-order navigation over scraper trees.

//! DOM query helpers.
//!
//! Thin wrappers over `scraper` and `ego-tree` giving the field extractors the
//! handful of operations they need:
//! - first match text / attribute lookups (trimmed, empty treated as no match)
//! - element text with or without a separator between text nodes
//! - "next element in document order" and "next element sibling" navigation

use ego_tree::NodeId;
use scraper::{ElementRef, Html, Selector};

/// Concatenated text of an element and its descendants, untouched.
pub fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect()
}

/// Text nodes of an element joined with `sep`.
pub fn element_text_with(el: ElementRef<'_>, sep: &str) -> String {
    el.text().collect::<Vec<_>>().join(sep)
}

/// Trimmed text of the first element matching `sel` that has any text.
pub fn first_text(doc: &Html, sel: &Selector) -> Option<String> {
    doc.select(sel).find_map(|el| {
        let text = element_text(el);
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Trimmed value of `attr` on the first element matching `sel` that carries it.
pub fn first_attr(doc: &Html, sel: &Selector, attr: &str) -> Option<String> {
    doc.select(sel).find_map(|el| {
        el.value().attr(attr).and_then(|v| {
            let trimmed = v.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
    })
}

/// First element matching `sel` that comes after `start` in document order.
///
/// Descendants of `start` count as "after" it, so an anchor nested in a
/// list item is found from that list item.
pub fn next_in_document<'a>(start: ElementRef<'a>, sel: &Selector) -> Option<ElementRef<'a>> {
    let start_id: NodeId = start.id();
    start
        .tree()
        .root()
        .descendants()
        .skip_while(|node| node.id() != start_id)
        .skip(1)
        .filter_map(ElementRef::wrap)
        .find(|el| sel.matches(el))
}

/// The next sibling that is an element, skipping text and comment nodes.
pub fn next_element_sibling(el: ElementRef<'_>) -> Option<ElementRef<'_>> {
    el.next_siblings().find_map(ElementRef::wrap)
}

/// The text node directly following `el`, trimmed, if there is one with content.
pub fn following_text(el: ElementRef<'_>) -> Option<String> {
    el.next_siblings()
        .filter_map(|node| node.value().as_text().map(|t| t.trim().to_string()))
        .find(|t| !t.is_empty())
}
