// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! HTML content extraction
//!
//! Extracts the visible text of a page using the `scraper` DOM.

use scraper::{Html, Node};

use super::normalize_whitespace;

/// Elements whose text is never visible
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript"];

/// Extract visible text from HTML
///
/// Script, style and noscript subtrees are dropped; the remaining text nodes
/// are joined with line separators and whitespace is collapsed. Malformed
/// markup yields whatever text the parser recovers, possibly empty.
pub fn extract_html_text(html: &str) -> String {
    let document = Html::parse_document(html);

    let mut parts: Vec<&str> = Vec::new();
    for node in document.tree.root().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            matches!(ancestor.value(), Node::Element(el) if HIDDEN_ELEMENTS.contains(&el.name()))
        });
        if !hidden {
            parts.push(text);
        }
    }

    normalize_whitespace(&parts.join("\n"))
}
