//! Readable-text extraction from HTML.
//!
//! Picks the main content area (`<main>`, `<article>`, `[role="main"]`, then
//! `<body>`), drops page chrome, and flattens what is left to newline-separated
//! text with whitespace collapsed.

use scraper::{ElementRef, Html, Node, Selector};

/// Content roots tried in order.
const CONTENT_SELECTORS: [&str; 4] = ["main", "article", r#"[role="main"]"#, "body"];

/// Elements whose subtree never contributes text.
const SKIPPED_TAGS: [&str; 11] = [
    "script", "style", "noscript", "template", "svg", "nav", "header", "footer", "aside", "form",
    "iframe",
];

/// Elements that start a new line.
const BLOCK_TAGS: [&str; 22] = [
    "p", "div", "section", "article", "main", "h1", "h2", "h3", "h4", "h5", "h6", "li", "ul",
    "ol", "blockquote", "pre", "table", "tr", "br", "hr", "dd", "dt",
];

pub fn extract_readable_text(html: &str) -> String {
    let doc = Html::parse_document(html);

    let root = CONTENT_SELECTORS.iter().find_map(|sel_str| {
        Selector::parse(sel_str)
            .ok()
            .and_then(|sel| doc.select(&sel).next())
    });

    let mut raw = String::new();
    match root {
        Some(el) => collect_text(el, &mut raw),
        // Fragments without a body: take the whole tree
        None => collect_text(doc.root_element(), &mut raw),
    }

    normalize_whitespace(&raw)
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) => {
                let name = el.name();
                if SKIPPED_TAGS.contains(&name) {
                    continue;
                }
                let block = BLOCK_TAGS.contains(&name);
                if block {
                    out.push('\n');
                }
                if let Some(child_el) = ElementRef::wrap(child) {
                    collect_text(child_el, out);
                }
                if block {
                    out.push('\n');
                }
            }
            _ => {}
        }
    }
}

/// Collapses runs of whitespace within lines and drops blank lines.
fn normalize_whitespace(raw: &str) -> String {
    raw.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefers_main_over_body() {
        let html = r#"<html><body><div>Sidebar junk</div><main><p>Real content</p></main></body></html>"#;
        assert_eq!(extract_readable_text(html), "Real content");
    }

    #[test]
    fn test_falls_back_to_body_without_chrome() {
        let html = r#"<html><body>
            <header>Site header</header>
            <script>var x = 1;</script>
            <div>First paragraph</div>
            <div>Second <b>bold</b> paragraph</div>
            <aside>Related links</aside>
        </body></html>"#;
        assert_eq!(
            extract_readable_text(html),
            "First paragraph\nSecond bold paragraph"
        );
    }

    #[test]
    fn test_list_items_on_separate_lines() {
        let html = "<article><ul><li>Grind</li><li>Bloom</li><li>Pour</li></ul></article>";
        assert_eq!(extract_readable_text(html), "Grind\nBloom\nPour");
    }

    #[test]
    fn test_empty_document_yields_empty_text() {
        assert_eq!(extract_readable_text("<html><body>  </body></html>"), "");
    }

    #[test]
    fn test_normalize_whitespace_collapses_runs() {
        assert_eq!(normalize_whitespace("  a \t b \n\n\n c  "), "a b\nc");
    }
}
