//! HTML → plain text reduction for the AI prompt.
//!
//! Non-visible subtrees (script, style, ...) and comments are dropped; block
//! elements start a new line; every line is trimmed and blank lines removed.

use scraper::{ElementRef, Html, Node};

/// Elements whose content never reaches the output.
const SKIPPED: &[&str] = &["script", "style", "noscript", "template", "head"];

/// Elements that break the text flow.
const BLOCKS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt", "figcaption",
    "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main", "nav",
    "ol", "p", "pre", "section", "table", "td", "th", "tr", "ul",
];

/// Extract visible text from an HTML document.
pub fn extract_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut raw = String::with_capacity(html.len() / 4);
    collect_text(document.root_element(), &mut raw);

    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Keep at most `max_chars` characters (not bytes).
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) => {
                let name = el.name();
                if SKIPPED.contains(&name) {
                    continue;
                }
                let block = BLOCKS.contains(&name);
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_drops_scripts_and_styles() {
        let html = r#"<html><head><title>Glimt</title><style>body{color:red}</style></head>
            <body><script>var x = "TICKETS_AVAILABLE";</script>
            <h1>Billetter</h1><p>  Tottenham  </p></body></html>"#;
        assert_eq!(extract_text(html), "Billetter\nTottenham");
    }

    #[test]
    fn test_extract_drops_comments_and_blank_lines() {
        let html = "<body><!-- hidden --><div>\n\n  one \n</div><div></div><div>two</div></body>";
        assert_eq!(extract_text(html), "one\ntwo");
    }

    #[test]
    fn test_extract_keeps_inline_text_on_one_line() {
        let html = "<p>Kamp mot <b>Tottenham</b> på <a href='#'>Aspmyra</a></p>";
        assert_eq!(extract_text(html), "Kamp mot Tottenham på Aspmyra");
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("Bodø/Glimt", 4), "Bodø");
        assert_eq!(truncate_chars("short", 100), "short");
        assert_eq!(truncate_chars("", 3), "");
    }
}
