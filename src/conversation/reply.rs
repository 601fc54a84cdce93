//! Parsing of in-page links in model replies.
//!
//! The grounding document asks the model to point at page sections with
//! markdown links of the form `[text](#anchor)`. Everything else in a reply
//! is plain text.

use std::sync::LazyLock;

use regex::Regex;

use crate::model::prompt::NAV_ANCHORS;

static LINK_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\((#[^)]+)\)").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    Text(&'a str),
    Link { text: &'a str, anchor: &'a str },
}

/// Split a reply into text spans and links, in order. Text spans are never empty.
pub fn segments(reply: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut last = 0;

    for caps in LINK_PATTERN.captures_iter(reply) {
        let (Some(whole), Some(text), Some(anchor)) = (caps.get(0), caps.get(1), caps.get(2))
        else {
            continue;
        };
        if whole.start() > last {
            out.push(Segment::Text(&reply[last..whole.start()]));
        }
        out.push(Segment::Link {
            text: text.as_str(),
            anchor: anchor.as_str(),
        });
        last = whole.end();
    }

    if last < reply.len() {
        out.push(Segment::Text(&reply[last..]));
    }
    out
}

/// Render a reply as HTML: text escaped, one `<a>` per link.
pub fn to_html(reply: &str) -> String {
    segments(reply)
        .into_iter()
        .map(|segment| match segment {
            Segment::Text(text) => tera::escape_html(text),
            Segment::Link { text, anchor } => format!(
                "<a href=\"{}\" class=\"chat-link\">{}</a>",
                tera::escape_html(anchor),
                tera::escape_html(text)
            ),
        })
        .collect()
}

/// Anchors linked from `reply` that don't exist on the page.
pub fn unknown_anchors(reply: &str) -> Vec<&str> {
    segments(reply)
        .into_iter()
        .filter_map(|segment| match segment {
            Segment::Link { anchor, .. } if !NAV_ANCHORS.contains(&anchor) => Some(anchor),
            _ => None,
        })
        .collect()
}
