//! Stage 1: pull indentable tags onto their own lines.
//!
//! Later stages are line-oriented; isolating the structural tags up front
//! keeps their scans simple.

use crate::tokenizer::{matches_ignore_ascii_case, parse_tag_info, Token, Tokenizer};

/// Tag names that stay inline. Everything else is an indentable tag and gets
/// surrounded by line breaks. `h7` does not exist in the input but is
/// introduced by the heading shift, and the set is shared with the indenter.
const INLINE_TAGS: &[&[u8]] = &[
    b"img", b"code", b"pre", b"h1", b"h2", b"h3", b"h4", b"h5", b"h6", b"h7", b"span", b"a",
    b"sup", b"col", b"colgroup", b"hr", b"div",
];

pub(crate) fn is_inline(name: &[u8]) -> bool {
    matches_ignore_ascii_case(name, INLINE_TAGS)
}

pub fn isolate_tags(src: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(src.len() + src.len() / 8);
    for token in Tokenizer::new(src) {
        match token {
            Token::Text(text) => out.extend_from_slice(text),
            Token::Tag(tag) => {
                let flat = flatten_tag(tag);
                if is_inline(parse_tag_info(&flat).name) {
                    out.extend_from_slice(&flat);
                } else {
                    out.push(b'\n');
                    out.extend_from_slice(&flat);
                    out.push(b'\n');
                }
            }
        }
    }
    out
}

/// Interior newlines become spaces so a tag never spans lines.
fn flatten_tag(tag: &[u8]) -> Vec<u8> {
    tag.iter()
        .map(|&b| if b == b'\n' { b' ' } else { b })
        .collect()
}
