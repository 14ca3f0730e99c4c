//! Stage 2: rewrite tag guts for the website.
//!
//! The pandoc output carries attributes, permalink anchors, layout wrappers
//! and source-highlighting classes the website template does not want. Tags
//! are first checked against the suppression rules, then run through the
//! ordered rewrite table; every rule whose matcher hits is applied.

use crate::tokenizer::{
    attr_value, matches_ignore_ascii_case, parse_tag_info, TagInfo, Token, Tokenizer,
};
use memchr::{memchr, memmem};

/// Open tags reduced to their bare form, attributes discarded.
const STRIP_ATTR_TAGS: &[&[u8]] = &[b"pre", b"table", b"tr", b"td", b"th"];

/// Layout tags with no counterpart on the website.
const SUPPRESSED_TAGS: &[&[u8]] = &[b"span", b"div", b"col", b"colgroup"];

/// Scan state, dropped at the end of the pass.
#[derive(Default)]
struct RewriteState {
    /// Between `<dd>` and `</dd>`; paragraph tags are suppressed there.
    in_dd: bool,
    /// A removed permalink anchor takes the tag after it down too.
    remove_next: bool,
    /// A bare `<code>` was turned into a literal span; the next `</code>`
    /// closes it. Tracking the pair keeps nesting matched.
    span_literal: bool,
}

pub fn rewrite_tags(src: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(src.len());
    let mut st = RewriteState::default();
    for token in Tokenizer::new(src) {
        match token {
            Token::Text(text) => rewrite_text(text, &mut out),
            Token::Tag(tag) => rewrite_tag(tag, &mut st, &mut out),
        }
    }
    out
}

/// Pandoc table captions end in `{#tbl:... tag="..."}` identifier blocks;
/// only the human-readable tag value is kept. Any other run mentioning
/// `tbl:` is a cross-reference and vanishes (its brace residue is cleaned
/// up by the indenter).
fn rewrite_text(text: &[u8], out: &mut Vec<u8>) {
    if memmem::find(text, b"{#tbl:").is_some() {
        if let Some(label) = caption_label(text) {
            out.push(b'\n');
            out.extend(label.iter().map(|&b| if b == b'\n' { b' ' } else { b }));
            out.push(b'\n');
        }
        return;
    }
    if memmem::find(text, b"tbl:").is_some() {
        return;
    }
    out.extend_from_slice(text);
}

fn caption_label(text: &[u8]) -> Option<&[u8]> {
    let start = memmem::find(text, b"tag=\"")? + 5;
    let len = memchr(b'"', &text[start..])?;
    Some(&text[start..start + len])
}

fn rewrite_tag(tag: &[u8], st: &mut RewriteState, out: &mut Vec<u8>) {
    let ti = parse_tag_info(tag);

    if ti.name.eq_ignore_ascii_case(b"dd") {
        st.in_dd = !ti.is_end;
    }

    if suppress(tag, &ti, st) {
        return;
    }

    // Inline code with no language class becomes a literal-styled span.
    if tag == b"<code>" {
        out.extend_from_slice(b"<span class=\"literal\">");
        st.span_literal = true;
        return;
    }
    if st.span_literal && ti.is_end && ti.name.eq_ignore_ascii_case(b"code") {
        out.extend_from_slice(b"</span>");
        st.span_literal = false;
        return;
    }

    let mut buf = tag.to_vec();
    for rule in REWRITE_RULES {
        if (rule.matches)(&ti) {
            buf = (rule.apply)(&ti, buf);
        }
    }
    out.extend_from_slice(&buf);
}

fn suppress(tag: &[u8], ti: &TagInfo, st: &mut RewriteState) -> bool {
    if st.remove_next {
        st.remove_next = false;
        return true;
    }
    if matches_ignore_ascii_case(ti.name, SUPPRESSED_TAGS) {
        return true;
    }
    if !ti.is_end && ti.name.eq_ignore_ascii_case(b"a") && is_permalink(tag) {
        // Take the matching </a> down with it.
        st.remove_next = true;
        return true;
    }
    if st.in_dd && ti.name.eq_ignore_ascii_case(b"p") {
        return true;
    }
    false
}

/// Self-referencing anchors pandoc attaches to headings and captions.
fn is_permalink(tag: &[u8]) -> bool {
    attr_value(tag, b"href").map_or(false, |v| v.starts_with(b"#"))
        || attr_value(tag, b"aria-hidden").map_or(false, |v| v == b"true")
}

/// One entry of the ordered rewrite table. Matchers are evaluated against
/// the tag as read; actions transform the raw bytes.
struct Rule {
    matches: fn(&TagInfo) -> bool,
    apply: fn(&TagInfo, Vec<u8>) -> Vec<u8>,
}

static REWRITE_RULES: &[Rule] = &[
    Rule {
        matches: strips_attributes,
        apply: strip_attributes,
    },
    Rule {
        matches: is_shiftable_heading,
        apply: shift_heading,
    },
    Rule {
        matches: any_tag,
        apply: rename_code_classes,
    },
    Rule {
        matches: any_tag,
        apply: rewrite_image_src,
    },
];

fn any_tag(_: &TagInfo) -> bool {
    true
}

fn strips_attributes(ti: &TagInfo) -> bool {
    !ti.is_end && matches_ignore_ascii_case(ti.name, STRIP_ATTR_TAGS)
}

fn strip_attributes(ti: &TagInfo, _buf: Vec<u8>) -> Vec<u8> {
    let mut bare = Vec::with_capacity(ti.name.len() + 2);
    bare.push(b'<');
    bare.extend_from_slice(ti.name);
    bare.push(b'>');
    bare
}

fn is_shiftable_heading(ti: &TagInfo) -> bool {
    crate::tokenizer::heading_level(ti.name).map_or(false, |l| (1..=6).contains(&l))
}

/// `hN` becomes `h(N+1)`; the maximum introduced level is h7.
fn shift_heading(ti: &TagInfo, mut buf: Vec<u8>) -> Vec<u8> {
    // Isolated heading tags are "<hN ...>" or "</hN>", so the digit position
    // is fixed by the end flag.
    let pos = if ti.is_end { 3 } else { 2 };
    buf[pos] += 1;
    buf
}

fn rename_code_classes(_: &TagInfo, buf: Vec<u8>) -> Vec<u8> {
    let buf = replace_once(buf, b"class=\"sourceCode bash\"", b"class=\"language-bash\"");
    replace_once(buf, b"class=\"sourceCode c\"", b"class=\"language-cpp\"")
}

fn rewrite_image_src(_: &TagInfo, buf: Vec<u8>) -> Vec<u8> {
    replace_once(buf, b"src=\"images/", b"src=\"/images/manual/")
}

fn replace_once(buf: Vec<u8>, from: &[u8], to: &[u8]) -> Vec<u8> {
    match memmem::find(&buf, from) {
        Some(pos) => {
            let mut out = Vec::with_capacity(buf.len() - from.len() + to.len());
            out.extend_from_slice(&buf[..pos]);
            out.extend_from_slice(to);
            out.extend_from_slice(&buf[pos + from.len()..]);
            out
        }
        None => buf,
    }
}
