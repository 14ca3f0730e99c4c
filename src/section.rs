//! Stage 4: re-indent the document for readability and wrap every top-level
//! block in a `<section>`, marking the spots where the splitter will cut.
//!
//! Sections wrap their content one level deep, so the indentation counter
//! starts at 1. `<page>` markers go in front of every chapter heading and,
//! inside the symbology chapter, in front of every sub-heading as well.

use crate::isolate::is_inline;
use crate::tokenizer::{has_attr_value, heading_level, parse_tag_info, TagInfo, Token, Tokenizer};
use memchr::memmem;

const INDENT: &[u8] = b"    ";

/// The symbology chapter is split per sub-heading; the region is bounded by
/// these two anchor ids.
const CHAPTER_START_ID: &[u8] = b"types-of-symbology";
const CHAPTER_END_ID: &[u8] = b"legal-and-version-information";

struct SectionState {
    depth: usize,
    in_pre: bool,
    /// Consecutive top-level paragraphs share one container section.
    in_paragraph_block: bool,
    /// No section is open yet, so boundaries emit no closing tag or marker.
    at_document_start: bool,
    in_symbology_chapter: bool,
}

pub fn indent_and_section(src: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(src.len() + src.len() / 4);
    let mut st = SectionState {
        depth: 1,
        in_pre: false,
        in_paragraph_block: false,
        at_document_start: true,
        in_symbology_chapter: false,
    };
    for token in Tokenizer::new(src) {
        match token {
            Token::Text(text) => emit_text(text, &st, &mut out),
            Token::Tag(tag) => emit_tag(tag, &mut st, &mut out),
        }
    }
    out.extend_from_slice(b"\n</section>\n");
    out
}

fn emit_text(text: &[u8], st: &SectionState, out: &mut Vec<u8>) {
    let fixed = fixup_text(text);
    if st.in_pre {
        out.extend_from_slice(&fixed);
        return;
    }
    // Indent continuation lines; a trailing newline is indented when the
    // following tag is emitted.
    for (i, &b) in fixed.iter().enumerate() {
        out.push(b);
        if b == b'\n' && i + 1 < fixed.len() {
            push_indent(out, st.depth);
        }
    }
}

/// Floating full stops left by stripped references become '. ', and bare
/// `{}` pairs (the husk of a removed cross-reference) vanish.
fn fixup_text(text: &[u8]) -> Vec<u8> {
    let mut fixed = Vec::with_capacity(text.len());
    for &b in text {
        if b == b'}' && fixed.last() == Some(&b'{') {
            fixed.pop();
            continue;
        }
        fixed.push(b);
    }
    replace_all(&fixed, b" . ", b". ")
}

fn replace_all(haystack: &[u8], from: &[u8], to: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(haystack.len());
    let mut last = 0usize;
    for pos in memmem::find_iter(haystack, from) {
        out.extend_from_slice(&haystack[last..pos]);
        out.extend_from_slice(to);
        last = pos + from.len();
    }
    out.extend_from_slice(&haystack[last..]);
    out
}

fn emit_tag(tag: &[u8], st: &mut SectionState, out: &mut Vec<u8>) {
    let ti = parse_tag_info(tag);

    if ti.name.eq_ignore_ascii_case(b"pre") {
        st.in_pre = !ti.is_end;
    }
    if has_attr_value(tag, b"id", CHAPTER_START_ID) {
        st.in_symbology_chapter = true;
    }
    if has_attr_value(tag, b"id", CHAPTER_END_ID) {
        st.in_symbology_chapter = false;
    }

    let indentable = !is_inline(ti.name);

    if ti.is_end {
        if indentable {
            st.depth = st.depth.saturating_sub(1);
            push_indent(out, st.depth);
        } else if out.ends_with(b"\n") {
            push_indent(out, st.depth);
        }
        out.extend_from_slice(tag);
        return;
    }

    if st.depth == 1 {
        if let Some(boundary) = classify_boundary(&ti, st) {
            open_section(&boundary, st, out);
        }
    }

    if indentable {
        push_indent(out, st.depth);
        out.extend_from_slice(tag);
        st.depth += 1;
    } else {
        if out.ends_with(b"\n") {
            push_indent(out, st.depth);
        }
        out.extend_from_slice(tag);
    }
}

struct Boundary {
    class: &'static [u8],
    page: bool,
}

/// Section triggers, all at depth 1 only. Headings always start a fresh
/// section; consecutive paragraphs are grouped into one; definition lists
/// and tables get their own typed sections.
fn classify_boundary(ti: &TagInfo, st: &mut SectionState) -> Option<Boundary> {
    if let Some(level) = heading_level(ti.name) {
        st.in_paragraph_block = true;
        let page = level == 2 || (level == 3 && st.in_symbology_chapter);
        return Some(Boundary {
            class: b"container",
            page,
        });
    }
    if ti.name.eq_ignore_ascii_case(b"p") {
        if st.in_paragraph_block {
            return None;
        }
        st.in_paragraph_block = true;
        return Some(Boundary {
            class: b"container",
            page: false,
        });
    }
    if ti.name.eq_ignore_ascii_case(b"dl") {
        st.in_paragraph_block = false;
        return Some(Boundary {
            class: b"definition-list container",
            page: false,
        });
    }
    if ti.name.eq_ignore_ascii_case(b"table") {
        st.in_paragraph_block = false;
        return Some(Boundary {
            class: b"table",
            page: false,
        });
    }
    None
}

fn open_section(boundary: &Boundary, st: &mut SectionState, out: &mut Vec<u8>) {
    if st.at_document_start {
        st.at_document_start = false;
    } else {
        out.extend_from_slice(b"</section>\n");
        if boundary.page {
            out.extend_from_slice(b"<page>\n");
        }
    }
    out.extend_from_slice(b"<section class=\"");
    out.extend_from_slice(boundary.class);
    out.extend_from_slice(b"\">\n");
}

fn push_indent(out: &mut Vec<u8>, depth: usize) {
    for _ in 0..depth {
        out.extend_from_slice(INDENT);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sectioned(src: &str) -> String {
        String::from_utf8(indent_and_section(src.as_bytes())).unwrap()
    }

    fn page_count(out: &str) -> usize {
        out.matches("<page>").count()
    }

    #[test]
    fn paragraphs_are_indented_inside_one_container() {
        assert_eq!(
            sectioned("\n<p>\nfirst\n</p>\n<p>\nsecond\n</p>\n"),
            concat!(
                "\n<section class=\"container\">\n",
                "    <p>\n",
                "        first\n",
                "    </p>\n",
                "    <p>\n",
                "        second\n",
                "    </p>\n",
                "\n</section>\n",
            )
        );
    }

    #[test]
    fn floating_full_stops_are_fixed() {
        let out = sectioned("\n<p>\nIntro . End\n</p>\n");
        assert!(out.contains("Intro. End"));
    }

    #[test]
    fn brace_residue_is_stripped() {
        let out = sectioned("\n<p>\nsee {} here\n</p>\n");
        assert!(out.contains("see  here"));
    }

    #[test]
    fn pre_blocks_are_not_reindented() {
        let out = sectioned("\n<p>\nx\n</p>\n<pre>a\n  b\n</pre>");
        assert!(out.contains("<pre>a\n  b\n"));
    }

    #[test]
    fn headings_always_open_a_section() {
        let out = sectioned("<h4 id=\"a\">A</h4>\n<p>\nx\n</p>\n<h4 id=\"b\">B</h4>\n");
        assert_eq!(out.matches("<section class=\"container\">").count(), 2);
        assert_eq!(page_count(&out), 0);
    }

    #[test]
    fn chapter_headings_start_pages_except_at_document_start() {
        let out = sectioned("<h2 id=\"a\">A</h2>\n<p>\nx\n</p>\n<h2 id=\"b\">B</h2>\n");
        assert_eq!(page_count(&out), 1);
        assert!(out.contains("</section>\n<page>\n<section class=\"container\">"));
    }

    #[test]
    fn symbology_chapter_subheadings_start_pages() {
        let out = sectioned(concat!(
            "<h2 id=\"one\">A</h2>\n",
            "<h3 id=\"x\">B</h3>\n",
            "<h2 id=\"types-of-symbology\">C</h2>\n",
            "<h3 id=\"y\">D</h3>\n",
            "<h3 id=\"z\">E</h3>\n",
            "<h2 id=\"legal-and-version-information\">F</h2>\n",
            "<h3 id=\"w\">G</h3>\n",
        ));
        // Pages: h2 C, h3 D, h3 E, h2 F. Neither the document-start h2 nor
        // the h3s outside the region contribute one.
        assert_eq!(page_count(&out), 4);
    }

    #[test]
    fn definition_lists_and_tables_get_typed_sections() {
        let out = sectioned("\n<p>\na\n</p>\n\n<dl>\n</dl>\n\n<table>\n</table>\n");
        assert!(out.contains("<section class=\"definition-list container\">"));
        assert!(out.contains("<section class=\"table\">"));
    }

    #[test]
    fn document_ends_with_a_closing_section() {
        assert!(sectioned("\n<p>\nx\n</p>\n").ends_with("\n</section>\n"));
    }

    #[test]
    fn unbalanced_close_tags_do_not_underflow() {
        let out = sectioned("\n</p>\n\n</p>\n\n</p>\n");
        assert!(out.ends_with("\n</section>\n"));
    }
}
