//! Two-state tag/text tokenizer shared by every pipeline stage.
//!
//! A tag is a complete `<...>` byte run located with a quote-aware scan;
//! text is everything between tags. An unterminated `<` yields the rest of
//! the input as text, so malformed markup passes through instead of failing.

use memchr::memchr;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Token<'a> {
    Tag(&'a [u8]),
    Text(&'a [u8]),
}

pub struct Tokenizer<'a> {
    src: &'a [u8],
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    pub fn new(src: &'a [u8]) -> Self {
        Tokenizer { src, pos: 0 }
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        let n = self.src.len();
        if self.pos >= n {
            return None;
        }
        if self.src[self.pos] == b'<' {
            if let Some(end) = find_tag_end(self.src, self.pos) {
                let tag = &self.src[self.pos..=end];
                self.pos = end + 1;
                return Some(Token::Tag(tag));
            }
            let rest = &self.src[self.pos..];
            self.pos = n;
            return Some(Token::Text(rest));
        }
        let next_lt = memchr(b'<', &self.src[self.pos..])
            .map(|off| self.pos + off)
            .unwrap_or(n);
        let text = &self.src[self.pos..next_lt];
        self.pos = next_lt;
        Some(Token::Text(text))
    }
}

/// Find the '>' for a tag starting at `i` (s[i] == '<'), being quote-aware.
fn find_tag_end(s: &[u8], mut i: usize) -> Option<usize> {
    let n = s.len();
    i += 1;
    let mut quote: u8 = 0;
    while i < n {
        let b = s[i];
        if quote != 0 {
            if b == quote {
                quote = 0;
            }
        } else if b == b'"' || b == b'\'' {
            quote = b;
        } else if b == b'>' {
            return Some(i);
        }
        i += 1;
    }
    None
}

#[derive(Clone, Copy, Debug)]
pub struct TagInfo<'a> {
    pub name: &'a [u8],
    pub is_end: bool,
}

/// Extract tag name and end flag from raw `<...>` bytes.
pub fn parse_tag_info(tag: &[u8]) -> TagInfo<'_> {
    let n = tag.len();
    let mut i = 1;

    let mut is_end = false;
    if i < n && tag[i] == b'/' {
        is_end = true;
        i += 1;
    }
    while i < n && is_ws(tag[i]) {
        i += 1;
    }
    let start = i;
    while i < n && is_name_char(tag[i]) {
        i += 1;
    }
    TagInfo {
        name: &tag[start..i],
        is_end,
    }
}

/// Heading level for names of the form `hN`.
pub fn heading_level(name: &[u8]) -> Option<u8> {
    if name.len() == 2 && name[0].eq_ignore_ascii_case(&b'h') && name[1].is_ascii_digit() {
        Some(name[1] - b'0')
    } else {
        None
    }
}

/// Value of attribute `name` in a raw `<...>` tag, if the attribute is
/// present. Scanner in the shape [name] ( '=' [value] )?; values may be
/// quoted or unquoted, and a valueless attribute yields an empty slice.
pub fn attr_value<'a>(tag: &'a [u8], name: &[u8]) -> Option<&'a [u8]> {
    let len = tag.len();
    if len < 2 {
        return None;
    }
    let mut i = 1usize;

    // skip the tag name itself
    if tag[i] == b'/' {
        i += 1;
    }
    while i < len && is_ws(tag[i]) {
        i += 1;
    }
    while i < len && is_name_char(tag[i]) {
        i += 1;
    }

    while i < len && tag[i] != b'>' {
        // skip whitespace and slashes
        while i < len && (is_ws(tag[i]) || tag[i] == b'/') {
            i += 1;
        }
        if i >= len || tag[i] == b'>' {
            break;
        }

        if !is_name_char(tag[i]) {
            // Not a valid name start; advance to avoid infinite loops.
            i += 1;
            continue;
        }
        let name_start = i;
        i += 1;
        while i < len && is_name_char(tag[i]) {
            i += 1;
        }
        let attr = &tag[name_start..i];

        while i < len && is_ws(tag[i]) {
            i += 1;
        }

        let mut value: &[u8] = b"";
        if i < len && tag[i] == b'=' {
            i += 1;
            while i < len && is_ws(tag[i]) {
                i += 1;
            }
            if i < len && (tag[i] == b'"' || tag[i] == b'\'') {
                let q = tag[i];
                i += 1;
                let start = i;
                while i < len && tag[i] != q {
                    i += 1;
                }
                value = &tag[start..i];
                if i < len {
                    i += 1;
                }
            } else {
                let start = i;
                while i < len && !is_ws(tag[i]) && tag[i] != b'>' {
                    i += 1;
                }
                value = &tag[start..i];
            }
        }

        if attr.eq_ignore_ascii_case(name) {
            return Some(value);
        }
    }
    None
}

pub fn has_attr_value(tag: &[u8], name: &[u8], value: &[u8]) -> bool {
    attr_value(tag, name).map_or(false, |v| v == value)
}

#[inline]
pub(crate) fn is_name_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b == b':'
}

#[inline]
pub(crate) fn is_ws(b: u8) -> bool {
    b == b' ' || b == b'\t' || b == b'\n' || b == b'\r'
}

pub(crate) fn matches_ignore_ascii_case(name: &[u8], set: &[&[u8]]) -> bool {
    set.iter().any(|&s| name.eq_ignore_ascii_case(s))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(src: &[u8]) -> Vec<Token<'_>> {
        Tokenizer::new(src).collect()
    }

    #[test]
    fn splits_tags_and_text() {
        assert_eq!(
            tokens(b"a<p>b</p>"),
            vec![
                Token::Text(b"a"),
                Token::Tag(b"<p>"),
                Token::Text(b"b"),
                Token::Tag(b"</p>"),
            ]
        );
    }

    #[test]
    fn quoted_gt_does_not_end_a_tag() {
        assert_eq!(
            tokens(b"<a href=\"x>y\">z"),
            vec![Token::Tag(b"<a href=\"x>y\">"), Token::Text(b"z")]
        );
    }

    #[test]
    fn unterminated_tag_becomes_text() {
        assert_eq!(tokens(b"a<p b"), vec![Token::Text(b"a"), Token::Text(b"<p b")]);
    }

    #[test]
    fn parses_name_and_end_flag() {
        let ti = parse_tag_info(b"</td>");
        assert_eq!(ti.name, b"td");
        assert!(ti.is_end);

        let ti = parse_tag_info(b"<h2 id=\"x\">");
        assert_eq!(ti.name, b"h2");
        assert!(!ti.is_end);
    }

    #[test]
    fn heading_levels() {
        assert_eq!(heading_level(b"h1"), Some(1));
        assert_eq!(heading_level(b"h7"), Some(7));
        assert_eq!(heading_level(b"hr"), None);
        assert_eq!(heading_level(b"head"), None);
    }

    #[test]
    fn finds_attribute_values() {
        let tag = b"<h3 class=\"x\" id=\"types-of-symbology\">";
        assert_eq!(attr_value(tag, b"id"), Some(&b"types-of-symbology"[..]));
        assert_eq!(attr_value(tag, b"class"), Some(&b"x"[..]));
        assert_eq!(attr_value(tag, b"href"), None);
        assert!(has_attr_value(tag, b"id", b"types-of-symbology"));
    }

    #[test]
    fn unquoted_and_valueless_attributes() {
        assert_eq!(attr_value(b"<a href=#intro>", b"href"), Some(&b"#intro"[..]));
        assert_eq!(attr_value(b"<td nowrap>", b"nowrap"), Some(&b""[..]));
    }
}
