//! Stage 3: collapse blank lines, except inside `<pre>` blocks where the
//! original spacing is part of the content.

use crate::tokenizer::{parse_tag_info, Token, Tokenizer};

pub fn collapse_blank_lines(src: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(src.len());
    let mut in_pre = false;
    let mut last = 0u8;
    for token in Tokenizer::new(src) {
        match token {
            Token::Tag(tag) => {
                let ti = parse_tag_info(tag);
                if ti.name.eq_ignore_ascii_case(b"pre") {
                    in_pre = !ti.is_end;
                }
                out.extend_from_slice(tag);
                last = b'>';
            }
            Token::Text(text) => {
                for &b in text {
                    if b != b'\n' || last != b'\n' || in_pre {
                        out.push(b);
                    }
                    last = b;
                }
            }
        }
    }
    out
}
