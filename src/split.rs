//! Stage 5: cut the sectioned document into named fragments at `<page>`
//! markers. Chapter heading text is dropped along the way (the website
//! template renders the title itself), but the heading tags stay.

use crate::tokenizer::{heading_level, parse_tag_info, Token, Tokenizer};
use crate::Error;

/// One output file of the split manual.
#[derive(Debug)]
pub struct Fragment {
    pub name: String,
    pub html: Vec<u8>,
}

/// Output fragments, one per manual part, in website order.
pub const FRAGMENT_NAMES: &[&str] = &[
    "chapter1.html",
    "chapter2.html",
    "chapter3.html",
    "chapter4.html",
    "chapter5.html",
    "chapter6.0.html",
    "chapter6.1.html",
    "chapter6.2.html",
    "chapter6.3.html",
    "chapter6.4.html",
    "chapter6.5.html",
    "chapter6.6.html",
    "chapter6.7.html",
    "chapter7.html",
    "appendixa.html",
    "appendixb.html",
];

/// Split the page-marked document into `names.len()` fragments. The marker
/// count must be exactly one less than the name count; anything else would
/// silently lose content, so it is an error instead.
pub fn split_pages(src: &[u8], names: &[&str]) -> Result<Vec<Fragment>, Error> {
    let mut pages: Vec<Vec<u8>> = Vec::with_capacity(names.len());
    let mut current: Vec<u8> = Vec::new();
    let mut in_h2 = false;

    for token in Tokenizer::new(src) {
        match token {
            Token::Tag(tag) => {
                if tag == b"<page>" {
                    pages.push(std::mem::take(&mut current));
                    continue;
                }
                let ti = parse_tag_info(tag);
                if heading_level(ti.name) == Some(2) {
                    in_h2 = !ti.is_end;
                }
                current.extend_from_slice(tag);
            }
            Token::Text(text) => {
                if !in_h2 {
                    current.extend_from_slice(text);
                }
            }
        }
    }
    pages.push(current);

    if pages.len() != names.len() {
        return Err(Error::FragmentCount {
            pages: pages.len(),
            names: names.len(),
        });
    }

    Ok(names
        .iter()
        .zip(pages)
        .map(|(&name, html)| Fragment {
            name: name.to_string(),
            html,
        })
        .collect())
}
