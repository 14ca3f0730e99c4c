//! chapterhtml — converts one large pandoc-generated HTML manual into
//! per-chapter fragments for embedding in a website template.
//!
//! The whole program is a linear pipeline of single-pass byte scans, each
//! consuming the previous stage's output string:
//!
//! 1. [`isolate`] puts indentable tags on their own lines.
//! 2. [`rewrite`] strips attributes, suppresses layout tags, shifts heading
//!    levels, renames code classes and rewrites image paths.
//! 3. [`collapse`] removes blank lines outside `<pre>` blocks.
//! 4. [`section`] re-indents and wraps top-level blocks in `<section>`s,
//!    inserting `<page>` markers at chapter boundaries.
//! 5. [`split`] cuts the document at the markers into named fragments.

pub mod collapse;
pub mod isolate;
pub mod rewrite;
pub mod section;
pub mod split;
pub mod tokenizer;

pub use split::{Fragment, FRAGMENT_NAMES};

use log::info;
use std::fs;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("document splits into {pages} fragments but {names} output names are configured")]
    FragmentCount { pages: usize, names: usize },
}

/// Run stages 1-4 over the raw manual, producing the page-marked, sectioned
/// document the splitter consumes.
pub fn convert(src: &[u8]) -> Vec<u8> {
    info!("isolating tags");
    let doc = isolate::isolate_tags(src);
    info!("adjusting tags");
    let doc = rewrite::rewrite_tags(&doc);
    info!("removing blank lines");
    let doc = collapse::collapse_blank_lines(&doc);
    info!("applying indentation and sections");
    section::indent_and_section(&doc)
}

/// Convert `input` and write one file per manual part into `out_dir`,
/// overwriting whatever is there.
pub fn run(input: &Path, out_dir: &Path) -> Result<(), Error> {
    info!("reading {}", input.display());
    let src = fs::read(input)?;

    let doc = convert(&src);
    let fragments = split::split_pages(&doc, FRAGMENT_NAMES)?;
    for fragment in &fragments {
        info!("writing {}", fragment.name);
        fs::write(out_dir.join(&fragment.name), &fragment.html)?;
    }
    Ok(())
}
