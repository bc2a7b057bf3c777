use std::path::Path;
use anyhow::{Result, anyhow};
use log::warn;

// @module: Page artifact naming and ordering protocol
//
// The `<base>_pagina_<index>.<ext>` convention is written down here and
// nowhere else. Formatting, parsing and sorting stay next to each other so
// the two halves cannot drift apart.

// @const: Marker between the document base name and the 1-based page index
pub const PAGE_MARKER: &str = "_pagina_";

// @const: Suffix of the final joined audio file
pub const RESULT_SUFFIX: &str = "_completo";

// @enum: Ordering a sort call ended up using
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOrdering {
    /// Every file name carried a parsable index; files are in numeric page order
    ByIndex,
    /// At least one file name did not parse; files are in lexical order
    Lexical,
}

// @fn: Per-page artifact file name for a given stage extension
pub fn page_file_name(base: &str, index: u32, extension: &str) -> String {
    format!("{}{}{}.{}", base, PAGE_MARKER, index, extension)
}

// @fn: File name of the final joined audiobook
pub fn result_file_name(base: &str) -> String {
    format!("{}{}.wav", base, RESULT_SUFFIX)
}

// @fn: Parse the page index back out of an artifact file name
//
// The index is the last underscore-delimited segment of the file stem.
// A name with no parsable trailing segment is an error, which the sort
// below turns into the lexical fallback.
pub fn page_index(file_name: &str) -> Result<u32> {
    let stem = Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| anyhow!("File name has no stem: {}", file_name))?;

    let last_segment = stem.rsplit_once('_').map_or(stem, |(_, tail)| tail);

    last_segment
        .parse::<u32>()
        .map_err(|_| anyhow!("No numeric page index in file name: {}", file_name))
}

// @fn: Sort page file names into document order
//
// Numeric order by parsed index when every name conforms. If any name
// fails to parse the whole list falls back to a plain lexical sort, with
// exactly one warning for the entire sort call.
pub fn sort_page_files(files: &mut [String]) -> PageOrdering {
    let mut indices = Vec::with_capacity(files.len());
    for name in files.iter() {
        match page_index(name) {
            Ok(index) => indices.push(index),
            Err(err) => {
                warn!("Could not order page files numerically ({}); falling back to lexical order", err);
                files.sort();
                return PageOrdering::Lexical;
            }
        }
    }

    let mut pairs: Vec<(u32, String)> = indices.into_iter().zip(files.iter().cloned()).collect();
    pairs.sort_by_key(|&(index, _)| index);
    for (slot, (_, name)) in files.iter_mut().zip(pairs) {
        *slot = name;
    }

    PageOrdering::ByIndex
}
