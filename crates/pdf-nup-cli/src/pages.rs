//! Page list parsing for `--pages` and `--overlay`

use anyhow::{Context, Result, bail};
use std::path::PathBuf;

/// Parse a 1-based page list such as `3,1-2` into 0-based indices, in the
/// order given
pub fn parse_page_list(list: &str, total: usize) -> Result<Vec<usize>> {
    let mut indices = Vec::new();

    for part in list.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (start, end) = match part.split_once('-') {
            Some((start, end)) => (parse_page(start, total)?, parse_page(end, total)?),
            None => {
                let page = parse_page(part, total)?;
                (page, page)
            }
        };
        if start > end {
            bail!("Page range {} runs backwards", part);
        }
        indices.extend(start..=end);
    }

    if indices.is_empty() {
        bail!("Page list '{}' selects no pages", list);
    }
    Ok(indices)
}

/// Parse a single 1-based page number into a 0-based index
pub fn parse_page(text: &str, total: usize) -> Result<usize> {
    let number: usize = text
        .trim()
        .parse()
        .with_context(|| format!("'{}' is not a page number", text.trim()))?;
    if number == 0 || number > total {
        bail!("Page {} is out of range (1-{})", number, total);
    }
    Ok(number - 1)
}

/// Parse `PAGE=path` into a 0-based page index and an image path
pub fn parse_overlay(arg: &str, total: usize) -> Result<(usize, PathBuf)> {
    let (page, path) = arg
        .split_once('=')
        .with_context(|| format!("Overlay '{}' must look like PAGE=image.png", arg))?;
    Ok((parse_page(page, total)?, PathBuf::from(path)))
}
