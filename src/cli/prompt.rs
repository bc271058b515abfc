// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Interactive fallback for values not given on the command line

use anyhow::{anyhow, bail, Result};
use std::io::{BufRead, Write};

use crate::scoring::LabelPair;

/// Print `message` and read one trimmed line
pub fn prompt_line<R: BufRead, W: Write>(input: &mut R, output: &mut W, message: &str) -> Result<String> {
    write!(output, "{}", message)?;
    output.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

pub fn resolve_query<R: BufRead, W: Write>(
    given: Option<String>,
    input: &mut R,
    output: &mut W,
) -> Result<String> {
    let query = match given {
        Some(query) => query,
        None => prompt_line(input, output, "Search query: ")?,
    };
    let query = query.trim().to_string();
    if query.is_empty() {
        bail!("Search query must not be empty");
    }
    Ok(query)
}

pub fn resolve_labels<R: BufRead, W: Write>(
    given: Option<String>,
    input: &mut R,
    output: &mut W,
) -> Result<LabelPair> {
    let raw = match given {
        Some(labels) => labels,
        None => prompt_line(
            input,
            output,
            "Classification labels, space separated (e.g. Bullish Bearish):\n> ",
        )?,
    };
    LabelPair::parse(&raw).map_err(|e| anyhow!(e))
}

/// Blank input means `default` (`SEARCH_MAX_RESULTS`)
pub fn resolve_max_results<R: BufRead, W: Write>(
    given: Option<usize>,
    default: usize,
    input: &mut R,
    output: &mut W,
) -> Result<usize> {
    let count = match given {
        Some(count) => count,
        None => {
            let raw = prompt_line(
                input,
                output,
                &format!("Number of results (large values take a while) [{}]: ", default),
            )?;
            if raw.is_empty() {
                default
            } else {
                raw.parse()
                    .map_err(|_| anyhow!("Not a valid result count: {}", raw))?
            }
        }
    };
    if count == 0 {
        bail!("Number of results must be at least 1");
    }
    Ok(count)
}
