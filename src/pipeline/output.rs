// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Result artifact: pretty-printed UTF-8 JSON array of records

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use super::record::ResultRecord;
use crate::errors::AcquisitionError;

pub const DEFAULT_OUTPUT_FILE: &str = "all_search_results.json";

/// Write `records` as a 4-space indented JSON array; non-ASCII stays unescaped
pub fn write_results(path: impl AsRef<Path>, records: &[ResultRecord]) -> Result<(), AcquisitionError> {
    let mut writer = BufWriter::new(File::create(path.as_ref())?);
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut writer, PrettyFormatter::with_indent(b"    "));
    records
        .serialize(&mut serializer)
        .map_err(std::io::Error::from)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

pub fn read_results(path: impl AsRef<Path>) -> Result<Vec<ResultRecord>, AcquisitionError> {
    let reader = BufReader::new(File::open(path.as_ref())?);
    let records = serde_json::from_reader(reader).map_err(std::io::Error::from)?;
    Ok(records)
}
