// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Media type classification for fetched resources

use serde::{Deserialize, Serialize};
use std::fmt;

/// Raster image suffixes recognised from the URL path
const IMAGE_SUFFIXES: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "tif"];

/// Extraction strategy selected for a fetched resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ContentFormat {
    Html,
    Pdf,
    Image,
    Unknown,
}

impl ContentFormat {
    /// Classify a resource from its declared content type and URL
    ///
    /// Decision order:
    /// 1. `pdf` in the content type, or a `.pdf` path suffix
    /// 2. `image` in the content type, or a raster image path suffix
    /// 3. `html` in the content type
    /// 4. otherwise `Unknown`
    ///
    /// Content type and suffix matching are case-insensitive.
    pub fn classify(content_type: &str, url: &str) -> Self {
        let content_type = content_type.to_ascii_lowercase();
        let suffix = path_suffix(url);

        if content_type.contains("pdf") || suffix.as_deref() == Some("pdf") {
            Self::Pdf
        } else if content_type.contains("image")
            || suffix
                .as_deref()
                .is_some_and(|s| IMAGE_SUFFIXES.contains(&s))
        {
            Self::Image
        } else if content_type.contains("html") {
            Self::Html
        } else {
            Self::Unknown
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Html => "HTML",
            Self::Pdf => "PDF",
            Self::Image => "IMAGE",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Whether the body should be decoded as text rather than read as raw bytes
    pub fn is_textual(&self) -> bool {
        matches!(self, Self::Html)
    }
}

impl fmt::Display for ContentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lowercased extension of the URL path, ignoring query and fragment
fn path_suffix(url: &str) -> Option<String> {
    let path = match url::Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        // Relative or malformed URLs: strip query/fragment by hand
        Err(_) => url
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_string(),
    };

    let file_name = path.rsplit('/').next()?;
    let (_, ext) = file_name.rsplit_once('.')?;
    if ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}
