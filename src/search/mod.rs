// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Web search
//!
//! Produces the ranked hit list the acquisition pipeline consumes.
//! DuckDuckGo's HTML interface is the default backend (no API key).

pub mod config;
pub mod duckduckgo;
pub mod provider;
pub mod types;

pub use config::SearchConfig;
pub use duckduckgo::DuckDuckGoProvider;
pub use provider::{SearchProvider, StaticSearchProvider};
pub use types::{SearchError, SearchHit};
