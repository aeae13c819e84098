//! Inventory resolution: which repositories, and which of their branches, are releasable
//!
//! Two sources, selected by the `repositories` config key:
//! - a URL to a markdown listing (the default), fetched and parsed leniently
//! - an explicit `repository -> [branches]` mapping
//!
//! Either way the result is an [`Inventory`] that keeps source order.

pub mod markdown;
pub mod remote;

use crate::core::error::FleetResult;
use crate::utils;
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use std::fmt;
use tracing::debug;

pub use remote::{HttpFetcher, ListingFetcher};

/// Inventory listing used when the config names no source
pub const DEFAULT_INVENTORY_URL: &str = "https://raw.githubusercontent.com/CSPI-QE/MSI/main/REPOS_INVENTORY.md";

/// One repository and its releasable branches, in inventory order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryEntry {
  pub name: String,
  pub branches: Vec<String>,
}

/// Ordered repository -> branches mapping
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
  entries: Vec<RepositoryEntry>,
}

impl Inventory {
  /// Add a repository; a repeated name replaces the earlier branches in place
  pub fn insert(&mut self, name: impl Into<String>, branches: Vec<String>) {
    let name = name.into();
    match self.entries.iter_mut().find(|e| e.name == name) {
      Some(existing) => existing.branches = branches,
      None => self.entries.push(RepositoryEntry { name, branches }),
    }
  }

  #[cfg(test)]
  pub fn get(&self, name: &str) -> Option<&RepositoryEntry> {
    self.entries.iter().find(|e| e.name == name)
  }

  pub fn iter(&self) -> impl Iterator<Item = &RepositoryEntry> {
    self.entries.iter()
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Total number of (repository, branch) pairs
  pub fn branch_count(&self) -> usize {
    self.entries.iter().map(|e| e.branches.len()).sum()
  }
}

/// Where the inventory comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InventorySource {
  /// Markdown listing fetched over HTTP
  Url(String),
  /// `repository URL or name -> branches`, in file order
  Explicit(Vec<(String, Vec<String>)>),
}

impl Default for InventorySource {
  fn default() -> Self {
    InventorySource::Url(DEFAULT_INVENTORY_URL.to_string())
  }
}

impl<'de> Deserialize<'de> for InventorySource {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    struct SourceVisitor;

    impl<'de> Visitor<'de> for SourceVisitor {
      type Value = InventorySource;

      fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an inventory URL or a mapping of repository to branch list")
      }

      fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        Ok(InventorySource::Url(value.to_string()))
      }

      fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        // Collected by hand so file order survives
        let mut entries = Vec::new();
        while let Some((key, branches)) = map.next_entry::<String, Vec<String>>()? {
          entries.push((key, branches));
        }
        Ok(InventorySource::Explicit(entries))
      }
    }

    deserializer.deserialize_any(SourceVisitor)
  }
}

/// Build the inventory from its source
///
/// A fetch failure is returned as-is; no partial inventory is ever produced.
pub fn resolve(source: &InventorySource, released_markers: &[String], fetcher: &dyn ListingFetcher) -> FleetResult<Inventory> {
  match source {
    InventorySource::Url(url) => {
      debug!("Fetching inventory from {}", url);
      let listing = fetcher.fetch(url)?;
      Ok(markdown::parse_listing(&listing, released_markers))
    }
    InventorySource::Explicit(entries) => {
      let mut inventory = Inventory::default();
      for (key, branches) in entries {
        let name = utils::repo_name_from_key(key);
        debug!("Found {} with branches {:?}", name, branches);
        inventory.insert(name, branches.clone());
      }
      Ok(inventory)
    }
  }
}
