//! # Talus Policy Store
//!
//! A local blocklist policy store: maps an opaque user key to a set of
//! named blocklists and answers a single question: is this name blocked
//! for this user? The resolver core has no dependency on this crate; a
//! caller may consult it before or after resolving.
//!
//! Matching is textual: exact entries, suffix entries (the name or any
//! subdomain), and substring entries, all ASCII-case-insensitive and
//! insensitive to a trailing dot. An unknown user key is never blocked
//! (fail-open).
//!
//! ## Example
//!
//! ```rust
//! use talus_policy::{Blocklist, PolicyStore};
//!
//! let mut ads = Blocklist::new("ads");
//! ads.add_suffix("doubleclick.net");
//!
//! let mut store = PolicyStore::new();
//! store.add_blocklist(ads);
//! store.assign("user-1", "ads").unwrap();
//!
//! assert!(store.is_blocked("user-1", "stats.doubleclick.net"));
//! assert!(!store.is_blocked("someone-else", "stats.doubleclick.net"));
//! ```

use compact_str::CompactString;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Errors raised while loading or assembling policy.
#[derive(Error, Debug)]
pub enum PolicyError {
    /// IO error while reading a policy file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The policy document could not be parsed.
    #[error("invalid policy document: {0}")]
    Parse(#[from] toml::de::Error),

    /// A user references a blocklist that is not defined.
    #[error("user '{user}' references undefined blocklist '{blocklist}'")]
    UnknownBlocklist {
        /// The referencing user key.
        user: String,
        /// The missing blocklist name.
        blocklist: String,
    },
}

/// Result type for policy operations.
pub type Result<T> = std::result::Result<T, PolicyError>;

/// Normalizes a domain for matching: ASCII lowercase, trailing dot
/// stripped.
fn normalize(domain: &str) -> CompactString {
    let trimmed = domain.strip_suffix('.').unwrap_or(domain);
    let mut out = CompactString::with_capacity(trimmed.len());
    for c in trimmed.chars() {
        out.push(c.to_ascii_lowercase());
    }
    out
}

/// A named blocklist.
#[derive(Debug, Clone, Default)]
pub struct Blocklist {
    /// List name, referenced by user assignments.
    name: CompactString,
    /// Entries matching one exact domain.
    exact: HashSet<CompactString>,
    /// Entries matching a domain and all of its subdomains.
    suffixes: Vec<CompactString>,
    /// Entries matching anywhere in the domain text.
    substrings: Vec<CompactString>,
}

impl Blocklist {
    /// Creates an empty blocklist with the given name.
    pub fn new(name: impl Into<CompactString>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Returns the list name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adds an exact-match entry.
    pub fn add_exact(&mut self, entry: &str) {
        self.exact.insert(normalize(entry));
    }

    /// Adds a suffix entry: matches the entry itself and any subdomain.
    pub fn add_suffix(&mut self, entry: &str) {
        self.suffixes.push(normalize(entry));
    }

    /// Adds a substring entry.
    pub fn add_substring(&mut self, entry: &str) {
        self.substrings.push(normalize(entry));
    }

    /// Returns the number of entries across all kinds.
    pub fn len(&self) -> usize {
        self.exact.len() + self.suffixes.len() + self.substrings.len()
    }

    /// Returns true if the list has no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if the domain matches any entry in this list.
    pub fn matches(&self, domain: &str) -> bool {
        let domain = normalize(domain);

        if self.exact.contains(&domain) {
            return true;
        }

        if self.suffixes.iter().any(|suffix| {
            domain == *suffix
                || (domain.len() > suffix.len()
                    && domain.ends_with(suffix.as_str())
                    && domain.as_bytes()[domain.len() - suffix.len() - 1] == b'.')
        }) {
            return true;
        }

        self.substrings
            .iter()
            .any(|needle| domain.contains(needle.as_str()))
    }
}

/// The policy store: blocklists by name plus per-user assignments.
#[derive(Debug, Clone, Default)]
pub struct PolicyStore {
    /// All known blocklists, by name.
    blocklists: HashMap<CompactString, Blocklist>,
    /// User key to assigned blocklist names.
    users: HashMap<CompactString, Vec<CompactString>>,
}

impl PolicyStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a blocklist.
    pub fn add_blocklist(&mut self, blocklist: Blocklist) {
        self.blocklists.insert(blocklist.name.clone(), blocklist);
    }

    /// Assigns a blocklist to a user key.
    pub fn assign(&mut self, user_key: &str, blocklist: &str) -> Result<()> {
        if !self.blocklists.contains_key(blocklist) {
            return Err(PolicyError::UnknownBlocklist {
                user: user_key.to_string(),
                blocklist: blocklist.to_string(),
            });
        }

        self.users
            .entry(CompactString::from(user_key))
            .or_default()
            .push(CompactString::from(blocklist));
        Ok(())
    }

    /// Returns true if `name` is blocked for `user_key`.
    ///
    /// An unknown user key yields `false`: an invalid key means nothing
    /// is blocked, never an error.
    pub fn is_blocked(&self, user_key: &str, name: &str) -> bool {
        let Some(assigned) = self.users.get(user_key) else {
            return false;
        };

        for list_name in assigned {
            if let Some(list) = self.blocklists.get(list_name) {
                if list.matches(name) {
                    debug!(user = user_key, list = %list_name, domain = name, "blocked");
                    return true;
                }
            }
        }

        false
    }

    /// Loads a store from a TOML policy document.
    pub fn from_config(config: PolicyConfig) -> Result<Self> {
        let mut store = Self::new();

        for list in config.blocklists {
            let mut blocklist = Blocklist::new(list.name.as_str());
            for entry in &list.exact {
                blocklist.add_exact(entry);
            }
            for entry in &list.suffixes {
                blocklist.add_suffix(entry);
            }
            for entry in &list.substrings {
                blocklist.add_substring(entry);
            }
            store.add_blocklist(blocklist);
        }

        for user in config.users {
            for list_name in &user.blocklists {
                store.assign(&user.key, list_name)?;
            }
        }

        Ok(store)
    }

    /// Loads a store from a TOML policy file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: PolicyConfig = toml::from_str(&text)?;
        Self::from_config(config)
    }
}

/// On-disk policy document.
///
/// ```toml
/// [[blocklists]]
/// name = "ads"
/// exact = ["ads.example.com"]
/// suffixes = ["doubleclick.net"]
/// substrings = ["telemetry"]
///
/// [[users]]
/// key = "user-1"
/// blocklists = ["ads"]
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PolicyConfig {
    /// Blocklist definitions.
    #[serde(default)]
    pub blocklists: Vec<BlocklistConfig>,
    /// User assignments.
    #[serde(default)]
    pub users: Vec<UserConfig>,
}

/// One blocklist definition.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlocklistConfig {
    /// List name.
    pub name: String,
    /// Exact-match entries.
    #[serde(default)]
    pub exact: Vec<String>,
    /// Suffix entries.
    #[serde(default)]
    pub suffixes: Vec<String>,
    /// Substring entries.
    #[serde(default)]
    pub substrings: Vec<String>,
}

/// One user assignment.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserConfig {
    /// Opaque user key.
    pub key: String,
    /// Names of assigned blocklists.
    pub blocklists: Vec<String>,
}
