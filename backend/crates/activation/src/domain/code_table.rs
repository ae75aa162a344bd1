//! Redeemable Code Table
//!
//! Fixed list of codes compiled into the binary. Anyone holding the binary
//! can read them; the table is a deterrent, not a secret store.

use crate::domain::value_objects::ActivationCode;
use std::collections::HashMap;
use std::num::NonZeroU32;
use std::sync::{Arc, LazyLock};

/// `(code, uses, description)`
const BUILTIN_CODES: &[(&str, u32, &str)] = &[
    ("DEMO-2024-FREE", 5, "Demo code"),
    ("COMIC-STARTER-10", 10, "Starter pack"),
    ("COMIC-CREATOR-30", 30, "Creator pack"),
    ("COMIC-STUDIO-100", 100, "Studio pack"),
];

static BUILTIN: LazyLock<Arc<CodeTable>> = LazyLock::new(|| {
    let table = BUILTIN_CODES
        .iter()
        .filter_map(|(code, uses, description)| {
            Some((*code, NonZeroU32::new(*uses)?, *description))
        })
        .fold(CodeTable::new(), |table, (code, uses, description)| {
            table.with_code(code, uses, description)
        });
    Arc::new(table)
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeEntry {
    pub uses: NonZeroU32,
    pub description: String,
}

/// Immutable mapping from obfuscated canonical code to its entry
#[derive(Debug, Clone, Default)]
pub struct CodeTable {
    entries: HashMap<String, CodeEntry>,
}

impl CodeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The table shipped with the binary
    pub fn builtin() -> Arc<Self> {
        BUILTIN.clone()
    }

    /// Add a code. Blank codes are ignored.
    pub fn with_code(mut self, code: &str, uses: NonZeroU32, description: &str) -> Self {
        if let Some(code) = ActivationCode::parse(code) {
            self.entries.insert(
                code.obfuscated(),
                CodeEntry {
                    uses,
                    description: description.to_string(),
                },
            );
        }
        self
    }

    pub fn lookup(&self, code: &ActivationCode) -> Option<&CodeEntry> {
        self.entries.get(&code.obfuscated())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
