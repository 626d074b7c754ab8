//! Keyword lookup over the static documentation catalog.
//!
//! No fuzzy matching and no ranking: an entry is relevant when one of
//! the known domain keywords in the text matches its name or methods.

pub mod catalog;

pub use catalog::{builtin_catalog, ApiSection, DocCatalog, ErrorRemedy, MethodDoc};

use crate::infrastructure::storage::SnapshotStore;
use log::{debug, warn};

/// Domain keywords recognized in free text.
pub const KEY_TERMS: [&str; 22] = [
    "extrude",
    "revolve",
    "sketch",
    "profile",
    "plane",
    "feature",
    "component",
    "body",
    "joint",
    "assembly",
    "parameter",
    "pattern",
    "circular",
    "rectangular",
    "mirror",
    "fillet",
    "chamfer",
    "hole",
    "thread",
    "construction",
    "offset",
    "loft",
];

const MAX_DIGEST_SECTIONS: usize = 3;

pub struct DocsRetriever {
    catalog: DocCatalog,
}

impl DocsRetriever {
    pub fn new(catalog: DocCatalog) -> Self {
        Self { catalog }
    }

    /// Load the catalog from the snapshot cache when fresh, otherwise
    /// rebuild from the built-in table and rewrite the snapshot.
    pub fn load_or_rebuild(store: &SnapshotStore) -> Self {
        match store.load::<DocCatalog>() {
            Ok(Some(catalog)) => {
                debug!("Loaded documentation catalog from {}", store.path().display());
                Self::new(catalog)
            }
            Ok(None) => {
                let catalog = builtin_catalog();
                if let Err(e) = store.save(&catalog) {
                    warn!("Failed to write documentation cache: {}", e);
                }
                Self::new(catalog)
            }
            Err(e) => {
                warn!("Unreadable documentation cache, rebuilding: {}", e);
                Self::new(builtin_catalog())
            }
        }
    }

    /// Known domain keywords present in the text.
    pub fn key_terms_in(text: &str) -> Vec<&'static str> {
        let lowered = text.to_lowercase();
        KEY_TERMS
            .iter()
            .copied()
            .filter(|term| lowered.contains(term))
            .collect()
    }

    /// Bounded digest of the sections matching the text, for prompt
    /// injection. `None` when no keyword matches.
    pub fn digest_for(&self, text: &str) -> Option<String> {
        let terms = Self::key_terms_in(text);
        if terms.is_empty() {
            return None;
        }

        let matching: Vec<(&String, &ApiSection)> = self
            .catalog
            .sections
            .iter()
            .filter(|(name, section)| {
                let name = name.to_lowercase();
                terms.iter().any(|term| {
                    name.contains(term)
                        || section
                            .methods
                            .keys()
                            .any(|m| m.to_lowercase().contains(term))
                })
            })
            .take(MAX_DIGEST_SECTIONS)
            .collect();

        if matching.is_empty() {
            return None;
        }

        let mut digest = String::from("FUSION 360 API NOTES:\n");
        for (name, section) in matching {
            digest.push_str(&format!("\n## {}\n{}\n", name, section.description));

            for (method_name, method) in &section.methods {
                digest.push_str(&format!(
                    "### {}\nParameters: {}\nReturns: {}\nExample: {}\n",
                    method_name, method.parameters, method.returns, method.example
                ));
            }

            if !section.common_errors.is_empty() {
                digest.push_str("Common errors:\n");
                for error in &section.common_errors {
                    digest.push_str(&format!("- {}\n", error));
                }
            }

            if !section.best_practices.is_empty() {
                digest.push_str("Best practices:\n");
                for practice in &section.best_practices {
                    digest.push_str(&format!("- {}\n", practice));
                }
            }
        }
        Some(digest)
    }

    /// Canned remediation for a failure, matched against the trace plus
    /// the code that produced it: a signature like `tangent`+`revolve`
    /// usually spans both.
    pub fn remedy_for_failure(&self, error_text: &str, code: &str) -> Option<&ErrorRemedy> {
        let context = format!("{}\n{}", error_text, code).to_lowercase();
        self.catalog
            .remedies
            .iter()
            .find(|remedy| remedy.signature.iter().all(|word| context.contains(word)))
    }
}
