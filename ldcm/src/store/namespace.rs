//! Prefix table for rewriting between `prefix:local` identifiers and full
//! IRIs.
//!
//! The table is fixed at construction. Expansion percent-encodes the local
//! part once; shortening decodes it again, so `shorten(expand(id)) == id` for
//! every identifier whose prefix is known.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

use crate::schema::vocab::DEFAULT_NAMESPACE;

/// Namespace for generated instances.
pub const DATA_NAMESPACE: &str = "http://data.local/rdf/linkeddicom/";
pub const SCHEMA_ORG_NAMESPACE: &str = "https://schema.org/";

/// Ordered `(prefix, namespace)` pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceTable {
    entries: Vec<(String, String)>,
}

impl Default for NamespaceTable {
    fn default() -> Self {
        Self::empty()
            .with("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#")
            .with("rdfs", "http://www.w3.org/2000/01/rdf-schema#")
            .with("xsd", "http://www.w3.org/2001/XMLSchema#")
            .with("owl", "http://www.w3.org/2002/07/owl#")
            .with("ldcm", DEFAULT_NAMESPACE)
            .with("data", DATA_NAMESPACE)
            .with("schema", SCHEMA_ORG_NAMESPACE)
            .with("file", "file:/")
    }
}

impl NamespaceTable {
    /// A table with no prefixes.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Add or replace a prefix.
    #[must_use]
    pub fn with(mut self, prefix: impl Into<String>, namespace: impl Into<String>) -> Self {
        let prefix = prefix.into();
        let namespace = namespace.into();
        if let Some(entry) = self.entries.iter_mut().find(|(p, _)| *p == prefix) {
            entry.1 = namespace;
        } else {
            self.entries.push((prefix, namespace));
        }
        self
    }

    /// The namespace bound to `prefix`.
    #[must_use]
    pub fn namespace(&self, prefix: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(p, _)| p == prefix)
            .map(|(_, ns)| ns.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(p, ns)| (p.as_str(), ns.as_str()))
    }

    /// Expand `prefix:local` into a full IRI. Returns `None` when the text
    /// has no colon or the prefix is unknown.
    #[must_use]
    pub fn expand(&self, short: &str) -> Option<String> {
        let (prefix, local) = short.split_once(':')?;
        let namespace = self.namespace(prefix)?;
        Some(format!("{namespace}{}", percent_encode(local)))
    }

    /// Rewrite a full IRI as `prefix:local` using the longest matching
    /// namespace.
    #[must_use]
    pub fn shorten(&self, iri: &str) -> Option<String> {
        let (prefix, local) = self.split(iri)?;
        Some(format!("{prefix}:{}", percent_decode(local)))
    }

    /// Strip a known namespace from a full IRI, or a known prefix from a
    /// short identifier. Unknown input comes back unchanged.
    #[must_use]
    pub fn remove_namespace(&self, text: &str) -> String {
        if let Some((_, local)) = self.split(text) {
            return percent_decode(local);
        }
        match text.split_once(':') {
            Some((prefix, local)) if self.namespace(prefix).is_some() => local.to_owned(),
            _ => text.to_owned(),
        }
    }

    fn split<'t>(&self, iri: &'t str) -> Option<(&str, &'t str)> {
        self.entries
            .iter()
            .filter(|(_, ns)| iri.starts_with(ns.as_str()))
            .max_by_key(|(_, ns)| ns.len())
            .map(|(prefix, ns)| (prefix.as_str(), &iri[ns.len()..]))
    }
}

/// Everything but ASCII alphanumerics, `_.-~` and `/` is escaped.
const LOCAL_NAME: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'_')
    .remove(b'.')
    .remove(b'-')
    .remove(b'~')
    .remove(b'/');

#[must_use]
pub fn percent_encode(text: &str) -> String {
    utf8_percent_encode(text, LOCAL_NAME).to_string()
}

/// Decode `%XX` escapes. Malformed escapes are kept literally.
#[must_use]
pub fn percent_decode(text: &str) -> String {
    percent_decode_str(text).decode_utf8_lossy().into_owned()
}
