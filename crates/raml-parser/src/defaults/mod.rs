//! The defaulted view of a parsed document.
//!
//! [`HasDefaults::with_defaults`] returns a new node with every value the
//! document left out filled in. The source node is never modified.

mod document;
mod http;
mod types;

use crate::datatype::{DataType, ScalarType};
use crate::model::{MediaType, Protocol, Raml};

/// Root-level values that descendants inherit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootContext {
    /// Media types for bodies that declare none of their own.
    pub media_types: Vec<MediaType>,
    /// Protocols for methods that declare none of their own.
    pub protocols: Vec<Protocol>,
}

impl RootContext {
    /// The context a document provides to its descendants.
    pub fn for_document(raml: &Raml) -> Self {
        Self {
            media_types: raml.media_types.clone().unwrap_or_default(),
            protocols: document::effective_protocols(raml),
        }
    }
}

impl Default for RootContext {
    fn default() -> Self {
        Self {
            media_types: Vec::new(),
            protocols: DEFAULT_PROTOCOLS.to_vec(),
        }
    }
}

/// Protocols assumed when neither the method nor the root names any.
pub const DEFAULT_PROTOCOLS: [Protocol; 2] = [Protocol::Http, Protocol::Https];

/// A node that can produce a copy of itself with defaults applied.
pub trait HasDefaults: Sized {
    fn with_defaults(&self, root: &RootContext) -> Self;
}

impl<T: HasDefaults> HasDefaults for Vec<T> {
    fn with_defaults(&self, root: &RootContext) -> Self {
        self.iter().map(|item| item.with_defaults(root)).collect()
    }
}

impl<T: HasDefaults> HasDefaults for Option<T> {
    fn with_defaults(&self, root: &RootContext) -> Self {
        self.as_ref().map(|inner| inner.with_defaults(root))
    }
}

impl Raml {
    /// This document with every default applied, using its own root context.
    pub fn defaulted(&self) -> Raml {
        self.with_defaults(&RootContext::for_document(self))
    }
}

fn string_type() -> DataType {
    DataType::Scalar(ScalarType::String)
}
