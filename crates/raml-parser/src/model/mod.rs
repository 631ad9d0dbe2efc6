//! The document model.
//!
//! Every node is owned by exactly one parent and built in one step from
//! already-parsed children. Optional fields stay `None` when the document does
//! not set them; the defaulted view fills them in.

pub mod annotation;
pub mod body;
pub mod document;
pub mod library;
pub mod lookup;
pub mod method;
pub mod resource;
pub mod security;
pub mod templates;
pub mod types;

pub use annotation::{Annotation, AnnotationType, AnnotationTypeKind};
pub use body::{Body, MediaType, MediaTypeBody};
pub use document::{DocumentationEntry, Raml};
pub use library::Library;
pub use lookup::{find_by_key, Keyed};
pub use method::{Header, HttpMethod, Method, Protocol, QueryString, Response};
pub use resource::{Resource, UriParameter};
pub use security::{
    OAuth1Settings, OAuth2Settings, SecurityScheme, SecuritySchemeDescription,
    SecuritySchemeSettings, SecuritySchemeType, SecuritySchemeUsage,
};
pub use templates::{ResourceType, ResourceTypeUsage, TraitDefinition, TraitUsage};
pub use types::{
    Example, FileRestrictions, NumberFormat, NumberRestrictions, Property, PropertyRestrictions,
    StringRestrictions, Type,
};
