use serde::Serialize;

use crate::datatype::DataType;
use crate::model::lookup::{find_by_key, Keyed};
use crate::model::types::{Example, Property};

/// A request or response body.
///
/// Either describes the payload directly, or holds one variant per media type.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Body {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub data_type: Option<DataType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<Vec<Property>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub examples: Option<Vec<Example>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_types: Option<Vec<MediaTypeBody>>,
}

impl Body {
    /// The variant for a media type identifier such as `application/json`.
    pub fn media_type(&self, identifier: &str) -> Option<&MediaTypeBody> {
        find_by_key(self.media_types.iter().flatten(), identifier)
    }
}

/// The body variant for one media type.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaTypeBody {
    pub identifier: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub data_type: Option<DataType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<Vec<Property>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub examples: Option<Vec<Example>>,
}

impl Keyed for MediaTypeBody {
    type Key = str;

    fn key(&self) -> &str {
        &self.identifier
    }
}

/// A media type identifier declared at the document root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MediaType {
    pub identifier: String,
}

impl MediaType {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
        }
    }

    /// A loose `type/subtype` check used to tell media-type keys apart from
    /// other keys at the same level.
    pub fn is_valid(identifier: &str) -> bool {
        let Some((kind, subtype)) = identifier.split_once('/') else {
            return false;
        };
        let valid = |part: &str, wildcard: bool| {
            !part.is_empty()
                && part.chars().all(|c| {
                    c.is_ascii_alphanumeric()
                        || matches!(c, '.' | '+' | '-' | '_' | '!' | '#' | '$' | '&' | '^')
                        || (wildcard && c == '*')
                })
        };
        valid(kind, true) && valid(subtype, true) && !subtype.contains('/')
    }
}
