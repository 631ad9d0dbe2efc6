use crate::model::{Body, Header, MediaTypeBody, Method, QueryString, Response, UriParameter};

use super::{string_type, HasDefaults, RootContext};

impl HasDefaults for Method {
    fn with_defaults(&self, root: &RootContext) -> Self {
        Method {
            protocols: Some(
                self.protocols
                    .clone()
                    .unwrap_or_else(|| root.protocols.clone()),
            ),
            query_parameters: self.query_parameters.with_defaults(root),
            headers: self.headers.with_defaults(root),
            query_string: self.query_string.with_defaults(root),
            responses: self.responses.with_defaults(root),
            body: self.body.with_defaults(root),
            ..self.clone()
        }
    }
}

impl HasDefaults for Response {
    fn with_defaults(&self, root: &RootContext) -> Self {
        Response {
            headers: self.headers.with_defaults(root),
            body: self.body.with_defaults(root),
            ..self.clone()
        }
    }
}

impl HasDefaults for Body {
    /// A body without media-type variants gets one variant per root media
    /// type, each carrying the body's own type, properties and examples.
    fn with_defaults(&self, root: &RootContext) -> Self {
        let properties = self.properties.with_defaults(root);
        let examples = self.examples.with_defaults(root);

        let media_types = match &self.media_types {
            Some(media_types) => Some(media_types.with_defaults(root)),
            None if root.media_types.is_empty() => None,
            None => Some(
                root.media_types
                    .iter()
                    .map(|media_type| MediaTypeBody {
                        identifier: media_type.identifier.clone(),
                        data_type: self.data_type.clone(),
                        properties: properties.clone(),
                        examples: examples.clone(),
                    })
                    .collect(),
            ),
        };

        Body {
            data_type: self.data_type.clone(),
            properties,
            examples,
            media_types,
        }
    }
}

impl HasDefaults for MediaTypeBody {
    fn with_defaults(&self, root: &RootContext) -> Self {
        MediaTypeBody {
            properties: self.properties.with_defaults(root),
            examples: self.examples.with_defaults(root),
            ..self.clone()
        }
    }
}

impl HasDefaults for Header {
    fn with_defaults(&self, root: &RootContext) -> Self {
        Header {
            data_type: Some(self.data_type.clone().unwrap_or_else(string_type)),
            required: Some(self.required.unwrap_or(true)),
            examples: self.examples.with_defaults(root),
            ..self.clone()
        }
    }
}

impl HasDefaults for UriParameter {
    fn with_defaults(&self, root: &RootContext) -> Self {
        UriParameter {
            data_type: Some(self.data_type.clone().unwrap_or_else(string_type)),
            required: Some(self.required.unwrap_or(true)),
            examples: self.examples.with_defaults(root),
            ..self.clone()
        }
    }
}

impl HasDefaults for QueryString {
    fn with_defaults(&self, root: &RootContext) -> Self {
        QueryString {
            properties: self.properties.with_defaults(root),
            examples: self.examples.with_defaults(root),
            ..self.clone()
        }
    }
}
