use crate::model::resource::template_names;
use crate::model::{
    AnnotationType, Library, Protocol, Raml, Resource, ResourceType, SecurityScheme,
    SecuritySchemeDescription, TraitDefinition, UriParameter,
};

use super::{string_type, HasDefaults, RootContext, DEFAULT_PROTOCOLS};

/// Declared protocols, else the scheme of the base URI, else HTTP and HTTPS.
pub(super) fn effective_protocols(raml: &Raml) -> Vec<Protocol> {
    if let Some(protocols) = &raml.protocols {
        return protocols.clone();
    }
    raml.base_uri
        .as_deref()
        .and_then(|uri| uri.split_once("://"))
        .and_then(|(scheme, _)| Protocol::parse(scheme))
        .map(|protocol| vec![protocol])
        .unwrap_or_else(|| DEFAULT_PROTOCOLS.to_vec())
}

/// Defaulted declared parameters, followed by a required string parameter
/// for each template name that has no declaration.
fn uri_parameters_with_defaults(
    declared: &Option<Vec<UriParameter>>,
    names: Vec<&str>,
    root: &RootContext,
) -> Option<Vec<UriParameter>> {
    let mut parameters = declared.with_defaults(root).unwrap_or_default();

    for name in names {
        if parameters.iter().any(|p| p.name == name) {
            continue;
        }
        parameters.push(UriParameter {
            name: name.to_string(),
            data_type: Some(string_type()),
            required: Some(true),
            ..Default::default()
        });
    }

    (!parameters.is_empty()).then_some(parameters)
}

impl HasDefaults for Raml {
    fn with_defaults(&self, root: &RootContext) -> Self {
        Raml {
            protocols: Some(effective_protocols(self)),
            base_uri_parameters: uri_parameters_with_defaults(
                &self.base_uri_parameters,
                template_names(self.base_uri.as_deref().unwrap_or_default()),
                root,
            ),
            types: self.types.with_defaults(root),
            traits: self.traits.with_defaults(root),
            resource_types: self.resource_types.with_defaults(root),
            annotation_types: self.annotation_types.with_defaults(root),
            security_schemes: self.security_schemes.with_defaults(root),
            uses: self.uses.with_defaults(root),
            resources: self.resources.with_defaults(root),
            ..self.clone()
        }
    }
}

impl HasDefaults for Resource {
    fn with_defaults(&self, root: &RootContext) -> Self {
        Resource {
            methods: self.methods.with_defaults(root),
            resources: self.resources.with_defaults(root),
            uri_parameters: uri_parameters_with_defaults(
                &self.uri_parameters,
                self.path_parameter_names(),
                root,
            ),
            ..self.clone()
        }
    }
}

impl HasDefaults for Library {
    fn with_defaults(&self, root: &RootContext) -> Self {
        Library {
            types: self.types.with_defaults(root),
            resource_types: self.resource_types.with_defaults(root),
            traits: self.traits.with_defaults(root),
            security_schemes: self.security_schemes.with_defaults(root),
            annotation_types: self.annotation_types.with_defaults(root),
            uses: self.uses.with_defaults(root),
            ..self.clone()
        }
    }
}

impl HasDefaults for TraitDefinition {
    fn with_defaults(&self, root: &RootContext) -> Self {
        TraitDefinition {
            headers: self.headers.with_defaults(root),
            query_parameters: self.query_parameters.with_defaults(root),
            query_string: self.query_string.with_defaults(root),
            responses: self.responses.with_defaults(root),
            body: self.body.with_defaults(root),
            ..self.clone()
        }
    }
}

impl HasDefaults for ResourceType {
    fn with_defaults(&self, root: &RootContext) -> Self {
        ResourceType {
            methods: self.methods.with_defaults(root),
            uri_parameters: self.uri_parameters.with_defaults(root),
            ..self.clone()
        }
    }
}

impl HasDefaults for SecurityScheme {
    fn with_defaults(&self, root: &RootContext) -> Self {
        SecurityScheme {
            described_by: self.described_by.with_defaults(root),
            ..self.clone()
        }
    }
}

impl HasDefaults for SecuritySchemeDescription {
    fn with_defaults(&self, root: &RootContext) -> Self {
        SecuritySchemeDescription {
            headers: self.headers.with_defaults(root),
            query_parameters: self.query_parameters.with_defaults(root),
            query_string: self.query_string.with_defaults(root),
            responses: self.responses.with_defaults(root),
            ..self.clone()
        }
    }
}

impl HasDefaults for AnnotationType {
    fn with_defaults(&self, root: &RootContext) -> Self {
        AnnotationType {
            properties: self.properties.with_defaults(root),
            ..self.clone()
        }
    }
}
