use crate::datatype::{DataType, ScalarType};
use crate::model::{
    Example, FileRestrictions, Property, PropertyRestrictions, StringRestrictions, Type,
};

use super::{string_type, HasDefaults, RootContext};

const ANY_FILE_TYPE: &str = "*/*";

impl HasDefaults for Type {
    fn with_defaults(&self, root: &RootContext) -> Self {
        let data_type = self.data_type.clone().unwrap_or_else(|| {
            if self.properties.is_some() {
                DataType::Object
            } else {
                string_type()
            }
        });

        let discriminator_value = match (&self.discriminator, &self.discriminator_value) {
            (Some(_), None) => Some(self.name.to_lowercase()),
            (_, value) => value.clone(),
        };

        Type {
            restrictions: restrictions_with_defaults(self.restrictions.as_ref(), &data_type),
            properties: self.properties.with_defaults(root),
            facets: self.facets.with_defaults(root),
            examples: self.examples.with_defaults(root),
            discriminator_value,
            data_type: Some(data_type),
            ..self.clone()
        }
    }
}

impl HasDefaults for Property {
    /// A trailing `?` on the name marks the property optional; the suffix is
    /// dropped from the defaulted name.
    fn with_defaults(&self, root: &RootContext) -> Self {
        let (name, optional) = match self.name.strip_suffix('?') {
            Some(name) => (name.to_string(), true),
            None => (self.name.clone(), false),
        };
        let data_type = self.data_type.clone().unwrap_or_else(string_type);

        Property {
            name,
            required: Some(self.required.unwrap_or(!optional)),
            restrictions: restrictions_with_defaults(self.restrictions.as_ref(), &data_type),
            examples: self.examples.with_defaults(root),
            data_type: Some(data_type),
            ..self.clone()
        }
    }
}

impl HasDefaults for PropertyRestrictions {
    fn with_defaults(&self, _root: &RootContext) -> Self {
        match self {
            PropertyRestrictions::String(r) => PropertyRestrictions::String(StringRestrictions {
                pattern: r.pattern.clone(),
                min_length: Some(r.min_length.unwrap_or(0)),
                max_length: Some(r.max_length.unwrap_or(u64::MAX)),
            }),
            PropertyRestrictions::Number(r) => PropertyRestrictions::Number(r.clone()),
            PropertyRestrictions::File(r) => PropertyRestrictions::File(FileRestrictions {
                file_types: Some(
                    r.file_types
                        .clone()
                        .unwrap_or_else(|| vec![ANY_FILE_TYPE.to_string()]),
                ),
                min_length: Some(r.min_length.unwrap_or(0)),
                max_length: Some(r.max_length.unwrap_or(u64::MAX)),
            }),
        }
    }
}

impl HasDefaults for Example {
    fn with_defaults(&self, _root: &RootContext) -> Self {
        Example {
            strict: Some(self.strict.unwrap_or(true)),
            ..self.clone()
        }
    }
}

/// Declared restrictions with their bounds filled in. String and file
/// scalars get bounds even when no facet was declared.
fn restrictions_with_defaults(
    restrictions: Option<&PropertyRestrictions>,
    data_type: &DataType,
) -> Option<PropertyRestrictions> {
    let root = RootContext::default();
    match (restrictions, data_type.scalar()) {
        (Some(restrictions), _) => Some(restrictions.with_defaults(&root)),
        (None, Some(ScalarType::String)) => Some(
            PropertyRestrictions::String(StringRestrictions::default()).with_defaults(&root),
        ),
        (None, Some(ScalarType::File)) => {
            Some(PropertyRestrictions::File(FileRestrictions::default()).with_defaults(&root))
        }
        (None, _) => None,
    }
}
