//! Lookup by key over child collections.

/// A node addressed by a name, identifier, path or status code.
pub trait Keyed {
    type Key: PartialEq + ?Sized;

    fn key(&self) -> &Self::Key;
}

/// The first item whose key equals `key`.
///
/// Linear scan in declaration order.
pub fn find_by_key<'a, T, I>(items: I, key: &T::Key) -> Option<&'a T>
where
    T: Keyed + 'a,
    I: IntoIterator<Item = &'a T>,
{
    items.into_iter().find(|item| item.key() == key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Property, Response};

    #[test]
    fn finds_first_match_by_name() {
        let properties = vec![
            Property {
                name: "id".into(),
                ..Default::default()
            },
            Property {
                name: "name".into(),
                description: Some("first".into()),
                ..Default::default()
            },
            Property {
                name: "name".into(),
                description: Some("second".into()),
                ..Default::default()
            },
        ];

        let found = find_by_key(&properties, "name").unwrap();
        assert_eq!(found.description.as_deref(), Some("first"));
        assert!(find_by_key(&properties, "missing").is_none());
    }

    #[test]
    fn finds_by_status_code() {
        let responses = vec![
            Response {
                code: 200,
                ..Default::default()
            },
            Response {
                code: 404,
                ..Default::default()
            },
        ];

        assert_eq!(find_by_key(&responses, &404).map(|r| r.code), Some(404));
        assert!(find_by_key(&responses, &500).is_none());
    }
}
