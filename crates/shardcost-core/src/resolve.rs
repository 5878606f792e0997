//! Query field name → primitive types.
//!
//! Names are matched against leaf names anywhere in the tree, depth-first and
//! pre-order; the first hit wins. Two branches declaring the same name are
//! not told apart.

use crate::error::{Error, Result};
use crate::schema::{Collection, Field, FieldKind, PrimitiveType};

/// Depth-first, pre-order search by name.
pub fn find_field<'a>(fields: &'a [Field], name: &str) -> Option<&'a Field> {
    for field in fields {
        if field.name == name {
            return Some(field);
        }
        if let Some(nested) = find_field(field.children(), name) {
            return Some(nested);
        }
    }
    None
}

/// Every primitive type reachable under `field`, in declaration order.
pub fn primitive_types(field: &Field, collection: &str) -> Result<Vec<PrimitiveType>> {
    let mut out = Vec::new();
    collect_primitive_types(field, collection, &mut out)?;
    Ok(out)
}

fn collect_primitive_types(
    field: &Field,
    collection: &str,
    out: &mut Vec<PrimitiveType>,
) -> Result<()> {
    match &field.kind {
        FieldKind::Primitive(ty) => out.push(*ty),
        FieldKind::Object { children } => {
            for child in children {
                collect_primitive_types(child, collection, out)?;
            }
        }
        FieldKind::Array { item: Some(item), .. } => {
            collect_primitive_types(item, collection, out)?;
        }
        FieldKind::Array { item: None, .. } => {
            return Err(Error::UnsupportedField {
                field: field.name.clone(),
                collection: collection.to_string(),
            })
        }
    }
    Ok(())
}

fn lookup<'a>(collection: &'a Collection, name: &str) -> Result<&'a Field> {
    find_field(collection.fields(), name).ok_or_else(|| Error::FieldNotFound {
        field: name.to_string(),
        collection: collection.name().to_string(),
    })
}

/// Resolve query field names into the concatenated list of primitive types.
pub fn resolve_field_types<S: AsRef<str>>(
    collection: &Collection,
    names: &[S],
) -> Result<Vec<PrimitiveType>> {
    let mut types = Vec::new();
    for name in names {
        let field = lookup(collection, name.as_ref())?;
        collect_primitive_types(field, collection.name(), &mut types)?;
    }
    Ok(types)
}

/// First primitive type a field name expands to.
pub fn field_type(collection: &Collection, name: &str) -> Result<PrimitiveType> {
    let field = lookup(collection, name)?;
    primitive_types(field, collection.name())?
        .first()
        .copied()
        .ok_or_else(|| Error::UnsupportedField {
            field: name.to_string(),
            collection: collection.name().to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CostConfig;

    fn product() -> Collection {
        Collection::new(
            "Product",
            vec![
                Field::primitive("IDP", PrimitiveType::Integer),
                Field::primitive("name", PrimitiveType::String),
                Field::object(
                    "dimensions",
                    vec![
                        Field::primitive("weight", PrimitiveType::Number),
                        Field::primitive("label", PrimitiveType::String),
                    ],
                ),
                Field::array(
                    "categories",
                    Field::object(
                        "categories_item",
                        vec![
                            Field::primitive("title", PrimitiveType::LongString),
                            Field::primitive("since", PrimitiveType::Date),
                        ],
                    ),
                    2.0,
                ),
                Field::object(
                    "supplier",
                    vec![Field::primitive("name", PrimitiveType::LongString)],
                ),
            ],
            100,
            &CostConfig::default(),
        )
    }

    #[test]
    fn resolves_flat_and_nested_names() {
        let coll = product();
        let types = resolve_field_types(&coll, &["IDP", "weight", "since"]).unwrap();
        assert_eq!(
            types,
            vec![
                PrimitiveType::Integer,
                PrimitiveType::Number,
                PrimitiveType::Date
            ]
        );
    }

    #[test]
    fn containers_expand_to_all_leaves() {
        let coll = product();
        assert_eq!(
            resolve_field_types(&coll, &["dimensions"]).unwrap(),
            vec![PrimitiveType::Number, PrimitiveType::String]
        );
        assert_eq!(
            resolve_field_types(&coll, &["categories"]).unwrap(),
            vec![PrimitiveType::LongString, PrimitiveType::Date]
        );
    }

    #[test]
    fn first_match_wins_on_name_collision() {
        let coll = product();
        // root `name` precedes `supplier.name`
        assert_eq!(field_type(&coll, "name").unwrap(), PrimitiveType::String);
    }

    #[test]
    fn duplicates_are_kept() {
        let coll = product();
        let types = resolve_field_types(&coll, &["IDP", "IDP"]).unwrap();
        assert_eq!(types.len(), 2);
    }

    #[test]
    fn missing_field_is_reported() {
        let coll = product();
        let err = resolve_field_types(&coll, &["IDP", "colour"]).unwrap_err();
        match err {
            Error::FieldNotFound { field, collection } => {
                assert_eq!(field, "colour");
                assert_eq!(collection, "Product");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn itemless_array_is_unsupported() {
        let coll = Collection::new(
            "Broken",
            vec![Field {
                name: "bare".into(),
                kind: FieldKind::Array {
                    item: None,
                    avg_items: 1.0,
                },
            }],
            1,
            &CostConfig::default(),
        );
        assert!(matches!(
            resolve_field_types(&coll, &["bare"]),
            Err(Error::UnsupportedField { .. })
        ));
    }

    #[test]
    fn empty_object_has_no_first_type() {
        let coll = Collection::new(
            "Meta",
            vec![Field::object("extra", vec![])],
            1,
            &CostConfig::default(),
        );
        assert!(resolve_field_types(&coll, &["extra"]).unwrap().is_empty());
        assert!(matches!(
            field_type(&coll, "extra"),
            Err(Error::UnsupportedField { .. })
        ));
    }
}
