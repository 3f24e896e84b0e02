use crate::catalog::{Catalog, fold_name};

/// Names containing `query` anywhere, ignoring case, in catalog order.
/// An empty query matches every name.
pub fn filter_suggestions<'a>(query: &str, catalog: &'a Catalog) -> Vec<&'a str> {
    let needle = fold_name(query);
    catalog
        .names()
        .filter(|name| fold_name(name).contains(&needle))
        .collect()
}
