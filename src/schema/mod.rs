//! Static schema registry - artifact list, table kinds, and column whitelists
//!
//! Everything here is fixed input data: which JSON artifact feeds which
//! table, in what order, which columns each table accepts, and which
//! compound field names stay JSON-encoded instead of being flattened.

pub mod registry;

pub use registry::{
    is_json_literal_field, schema_for, table_for, ArtifactSpec, Collection, CollectionKind,
    TableKind, TableSchema, TypeLookup, Whitelist, ARTIFACTS, CANONICAL_TABLES, FLATTEN_SEPARATOR,
};
