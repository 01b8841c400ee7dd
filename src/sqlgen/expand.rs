use serde_json::{Map, Value};

use crate::error::SeedError;
use crate::schema::{
    schema_for, ArtifactSpec, Collection, CollectionKind, TableKind, TypeLookup,
};
use crate::sqlgen::normalize::{normalize, NormalizedRow};
use crate::sqlgen::statement::{insert_statement, SqlStatement};

/// The statements produced for one artifact, plus any reference names the
/// name-array junction could not resolve. Unresolved names never fail the
/// record; the orchestrator reports them.
#[derive(Debug, Default)]
pub struct Expansion {
    pub statements: Vec<SqlStatement>,
    pub unresolved: Vec<String>,
}

/// Expand an artifact's records into statements according to its table
/// kind: the primary statement first, then one block per collection field
/// in declared order, elements in source array order.
pub fn expand(
    spec: &ArtifactSpec,
    records: &[Value],
    lookup: &TypeLookup,
) -> Result<Expansion, SeedError> {
    let mut expansion = Expansion::default();

    for record in records {
        let record = record_object(spec, record)?;
        match spec.kind {
            TableKind::Plain => expand_plain(spec, record, &mut expansion)?,
            TableKind::JsonBlob {
                id_field,
                blob_field,
                blob_column,
            } => expand_json_blob(spec, record, id_field, blob_field, blob_column, &mut expansion),
            TableKind::NameJunction {
                parent_field,
                names_field,
                parent_column,
                child_column,
            } => expand_name_junction(
                spec,
                record,
                parent_field,
                names_field,
                parent_column,
                child_column,
                lookup,
                &mut expansion,
            ),
            TableKind::MultiCollection {
                id_field,
                parent_column,
                collections,
            } => expand_multi_collection(
                spec,
                record,
                id_field,
                parent_column,
                collections,
                &mut expansion,
            )?,
        }
    }

    Ok(expansion)
}

fn record_object<'a>(
    spec: &ArtifactSpec,
    record: &'a Value,
) -> Result<&'a Map<String, Value>, SeedError> {
    record.as_object().ok_or_else(|| SeedError::MalformedArtifact {
        name: spec.file.to_string(),
        detail: "expected a JSON object record".to_string(),
    })
}

fn expand_plain(
    spec: &ArtifactSpec,
    record: &Map<String, Value>,
    expansion: &mut Expansion,
) -> Result<(), SeedError> {
    let row = normalize(record, &schema_for(spec.table))?;
    expansion.statements.push(insert_statement(spec.table, &row));
    Ok(())
}

fn expand_json_blob(
    spec: &ArtifactSpec,
    record: &Map<String, Value>,
    id_field: &str,
    blob_field: &str,
    blob_column: &str,
    expansion: &mut Expansion,
) {
    let id = field_or_null(record, id_field);
    let blob = match record.get(blob_field) {
        Some(value) if has_content(value) => value.clone(),
        _ => Value::Null,
    };

    let row = NormalizedRow::from_pairs(vec![
        (id_field.to_string(), id),
        (blob_column.to_string(), blob),
    ]);
    expansion.statements.push(insert_statement(spec.table, &row));
}

#[allow(clippy::too_many_arguments)]
fn expand_name_junction(
    spec: &ArtifactSpec,
    record: &Map<String, Value>,
    parent_field: &str,
    names_field: &str,
    parent_column: &str,
    child_column: &str,
    lookup: &TypeLookup,
    expansion: &mut Expansion,
) {
    let parent = field_or_null(record, parent_field);
    let Some(names) = record.get(names_field).and_then(Value::as_array) else {
        return;
    };

    for name in names {
        let resolved = name.as_str().and_then(|n| lookup.resolve(n));
        match resolved {
            Some(id) => {
                let row = NormalizedRow::from_pairs(vec![
                    (parent_column.to_string(), parent.clone()),
                    (child_column.to_string(), Value::from(id)),
                ]);
                expansion.statements.push(insert_statement(spec.table, &row));
            }
            None => expansion.unresolved.push(display_name(name)),
        }
    }
}

fn expand_multi_collection(
    spec: &ArtifactSpec,
    record: &Map<String, Value>,
    id_field: &str,
    parent_column: &str,
    collections: &[Collection],
    expansion: &mut Expansion,
) -> Result<(), SeedError> {
    // Primary row without the embedded collections.
    let mut primary = record.clone();
    for collection in collections {
        primary.remove(collection.field);
    }
    let row = normalize(&primary, &schema_for(spec.table))?;
    expansion.statements.push(insert_statement(spec.table, &row));

    let parent = field_or_null(record, id_field);
    for collection in collections {
        let Some(elements) = record.get(collection.field).and_then(Value::as_array) else {
            continue;
        };

        for element in elements {
            match collection.kind {
                CollectionKind::IdList { column } => {
                    let row = NormalizedRow::from_pairs(vec![
                        (parent_column.to_string(), parent.clone()),
                        (column.to_string(), element.clone()),
                    ]);
                    expansion
                        .statements
                        .push(insert_statement(collection.table, &row));
                }
                CollectionKind::Flagged {
                    id_column,
                    flag_column,
                } => {
                    let Some(element) = element.as_object() else {
                        continue;
                    };
                    let row = NormalizedRow::from_pairs(vec![
                        (parent_column.to_string(), parent.clone()),
                        (id_column.to_string(), field_or_null(element, id_column)),
                        (
                            flag_column.to_string(),
                            element.get(flag_column).cloned().unwrap_or(Value::Bool(false)),
                        ),
                    ]);
                    expansion
                        .statements
                        .push(insert_statement(collection.table, &row));
                }
                CollectionKind::Weighted {
                    id_column,
                    weight_column,
                } => {
                    let Some(element) = element.as_object() else {
                        continue;
                    };
                    let row = NormalizedRow::from_pairs(vec![
                        (parent_column.to_string(), parent.clone()),
                        (id_column.to_string(), field_or_null(element, id_column)),
                        (
                            weight_column.to_string(),
                            element.get(weight_column).cloned().unwrap_or(Value::from(1.0)),
                        ),
                    ]);
                    expansion
                        .statements
                        .push(insert_statement(collection.table, &row));
                }
            }
        }
    }

    Ok(())
}

fn field_or_null(record: &Map<String, Value>, field: &str) -> Value {
    record.get(field).cloned().unwrap_or(Value::Null)
}

/// Empty containers, empty strings, zero, false, and null all count as
/// absent for the JSON-blob column.
fn has_content(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64() != Some(0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn display_name(name: &Value) -> String {
    match name.as_str() {
        Some(s) => s.to_string(),
        None => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ARTIFACTS;
    use serde_json::json;

    fn spec(file: &str) -> &'static ArtifactSpec {
        ARTIFACTS.iter().find(|s| s.file == file).unwrap()
    }

    fn texts(expansion: &Expansion) -> Vec<&str> {
        expansion.statements.iter().map(|s| s.text.as_str()).collect()
    }

    #[test]
    fn plain_table_emits_one_statement_per_record() {
        let records = vec![
            json!({"id": 1, "name": "Kanto"}),
            json!({"id": 2, "name": "Johto", "ignored": true}),
        ];
        let expansion = expand(spec("01_region.json"), &records, &TypeLookup::builtin()).unwrap();

        assert_eq!(
            texts(&expansion),
            [
                "INSERT INTO regions (id, name) VALUES (1, 'Kanto');",
                "INSERT INTO regions (id, name) VALUES (2, 'Johto');",
            ]
        );
    }

    #[test]
    fn json_blob_renames_chain_and_drops_the_rest() {
        let records = vec![json!({
            "id": 1,
            "chain": {"species_id": 1, "evolves_to": []},
            "extra": "drop-me"
        })];
        let expansion =
            expand(spec("08_evolution_chains.json"), &records, &TypeLookup::builtin()).unwrap();

        assert_eq!(
            texts(&expansion),
            [r#"INSERT INTO evolution_chains (id, chain_data) VALUES (1, '{"species_id":1,"evolves_to":[]}');"#]
        );
    }

    #[test]
    fn json_blob_empty_chain_becomes_null() {
        let records = vec![json!({"id": 7, "chain": {}}), json!({"id": 8})];
        let expansion =
            expand(spec("08_evolution_chains.json"), &records, &TypeLookup::builtin()).unwrap();

        assert_eq!(
            texts(&expansion),
            [
                "INSERT INTO evolution_chains (id, chain_data) VALUES (7, NULL);",
                "INSERT INTO evolution_chains (id, chain_data) VALUES (8, NULL);",
            ]
        );
    }

    #[test]
    fn name_junction_resolves_elements_and_skips_unknown_names() {
        let records = vec![json!({
            "pokemon_id": 5,
            "weaknesses": ["Fogo", "Água", "Desconhecido"]
        })];
        let expansion =
            expand(spec("10_weaknesses.json"), &records, &TypeLookup::builtin()).unwrap();

        assert_eq!(
            texts(&expansion),
            [
                "INSERT INTO pokemon_weaknesses (pokemon_id, type_id) VALUES (5, 2);",
                "INSERT INTO pokemon_weaknesses (pokemon_id, type_id) VALUES (5, 3);",
            ]
        );
        assert_eq!(expansion.unresolved, ["Desconhecido"]);
    }

    #[test]
    fn name_junction_without_names_field_emits_nothing() {
        let records = vec![json!({"pokemon_id": 5})];
        let expansion =
            expand(spec("10_weaknesses.json"), &records, &TypeLookup::builtin()).unwrap();

        assert!(expansion.statements.is_empty());
        assert!(expansion.unresolved.is_empty());
    }

    #[test]
    fn multi_collection_emits_primary_then_junction_blocks_in_order() {
        let records = vec![json!({
            "id": 1,
            "number": "001",
            "name": "Bulbasaur",
            "sprites": {"front_default": "url"},
            "type_ids": [5, 8],
            "abilities": [
                {"ability_id": 65},
                {"ability_id": 34, "is_hidden": true}
            ],
            "egg_group_ids": [1],
            "weaknesses": [
                {"type_id": 2},
                {"type_id": 11, "multiplier": 2.0}
            ]
        })];
        let expansion = expand(spec("09_pokemon.json"), &records, &TypeLookup::builtin()).unwrap();

        assert_eq!(
            texts(&expansion),
            [
                r#"INSERT INTO pokemons (id, number, name, sprites) VALUES (1, '001', 'Bulbasaur', '{"front_default":"url"}');"#,
                "INSERT INTO pokemon_types (pokemon_id, type_id) VALUES (1, 5);",
                "INSERT INTO pokemon_types (pokemon_id, type_id) VALUES (1, 8);",
                "INSERT INTO pokemon_abilities (pokemon_id, ability_id, is_hidden) VALUES (1, 65, FALSE);",
                "INSERT INTO pokemon_abilities (pokemon_id, ability_id, is_hidden) VALUES (1, 34, TRUE);",
                "INSERT INTO pokemon_egg_groups (pokemon_id, egg_group_id) VALUES (1, 1);",
                "INSERT INTO pokemon_weaknesses (pokemon_id, type_id, multiplier) VALUES (1, 2, 1.0);",
                "INSERT INTO pokemon_weaknesses (pokemon_id, type_id, multiplier) VALUES (1, 11, 2.0);",
            ]
        );
    }

    #[test]
    fn multi_collection_skips_non_object_elements_in_tagged_collections() {
        let records = vec![json!({
            "id": 1,
            "name": "Bulbasaur",
            "abilities": [65, {"ability_id": 34}]
        })];
        let expansion = expand(spec("09_pokemon.json"), &records, &TypeLookup::builtin()).unwrap();

        assert_eq!(
            texts(&expansion),
            [
                "INSERT INTO pokemons (id, name) VALUES (1, 'Bulbasaur');",
                "INSERT INTO pokemon_abilities (pokemon_id, ability_id, is_hidden) VALUES (1, 34, FALSE);",
            ]
        );
    }

    #[test]
    fn non_object_record_is_malformed() {
        let records = vec![json!(["not", "an", "object"])];
        let err = expand(spec("01_region.json"), &records, &TypeLookup::builtin()).unwrap_err();
        assert!(matches!(err, SeedError::MalformedArtifact { .. }));
    }
}
