use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

/// Separator used when nested object keys are flattened into compound
/// column names (`sprites.front_default` becomes `sprites_front_default`).
pub const FLATTEN_SEPARATOR: &str = "_";

/// Columns a table accepts.
#[derive(Debug, Clone, Copy)]
pub enum Whitelist {
    /// Only these columns survive filtering, in record arrival order.
    Columns(&'static [&'static str]),
    /// Every incoming field is accepted.
    Unrestricted,
}

impl Whitelist {
    pub fn accepts(&self, column: &str) -> bool {
        match self {
            Whitelist::Columns(cols) => cols.contains(&column),
            Whitelist::Unrestricted => true,
        }
    }
}

/// A destination table together with its column whitelist.
#[derive(Debug, Clone, Copy)]
pub struct TableSchema {
    pub table: &'static str,
    pub whitelist: Whitelist,
}

/// How records for a table expand into statements.
///
/// A closed set of variants instead of string branching: each variant
/// carries the field names its expansion needs.
#[derive(Debug, Clone, Copy)]
pub enum TableKind {
    /// One normalized INSERT per record.
    Plain,
    /// A designated field is stored whole as a JSON-literal column; every
    /// other field except the identifier is dropped.
    JsonBlob {
        id_field: &'static str,
        blob_field: &'static str,
        blob_column: &'static str,
    },
    /// A field holds an array of human-readable names resolved through a
    /// fixed lookup; each resolved element emits one two-column junction
    /// row. Unresolved names are skipped per element.
    NameJunction {
        parent_field: &'static str,
        names_field: &'static str,
        parent_column: &'static str,
        child_column: &'static str,
    },
    /// The record carries several embedded one-to-many collections; the
    /// primary row is emitted without them, then one junction row per
    /// collection element, collections in declared order.
    MultiCollection {
        id_field: &'static str,
        parent_column: &'static str,
        collections: &'static [Collection],
    },
}

/// One embedded collection of a multi-collection record.
#[derive(Debug, Clone, Copy)]
pub struct Collection {
    /// Field on the source record holding the collection.
    pub field: &'static str,
    /// Junction table its rows target.
    pub table: &'static str,
    pub kind: CollectionKind,
}

#[derive(Debug, Clone, Copy)]
pub enum CollectionKind {
    /// Array of raw identifiers.
    IdList { column: &'static str },
    /// Array of sub-objects with an id and a boolean qualifier that
    /// defaults to false when absent.
    Flagged {
        id_column: &'static str,
        flag_column: &'static str,
    },
    /// Array of sub-objects with an id and a numeric weight that defaults
    /// to 1.0 when absent.
    Weighted {
        id_column: &'static str,
        weight_column: &'static str,
    },
}

/// One source artifact: file name, destination table, and expansion kind.
#[derive(Debug, Clone, Copy)]
pub struct ArtifactSpec {
    pub file: &'static str,
    pub table: &'static str,
    pub kind: TableKind,
}

const POKEMON_COLLECTIONS: &[Collection] = &[
    Collection {
        field: "type_ids",
        table: "pokemon_types",
        kind: CollectionKind::IdList { column: "type_id" },
    },
    Collection {
        field: "abilities",
        table: "pokemon_abilities",
        kind: CollectionKind::Flagged {
            id_column: "ability_id",
            flag_column: "is_hidden",
        },
    },
    Collection {
        field: "egg_group_ids",
        table: "pokemon_egg_groups",
        kind: CollectionKind::IdList {
            column: "egg_group_id",
        },
    },
    Collection {
        field: "weaknesses",
        table: "pokemon_weaknesses",
        kind: CollectionKind::Weighted {
            id_column: "type_id",
            weight_column: "multiplier",
        },
    },
];

/// The declared artifact set in table dependency order. The orchestrator
/// iterates this list, never the filesystem.
pub const ARTIFACTS: &[ArtifactSpec] = &[
    ArtifactSpec {
        file: "01_region.json",
        table: "regions",
        kind: TableKind::Plain,
    },
    ArtifactSpec {
        file: "02_type.json",
        table: "types",
        kind: TableKind::Plain,
    },
    ArtifactSpec {
        file: "03_egg_group.json",
        table: "egg_groups",
        kind: TableKind::Plain,
    },
    ArtifactSpec {
        file: "04_generation.json",
        table: "generations",
        kind: TableKind::Plain,
    },
    ArtifactSpec {
        file: "05_ability.json",
        table: "abilities",
        kind: TableKind::Plain,
    },
    ArtifactSpec {
        file: "06_species.json",
        table: "species",
        kind: TableKind::Plain,
    },
    ArtifactSpec {
        file: "07_stats.json",
        table: "stats",
        kind: TableKind::Plain,
    },
    ArtifactSpec {
        file: "08_evolution_chains.json",
        table: "evolution_chains",
        kind: TableKind::JsonBlob {
            id_field: "id",
            blob_field: "chain",
            blob_column: "chain_data",
        },
    },
    ArtifactSpec {
        file: "09_pokemon.json",
        table: "pokemons",
        kind: TableKind::MultiCollection {
            id_field: "id",
            parent_column: "pokemon_id",
            collections: POKEMON_COLLECTIONS,
        },
    },
    ArtifactSpec {
        file: "10_weaknesses.json",
        table: "pokemon_weaknesses",
        kind: TableKind::NameJunction {
            parent_field: "pokemon_id",
            names_field: "weaknesses",
            parent_column: "pokemon_id",
            child_column: "type_id",
        },
    },
];

/// Every destination table in dependency order, junction tables included.
///
/// The schema deployment step and the post-load validator iterate the same
/// list; the three lists must stay in agreement.
pub const CANONICAL_TABLES: &[&str] = &[
    "regions",
    "types",
    "egg_groups",
    "generations",
    "abilities",
    "species",
    "stats",
    "evolution_chains",
    "pokemons",
    "pokemon_types",
    "pokemon_abilities",
    "pokemon_egg_groups",
    "pokemon_weaknesses",
];

const TABLE_WHITELISTS: &[(&str, &[&str])] = &[
    ("regions", &["id", "name"]),
    ("types", &["id", "name", "color"]),
    ("egg_groups", &["id", "name"]),
    ("generations", &["id", "name", "region_id"]),
    ("abilities", &["id", "name", "description", "effect"]),
    ("species", &["id", "name", "description", "color", "generation_id"]),
    (
        "stats",
        &["id", "total", "hp", "attack", "defense", "sp_atk", "sp_def", "speed"],
    ),
    ("evolution_chains", &["id", "chain_data"]),
    ("pokemon_weaknesses", &["pokemon_id", "type_id"]),
    (
        "pokemons",
        &[
            "id",
            "number",
            "name",
            "height",
            "weight",
            "description",
            "sprites",
            "gender_male",
            "gender_female",
            "gender_rate_value",
            "egg_cycles",
            "stats_id",
            "generation_id",
            "species_id",
            "region_id",
            "evolution_chain_id",
        ],
    ),
];

/// Look up the destination table for an artifact file name.
pub fn table_for(artifact: &str) -> Option<&'static str> {
    ARTIFACTS
        .iter()
        .find(|spec| spec.file == artifact)
        .map(|spec| spec.table)
}

/// The schema for a table. Tables without a declared whitelist accept
/// every incoming field.
pub fn schema_for(table: &'static str) -> TableSchema {
    let whitelist = TABLE_WHITELISTS
        .iter()
        .copied()
        .find(|(name, _)| *name == table)
        .map(|(_, cols)| Whitelist::Columns(cols))
        .unwrap_or(Whitelist::Unrestricted);
    TableSchema { table, whitelist }
}

// Compound names that stay JSON-encoded rather than being flattened.
// Substring match, case-insensitive, mirroring the seed data conventions
// ("sprites" also covers "other_sprites" and any flattened descendant).
static JSON_LITERAL_FIELDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)sprites|other_sprites|stats_data|abilities_data|types_data|weaknesses_data|evolution_data")
        .expect("json-literal field pattern is valid")
});

/// Whether a compound column name must remain a JSON-encoded blob.
pub fn is_json_literal_field(name: &str) -> bool {
    JSON_LITERAL_FIELDS.is_match(name)
}

/// Fixed type-name → identifier table used by the name-array junction.
///
/// Passed into the expander explicitly so tests can substitute their own
/// entries; the seed data names its types in Portuguese.
#[derive(Debug, Clone)]
pub struct TypeLookup {
    by_name: HashMap<String, i64>,
}

impl TypeLookup {
    /// The builtin table matching the canonical `types` artifact.
    pub fn builtin() -> Self {
        Self::from_pairs([
            ("Normal", 1),
            ("Fogo", 2),
            ("Água", 3),
            ("Elétrico", 4),
            ("Grama", 5),
            ("Gelo", 6),
            ("Lutador", 7),
            ("Venenoso", 8),
            ("Terrestre", 9),
            ("Voador", 10),
            ("Psíquico", 11),
            ("Inseto", 12),
            ("Pedra", 13),
            ("Fantasma", 14),
            ("Dragão", 15),
            ("Escuridão", 16),
            ("Metálico", 17),
            ("Fada", 18),
        ])
    }

    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, i64)>) -> Self {
        TypeLookup {
            by_name: pairs
                .into_iter()
                .map(|(name, id)| (name.to_string(), id))
                .collect(),
        }
    }

    pub fn resolve(&self, name: &str) -> Option<i64> {
        self.by_name.get(name).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_order_matches_canonical_tables() {
        // Every artifact's table appears in the canonical list, and their
        // relative order agrees.
        let mut last = 0;
        for spec in ARTIFACTS {
            let pos = CANONICAL_TABLES
                .iter()
                .position(|t| *t == spec.table)
                .unwrap();
            assert!(pos >= last || spec.table == "pokemon_weaknesses");
            last = last.max(pos);
        }
    }

    #[test]
    fn table_lookup_by_artifact_name() {
        assert_eq!(table_for("02_type.json"), Some("types"));
        assert_eq!(table_for("09_pokemon.json"), Some("pokemons"));
        assert_eq!(table_for("unknown.json"), None);
    }

    #[test]
    fn whitelists_are_declared_for_every_artifact_table() {
        for spec in ARTIFACTS {
            assert!(
                matches!(schema_for(spec.table).whitelist, Whitelist::Columns(_)),
                "{} has no whitelist",
                spec.table
            );
        }
    }

    #[test]
    fn json_literal_fields_match_by_substring() {
        assert!(is_json_literal_field("sprites"));
        assert!(is_json_literal_field("sprites_other_home"));
        assert!(is_json_literal_field("other_sprites"));
        assert!(is_json_literal_field("EVOLUTION_DATA"));
        assert!(!is_json_literal_field("chain"));
        assert!(!is_json_literal_field("stats_id"));
    }

    #[test]
    fn builtin_lookup_resolves_known_names_only() {
        let lookup = TypeLookup::builtin();
        assert_eq!(lookup.resolve("Fogo"), Some(2));
        assert_eq!(lookup.resolve("Água"), Some(3));
        assert_eq!(lookup.resolve("Fada"), Some(18));
        assert_eq!(lookup.resolve("Fire"), None);
    }
}
