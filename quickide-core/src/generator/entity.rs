//! Entity documents (`minecraft:entity`) and their spawn rules.

use crate::document::{insert, ConfigDocument};
use crate::fields::FieldSet;
use crate::schema::{self, DocumentKind};
use crate::{Error, Result};
use serde_json::{json, Map, Value};

/// Entity families; the chosen one also drives spawn-rule population control.
pub const FAMILIES: &[&str] = &["animal", "monster", "npc", "ambient"];

/// Behaviour presets and the component each one adds.
pub const BEHAVIORS: &[(&str, &str)] = &[
    ("idle", "minecraft:behavior.look_around"),
    ("walk", "minecraft:behavior.random_stroll"),
    ("look", "minecraft:behavior.look_at_player"),
    ("panic", "minecraft:behavior.panic"),
    ("follow_owner", "minecraft:behavior.follow_owner"),
];

/// Biomes offered by the spawn form. Any biome tag is accepted.
pub const BIOMES: &[&str] = &["plains", "desert", "forest", "taiga", "swamp", "jungle"];

const DEFAULT_HEALTH: i64 = 20;
const DEFAULT_SPEED: f64 = 0.25;
const DEFAULT_DAMAGE: i64 = 0;
const DEFAULT_KNOCKBACK_RESISTANCE: f64 = 0.0;
const DESPAWN_MIN_DISTANCE: i64 = 128;
const DESPAWN_MAX_DISTANCE: i64 = 256;

const DEFAULT_SPAWN_WEIGHT: i64 = 10;
const DEFAULT_HERD_MIN: i64 = 2;
const DEFAULT_HERD_MAX: i64 = 4;

/// Whether the entity spawns naturally; unset means yes.
fn is_spawnable(fields: &FieldSet) -> bool {
    fields.get("spawnable").is_none() || fields.flag("spawnable")
}

/// Generate an entity document.
///
/// Fields: `identifier`, `display_name`, `type`, `health`, `speed`,
/// `damage`, `knockback_resistance`, `behavior`, `spawnable`, `equipment` +
/// `equipment_table`, `loot_table`, `baby`.
pub fn generate(fields: &FieldSet) -> Result<ConfigDocument> {
    let spec = schema::lookup(DocumentKind::Entity);
    fields.require(spec.required)?;
    let identifier = fields.require_text("identifier")?;
    let display_name = fields.require_text("display_name")?;
    let family = fields.choice("type", FAMILIES, "animal")?;
    let health = fields.int_or("health", DEFAULT_HEALTH);

    let mut components = json!({
        "minecraft:type_family": { "family": [family] },
        "minecraft:health": { "value": health, "max": health },
        "minecraft:movement": { "value": fields.float_or("speed", DEFAULT_SPEED) },
        "minecraft:attack": { "damage": fields.int_or("damage", DEFAULT_DAMAGE) },
        "minecraft:knockback_resistance": {
            "value": fields.float_or("knockback_resistance", DEFAULT_KNOCKBACK_RESISTANCE)
        },
        "minecraft:nameable": {
            "always_show": true,
            "allow_name_tag_renaming": true
        },
        "minecraft:despawn": {
            "despawn_from_distance": {
                "min_distance": DESPAWN_MIN_DISTANCE,
                "max_distance": DESPAWN_MAX_DISTANCE
            }
        }
    });

    if let Some(behavior) = fields.text("behavior") {
        let component = BEHAVIORS
            .iter()
            .find(|(name, _)| *name == behavior)
            .map(|(_, component)| *component)
            .ok_or_else(|| {
                let names: Vec<&str> = BEHAVIORS.iter().map(|(name, _)| *name).collect();
                Error::validation(
                    "behavior",
                    format!("'{}' is not one of: {}", behavior, names.join(", ")),
                )
            })?;
        insert(&mut components, component, Value::Object(Map::new()));
    }

    if fields.flag("equipment") {
        if let Some(table) = fields.text("equipment_table") {
            insert(&mut components, "minecraft:equipment", json!({ "table": table }));
        }
    }

    if let Some(table) = fields.text("loot_table") {
        insert(&mut components, "minecraft:loot", json!({ "table": table }));
    }

    if fields.flag("baby") {
        insert(
            &mut components,
            "minecraft:breedable",
            json!({
                "require_tame": false,
                "breeds_with": [],
                "breed_items": []
            }),
        );
    }

    let value = json!({
        "format_version": spec.format_version,
        "minecraft:entity": {
            "description": {
                "identifier": identifier,
                "is_spawnable": is_spawnable(fields),
                "is_summonable": true,
                "is_experimental": false
            },
            "component_groups": {},
            "components": components,
            "events": {}
        }
    });

    let name_key = schema::localization_key(spec.lang_prefix.unwrap_or("entity"), &identifier);
    let doc = ConfigDocument::new(DocumentKind::Entity, value, schema::suggested_file_name(&identifier))?;
    Ok(doc.with_localization(name_key, display_name))
}

/// Generate the spawn rules for an entity form.
///
/// Needs `identifier` and `biome`; `spawn_weight`, `spawn_min` and
/// `spawn_max` default to 10, 2 and 4. A form marked not spawnable is
/// rejected, since the rules would never apply.
pub fn generate_spawn_rules(fields: &FieldSet) -> Result<ConfigDocument> {
    let spec = schema::lookup(DocumentKind::SpawnRules);
    fields.require(spec.required)?;
    if !is_spawnable(fields) {
        return Err(Error::validation(
            "spawnable",
            "spawn rules need a naturally spawning entity",
        ));
    }
    let identifier = fields.require_text("identifier")?;
    let biome = fields.require_text("biome")?;
    let family = fields.choice("type", FAMILIES, "animal")?;

    let value = json!({
        "format_version": spec.format_version,
        "minecraft:spawn_rules": {
            "description": {
                "identifier": identifier,
                "population_control": family
            },
            "conditions": [
                {
                    "minecraft:spawns_on_surface": {},
                    "minecraft:weight": {
                        "default": fields.int_or("spawn_weight", DEFAULT_SPAWN_WEIGHT)
                    },
                    "minecraft:herd": {
                        "min_size": fields.int_or("spawn_min", DEFAULT_HERD_MIN),
                        "max_size": fields.int_or("spawn_max", DEFAULT_HERD_MAX)
                    },
                    "minecraft:biome_filter": {
                        "test": "has_biome_tag",
                        "operator": "==",
                        "value": biome
                    }
                }
            ]
        }
    });

    ConfigDocument::new(
        DocumentKind::SpawnRules,
        value,
        schema::suggested_file_name(&identifier),
    )
}

/// Whether saving this entity form should also write spawn rules.
pub fn wants_spawn_rules(fields: &FieldSet) -> bool {
    is_spawnable(fields) && fields.text("biome").is_some()
}
