//! Block documents (`minecraft:block`).

use crate::document::{insert, ConfigDocument};
use crate::fields::FieldSet;
use crate::schema::{self, DocumentKind};
use crate::Result;
use serde_json::{json, Value};

/// Creative inventory categories accepted for blocks.
pub const CATEGORIES: &[&str] = &["construction", "nature", "equipment", "items"];

/// Render methods for the `*` material instance.
pub const RENDER_METHODS: &[&str] = &["opaque", "alpha_test", "blend"];

const DEFAULT_LIGHT_EMISSION: f64 = 0.0;
const DEFAULT_HARDNESS: f64 = 1.5;
const DEFAULT_RESISTANCE: f64 = 10.0;
const FRICTION: f64 = 0.6;
const FLAMMABLE_BURN_ODDS: i64 = 5;
const MAP_COLOR: &str = "#ffffff";
const FULL_BLOCK_GEOMETRY: &str = "minecraft:geometry.full_block";

/// Generate a block document.
///
/// `light_emission`, `hardness` and `resistance` fall back to 0, 1.5 and 10
/// when blank or not numeric. `unit_cube` wins over a custom `geometry`.
pub fn generate(fields: &FieldSet) -> Result<ConfigDocument> {
    let spec = schema::lookup(DocumentKind::Block);
    fields.require(spec.required)?;
    let identifier = fields.require_text("identifier")?;
    let display_name = fields.require_text("display_name")?;
    let category = fields.choice("category", CATEGORIES, "construction")?;
    let render_method = fields.choice("render_method", RENDER_METHODS, "opaque")?;
    let texture = fields.text("texture").unwrap_or_else(|| identifier.clone());

    let burn_odds = if fields.flag("flammable") {
        FLAMMABLE_BURN_ODDS
    } else {
        0
    };

    let mut components = json!({
        "minecraft:block_light_emission": fields.float_or("light_emission", DEFAULT_LIGHT_EMISSION),
        "minecraft:destroy_time": fields.float_or("hardness", DEFAULT_HARDNESS),
        "minecraft:explosion_resistance": fields.float_or("resistance", DEFAULT_RESISTANCE),
        "minecraft:friction": FRICTION,
        "minecraft:flammable": { "burn_odds": burn_odds },
        "minecraft:map_color": MAP_COLOR,
        "minecraft:material_instances": {
            "*": {
                "texture": texture,
                "render_method": render_method
            }
        }
    });

    if fields.flag("unit_cube") {
        insert(&mut components, "minecraft:geometry", json!(FULL_BLOCK_GEOMETRY));
    } else if let Some(geometry) = fields.text("geometry") {
        insert(&mut components, "minecraft:geometry", Value::String(geometry));
    }

    if fields.flag("transparent") {
        insert(&mut components, "minecraft:breathability", json!("air"));
    }

    if fields.flag("replaceable") {
        insert(&mut components, "minecraft:replaceable", Value::Bool(true));
    }

    if let Some(loot) = fields.text("loot") {
        insert(&mut components, "minecraft:loot", Value::String(loot));
    }

    let value = json!({
        "format_version": spec.format_version,
        "minecraft:block": {
            "description": {
                "identifier": identifier,
                "category": category
            },
            "components": components
        }
    });

    let name_key = schema::localization_key(spec.lang_prefix.unwrap_or("tile"), &identifier);
    let doc = ConfigDocument::new(DocumentKind::Block, value, schema::suggested_file_name(&identifier))?;
    Ok(doc.with_localization(name_key, display_name))
}
