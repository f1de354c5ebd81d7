//! Item documents (`minecraft:item`).

use crate::document::{insert, ConfigDocument};
use crate::fields::FieldSet;
use crate::schema::{self, DocumentKind};
use crate::Result;
use serde_json::{json, Value};

/// Creative inventory categories accepted for items.
pub const CATEGORIES: &[&str] = &["items", "equipment", "nature", "construction"];

/// Saturation modifier used when nutrition is zero or negative.
const FALLBACK_SATURATION_MODIFIER: f64 = 0.5;

/// Generate an item document.
///
/// Recognised fields: `identifier`, `display_name` (required), `category`,
/// `icon`, `max_stack_size`, `hand_equipped`, `has_durability` +
/// `max_durability`, `is_food` + `nutrition` + `saturation`, `is_weapon` +
/// `damage`.
pub fn generate(fields: &FieldSet) -> Result<ConfigDocument> {
    let spec = schema::lookup(DocumentKind::Item);
    fields.require(spec.required)?;
    let identifier = fields.require_text("identifier")?;
    let display_name = fields.require_text("display_name")?;
    let category = fields.choice("category", CATEGORIES, "items")?;

    let name_key = schema::localization_key(spec.lang_prefix.unwrap_or("item"), &identifier);
    let icon = fields.text("icon").unwrap_or_else(|| identifier.clone());

    let mut components = json!({
        "minecraft:display_name": { "value": name_key },
        "minecraft:icon": { "texture": icon }
    });

    if let Some(stack_size) = fields.optional_int("max_stack_size")? {
        insert(&mut components, "minecraft:max_stack_size", json!(stack_size));
    }

    if fields.flag("hand_equipped") {
        insert(&mut components, "minecraft:hand_equipped", Value::Bool(true));
    }

    if fields.flag("has_durability") {
        if let Some(max_durability) = fields.optional_int("max_durability")? {
            insert(
                &mut components,
                "minecraft:durability",
                json!({ "max_durability": max_durability }),
            );
        }
    }

    if fields.flag("is_food") {
        let nutrition = fields.optional_int("nutrition")?;
        let saturation = fields.optional_float("saturation")?;
        if let (Some(nutrition), Some(saturation)) = (nutrition, saturation) {
            insert(
                &mut components,
                "minecraft:food",
                json!({
                    "nutrition": nutrition,
                    "saturation_modifier": saturation_modifier(nutrition, saturation)
                }),
            );
        }
    }

    if fields.flag("is_weapon") {
        if let Some(damage) = fields.optional_int("damage")? {
            insert(&mut components, "minecraft:damage", json!(damage));
        }
    }

    let value = json!({
        "format_version": spec.format_version,
        "minecraft:item": {
            "description": {
                "identifier": identifier,
                "category": category
            },
            "components": components
        }
    });

    let doc = ConfigDocument::new(DocumentKind::Item, value, schema::suggested_file_name(&identifier))?;
    Ok(doc.with_localization(name_key, display_name))
}

fn saturation_modifier(nutrition: i64, saturation: f64) -> f64 {
    if nutrition > 0 {
        saturation / nutrition as f64
    } else {
        FALLBACK_SATURATION_MODIFIER
    }
}
