//! Recipe documents: shaped, shapeless, furnace and brewing.
//!
//! The crafting grid is read from fields named `grid.<row>.<col>` with rows
//! and columns numbered from 0.

use crate::document::ConfigDocument;
use crate::fields::FieldSet;
use crate::schema::{self, DocumentKind, RecipeKind};
use crate::{Error, Result};
use serde_json::{json, Map, Value};

/// Side length of the crafting grid.
pub const GRID_SIZE: usize = 3;

/// Namespace for derived recipe identifiers when none is given.
pub const DEFAULT_NAMESPACE: &str = "wiki";

const DEFAULT_OUTPUT_COUNT: i64 = 1;

/// Field name of one crafting grid cell.
pub fn grid_field(row: usize, col: usize) -> String {
    format!("grid.{}.{}", row, col)
}

/// Generate a recipe document.
///
/// `recipe_type` selects the variant (default `crafting_shaped`). A blank
/// `identifier` is derived as `<namespace>:<tag>_<output name>`.
pub fn generate(fields: &FieldSet) -> Result<ConfigDocument> {
    let recipe_kind = match fields.text("recipe_type") {
        Some(text) => text.parse::<RecipeKind>()?,
        None => RecipeKind::CraftingShaped,
    };
    let kind = DocumentKind::Recipe(recipe_kind);
    let spec = schema::lookup(kind);
    fields.require(spec.required)?;

    let output = fields.require_text("output")?;
    let output_name = schema::short_name(&output).to_string();
    let identifier = fields.text("identifier").unwrap_or_else(|| {
        let namespace = fields
            .text("namespace")
            .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string());
        format!("{}:{}_{}", namespace, recipe_kind.identifier_tag(), output_name)
    });
    let output_count = fields.int_or("output_count", DEFAULT_OUTPUT_COUNT);
    let description = json!({ "identifier": identifier });

    let body = match recipe_kind {
        RecipeKind::CraftingShaped => {
            let (pattern, keys) = shaped_pattern(fields)?;
            json!({
                "description": description,
                "tags": ["crafting_table"],
                "pattern": pattern,
                "key": keys,
                "result": { "item": output, "count": output_count }
            })
        }
        RecipeKind::CraftingShapeless => {
            let ingredients = shapeless_ingredients(fields)?;
            json!({
                "description": description,
                "tags": ["crafting_table"],
                "ingredients": ingredients,
                "result": { "item": output, "count": output_count }
            })
        }
        RecipeKind::Furnace => json!({
            "description": description,
            "tags": ["furnace", "blast_furnace", "smoker"],
            "input": fields.require_text("input")?,
            "output": output,
            "output_count": output_count
        }),
        RecipeKind::Brewing => json!({
            "description": description,
            "tags": ["brewing_stand"],
            "input": fields.require_text("input")?,
            "reagent": fields.require_text("reagent")?,
            "output": output
        }),
    };

    let mut value = Map::new();
    if let Some(format_version) = spec.format_version {
        value.insert("format_version".to_string(), json!(format_version));
    }
    if let Some(root_key) = spec.root_key {
        value.insert(root_key.to_string(), body);
    }

    ConfigDocument::new(
        kind,
        Value::Object(value),
        format!("{}_{}", output_name, recipe_kind.as_str()),
    )
}

/// Build the shaped pattern rows and key map.
///
/// Each occupied cell takes the letter of its column, so two different items
/// in the same column share a key and the later row's item wins.
fn shaped_pattern(fields: &FieldSet) -> Result<(Vec<String>, Map<String, Value>)> {
    let mut pattern = Vec::new();
    let mut keys = Map::new();

    for row in 0..GRID_SIZE {
        let mut line = String::with_capacity(GRID_SIZE);
        for col in 0..GRID_SIZE {
            match fields.text(&grid_field(row, col)) {
                Some(item) => {
                    let key = column_key(col);
                    line.push(key);
                    keys.insert(key.to_string(), json!({ "item": item }));
                }
                None => line.push(' '),
            }
        }
        if !line.trim().is_empty() {
            pattern.push(line);
        }
    }

    if pattern.is_empty() {
        return Err(Error::validation("grid", "at least one grid cell must hold an item"));
    }
    Ok((pattern, keys))
}

fn shapeless_ingredients(fields: &FieldSet) -> Result<Vec<Value>> {
    let ingredients: Vec<Value> = (0..GRID_SIZE)
        .flat_map(|row| (0..GRID_SIZE).map(move |col| grid_field(row, col)))
        .filter_map(|name| fields.text(&name))
        .map(|item| json!({ "item": item }))
        .collect();

    if ingredients.is_empty() {
        return Err(Error::validation("grid", "at least one grid cell must hold an item"));
    }
    Ok(ingredients)
}

fn column_key(col: usize) -> char {
    (b'A' + col as u8) as char
}
