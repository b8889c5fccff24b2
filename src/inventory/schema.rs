//! Tool schema and instruction text for the `update_inventory` function.
//!
//! The schema is described with a typed [`SchemaNode`] tree rather than
//! ad-hoc JSON maps, so a malformed schema fails to compile instead of
//! surfacing as a rejected request at runtime.

use std::collections::BTreeMap;

use serde::Serialize;

/// Name of the single function the model is forced to call.
pub const FUNCTION_NAME: &str = "update_inventory";

/// Description shown to the model for the function.
pub const FUNCTION_DESCRIPTION: &str = "Update inventory items with specific actions";

/// Action values the schema permits.
pub const ACTION_VALUES: [&str; 5] = ["add", "subtract", "discard_all", "rename", "change_unit"];

/// Unit tokens the schema permits.
pub const UNIT_VALUES: [&str; 9] = [
    "un",
    "kg",
    "grams",
    "kilograms",
    "liters",
    "units",
    "m",
    "ft",
    "sq ft",
];

/// Instruction text steering the model to populate the function arguments.
///
/// Kept in Portuguese to match the user base. The rules mirror the argument
/// defaults in [`crate::inventory`]: singularize item names unless quoted,
/// quantity defaults to 1, unit to "un", category to "geral".
pub const SYSTEM_PROMPT: &str = r#"
Analise a tarefa fornecida e extraia as seguintes informações:

   1. action: O tipo de ação a ser executada. As opções possíveis são:
        - add: Adicionar quantidades a um item existente ou criar um novo item.
        - subtract: Remover quantidades de um item.
        - discard_all: Remover todas as quantidades de um item.
        - rename: Alterar o nome de um item.
        - change_unit: Alterar a unidade de medida de um item.
   2. item_name: O nome do item. Converta para substantivo no singular. Não traduza o nome nem resuma nem omita a marca caso o usuário forneça, apenas converta para singular.
   Se o usuário passar o nome do item em '' ou "" salve do jeito que ele passar, apenas removendo as ''/"".
   3. quantity: A quantidade, que pode ser um número inteiro ou decimal. Caso não seja especificada, atribua = 1.
   4. unit: A unidade da quantidade (por exemplo, "kg", "un", "m", "ft", "sq ft"). Caso não seja informada, defina como "un".
   5. category: A categoria à qual o item pertence. Caso não seja mencionada, defina como "geral".
   6. location: O local do item, opcional. Caso não seja fornecido, pode ser nulo.
   7. description: A descrição do item, opcional. Caso não seja fornecida, pode ser nula.

Somente para a ação rename, extraia também:
   8. old_item_name: O nome atual do item (ou nulo se não for informado).
   9. new_item_name: O novo nome para o item (ou nulo se não for informado).

Responda somente com a chamada de função, sem texto livre.
"#;

/// A node in a JSON Schema tree.
///
/// Serializes to standard JSON Schema; only the node kinds this crate needs
/// are modeled.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SchemaNode {
    /// An object with named properties and a required-field list.
    Object {
        /// Property name to schema mapping.
        properties: BTreeMap<String, SchemaNode>,
        /// Names of properties the model must supply.
        required: Vec<String>,
    },
    /// A string, optionally restricted to an enumerated set.
    String {
        /// Description shown to the model.
        description: String,
        /// Permitted values, when the field is enumerated.
        #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
        values: Option<Vec<String>>,
    },
    /// A number (integer or decimal).
    Number {
        /// Description shown to the model.
        description: String,
    },
}

impl SchemaNode {
    fn string(description: &str) -> Self {
        Self::String {
            description: description.to_owned(),
            values: None,
        }
    }

    fn string_enum(description: &str, values: &[&str]) -> Self {
        Self::String {
            description: description.to_owned(),
            values: Some(values.iter().map(|v| (*v).to_owned()).collect()),
        }
    }

    fn number(description: &str) -> Self {
        Self::Number {
            description: description.to_owned(),
        }
    }
}

/// Build the parameter schema for the `update_inventory` function.
///
/// `item_name` and `unit` are the only required properties; everything else
/// carries a documented default or is nullable.
pub fn update_inventory_parameters() -> SchemaNode {
    let mut properties = BTreeMap::new();
    properties.insert(
        "action".to_owned(),
        SchemaNode::string_enum(
            "Action required for the task: add, subtract, discard_all, rename, change_unit",
            &ACTION_VALUES,
        ),
    );
    properties.insert(
        "item_name".to_owned(),
        SchemaNode::string("Item of the task"),
    );
    properties.insert(
        "quantity".to_owned(),
        SchemaNode::number("Quantity of the item in the task"),
    );
    properties.insert(
        "unit".to_owned(),
        SchemaNode::string_enum("Unit of the item's quantity", &UNIT_VALUES),
    );
    properties.insert(
        "old_item_name".to_owned(),
        SchemaNode::string("Previous name of the item if being renamed"),
    );
    properties.insert(
        "new_item_name".to_owned(),
        SchemaNode::string("New name of the item if being renamed"),
    );
    properties.insert(
        "category".to_owned(),
        SchemaNode::string("Category of the item"),
    );
    properties.insert(
        "description".to_owned(),
        SchemaNode::string("Description of the item"),
    );
    properties.insert(
        "location".to_owned(),
        SchemaNode::string("Location of the item"),
    );

    SchemaNode::Object {
        properties,
        required: vec!["item_name".to_owned(), "unit".to_owned()],
    }
}
