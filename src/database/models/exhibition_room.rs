use serde::{Deserialize, Serialize};

use crate::database::resource::{Descriptor, Resource};
use crate::database::store::Collection;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExhibitionRoom {
    pub room_code: String,
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Resource for ExhibitionRoom {
    const DESCRIPTOR: Descriptor = Descriptor {
        collection: Collection {
            name: "exhibition_rooms",
            unique_key: "roomCode",
        },
        route: "exhibition-rooms",
        fields: &["roomCode", "name", "description", "floor", "image"],
        required: &["roomCode", "name", "description"],
        duplicate_message: "Specified room code has already been used.",
        not_found_message: "Exhibition room not found.",
        not_saved_message: "Exhibition room could not be saved.",
        none_found_message: "No exhibition rooms found.",
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_room_code_in_camel_case() {
        let room = ExhibitionRoom {
            room_code: "A1".to_string(),
            name: "Fossils".to_string(),
            description: "Dinosaurs and more".to_string(),
            floor: None,
            image: None,
        };
        let value = serde_json::to_value(&room).unwrap();
        assert_eq!(value, json!({"roomCode": "A1", "name": "Fossils", "description": "Dinosaurs and more"}));
    }

    #[test]
    fn rejects_non_integer_floor() {
        let fields = json!({"roomCode": "A1", "name": "n", "description": "d", "floor": "second"});
        let map = fields.as_object().unwrap();
        assert!(ExhibitionRoom::from_fields(map).is_err());
    }
}
