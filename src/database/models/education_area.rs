use serde::{Deserialize, Serialize};

use crate::database::resource::{Descriptor, Resource};
use crate::database::store::Collection;

/// A thematic area of the museum's education programme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationArea {
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Resource for EducationArea {
    const DESCRIPTOR: Descriptor = Descriptor {
        collection: Collection {
            name: "education_areas",
            unique_key: "name",
        },
        route: "education-areas",
        fields: &["name", "description", "image"],
        required: &["name", "description"],
        duplicate_message: "Education area already exists.",
        not_found_message: "Education area not found.",
        not_saved_message: "Education area could not be saved.",
        none_found_message: "No education areas found.",
    };
}
