use serde::{Deserialize, Serialize};

use crate::database::resource::{Descriptor, Resource};
use crate::database::store::Collection;

/// A step-by-step activity suggested to visitors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub title: String,
    /// Paragraphs
    pub description: Vec<String>,
    pub steps: Vec<String>,
    pub source: String,
    pub image: String,
}

impl Resource for Recommendation {
    const DESCRIPTOR: Descriptor = Descriptor {
        collection: Collection {
            name: "recommendations",
            unique_key: "title",
        },
        route: "recommendations",
        fields: &["title", "description", "steps", "source", "image"],
        required: &["title", "description", "steps", "source", "image"],
        duplicate_message: "Recommendation with indicated title already exists.",
        not_found_message: "Recommendation not found.",
        not_saved_message: "Recommendation could not be saved.",
        none_found_message: "No recommendations found.",
    };
}
