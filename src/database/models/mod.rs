pub mod education_area;
pub mod exhibition_room;
pub mod recommendation;

pub use education_area::EducationArea;
pub use exhibition_room::ExhibitionRoom;
pub use recommendation::Recommendation;

use crate::database::resource::Resource;
use crate::database::store::Collection;

/// Every collection the service manages, for schema bootstrap.
pub fn collections() -> [Collection; 3] {
    [
        EducationArea::DESCRIPTOR.collection,
        Recommendation::DESCRIPTOR.collection,
        ExhibitionRoom::DESCRIPTOR.collection,
    ]
}
