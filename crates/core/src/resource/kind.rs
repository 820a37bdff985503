use serde::{Deserialize, Serialize};

use super::schema::{FieldSpec, FieldType::*, Schema};

/// Resource families served under `/api/{path}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResourceKind {
    Room,
    Restaurant,
    Event,
    Venue,
    Offer,
    Attraction,
    Facility,
    Program,
    Service,
    Gallery,
    ContactInfo,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 11] = [
        ResourceKind::Room,
        ResourceKind::Restaurant,
        ResourceKind::Event,
        ResourceKind::Venue,
        ResourceKind::Offer,
        ResourceKind::Attraction,
        ResourceKind::Facility,
        ResourceKind::Program,
        ResourceKind::Service,
        ResourceKind::Gallery,
        ResourceKind::ContactInfo,
    ];

    /// URL segment under `/api`.
    pub const fn path(self) -> &'static str {
        match self {
            ResourceKind::Room => "rooms",
            ResourceKind::Restaurant => "restaurants",
            ResourceKind::Event => "events",
            ResourceKind::Venue => "venues",
            ResourceKind::Offer => "offers",
            ResourceKind::Attraction => "attractions",
            ResourceKind::Facility => "facilities",
            ResourceKind::Program => "programs",
            ResourceKind::Service => "services",
            ResourceKind::Gallery => "galleries",
            ResourceKind::ContactInfo => "contactInfos",
        }
    }

    /// PostgreSQL table holding this family.
    pub const fn table(self) -> &'static str {
        match self {
            ResourceKind::ContactInfo => "contact_infos",
            other => other.path(),
        }
    }

    /// Singular name used in messages ("Room not found").
    pub const fn label(self) -> &'static str {
        match self {
            ResourceKind::Room => "Room",
            ResourceKind::Restaurant => "Restaurant",
            ResourceKind::Event => "Event",
            ResourceKind::Venue => "Venue",
            ResourceKind::Offer => "Offer",
            ResourceKind::Attraction => "Attraction",
            ResourceKind::Facility => "Facility",
            ResourceKind::Program => "Program",
            ResourceKind::Service => "Service",
            ResourceKind::Gallery => "Gallery",
            ResourceKind::ContactInfo => "Contact info",
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.path() == path)
    }

    pub const fn schema(self) -> Schema {
        Schema::new(match self {
            ResourceKind::Room => ROOM,
            ResourceKind::Restaurant => RESTAURANT,
            ResourceKind::Event => EVENT,
            ResourceKind::Venue => VENUE,
            ResourceKind::Offer => OFFER,
            ResourceKind::Attraction => ATTRACTION,
            ResourceKind::Facility => FACILITY,
            ResourceKind::Program => PROGRAM,
            ResourceKind::Service => SERVICE,
            ResourceKind::Gallery => GALLERY,
            ResourceKind::ContactInfo => CONTACT_INFO,
        })
    }
}

const ROOM: &[FieldSpec] = &[
    FieldSpec::required("name", Text),
    FieldSpec::optional("description", Text),
    FieldSpec::optional("price", Number),
    FieldSpec::optional("capacity", Integer),
    FieldSpec::optional("size", Text),
    FieldSpec::optional("bedType", Text),
    FieldSpec::optional("amenities", TextList),
    FieldSpec::optional("images", TextList),
    FieldSpec::optional("isAvailable", Boolean),
];

const RESTAURANT: &[FieldSpec] = &[
    FieldSpec::required("name", Text),
    FieldSpec::optional("description", Text),
    FieldSpec::optional("cuisine", Text),
    FieldSpec::optional("openingHours", Text),
    FieldSpec::optional("capacity", Integer),
    FieldSpec::optional("specialties", TextList),
    FieldSpec::optional("images", TextList),
    FieldSpec::optional("menuUrl", Text),
];

const EVENT: &[FieldSpec] = &[
    FieldSpec::required("title", Text),
    FieldSpec::optional("description", Text),
    FieldSpec::optional("date", Date),
    FieldSpec::optional("startTime", Text),
    FieldSpec::optional("endTime", Text),
    FieldSpec::optional("venueId", Text),
    FieldSpec::optional("category", Text),
    FieldSpec::optional("image", Text),
    FieldSpec::optional("isPublished", Boolean),
];

const VENUE: &[FieldSpec] = &[
    FieldSpec::required("name", Text),
    FieldSpec::optional("description", Text),
    FieldSpec::optional("capacity", Integer),
    FieldSpec::optional("area", Text),
    FieldSpec::optional("layouts", TextList),
    FieldSpec::optional("equipment", TextList),
    FieldSpec::optional("images", TextList),
];

const OFFER: &[FieldSpec] = &[
    FieldSpec::required("title", Text),
    FieldSpec::optional("description", Text),
    FieldSpec::optional("price", Number),
    FieldSpec::optional("discount", Number),
    FieldSpec::optional("validFrom", Date),
    FieldSpec::optional("validUntil", Date),
    FieldSpec::optional("conditions", TextList),
    FieldSpec::optional("image", Text),
    FieldSpec::optional("isActive", Boolean),
];

const ATTRACTION: &[FieldSpec] = &[
    FieldSpec::required("name", Text),
    FieldSpec::optional("description", Text),
    FieldSpec::optional("distance", Text),
    FieldSpec::optional("category", Text),
    FieldSpec::optional("image", Text),
    FieldSpec::optional("location", Text),
];

const FACILITY: &[FieldSpec] = &[
    FieldSpec::required("name", Text),
    FieldSpec::optional("description", Text),
    FieldSpec::optional("icon", Text),
    FieldSpec::optional("openingHours", Text),
    FieldSpec::optional("images", TextList),
];

const PROGRAM: &[FieldSpec] = &[
    FieldSpec::required("title", Text),
    FieldSpec::optional("description", Text),
    FieldSpec::optional("duration", Text),
    FieldSpec::optional("price", Number),
    FieldSpec::optional("schedule", Text),
    FieldSpec::optional("image", Text),
];

const SERVICE: &[FieldSpec] = &[
    FieldSpec::required("name", Text),
    FieldSpec::optional("description", Text),
    FieldSpec::optional("icon", Text),
    FieldSpec::optional("price", Number),
    FieldSpec::optional("isAvailable", Boolean),
];

const GALLERY: &[FieldSpec] = &[
    FieldSpec::required("title", Text),
    FieldSpec::optional("category", Text),
    FieldSpec::required("images", TextList),
    FieldSpec::optional("description", Text),
];

const CONTACT_INFO: &[FieldSpec] = &[
    FieldSpec::required("address", Text),
    FieldSpec::optional("phone", Text),
    FieldSpec::optional("email", Email),
    FieldSpec::optional("whatsapp", Text),
    FieldSpec::optional("mapUrl", Text),
    FieldSpec::optional("openingHours", Text),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_round_trip() {
        for kind in ResourceKind::ALL {
            assert_eq!(ResourceKind::from_path(kind.path()), Some(kind));
        }
        assert_eq!(ResourceKind::from_path("users"), None);
    }

    #[test]
    fn contact_infos_use_a_snake_case_table() {
        assert_eq!(ResourceKind::ContactInfo.path(), "contactInfos");
        assert_eq!(ResourceKind::ContactInfo.table(), "contact_infos");
        assert_eq!(ResourceKind::Gallery.table(), "galleries");
    }

    #[test]
    fn every_family_has_a_required_field() {
        for kind in ResourceKind::ALL {
            assert!(
                kind.schema().fields().iter().any(|f| f.required),
                "{kind:?} has no required field"
            );
        }
    }
}
