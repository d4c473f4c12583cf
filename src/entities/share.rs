use serde::{Deserialize, Serialize};

use crate::entities::Coordinates;

pub const SHARE_TITLE: &str = "My Live Location";
pub const SHARE_TEXT: &str =
    "I'm sharing my live location with you for my safety. Please track me here:";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShareData {
    pub title: String,
    pub text: String,
    pub url: String,
}

impl ShareData {
    pub fn for_location(coordinates: &Coordinates) -> Self {
        Self {
            title: SHARE_TITLE.into(),
            text: SHARE_TEXT.into(),
            url: maps_link(coordinates),
        }
    }
}

pub fn maps_link(coordinates: &Coordinates) -> String {
    format!(
        "https://www.google.com/maps?q={},{}",
        coordinates.latitude, coordinates.longitude
    )
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum ShareOutcome {
    Shared,
    Copied { url: String },
}

#[test]
fn share_data_links_to_maps() {
    let data = ShareData::for_location(&Coordinates::new(22.28, 70.772));

    assert_eq!(data.url, "https://www.google.com/maps?q=22.28,70.772");
    assert_eq!(data.title, "My Live Location");
}
