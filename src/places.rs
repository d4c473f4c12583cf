//! Safe places around Marwadi University, Rajkot.

use crate::entities::{Category, SafePlace};

pub fn rajkot() -> Vec<SafePlace> {
    vec![
        SafePlace::new("Sterling Hospital", Category::Hospital, 22.2910, 70.7780),
        SafePlace::new(
            "Gandhigram Police Station",
            Category::PoliceStation,
            22.2965,
            70.7719,
        ),
        SafePlace::new("Wockhardt Hospital", Category::Hospital, 22.2745, 70.7699),
        SafePlace::new(
            "University Police Station",
            Category::PoliceStation,
            22.2858,
            70.7697,
        ),
        SafePlace::new(
            "24x7 Pharmacy (Near Wockhardt)",
            Category::Pharmacy,
            22.2750,
            70.7700,
        ),
    ]
}

#[test]
fn rajkot_nearest_places() {
    use crate::entities::{find_nearest, Coordinates};

    let places = rajkot();
    assert_eq!(places.len(), 5);

    let nearest = find_nearest(&places, &Coordinates::new(22.2800, 70.7720)).unwrap();
    assert_eq!(nearest.place.name, "24x7 Pharmacy (Near Wockhardt)");

    let nearest = find_nearest(&places, &Coordinates::new(22.2850, 70.7705)).unwrap();
    assert_eq!(nearest.place.name, "University Police Station");
    assert!((nearest.distance - 121.2).abs() < 1.0);

    let nearest = find_nearest(&places, &Coordinates::new(22.2960, 70.7720)).unwrap();
    assert_eq!(nearest.place.name, "Gandhigram Police Station");
}
