use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entities::Coordinates;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Hospital,
    PoliceStation,
    Pharmacy,
}

impl Category {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Hospital => "Hospital",
            Self::PoliceStation => "Police Station",
            Self::Pharmacy => "Pharmacy",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SafePlace {
    pub name: String,
    pub category: Category,
    pub coordinates: Coordinates,
}

impl SafePlace {
    pub fn new(name: impl Into<String>, category: Category, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            category,
            coordinates: Coordinates::new(latitude, longitude),
        }
    }

    pub fn popup_label(&self) -> String {
        format!("<b>{}</b><br>{}", self.name, self.category)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Nearest {
    pub place: SafePlace,
    /// Meters from the query coordinate.
    pub distance: f64,
}

/// Linear scan for the closest place. Only a strictly smaller distance
/// replaces the current best, so the earliest entry wins a tie and a NaN
/// distance never wins.
pub fn find_nearest(places: &[SafePlace], from: &Coordinates) -> Option<Nearest> {
    let mut best: Option<(&SafePlace, f64)> = None;

    for place in places {
        let distance = from.distance_to(&place.coordinates);

        let closer = match best {
            Some((_, min_distance)) => distance < min_distance,
            None => !distance.is_nan(),
        };

        if closer {
            best = Some((place, distance));
        }
    }

    best.map(|(place, distance)| Nearest {
        place: place.clone(),
        distance,
    })
}

#[test]
fn nearest_picks_minimum_distance() {
    let places = vec![
        SafePlace::new("far", Category::Hospital, 22.3000, 70.8000),
        SafePlace::new("near", Category::Pharmacy, 22.2801, 70.7721),
        SafePlace::new("middle", Category::PoliceStation, 22.2850, 70.7750),
    ];

    let nearest = find_nearest(&places, &Coordinates::new(22.2800, 70.7720)).unwrap();

    assert_eq!(nearest.place.name, "near");
    for place in &places {
        assert!(nearest.distance <= Coordinates::new(22.2800, 70.7720).distance_to(&place.coordinates));
    }
}

#[test]
fn nearest_tie_goes_to_first_entry() {
    let places = vec![
        SafePlace::new("first", Category::Hospital, 22.2900, 70.7700),
        SafePlace::new("second", Category::PoliceStation, 22.2900, 70.7700),
    ];

    let nearest = find_nearest(&places, &Coordinates::new(22.2800, 70.7720)).unwrap();

    assert_eq!(nearest.place.name, "first");
}

#[test]
fn nearest_of_nothing_is_none() {
    assert!(find_nearest(&[], &Coordinates::new(0.0, 0.0)).is_none());
}

#[test]
fn popup_label_names_category() {
    let place = SafePlace::new("Sterling Hospital", Category::Hospital, 22.2910, 70.7780);

    assert_eq!(place.popup_label(), "<b>Sterling Hospital</b><br>Hospital");
    assert_eq!(Category::PoliceStation.to_string(), "Police Station");
}

#[test]
fn nearest_never_picks_unmeasurable_place() {
    let places = vec![
        SafePlace::new("broken", Category::Hospital, f64::NAN, 70.7700),
        SafePlace::new("real", Category::Pharmacy, 22.2900, 70.7700),
        SafePlace::new("broken again", Category::Hospital, 22.2800, f64::NAN),
    ];

    let nearest = find_nearest(&places, &Coordinates::new(22.2800, 70.7720)).unwrap();
    assert_eq!(nearest.place.name, "real");

    assert!(find_nearest(&places[..1], &Coordinates::new(22.2800, 70.7720)).is_none());
}

#[test]
fn nearest_matches_brute_force_on_random_sets() {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    let mut rng = StdRng::seed_from_u64(42);

    for _ in 0..500 {
        let len = rng.gen_range(1..12);
        let mut places: Vec<SafePlace> = (0..len)
            .map(|i| {
                SafePlace::new(
                    format!("place {}", i),
                    Category::Hospital,
                    rng.gen_range(22.20..22.40),
                    rng.gen_range(70.70..70.90),
                )
            })
            .collect();

        // duplicate coordinates so ties actually happen
        if len > 1 && rng.gen_bool(0.5) {
            let from = rng.gen_range(0..len);
            let to = rng.gen_range(0..len);
            places[to].coordinates = places[from].coordinates;
        }

        let from = Coordinates::new(rng.gen_range(22.20..22.40), rng.gen_range(70.70..70.90));

        let mut expected = 0;
        for (i, place) in places.iter().enumerate() {
            if from.distance_to(&place.coordinates) < from.distance_to(&places[expected].coordinates) {
                expected = i;
            }
        }

        let nearest = find_nearest(&places, &from).unwrap();
        assert_eq!(nearest.place.name, places[expected].name);
        assert_eq!(nearest.distance, from.distance_to(&places[expected].coordinates));
    }
}
