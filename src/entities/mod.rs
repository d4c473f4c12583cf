mod location;
mod place;
mod route;
mod share;

pub use location::{Coordinates, Fix, EARTH_RADIUS};
pub use place::{find_nearest, Category, Nearest, SafePlace};
pub use route::{Route, RouteStyle};
pub use share::{maps_link, ShareData, ShareOutcome};
