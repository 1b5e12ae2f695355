pub mod cities;

pub use cities::{add_city, get_coordinates, select_cities, AddCityOutcome};
