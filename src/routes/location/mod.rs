mod handler;
mod model;

pub use handler::{check_location, location_history};
pub use model::{CheckLocationRequest, HistoryQuery, LocationResponse};
