mod active;
mod incident;
mod location;
mod stats;

pub use active::ActiveIncidentSource;
pub use incident::IncidentService;
pub use location::LocationService;
pub use stats::StatsService;
