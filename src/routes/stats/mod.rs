mod handler;

pub use handler::{StatsResponse, incident_stats};
