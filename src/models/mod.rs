pub mod delivery;
pub mod incident;
pub mod location;

pub use delivery::DeliveryTask;
pub use incident::{Incident, IncidentPatch, NewIncident};
pub use location::LocationCheck;
