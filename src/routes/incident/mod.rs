mod handler;
mod model;

pub use handler::{
    active_incidents,
    create_incident,
    deactivate_incident,
    get_incident,
    list_incidents,
    update_incident,
};
pub use model::{IncidentListResponse, IncidentResponse, ListQuery};
