//! API endpoint handlers, one module per resource.

pub mod asha_visits;
pub mod consultations;
pub mod emergency;
pub mod health;
pub mod health_records;
pub mod medicine_requests;
pub mod pharmacies;
pub mod symptoms;
pub mod translate;
pub mod users;
