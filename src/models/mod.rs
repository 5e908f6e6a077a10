pub mod alert;
pub mod asha_visit;
pub mod consultation;
pub mod enums;
pub mod health_record;
pub mod location;
pub mod medicine_request;
pub mod pharmacy;
pub mod symptom_check;
pub mod user;

pub use alert::*;
pub use asha_visit::*;
pub use consultation::*;
pub use enums::*;
pub use health_record::*;
pub use location::*;
pub use medicine_request::*;
pub use pharmacy::*;
pub use symptom_check::*;
pub use user::*;

use chrono::{DateTime, SecondsFormat, Utc};
use uuid::Uuid;

/// Fresh server-side identifier for a new entity.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Current time truncated to microseconds, the precision the store keeps.
pub fn now() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::parse_from_rfc3339(&now.to_rfc3339_opts(SecondsFormat::Micros, true))
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(now)
}

/// Short form of an id used in SMS text ("Booking ID: 1a2b3c4d").
pub fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_ids_are_unique_uuids() {
        let a = new_id();
        let b = new_id();
        assert_ne!(a, b);
        assert!(Uuid::parse_str(&a).is_ok());
    }

    #[test]
    fn short_id_takes_first_eight_chars() {
        assert_eq!(short_id("1a2b3c4d-5e6f"), "1a2b3c4d");
        assert_eq!(short_id("abc"), "abc");
    }

    #[test]
    fn now_has_microsecond_precision() {
        let ts = now();
        assert_eq!(ts.timestamp_subsec_nanos() % 1_000, 0);
    }
}
