//! Responder matching and fan-out for emergency alerts.
//!
//! Health workers with a known position are matched by great-circle
//! distance. Workers without one only match alerts raised from their own
//! village. The fan-out runs after the alert is stored and never affects
//! the response to the caller.

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::config::EmergencyConfig;
use crate::db::{self, DatabaseError, Store};
use crate::models::{EmergencyAlert, User};
use crate::notify::{Notification, NotificationKind, Notifier};

#[derive(Debug, Clone, PartialEq)]
pub struct ResponderMatch {
    pub user: User,
    /// `None` when matched by village rather than position.
    pub distance_km: Option<f64>,
}

fn same_village(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

/// Pick responders for an alert, nearest first, capped at `max_responders`.
pub fn match_responders(
    candidates: Vec<User>,
    alert: &EmergencyAlert,
    alert_village: Option<&str>,
    settings: &EmergencyConfig,
) -> Vec<ResponderMatch> {
    let mut matches: Vec<ResponderMatch> = candidates
        .into_iter()
        .filter(|user| user.role.is_responder() && user.id != alert.user_id)
        .filter_map(|user| match user.location {
            Some(point) => {
                let distance = point.distance_km(&alert.location);
                (distance <= settings.responder_radius_km).then_some(ResponderMatch {
                    user,
                    distance_km: Some(distance),
                })
            }
            None => alert_village
                .filter(|village| same_village(village, &user.village))
                .map(|_| ResponderMatch {
                    user,
                    distance_km: None,
                }),
        })
        .collect();

    matches.sort_by(|a, b| {
        a.distance_km
            .unwrap_or(f64::INFINITY)
            .total_cmp(&b.distance_km.unwrap_or(f64::INFINITY))
    });
    matches.truncate(settings.max_responders);
    matches
}

/// Find responders for a stored alert and queue one message per responder.
pub fn fan_out(
    store: &Store,
    notifier: &Notifier,
    alert: &EmergencyAlert,
    settings: &EmergencyConfig,
) -> Result<Vec<ResponderMatch>, DatabaseError> {
    let (candidates, alerting_user) = store.with_conn(|conn| {
        Ok((
            db::list_responders(conn)?,
            db::get_user(conn, &alert.user_id)?,
        ))
    })?;

    let alert_village = alerting_user.as_ref().map(|u| u.village.as_str());
    let matches = match_responders(candidates, alert, alert_village, settings);

    let message = alert.responder_message();
    for m in &matches {
        notifier.dispatch(Notification::new(
            NotificationKind::EmergencyAlert,
            m.user.phone.clone(),
            message.clone(),
        ));
    }

    tracing::info!(
        alert_id = %alert.id,
        responders = matches.len(),
        "Emergency alert fan-out queued"
    );
    Ok(matches)
}

/// Run [`fan_out`] in the background. Failures are logged, never retried.
pub fn spawn_fan_out(
    store: Arc<Store>,
    notifier: Notifier,
    alert: EmergencyAlert,
    settings: EmergencyConfig,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(e) = fan_out(&store, &notifier, &alert, &settings) {
            tracing::error!(alert_id = %alert.id, error = %e, "Emergency fan-out failed");
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EmergencyAlertCreate, GeoPoint, UserCreate, UserRole};

    fn settings() -> EmergencyConfig {
        EmergencyConfig {
            responder_radius_km: 25.0,
            max_responders: 10,
        }
    }

    fn user(name: &str, role: UserRole, village: &str, location: Option<GeoPoint>) -> User {
        User::from_create(UserCreate {
            name: name.into(),
            phone: format!("+91-90000{name}"),
            village: village.into(),
            language: "hi".into(),
            role,
            emergency_contact: None,
            location,
        })
    }

    fn alert_from(user_id: &str) -> EmergencyAlert {
        EmergencyAlert::from_create(EmergencyAlertCreate {
            user_id: user_id.into(),
            user_name: "Ramesh".into(),
            user_phone: "+91-9000000000".into(),
            location: GeoPoint::new(30.9000, 75.8500),
            alert_type: crate::models::AlertType::Medical,
            description: None,
        })
    }

    #[test]
    fn matches_within_radius_nearest_first() {
        let near = user("near", UserRole::Asha, "Rampur", Some(GeoPoint::new(30.91, 75.85)));
        let nearer = user("nearer", UserRole::Doctor, "Rampur", Some(GeoPoint::new(30.901, 75.85)));
        let far = user("far", UserRole::Doctor, "Rampur", Some(GeoPoint::new(31.63, 74.87)));

        let matches = match_responders(
            vec![near, far, nearer],
            &alert_from("patient-1"),
            Some("Rampur"),
            &settings(),
        );
        let names: Vec<_> = matches.iter().map(|m| m.user.name.as_str()).collect();
        assert_eq!(names, vec!["nearer", "near"]);
        assert!(matches[0].distance_km.unwrap() < matches[1].distance_km.unwrap());
    }

    #[test]
    fn unlocated_workers_match_by_village_after_located_ones() {
        let local = user("local", UserRole::Asha, "rampur ", None);
        let elsewhere = user("elsewhere", UserRole::Asha, "Sitapur", None);
        let located = user("located", UserRole::Doctor, "Sitapur", Some(GeoPoint::new(30.90, 75.86)));

        let matches = match_responders(
            vec![local, elsewhere, located],
            &alert_from("patient-1"),
            Some("Rampur"),
            &settings(),
        );
        let names: Vec<_> = matches.iter().map(|m| m.user.name.as_str()).collect();
        assert_eq!(names, vec!["located", "local"]);
        assert_eq!(matches[1].distance_km, None);
    }

    #[test]
    fn unknown_alert_village_matches_only_by_distance() {
        let local = user("local", UserRole::Asha, "Rampur", None);
        let matches = match_responders(vec![local], &alert_from("p"), None, &settings());
        assert!(matches.is_empty());
    }

    #[test]
    fn excludes_patients_and_the_alerting_user() {
        let here = Some(GeoPoint::new(30.9, 75.85));
        let patient = user("patient", UserRole::Patient, "Rampur", here);
        let me = user("me", UserRole::Asha, "Rampur", here);
        let alert = alert_from(&me.id);

        let matches = match_responders(vec![patient, me], &alert, Some("Rampur"), &settings());
        assert!(matches.is_empty());
    }

    #[test]
    fn caps_the_number_of_responders() {
        let candidates = (0..5)
            .map(|i| user(&i.to_string(), UserRole::Asha, "Rampur", None))
            .collect();
        let capped = EmergencyConfig {
            max_responders: 3,
            ..settings()
        };
        let matches = match_responders(candidates, &alert_from("p"), Some("Rampur"), &capped);
        assert_eq!(matches.len(), 3);
    }

    #[tokio::test]
    async fn fan_out_queues_one_message_per_responder() {
        let store = Store::in_memory().unwrap();
        let patient = user("patient", UserRole::Patient, "Rampur", None);
        let asha = user("asha", UserRole::Asha, "Rampur", None);
        let far_doc = user("doc", UserRole::Doctor, "Sitapur", Some(GeoPoint::new(31.63, 74.87)));
        store
            .with_conn(|conn| {
                db::insert_user(conn, &patient)?;
                db::insert_user(conn, &asha)?;
                db::insert_user(conn, &far_doc)
            })
            .unwrap();

        let alert = alert_from(&patient.id);
        let (notifier, mut receiver) = Notifier::channel();
        let matches = fan_out(&store, &notifier, &alert, &settings()).unwrap();

        assert_eq!(matches.len(), 1);
        let sent = receiver.try_recv().unwrap();
        assert_eq!(sent.phone, asha.phone);
        assert_eq!(sent.kind, NotificationKind::EmergencyAlert);
        assert!(sent.message.starts_with("EMERGENCY ALERT: Ramesh needs help"));
        assert!(receiver.try_recv().is_err());
    }
}
