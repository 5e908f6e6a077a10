//! Consultation rooms: room id allocation and static call-setup data.

use serde::Serialize;
use uuid::Uuid;

use crate::db::{self, DatabaseError, Store};
use crate::models::{Consultation, ConsultationCreate};

pub const ROOM_PREFIX: &str = "room_";

/// Public STUN servers handed to both call participants.
pub const STUN_SERVERS: &[&str] = &[
    "stun:stun.l.google.com:19302",
    "stun:stun1.l.google.com:19302",
];

/// Attempts before giving up on finding an unused room id.
const MAX_ROOM_ATTEMPTS: usize = 5;

/// `room_` followed by 8 random hex characters.
pub fn new_room_id() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("{ROOM_PREFIX}{}", &hex[..8])
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IceServer {
    pub urls: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebRtcConfig {
    #[serde(rename = "iceServers")]
    pub ice_servers: Vec<IceServer>,
}

impl WebRtcConfig {
    pub fn standard() -> Self {
        Self {
            ice_servers: STUN_SERVERS
                .iter()
                .map(|url| IceServer {
                    urls: url.to_string(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RoomInfo {
    pub room_id: String,
    pub consultation: Consultation,
    pub webrtc_config: WebRtcConfig,
}

/// Book a consultation under a freshly allocated room id.
pub fn book_consultation(
    store: &Store,
    input: ConsultationCreate,
) -> Result<Consultation, DatabaseError> {
    store.with_transaction(|conn| {
        let mut room_id = new_room_id();
        let mut attempts = 1;
        while db::room_id_exists(conn, &room_id)? {
            if attempts >= MAX_ROOM_ATTEMPTS {
                return Err(DatabaseError::ConstraintViolation(
                    "could not allocate a free consultation room".into(),
                ));
            }
            room_id = new_room_id();
            attempts += 1;
        }

        let consultation = Consultation::from_create(input, room_id);
        db::insert_consultation(conn, &consultation)?;
        Ok(consultation)
    })
}

/// Room lookup for joining a call.
pub fn room_info(store: &Store, room_id: &str) -> Result<RoomInfo, DatabaseError> {
    let consultation = store
        .with_conn(|conn| db::get_consultation_by_room(conn, room_id))?
        .ok_or_else(|| DatabaseError::not_found("consultation room", room_id))?;

    Ok(RoomInfo {
        room_id: consultation.room_id.clone(),
        consultation,
        webrtc_config: WebRtcConfig::standard(),
    })
}
