//! Sample data for a fresh installation.

use std::collections::BTreeMap;

use crate::db::{self, DatabaseError, Store};
use crate::models::{MedicineStock, Pharmacy, PharmacyUpsert};

pub const SAMPLE_PHARMACY_ID: &str = "civil-hospital-pharmacy";

fn stock(stock: u32, price: f64, expiry: &str) -> MedicineStock {
    MedicineStock {
        stock,
        price,
        expiry: expiry.to_string(),
    }
}

pub fn sample_pharmacy() -> Pharmacy {
    let medicines = BTreeMap::from([
        ("paracetamol".to_string(), stock(50, 10.0, "2025-12-31")),
        ("amoxicillin".to_string(), stock(30, 45.0, "2025-10-15")),
        ("metformin".to_string(), stock(25, 25.0, "2025-11-20")),
        ("aspirin".to_string(), stock(40, 8.0, "2025-09-30")),
    ]);
    Pharmacy::from_upsert(PharmacyUpsert {
        id: Some(SAMPLE_PHARMACY_ID.to_string()),
        name: "Civil Hospital Pharmacy".to_string(),
        location: "Civil Hospital, Village Center".to_string(),
        phone: "+91-9876543210".to_string(),
        medicines,
    })
}

/// Seed the sample pharmacy when no users exist yet. Returns whether it seeded.
pub fn seed_sample_data(store: &Store) -> Result<bool, DatabaseError> {
    store.with_transaction(|conn| {
        if db::count_users(conn)? > 0 {
            return Ok(false);
        }
        db::upsert_pharmacy(conn, &sample_pharmacy())?;
        tracing::info!(pharmacy_id = SAMPLE_PHARMACY_ID, "Seeded sample pharmacy");
        Ok(true)
    })
}
