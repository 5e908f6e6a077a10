use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stock line for one medicine at one pharmacy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicineStock {
    pub stock: u32,
    pub price: f64,
    pub expiry: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pharmacy {
    pub id: String,
    pub name: String,
    pub location: String,
    pub phone: String,
    /// Keyed by lower-cased medicine name.
    pub medicines: BTreeMap<String, MedicineStock>,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PharmacyUpsert {
    pub id: Option<String>,
    pub name: String,
    pub location: String,
    pub phone: String,
    #[serde(default)]
    pub medicines: BTreeMap<String, MedicineStock>,
}

/// Inventory keys are case-insensitive; store them lower-cased.
pub fn normalize_medicine_name(name: &str) -> String {
    name.trim().to_lowercase()
}

impl PharmacyUpsert {
    /// First inventory key whose normalized name repeats an earlier key,
    /// e.g. `"Paracetamol"` next to `"paracetamol "`.
    pub fn colliding_medicine(&self) -> Option<&str> {
        let mut seen = BTreeSet::new();
        self.medicines
            .keys()
            .find(|name| !seen.insert(normalize_medicine_name(name)))
            .map(String::as_str)
    }
}

impl Pharmacy {
    /// Callers must reject inputs with a [`PharmacyUpsert::colliding_medicine`]
    /// first; otherwise the key that sorts last wins.
    pub fn from_upsert(input: PharmacyUpsert) -> Self {
        let id = input
            .id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(super::new_id);
        let medicines = input
            .medicines
            .into_iter()
            .map(|(name, stock)| (normalize_medicine_name(&name), stock))
            .collect();
        Self {
            id,
            name: input.name,
            location: input.location,
            phone: input.phone,
            medicines,
            last_updated: super::now(),
        }
    }
}

/// Answer to "does this pharmacy have X?".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MedicineAvailability {
    pub available: bool,
    pub stock: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry: Option<String>,
}

impl Pharmacy {
    pub fn availability(&self, medicine_name: &str) -> MedicineAvailability {
        match self.medicines.get(&normalize_medicine_name(medicine_name)) {
            None => MedicineAvailability {
                available: false,
                stock: 0,
                price: None,
                expiry: None,
            },
            Some(line) => MedicineAvailability {
                available: line.stock > 0,
                stock: line.stock,
                price: Some(line.price),
                expiry: Some(line.expiry.clone()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pharmacy() -> Pharmacy {
        let mut medicines = BTreeMap::new();
        medicines.insert(
            "Paracetamol".to_string(),
            MedicineStock { stock: 50, price: 10.0, expiry: "2025-12-31".into() },
        );
        medicines.insert(
            "aspirin".to_string(),
            MedicineStock { stock: 0, price: 8.0, expiry: "2025-09-30".into() },
        );
        Pharmacy::from_upsert(PharmacyUpsert {
            id: None,
            name: "Civil Hospital Pharmacy".into(),
            location: "Village Center".into(),
            phone: "+91-9876543210".into(),
            medicines,
        })
    }

    #[test]
    fn upsert_lowercases_inventory_keys() {
        let p = pharmacy();
        assert!(p.medicines.contains_key("paracetamol"));
        assert!(!p.medicines.contains_key("Paracetamol"));
    }

    #[test]
    fn availability_is_case_insensitive() {
        let a = pharmacy().availability("PARACETAMOL");
        assert!(a.available);
        assert_eq!(a.stock, 50);
        assert_eq!(a.price, Some(10.0));
    }

    #[test]
    fn zero_stock_is_listed_but_unavailable() {
        let a = pharmacy().availability("aspirin");
        assert!(!a.available);
        assert_eq!(a.expiry.as_deref(), Some("2025-09-30"));
    }

    #[test]
    fn unlisted_medicine_reports_zero_stock() {
        let a = pharmacy().availability("insulin");
        assert_eq!(
            a,
            MedicineAvailability { available: false, stock: 0, price: None, expiry: None }
        );
    }

    #[test]
    fn keys_differing_only_by_case_collide() {
        let mut medicines = BTreeMap::new();
        let line = MedicineStock { stock: 1, price: 1.0, expiry: "2026-01-01".into() };
        medicines.insert("Paracetamol".to_string(), line.clone());
        medicines.insert("aspirin".to_string(), line.clone());
        let mut input = PharmacyUpsert {
            id: None,
            name: "n".into(),
            location: "l".into(),
            phone: "p".into(),
            medicines,
        };
        assert_eq!(input.colliding_medicine(), None);

        input.medicines.insert("paracetamol ".to_string(), line);
        assert_eq!(input.colliding_medicine(), Some("paracetamol "));
    }

    #[test]
    fn provided_id_is_kept() {
        let p = Pharmacy::from_upsert(PharmacyUpsert {
            id: Some("ph-1".into()),
            name: "n".into(),
            location: "l".into(),
            phone: "p".into(),
            medicines: BTreeMap::new(),
        });
        assert_eq!(p.id, "ph-1");
    }
}
