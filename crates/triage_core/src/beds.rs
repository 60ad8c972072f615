//! Ward and bed inventory for admission placement.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use triage_error::{AdmissionError, AdmissionErrorKind};

/// Hospital ward a bed belongs to.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
pub enum Ward {
    Medical,
    Surgical,
    Cardiology,
    #[serde(rename = "ICU")]
    #[strum(serialize = "ICU")]
    Icu,
}

/// Occupancy state of a bed.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
pub enum BedStatus {
    Available,
    Taken,
    Cleaning,
}

/// A single bed in the inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct Bed {
    id: String,
    ward: Ward,
    room: u32,
    bed_number: u32,
    status: BedStatus,
}

impl Bed {
    /// Create a bed entry.
    pub fn new(
        id: impl Into<String>,
        ward: Ward,
        room: u32,
        bed_number: u32,
        status: BedStatus,
    ) -> Self {
        Self {
            id: id.into(),
            ward,
            room,
            bed_number,
            status,
        }
    }

    /// Whether the bed can currently be allocated.
    pub fn is_available(&self) -> bool {
        self.status == BedStatus::Available
    }
}

/// Mutable bed inventory supporting lookup, filtering, and allocation.
///
/// # Examples
///
/// ```
/// use triage_core::{BedRegistry, Ward};
///
/// let mut registry = BedRegistry::sample();
/// assert!(!registry.available_in(Ward::Medical).is_empty());
///
/// let bed = registry.allocate("MED-101-1").unwrap();
/// assert_eq!(bed.ward(), &Ward::Medical);
/// assert!(registry.allocate("MED-101-1").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct BedRegistry {
    beds: Vec<Bed>,
}

impl BedRegistry {
    /// Create a registry over the given inventory.
    pub fn new(beds: Vec<Bed>) -> Self {
        Self { beds }
    }

    /// Demo inventory mirroring a small four-ward hospital.
    pub fn sample() -> Self {
        use BedStatus::{Available, Taken};
        use Ward::{Cardiology, Icu, Medical, Surgical};

        Self::new(vec![
            Bed::new("MED-101-1", Medical, 101, 1, Available),
            Bed::new("MED-101-2", Medical, 101, 2, Taken),
            Bed::new("MED-102-1", Medical, 102, 1, Available),
            Bed::new("MED-102-2", Medical, 102, 2, Available),
            Bed::new("MED-103-1", Medical, 103, 1, Taken),
            Bed::new("SUR-201-1", Surgical, 201, 1, Available),
            Bed::new("SUR-201-2", Surgical, 201, 2, Available),
            Bed::new("SUR-202-1", Surgical, 202, 1, Taken),
            Bed::new("SUR-202-2", Surgical, 202, 2, Available),
            Bed::new("CAR-301-1", Cardiology, 301, 1, Taken),
            Bed::new("CAR-301-2", Cardiology, 301, 2, Available),
            Bed::new("CAR-302-1", Cardiology, 302, 1, Available),
            Bed::new("ICU-401-1", Icu, 401, 1, Available),
            Bed::new("ICU-401-2", Icu, 401, 2, Taken),
        ])
    }

    /// All beds, in inventory order.
    pub fn beds(&self) -> &[Bed] {
        &self.beds
    }

    /// Distinct wards, in inventory order.
    pub fn wards(&self) -> Vec<Ward> {
        let mut wards = Vec::new();
        for bed in &self.beds {
            if !wards.contains(&bed.ward) {
                wards.push(bed.ward);
            }
        }
        wards
    }

    /// Beds in `ward` that can currently be allocated.
    pub fn available_in(&self, ward: Ward) -> Vec<&Bed> {
        self.beds
            .iter()
            .filter(|bed| bed.ward == ward && bed.is_available())
            .collect()
    }

    /// Look up a bed by identifier.
    pub fn get(&self, id: &str) -> Option<&Bed> {
        self.beds.iter().find(|bed| bed.id == id)
    }

    /// Allocate a bed, marking it taken.
    ///
    /// Returns a snapshot of the bed as allocated, or an [`AdmissionError`]
    /// when the bed is unknown or not available.
    pub fn allocate(&mut self, id: &str) -> Result<Bed, AdmissionError> {
        let bed = self
            .beds
            .iter_mut()
            .find(|bed| bed.id == id)
            .ok_or_else(|| AdmissionError::new(AdmissionErrorKind::UnknownBed(id.to_string())))?;

        if !bed.is_available() {
            return Err(AdmissionError::new(AdmissionErrorKind::BedUnavailable {
                id: id.to_string(),
                status: bed.status.to_string(),
            }));
        }

        bed.status = BedStatus::Taken;
        Ok(bed.clone())
    }
}
