//! Shared wizard state store.
//!
//! Holds the confirmed record of every completed step until final submission.
//! A single instance is owned by the [`Wizard`](super::Wizard) and lent to the
//! step that is currently interactive, so there is never more than one writer.
//! Each setter replaces the previous value for its key.

use super::records::{GuardianKind, GuardianRecord, HouseholdRecord, ObservationsRecord, StudentRecord};
use log::*;

/// Copy of everything the store holds.
///
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WizardSnapshot {
    pub student: Option<StudentRecord>,
    pub maternal: Option<GuardianRecord>,
    pub paternal: Option<GuardianRecord>,
    pub observations: Option<ObservationsRecord>,
    pub household: Option<HouseholdRecord>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WizardStore {
    data: WizardSnapshot,
}

impl WizardStore {
    pub fn new() -> Self {
        WizardStore::default()
    }

    pub fn set_student(&mut self, record: StudentRecord) {
        debug!("Storing student record.");
        self.data.student = Some(record);
    }

    pub fn set_maternal_guardian(&mut self, record: GuardianRecord) {
        self.set_guardian(GuardianKind::Maternal, record);
    }

    pub fn set_paternal_guardian(&mut self, record: GuardianRecord) {
        self.set_guardian(GuardianKind::Paternal, record);
    }

    pub fn set_guardian(&mut self, kind: GuardianKind, record: GuardianRecord) {
        debug!(
            "Storing {:?} guardian record (present: {}).",
            kind,
            record.is_present()
        );
        match kind {
            GuardianKind::Maternal => self.data.maternal = Some(record),
            GuardianKind::Paternal => self.data.paternal = Some(record),
        }
    }

    pub fn set_observations(&mut self, record: ObservationsRecord) {
        debug!("Storing observations record.");
        self.data.observations = Some(record);
    }

    pub fn set_household(&mut self, record: HouseholdRecord) {
        debug!("Storing household record.");
        self.data.household = Some(record);
    }

    pub fn student(&self) -> Option<&StudentRecord> {
        self.data.student.as_ref()
    }

    pub fn guardian(&self, kind: GuardianKind) -> Option<&GuardianRecord> {
        match kind {
            GuardianKind::Maternal => self.data.maternal.as_ref(),
            GuardianKind::Paternal => self.data.paternal.as_ref(),
        }
    }

    pub fn observations(&self) -> Option<&ObservationsRecord> {
        self.data.observations.as_ref()
    }

    pub fn household(&self) -> Option<&HouseholdRecord> {
        self.data.household.as_ref()
    }

    /// Return a copy of every stored record.
    ///
    pub fn get_all(&self) -> WizardSnapshot {
        self.data.clone()
    }

    /// Drop every stored record.
    ///
    pub fn clear(&mut self) {
        debug!("Clearing wizard store.");
        self.data = WizardSnapshot::default();
    }

    pub fn is_empty(&self) -> bool {
        self.data == WizardSnapshot::default()
    }
}
