//! Remote enrollment API.
//!
//! One method per endpoint. Request bodies are built here from the wizard
//! records, using the key names the backend expects.

mod client;
mod error;
mod resource;

pub use error::ApiError;
pub use resource::StudentId;

use crate::wizard::records::{
    GuardianKind, GuardianRecord, HouseholdRecord, ObservationsRecord, StudentRecord,
};
use client::Client;
use log::*;
use serde_json::{json, Map, Value};
use std::time::Duration;

pub const STUDENTS_ENDPOINT: &str = "alunos";
pub const MATERNAL_ENDPOINT: &str = "maes";
pub const PATERNAL_ENDPOINT: &str = "pais";
pub const OBSERVATIONS_ENDPOINT: &str = "observacoes";

/// Endpoint receiving the given guardian kind.
///
pub fn guardian_endpoint(kind: GuardianKind) -> &'static str {
    match kind {
        GuardianKind::Maternal => MATERNAL_ENDPOINT,
        GuardianKind::Paternal => PATERNAL_ENDPOINT,
    }
}

/// Responsible for asynchronous interaction with the enrollment API.
///
pub struct Api {
    client: Client,
}

impl Api {
    /// Returns a new instance for the given base URL.
    ///
    pub fn new(base_url: &str, timeout: Duration) -> Api {
        debug!("Initializing API client for {}...", base_url);
        Api {
            client: Client::new(base_url, timeout),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.client.base_url
    }

    /// Create the student resource and return its identifier.
    ///
    pub async fn create_student(&self, student: &StudentRecord) -> Result<StudentId, ApiError> {
        debug!("Creating student...");
        let body = serde_json::to_value(student)?;
        let response = self.client.post(STUDENTS_ENDPOINT, &body).await?;
        let id = StudentId::from_response(&response).ok_or_else(|| ApiError::MissingIdentifier {
            endpoint: STUDENTS_ENDPOINT.to_string(),
        })?;
        info!("Created student with ID {}.", id);
        Ok(id)
    }

    /// Create a guardian resource linked to the student.
    ///
    pub async fn create_guardian(
        &self,
        kind: GuardianKind,
        guardian: &GuardianRecord,
        student_id: &StudentId,
    ) -> Result<(), ApiError> {
        debug!("Creating {} guardian for student ID {}...", kind.suffix(), student_id);
        let body = guardian_body(kind, guardian, student_id);
        self.client.post(guardian_endpoint(kind), &body).await?;
        Ok(())
    }

    /// Create the observations resource, merged with the household data.
    ///
    pub async fn create_observations(
        &self,
        observations: &ObservationsRecord,
        household: &HouseholdRecord,
        student_id: &StudentId,
    ) -> Result<(), ApiError> {
        debug!("Creating observations for student ID {}...", student_id);
        let body = observations_body(observations, household, student_id);
        self.client.post(OBSERVATIONS_ENDPOINT, &body).await?;
        Ok(())
    }
}

/// Guardian body: every field keyed by its stem plus the kind's suffix
/// (`nomeMae`, `cpfPai`, ...) and the `alunoId` foreign key.
///
pub fn guardian_body(kind: GuardianKind, guardian: &GuardianRecord, student_id: &StudentId) -> Value {
    let mut body = Map::new();
    for (stem, value) in guardian.fields() {
        body.insert(
            format!("{}{}", stem, kind.suffix()),
            Value::String(value.to_string()),
        );
    }
    body.insert("alunoId".to_string(), student_id.to_json());
    Value::Object(body)
}

/// Observations body. Descriptions whose gate is closed are sent as `null`.
///
pub fn observations_body(
    observations: &ObservationsRecord,
    household: &HouseholdRecord,
    student_id: &StudentId,
) -> Value {
    json!({
        "matriculaTipo": observations.enrollment_type,
        "escola": observations.previous_school,
        "temIrmaos": observations.has_siblings,
        "irmaosNome": observations.sibling_names,
        "temEspecialista": observations.has_specialist,
        "especialista": observations.specialist,
        "temAlergias": observations.has_allergies,
        "alergia": observations.allergies,
        "temMedicamento": observations.has_medication,
        "medicamento": observations.medication,
        "reside": household.residency,
        "respNome": household.financial_guardian_name,
        "respCpf": household.financial_guardian_cpf,
        "respTelefone": household.financial_guardian_phone,
        "pessoasAutorizadas": household.authorized_pickup_text(),
        "alunoId": student_id.to_json(),
    })
}
