//! Final submission of an enrollment.
//!
//! Reads every record from the store and sends them to the API in dependency
//! order: the student first (its identifier keys everything else), then both
//! guardians, then the observations merged with the household data. The first
//! failure aborts the sequence and leaves the store untouched so the user can
//! submit again. Resources created before the failure are not rolled back.

use super::records::{GuardianKind, GuardianRecord, HouseholdRecord};
use super::step::{FieldIssue, StepKind, StepReport};
use super::store::WizardStore;
use super::validators::{validate, Field, ValidationContext};
use crate::api::{guardian_endpoint, Api, ApiError, StudentId, OBSERVATIONS_ENDPOINT, STUDENTS_ENDPOINT};
use log::*;

/// Whether the user accepted the data-use terms.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Consent {
    Given,
    NotGiven,
}

/// Outcome of a successful submission.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Receipt {
    pub student_id: StudentId,
    pub requests: usize,
}

/// Errors that stop a submission.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    /// Consent is required before any request is sent
    #[error("Data-use consent not given")]
    ConsentRequired,

    /// A submission is already in flight
    #[error("Submission already in progress")]
    AlreadySubmitting,

    /// The network thread cannot take the submission
    #[error("Network thread unavailable")]
    Unavailable,

    /// The final step's own fields are invalid
    #[error("Final step has {} invalid field(s)", .0.issues.len())]
    Invalid(StepReport),

    /// A step's record is missing from the store
    #[error("Step not completed: {0}")]
    MissingStep(StepKind),

    /// A request of the sequence failed
    #[error("Request to '{stage}' failed: {source}")]
    Request {
        stage: &'static str,
        source: ApiError,
    },
}

impl SubmissionError {
    /// Text for the error dialog.
    ///
    pub fn user_message(&self) -> String {
        match self {
            SubmissionError::ConsentRequired => {
                "É necessário aceitar o uso dos dados para enviar o cadastro.".to_string()
            }
            SubmissionError::AlreadySubmitting => {
                "O cadastro já está sendo enviado. Aguarde.".to_string()
            }
            SubmissionError::Unavailable => {
                "Não foi possível iniciar o envio. Tente novamente.".to_string()
            }
            SubmissionError::Invalid(report) => report.summary(),
            SubmissionError::MissingStep(step) => format!("Etapa não concluída: {}", step),
            SubmissionError::Request { source, .. } => {
                format!("Erro no cadastro:\n{}", source.user_message())
            }
        }
    }
}

/// Sends a completed wizard to the API.
///
pub struct Assembler {
    api: Api,
    require_consent: bool,
}

impl Assembler {
    pub fn new(api: Api, require_consent: bool) -> Self {
        Assembler {
            api,
            require_consent,
        }
    }

    pub fn requires_consent(&self) -> bool {
        self.require_consent
    }

    /// Submit everything in the store. On success the store is cleared.
    ///
    pub async fn submit(
        &self,
        store: &mut WizardStore,
        consent: Consent,
    ) -> Result<Receipt, SubmissionError> {
        if self.require_consent && consent != Consent::Given {
            warn!("Submission refused: consent not given.");
            return Err(SubmissionError::ConsentRequired);
        }

        let household = store
            .household()
            .ok_or(SubmissionError::MissingStep(StepKind::Household))?;
        let report = validate_household(household);
        if !report.is_empty() {
            return Err(SubmissionError::Invalid(report));
        }
        let student = store
            .student()
            .ok_or(SubmissionError::MissingStep(StepKind::Student))?;
        let observations = store
            .observations()
            .ok_or(SubmissionError::MissingStep(StepKind::Observations))?;

        info!("Submitting enrollment...");
        let student_id = self
            .api
            .create_student(student)
            .await
            .map_err(|source| SubmissionError::Request {
                stage: STUDENTS_ENDPOINT,
                source,
            })?;
        let mut requests = 1;

        for kind in [GuardianKind::Maternal, GuardianKind::Paternal] {
            let guardian = outgoing_guardian(store, kind);
            self.api
                .create_guardian(kind, &guardian, &student_id)
                .await
                .map_err(|source| SubmissionError::Request {
                    stage: guardian_endpoint(kind),
                    source,
                })?;
            requests += 1;
        }

        self.api
            .create_observations(observations, household, &student_id)
            .await
            .map_err(|source| SubmissionError::Request {
                stage: OBSERVATIONS_ENDPOINT,
                source,
            })?;
        requests += 1;

        info!(
            "Enrollment submitted for student ID {} ({} requests).",
            student_id, requests
        );
        store.clear();
        Ok(Receipt {
            student_id,
            requests,
        })
    }
}

/// The guardian record to transmit: the stored one when it carries data,
/// otherwise the "not informed" record.
///
fn outgoing_guardian(store: &WizardStore, kind: GuardianKind) -> GuardianRecord {
    match store.guardian(kind) {
        Some(guardian) if guardian.is_present() => guardian.clone(),
        _ => {
            debug!("{:?} guardian absent, sending not-informed record.", kind);
            GuardianRecord::not_informed()
        }
    }
}

/// Re-check the household fields with the same validators the step uses.
///
pub fn validate_household(household: &HouseholdRecord) -> StepReport {
    let pickup = household.authorized_pickup_text();
    let values = [
        (Field::Residency, household.residency.as_str()),
        (Field::FinancialGuardianName, household.financial_guardian_name.as_str()),
        (Field::FinancialGuardianCpf, household.financial_guardian_cpf.as_str()),
        (Field::FinancialGuardianPhone, household.financial_guardian_phone.as_str()),
        (Field::AuthorizedPickup, pickup.as_str()),
    ];
    let issues = values
        .iter()
        .filter_map(|(field, value)| {
            validate(*field, value, ValidationContext::active()).map(|message| FieldIssue {
                field: *field,
                label: field.label(),
                message,
            })
        })
        .collect();
    StepReport {
        step: StepKind::Household,
        issues,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::records::{
        EnrollmentType, ObservationsRecord, StudentRecord, YesNo, NOT_INFORMED,
    };
    use fake::{Fake, Faker};
    use httpmock::{Mock, MockServer};
    use serde_json::json;
    use std::time::Duration;

    fn household() -> HouseholdRecord {
        HouseholdRecord {
            residency: "Mãe e avó".to_string(),
            financial_guardian_name: "Ana da Silva".to_string(),
            financial_guardian_cpf: "987.654.321-00".to_string(),
            financial_guardian_phone: "(21) 98765-4321".to_string(),
            authorized_pickup: vec!["Ana da Silva".to_string()],
        }
    }

    fn initial_observations() -> ObservationsRecord {
        ObservationsRecord {
            enrollment_type: EnrollmentType::Initial,
            previous_school: None,
            has_siblings: YesNo::No,
            sibling_names: None,
            has_specialist: YesNo::No,
            specialist: None,
            has_allergies: YesNo::No,
            allergies: None,
            has_medication: YesNo::No,
            medication: None,
        }
    }

    /// Store as left by a walk through every step with both guardians off.
    fn completed_store() -> WizardStore {
        let mut store = WizardStore::new();
        let student: StudentRecord = Faker.fake();
        store.set_student(student);
        store.set_maternal_guardian(GuardianRecord::absent());
        store.set_paternal_guardian(GuardianRecord::absent());
        store.set_observations(initial_observations());
        store.set_household(household());
        store
    }

    fn assembler(server: &MockServer, require_consent: bool) -> Assembler {
        Assembler::new(
            Api::new(&server.base_url(), Duration::from_secs(10)),
            require_consent,
        )
    }

    async fn mock_created<'a>(server: &'a MockServer, path: &str) -> Mock<'a> {
        server
            .mock_async(|when, then| {
                when.method("POST").path(path);
                then.status(201).json_body(json!({ "id": 21 }));
            })
            .await
    }

    #[tokio::test]
    async fn submit_sends_four_requests_and_clears_store() {
        let server = MockServer::start_async().await;
        let student = mock_created(&server, "/alunos").await;
        let maternal = server
            .mock_async(|when, then| {
                when.method("POST")
                    .path("/maes")
                    .json_body_partial(r#"{ "nomeMae": "Não informado", "cpfMae": "", "alunoId": 21 }"#);
                then.status(201).json_body(json!({ "id": 1 }));
            })
            .await;
        let paternal = server
            .mock_async(|when, then| {
                when.method("POST")
                    .path("/pais")
                    .json_body_partial(r#"{ "nomePai": "Não informado", "alunoId": 21 }"#);
                then.status(201).json_body(json!({ "id": 2 }));
            })
            .await;
        let observations = server
            .mock_async(|when, then| {
                when.method("POST").path("/observacoes").json_body_partial(
                    r#"{ "matriculaTipo": "inicial", "temIrmaos": "não", "reside": "Mãe e avó", "alunoId": 21 }"#,
                );
                then.status(201).json_body(json!({ "id": 3 }));
            })
            .await;

        let mut store = completed_store();
        let receipt = assembler(&server, true)
            .submit(&mut store, Consent::Given)
            .await
            .unwrap();

        assert_eq!(receipt.requests, 4);
        assert_eq!(receipt.student_id, StudentId::from(21));
        student.assert_async().await;
        maternal.assert_async().await;
        paternal.assert_async().await;
        observations.assert_async().await;
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn submit_sends_present_guardian() {
        let server = MockServer::start_async().await;
        mock_created(&server, "/alunos").await;
        mock_created(&server, "/pais").await;
        mock_created(&server, "/observacoes").await;
        let guardian = GuardianRecord {
            name: "Ana da Silva".to_string(),
            email: "ana@example.com".to_string(),
            ..GuardianRecord::default()
        };
        let maternal = server
            .mock_async(|when, then| {
                when.method("POST").path("/maes").json_body_partial(
                    r#"{ "nomeMae": "Ana da Silva", "emailMae": "ana@example.com" }"#,
                );
                then.status(201);
            })
            .await;

        let mut store = completed_store();
        store.set_maternal_guardian(guardian);
        assembler(&server, true)
            .submit(&mut store, Consent::Given)
            .await
            .unwrap();
        maternal.assert_async().await;
    }

    #[tokio::test]
    async fn submit_failure_keeps_store_and_stops() {
        let server = MockServer::start_async().await;
        let student = mock_created(&server, "/alunos").await;
        server
            .mock_async(|when, then| {
                when.method("POST").path("/maes");
                then.status(500)
                    .json_body(json!({ "message": "Servidor indisponível" }));
            })
            .await;
        let paternal = mock_created(&server, "/pais").await;
        let observations = mock_created(&server, "/observacoes").await;

        let mut store = completed_store();
        let before = store.get_all();
        let error = assembler(&server, true)
            .submit(&mut store, Consent::Given)
            .await
            .unwrap_err();

        assert!(matches!(error, SubmissionError::Request { stage: "maes", .. }));
        assert_eq!(error.user_message(), "Erro no cadastro:\nServidor indisponível");
        assert_eq!(store.get_all(), before);
        student.assert_async().await;
        assert_eq!(paternal.hits_async().await, 0);
        assert_eq!(observations.hits_async().await, 0);
    }

    #[tokio::test]
    async fn submit_requires_consent_before_any_request() {
        let server = MockServer::start_async().await;
        let student = mock_created(&server, "/alunos").await;

        let mut store = completed_store();
        let error = assembler(&server, true)
            .submit(&mut store, Consent::NotGiven)
            .await
            .unwrap_err();
        assert!(matches!(error, SubmissionError::ConsentRequired));
        assert_eq!(student.hits_async().await, 0);
        assert!(!store.is_empty());
    }

    #[tokio::test]
    async fn submit_without_consent_when_not_required() {
        let server = MockServer::start_async().await;
        for path in ["/alunos", "/maes", "/pais", "/observacoes"] {
            mock_created(&server, path).await;
        }

        let mut store = completed_store();
        let receipt = assembler(&server, false)
            .submit(&mut store, Consent::NotGiven)
            .await
            .unwrap();
        assert_eq!(receipt.requests, 4);
    }

    #[tokio::test]
    async fn submit_rejects_invalid_household() {
        let server = MockServer::start_async().await;
        let student = mock_created(&server, "/alunos").await;

        let mut store = completed_store();
        store.set_household(HouseholdRecord {
            financial_guardian_phone: "(21) 8765-4321".to_string(),
            authorized_pickup: Vec::new(),
            ..household()
        });
        let error = assembler(&server, true)
            .submit(&mut store, Consent::Given)
            .await
            .unwrap_err();

        let SubmissionError::Invalid(report) = &error else {
            panic!("unexpected error: {:?}", error);
        };
        assert!(report.contains_message("Telefone inválido"));
        assert!(report.contains_message("Informe as pessoas autorizadas"));
        assert!(error.user_message().starts_with("Para continuar"));
        assert_eq!(student.hits_async().await, 0);
    }

    #[tokio::test]
    async fn submit_requires_every_step() {
        let server = MockServer::start_async().await;
        let mut store = completed_store();
        let snapshot = store.get_all();
        store.clear();
        store.set_household(household());
        if let Some(observations) = snapshot.observations {
            store.set_observations(observations);
        }

        let error = assembler(&server, true)
            .submit(&mut store, Consent::Given)
            .await
            .unwrap_err();
        assert!(matches!(error, SubmissionError::MissingStep(StepKind::Student)));
        assert!(error.user_message().contains("Dados do Aluno"));
    }

    #[test]
    fn test_not_informed_record_is_sent_for_absent_guardians() {
        let mut store = WizardStore::new();
        assert_eq!(
            outgoing_guardian(&store, GuardianKind::Maternal).name,
            NOT_INFORMED
        );
        store.set_paternal_guardian(GuardianRecord::absent());
        assert_eq!(
            outgoing_guardian(&store, GuardianKind::Paternal),
            GuardianRecord::not_informed()
        );
    }
}
