//! Step form controllers.
//!
//! A [`StepForm`] owns one step's draft and drives it through
//! `Editing → Validating → Blocked | Advancing`. What differs between steps
//! (their fields, how a record is built and where it is stored) lives in the
//! [`Step`] implementations at the bottom of this module.

use super::debounce::Debouncer;
use super::error::WizardError;
use super::records::{
    self, GuardianKind, GuardianRecord, HouseholdRecord, ObservationsRecord, StudentRecord,
};
use super::store::WizardStore;
use super::validators::{validate, Field, ValidationContext};
use log::*;
use std::collections::BTreeMap;
use std::fmt;
use std::time::{Duration, Instant};

/// Message shown when a valid step cannot be promoted into the store.
///
pub const ADVANCE_FAILED: &str = "Ocorreu um erro ao tentar avançar para a próxima tela";

/// Identifies the wizard steps.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StepKind {
    Student,
    MaternalGuardian,
    PaternalGuardian,
    Observations,
    Household,
}

impl StepKind {
    pub fn title(&self) -> &'static str {
        match self {
            StepKind::Student => "Dados do Aluno",
            StepKind::MaternalGuardian => "Responsável Materno",
            StepKind::PaternalGuardian => "Responsável Paterno",
            StepKind::Observations => "Observações",
            StepKind::Household => "Composição Familiar",
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Field values typed so far for one step.
///
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Draft {
    values: BTreeMap<Field, String>,
}

impl Draft {
    pub fn get(&self, field: Field) -> &str {
        self.values.get(&field).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, field: Field, value: String) {
        self.values.insert(field, value);
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.values.values().all(|v| v.is_empty())
    }

    /// Trimmed text value.
    ///
    pub fn text(&self, field: Field) -> String {
        self.get(field).trim().to_string()
    }

    /// Trimmed text value, or `None` unless the field's gate is open.
    ///
    pub fn gated_text(&self, field: Field) -> Option<String> {
        self.is_open(field).then(|| self.text(field))
    }

    /// Whether the field is open given its gating field's current answer.
    ///
    pub fn is_open(&self, field: Field) -> bool {
        match field.gate() {
            Some(gate) => field.is_opened_by(self.get(gate)),
            None => true,
        }
    }

    pub fn context(&self, field: Field, section_active: bool) -> ValidationContext {
        let context = if section_active {
            ValidationContext::active()
        } else {
            ValidationContext::inactive()
        };
        context.with_gate(self.is_open(field))
    }

    fn choice<T>(&self, field: Field, parse: impl Fn(&str) -> Option<T>) -> Result<T, WizardError> {
        let value = self.get(field);
        parse(value).ok_or_else(|| WizardError::InvalidChoice {
            field,
            value: value.to_string(),
        })
    }
}

/// One missing or invalid field in an aggregated report.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldIssue {
    pub field: Field,
    pub label: &'static str,
    pub message: &'static str,
}

/// Every missing or invalid field of a step, in display order.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepReport {
    pub step: StepKind,
    pub issues: Vec<FieldIssue>,
}

impl StepReport {
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn contains_message(&self, message: &str) -> bool {
        self.issues.iter().any(|issue| issue.message == message)
    }

    /// Text for the blocking dialog.
    ///
    pub fn summary(&self) -> String {
        let lines: Vec<String> = self
            .issues
            .iter()
            .map(|issue| format!("• {}: {}", issue.label, issue.message))
            .collect();
        format!(
            "Para continuar, corrija os seguintes campos:\n\n{}",
            lines.join("\n")
        )
    }
}

/// Controller states.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepPhase {
    Editing,
    Validating,
    Blocked(StepReport),
    Advancing,
    Failed(String),
}

/// Result of pressing "next" on a step.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    Advance,
    Blocked(StepReport),
    Failed(String),
}

/// What distinguishes one wizard step from another.
///
pub trait Step {
    type Record;

    fn kind(&self) -> StepKind;

    /// Fields in display order.
    fn fields(&self) -> &'static [Field];

    /// Whether the step has a "has guardian" style switch.
    fn has_toggle(&self) -> bool {
        false
    }

    /// Record stored when the section is switched off.
    fn absent(&self) -> Option<Self::Record> {
        None
    }

    fn build(&self, draft: &Draft) -> Result<Self::Record, WizardError>;

    fn promote(&self, record: Self::Record, store: &mut WizardStore) -> Result<(), WizardError>;
}

/// Object-safe view of a step form, used by the wizard and the UI to drive
/// whichever step is current.
///
pub trait FormView {
    fn kind(&self) -> StepKind;
    fn fields(&self) -> &'static [Field];
    /// Fields to display: conditional fields only while their gate is open,
    /// nothing while the section is switched off.
    fn visible_fields(&self) -> Vec<Field>;
    fn value(&self, field: Field) -> &str;
    fn error(&self, field: Field) -> Option<&'static str>;
    fn phase(&self) -> &StepPhase;
    fn has_toggle(&self) -> bool;
    fn section_active(&self) -> bool;

    /// Record a new value (masked when the field has a mask) and schedule a
    /// debounced validation of that field only.
    fn edit(&mut self, field: Field, value: &str, now: Instant);

    /// Run debounced validations whose delay has elapsed.
    fn tick(&mut self, now: Instant);

    /// Run every pending debounced validation immediately.
    fn flush(&mut self);

    /// Switch the section on or off. Switching off resets the draft and
    /// overwrites the store entry with the absent record right away.
    fn set_section_active(
        &mut self,
        active: bool,
        store: &mut WizardStore,
    ) -> Result<(), WizardError>;

    /// Validate the whole step and, when valid, promote it into the store.
    fn submit(&mut self, store: &mut WizardStore) -> StepOutcome;

    /// Leave `Blocked`/`Failed` and return to editing.
    fn retry(&mut self);

    /// Discard the step's draft.
    fn cancel(&mut self);
}

/// Controller for one wizard step.
///
#[derive(Debug)]
pub struct StepForm<S: Step> {
    step: S,
    draft: Draft,
    errors: BTreeMap<Field, &'static str>,
    debouncer: Debouncer<Field, String>,
    phase: StepPhase,
    section_active: bool,
    validations_run: usize,
}

impl<S: Step> StepForm<S> {
    /// Return a new form. Steps with a section switch start switched off.
    ///
    pub fn new(step: S, debounce: Duration) -> Self {
        let section_active = !step.has_toggle();
        StepForm {
            step,
            draft: Draft::default(),
            errors: BTreeMap::new(),
            debouncer: Debouncer::new(debounce),
            phase: StepPhase::Editing,
            section_active,
            validations_run: 0,
        }
    }

    pub fn step(&self) -> &S {
        &self.step
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn errors(&self) -> &BTreeMap<Field, &'static str> {
        &self.errors
    }

    /// Number of single-field validations run so far (debounced or flushed).
    ///
    pub fn validations_run(&self) -> usize {
        self.validations_run
    }

    pub fn has_pending_validation(&self, field: Field) -> bool {
        self.debouncer.is_pending(field)
    }

    fn run_validation(&mut self, field: Field, value: &str) {
        self.validations_run += 1;
        let context = self.draft.context(field, self.section_active);
        match validate(field, value, context) {
            Some(message) => {
                self.errors.insert(field, message);
            }
            None => {
                self.errors.remove(&field);
            }
        }
    }

    /// Re-derive every field's error from the current draft.
    ///
    fn evaluate(&mut self) -> StepReport {
        let mut errors = BTreeMap::new();
        let mut issues = Vec::new();
        for field in self.step.fields() {
            let context = self.draft.context(*field, self.section_active);
            if let Some(message) = validate(*field, self.draft.get(*field), context) {
                errors.insert(*field, message);
                issues.push(FieldIssue {
                    field: *field,
                    label: field.label(),
                    message,
                });
            }
        }
        self.errors = errors;
        StepReport {
            step: self.step.kind(),
            issues,
        }
    }

    fn reset(&mut self) {
        self.draft.clear();
        self.errors.clear();
        self.debouncer.cancel_all();
        self.phase = StepPhase::Editing;
    }

    fn finish(&mut self, result: Result<(), WizardError>) -> StepOutcome {
        match result {
            Ok(()) => {
                info!("Step '{}' stored, advancing.", self.step.kind());
                self.phase = StepPhase::Advancing;
                StepOutcome::Advance
            }
            Err(e) => {
                error!("Failed to store step '{}': {}", self.step.kind(), e);
                self.phase = StepPhase::Failed(ADVANCE_FAILED.to_string());
                StepOutcome::Failed(ADVANCE_FAILED.to_string())
            }
        }
    }
}

impl<S: Step> FormView for StepForm<S> {
    fn kind(&self) -> StepKind {
        self.step.kind()
    }

    fn fields(&self) -> &'static [Field] {
        self.step.fields()
    }

    fn visible_fields(&self) -> Vec<Field> {
        if !self.section_active {
            return Vec::new();
        }
        self.step
            .fields()
            .iter()
            .copied()
            .filter(|field| self.draft.is_open(*field))
            .collect()
    }

    fn value(&self, field: Field) -> &str {
        self.draft.get(field)
    }

    fn error(&self, field: Field) -> Option<&'static str> {
        self.errors.get(&field).copied()
    }

    fn phase(&self) -> &StepPhase {
        &self.phase
    }

    fn has_toggle(&self) -> bool {
        self.step.has_toggle()
    }

    fn section_active(&self) -> bool {
        self.section_active
    }

    fn edit(&mut self, field: Field, value: &str, now: Instant) {
        let value = match field.mask() {
            Some(mask) => mask.apply(value),
            None => value.to_string(),
        };
        self.draft.set(field, value.clone());
        if !matches!(self.phase, StepPhase::Editing) {
            self.phase = StepPhase::Editing;
        }
        for dependent in field.dependents() {
            if !self.draft.is_open(*dependent) {
                self.errors.remove(dependent);
            }
        }
        self.debouncer.schedule(field, value, now);
    }

    fn tick(&mut self, now: Instant) {
        for (field, value) in self.debouncer.due(now) {
            self.run_validation(field, &value);
        }
    }

    fn flush(&mut self) {
        for (field, value) in self.debouncer.flush() {
            self.run_validation(field, &value);
        }
    }

    fn set_section_active(
        &mut self,
        active: bool,
        store: &mut WizardStore,
    ) -> Result<(), WizardError> {
        if !self.step.has_toggle() {
            return Ok(());
        }
        debug!(
            "Section '{}' switched {}.",
            self.step.kind(),
            if active { "on" } else { "off" }
        );
        self.section_active = active;
        if !active {
            self.reset();
            if let Some(absent) = self.step.absent() {
                self.step.promote(absent, store)?;
            }
        }
        Ok(())
    }

    fn submit(&mut self, store: &mut WizardStore) -> StepOutcome {
        self.phase = StepPhase::Validating;
        self.flush();

        if !self.section_active {
            let result = match self.step.absent() {
                Some(absent) => self.step.promote(absent, store),
                None => Ok(()),
            };
            return self.finish(result);
        }

        let report = self.evaluate();
        if !report.is_empty() {
            debug!(
                "Step '{}' blocked with {} issue(s).",
                self.step.kind(),
                report.issues.len()
            );
            self.phase = StepPhase::Blocked(report.clone());
            return StepOutcome::Blocked(report);
        }

        let result = self
            .step
            .build(&self.draft)
            .and_then(|record| self.step.promote(record, store));
        self.finish(result)
    }

    fn retry(&mut self) {
        self.phase = StepPhase::Editing;
    }

    fn cancel(&mut self) {
        debug!("Discarding draft of step '{}'.", self.step.kind());
        self.reset();
    }
}

const STUDENT_FIELDS: &[Field] = &[
    Field::StudentName,
    Field::BirthDate,
    Field::Birthplace,
    Field::Nationality,
    Field::Sex,
    Field::StudentCpf,
    Field::StudentRg,
    Field::Term,
    Field::Page,
    Field::Book,
    Field::Registration,
    Field::Shift,
    Field::BloodType,
    Field::Race,
    Field::AcademicYear,
];

const GUARDIAN_FIELDS: &[Field] = &[
    Field::GuardianName,
    Field::GuardianPostalCode,
    Field::GuardianPhone,
    Field::GuardianWorkplace,
    Field::GuardianBirthDate,
    Field::GuardianCpf,
    Field::GuardianEmail,
    Field::GuardianWorkPhone,
    Field::GuardianStreet,
    Field::GuardianHouseNumber,
    Field::GuardianRg,
    Field::GuardianProfession,
];

const OBSERVATIONS_FIELDS: &[Field] = &[
    Field::EnrollmentType,
    Field::PreviousSchool,
    Field::HasSiblings,
    Field::SiblingNames,
    Field::HasSpecialist,
    Field::SpecialistDescription,
    Field::HasAllergies,
    Field::AllergyDescription,
    Field::HasMedication,
    Field::MedicationDescription,
];

const HOUSEHOLD_FIELDS: &[Field] = &[
    Field::Residency,
    Field::FinancialGuardianName,
    Field::FinancialGuardianCpf,
    Field::FinancialGuardianPhone,
    Field::AuthorizedPickup,
];

#[derive(Clone, Copy, Debug, Default)]
pub struct StudentStep;

impl Step for StudentStep {
    type Record = StudentRecord;

    fn kind(&self) -> StepKind {
        StepKind::Student
    }

    fn fields(&self) -> &'static [Field] {
        STUDENT_FIELDS
    }

    fn build(&self, draft: &Draft) -> Result<StudentRecord, WizardError> {
        Ok(StudentRecord {
            name: draft.text(Field::StudentName),
            birth_date: draft.text(Field::BirthDate),
            birthplace: draft.text(Field::Birthplace),
            nationality: draft.text(Field::Nationality),
            cpf: draft.text(Field::StudentCpf),
            rg: draft.text(Field::StudentRg),
            term: draft.text(Field::Term),
            page: draft.text(Field::Page),
            book: draft.text(Field::Book),
            registration: draft.text(Field::Registration),
            sex: draft.choice(Field::Sex, records::Sex::from_value)?,
            shift: draft.choice(Field::Shift, records::Shift::from_value)?,
            blood_type: draft.choice(Field::BloodType, records::BloodType::from_value)?,
            race: draft.choice(Field::Race, records::Race::from_value)?,
            academic_year: draft.text(Field::AcademicYear),
        })
    }

    fn promote(&self, record: StudentRecord, store: &mut WizardStore) -> Result<(), WizardError> {
        store.set_student(record);
        Ok(())
    }
}

#[derive(Clone, Copy, Debug)]
pub struct GuardianStep {
    kind: GuardianKind,
}

impl GuardianStep {
    pub fn new(kind: GuardianKind) -> Self {
        GuardianStep { kind }
    }

    pub fn guardian_kind(&self) -> GuardianKind {
        self.kind
    }
}

impl Step for GuardianStep {
    type Record = GuardianRecord;

    fn kind(&self) -> StepKind {
        match self.kind {
            GuardianKind::Maternal => StepKind::MaternalGuardian,
            GuardianKind::Paternal => StepKind::PaternalGuardian,
        }
    }

    fn fields(&self) -> &'static [Field] {
        GUARDIAN_FIELDS
    }

    fn has_toggle(&self) -> bool {
        true
    }

    fn absent(&self) -> Option<GuardianRecord> {
        Some(GuardianRecord::absent())
    }

    fn build(&self, draft: &Draft) -> Result<GuardianRecord, WizardError> {
        Ok(GuardianRecord {
            name: draft.text(Field::GuardianName),
            postal_code: draft.text(Field::GuardianPostalCode),
            phone: draft.text(Field::GuardianPhone),
            workplace: draft.text(Field::GuardianWorkplace),
            birth_date: draft.text(Field::GuardianBirthDate),
            cpf: draft.text(Field::GuardianCpf),
            rg: draft.text(Field::GuardianRg),
            email: draft.text(Field::GuardianEmail),
            work_phone: draft.text(Field::GuardianWorkPhone),
            street: draft.text(Field::GuardianStreet),
            house_number: draft.text(Field::GuardianHouseNumber),
            profession: draft.text(Field::GuardianProfession),
        })
    }

    fn promote(&self, record: GuardianRecord, store: &mut WizardStore) -> Result<(), WizardError> {
        store.set_guardian(self.kind, record);
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ObservationsStep;

impl Step for ObservationsStep {
    type Record = ObservationsRecord;

    fn kind(&self) -> StepKind {
        StepKind::Observations
    }

    fn fields(&self) -> &'static [Field] {
        OBSERVATIONS_FIELDS
    }

    fn build(&self, draft: &Draft) -> Result<ObservationsRecord, WizardError> {
        Ok(ObservationsRecord {
            enrollment_type: draft.choice(Field::EnrollmentType, records::EnrollmentType::from_value)?,
            previous_school: draft.gated_text(Field::PreviousSchool),
            has_siblings: draft.choice(Field::HasSiblings, records::YesNo::from_value)?,
            sibling_names: draft.gated_text(Field::SiblingNames),
            has_specialist: draft.choice(Field::HasSpecialist, records::YesNo::from_value)?,
            specialist: draft.gated_text(Field::SpecialistDescription),
            has_allergies: draft.choice(Field::HasAllergies, records::YesNo::from_value)?,
            allergies: draft.gated_text(Field::AllergyDescription),
            has_medication: draft.choice(Field::HasMedication, records::YesNo::from_value)?,
            medication: draft.gated_text(Field::MedicationDescription),
        })
    }

    fn promote(&self, record: ObservationsRecord, store: &mut WizardStore) -> Result<(), WizardError> {
        store.set_observations(record);
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct HouseholdStep;

impl Step for HouseholdStep {
    type Record = HouseholdRecord;

    fn kind(&self) -> StepKind {
        StepKind::Household
    }

    fn fields(&self) -> &'static [Field] {
        HOUSEHOLD_FIELDS
    }

    fn build(&self, draft: &Draft) -> Result<HouseholdRecord, WizardError> {
        Ok(HouseholdRecord {
            residency: draft.text(Field::Residency),
            financial_guardian_name: draft.text(Field::FinancialGuardianName),
            financial_guardian_cpf: draft.text(Field::FinancialGuardianCpf),
            financial_guardian_phone: draft.text(Field::FinancialGuardianPhone),
            authorized_pickup: HouseholdRecord::parse_people(draft.get(Field::AuthorizedPickup)),
        })
    }

    /// The household sub-step completes the observations step, so it cannot
    /// be stored before it.
    fn promote(&self, record: HouseholdRecord, store: &mut WizardStore) -> Result<(), WizardError> {
        if store.observations().is_none() {
            return Err(WizardError::MissingStep(StepKind::Observations));
        }
        store.set_household(record);
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::wizard::records::{EnrollmentType, Sex, YesNo};
    use crate::wizard::validators::{MSG_CPF, MSG_EMAIL};

    pub const DEBOUNCE: Duration = Duration::from_millis(300);

    pub fn fill(form: &mut dyn FormView, values: &[(Field, &str)], now: Instant) {
        for (field, value) in values {
            form.edit(*field, value, now);
        }
    }

    pub fn valid_student() -> Vec<(Field, &'static str)> {
        vec![
            (Field::StudentName, "Maria da Silva"),
            (Field::BirthDate, "29022016"),
            (Field::Sex, "F"),
            (Field::StudentCpf, "12345678901"),
            (Field::StudentRg, "123456789"),
            (Field::Term, "12"),
            (Field::Page, "34"),
            (Field::Book, "5"),
            (Field::Registration, "6789"),
            (Field::Shift, "Manhã"),
            (Field::BloodType, "O+"),
            (Field::Race, "Parda"),
            (Field::AcademicYear, "2025"),
        ]
    }

    pub fn valid_guardian() -> Vec<(Field, &'static str)> {
        vec![
            (Field::GuardianName, "Ana da Silva"),
            (Field::GuardianPostalCode, "25950000"),
            (Field::GuardianPhone, "21987654321"),
            (Field::GuardianBirthDate, "15081985"),
            (Field::GuardianCpf, "98765432100"),
            (Field::GuardianEmail, "ana@example.com"),
            (Field::GuardianStreet, "Rua das Flores"),
            (Field::GuardianHouseNumber, "42"),
            (Field::GuardianRg, "987654321"),
        ]
    }

    pub fn initial_observations() -> Vec<(Field, &'static str)> {
        vec![
            (Field::EnrollmentType, "inicial"),
            (Field::HasSiblings, "não"),
            (Field::HasSpecialist, "não"),
            (Field::HasAllergies, "não"),
            (Field::HasMedication, "não"),
        ]
    }

    pub fn valid_household() -> Vec<(Field, &'static str)> {
        vec![
            (Field::Residency, "Mãe e avó"),
            (Field::FinancialGuardianName, "Ana da Silva"),
            (Field::FinancialGuardianCpf, "98765432100"),
            (Field::FinancialGuardianPhone, "21987654321"),
            (Field::AuthorizedPickup, "Ana da Silva, Joana Souza"),
        ]
    }

    #[test]
    fn test_student_submit_stores_record() {
        let mut store = WizardStore::new();
        let mut form = StepForm::new(StudentStep, DEBOUNCE);
        fill(&mut form, &valid_student(), Instant::now());

        assert_eq!(form.submit(&mut store), StepOutcome::Advance);
        assert_eq!(form.phase(), &StepPhase::Advancing);
        let student = store.student().expect("student stored");
        assert_eq!(student.sex, Sex::Female);
        assert_eq!(student.birth_date, "29/02/2016");
        assert_eq!(student.cpf, "123.456.789-01");
        assert!(student.birthplace.is_empty());
    }

    #[test]
    fn test_submitting_twice_stores_same_record() {
        let mut store = WizardStore::new();
        let mut form = StepForm::new(StudentStep, DEBOUNCE);
        fill(&mut form, &valid_student(), Instant::now());

        assert_eq!(form.submit(&mut store), StepOutcome::Advance);
        let first = store.get_all();
        assert_eq!(form.submit(&mut store), StepOutcome::Advance);
        assert_eq!(store.get_all(), first);
    }

    #[test]
    fn test_empty_student_is_blocked_with_every_missing_field() {
        let mut store = WizardStore::new();
        let mut form = StepForm::new(StudentStep, DEBOUNCE);

        let StepOutcome::Blocked(report) = form.submit(&mut store) else {
            panic!("expected blocked outcome");
        };
        let fields: Vec<Field> = report.issues.iter().map(|i| i.field).collect();
        assert!(fields.contains(&Field::StudentName));
        assert!(fields.contains(&Field::Sex));
        assert!(fields.contains(&Field::AcademicYear));
        assert!(!fields.contains(&Field::Birthplace));
        assert!(!fields.contains(&Field::Nationality));
        assert!(report.summary().contains("• CPF: CPF inválido"));
        assert!(store.student().is_none());
        assert!(matches!(form.phase(), StepPhase::Blocked(_)));

        form.retry();
        assert_eq!(form.phase(), &StepPhase::Editing);
    }

    #[test]
    fn test_debounced_edits_validate_once_after_flush() {
        let mut form = StepForm::new(StudentStep, DEBOUNCE);
        let start = Instant::now();
        for (i, value) in ["1", "12", "123", "1234", "12345678901"].iter().enumerate() {
            form.edit(Field::StudentCpf, value, start + Duration::from_millis(i as u64 * 50));
        }
        assert_eq!(form.validations_run(), 0);

        form.flush();
        assert_eq!(form.validations_run(), 1);
        assert_eq!(form.error(Field::StudentCpf), None);

        form.flush();
        assert_eq!(form.validations_run(), 1);
    }

    #[test]
    fn test_tick_runs_validation_after_delay() {
        let mut form = StepForm::new(StudentStep, DEBOUNCE);
        let start = Instant::now();
        form.edit(Field::StudentCpf, "123.456.789-0", start);

        form.tick(start + Duration::from_millis(100));
        assert_eq!(form.error(Field::StudentCpf), None);
        assert!(form.has_pending_validation(Field::StudentCpf));

        form.tick(start + DEBOUNCE);
        assert_eq!(form.error(Field::StudentCpf), Some(MSG_CPF));
        assert!(!form.has_pending_validation(Field::StudentCpf));
    }

    #[test]
    fn test_cpf_error_clears_when_eleven_digits() {
        let mut form = StepForm::new(StudentStep, DEBOUNCE);
        let now = Instant::now();
        form.edit(Field::StudentCpf, "123.456.789-0", now);
        form.flush();
        assert_eq!(form.error(Field::StudentCpf), Some("CPF inválido"));

        form.edit(Field::StudentCpf, "123.456.789-01", now);
        form.flush();
        assert_eq!(form.error(Field::StudentCpf), None);
    }

    #[test]
    fn test_masks_are_applied_on_edit() {
        let mut form = StepForm::new(StudentStep, DEBOUNCE);
        form.edit(Field::BirthDate, "01a022020", Instant::now());
        assert_eq!(form.value(Field::BirthDate), "01/02/2020");
        form.edit(Field::StudentName, "Ana 1", Instant::now());
        assert_eq!(form.value(Field::StudentName), "Ana 1");
    }

    #[test]
    fn test_guardian_starts_switched_off_and_skips_validation() {
        let mut store = WizardStore::new();
        let mut form = StepForm::new(GuardianStep::new(GuardianKind::Maternal), DEBOUNCE);
        assert!(!form.section_active());
        assert!(form.visible_fields().is_empty());

        assert_eq!(form.submit(&mut store), StepOutcome::Advance);
        assert_eq!(
            store.guardian(GuardianKind::Maternal),
            Some(&GuardianRecord::absent())
        );
    }

    #[test]
    fn test_toggle_off_clears_section_immediately() {
        let mut store = WizardStore::new();
        let mut form = StepForm::new(GuardianStep::new(GuardianKind::Paternal), DEBOUNCE);
        form.set_section_active(true, &mut store).unwrap();
        fill(&mut form, &valid_guardian(), Instant::now());
        assert_eq!(form.submit(&mut store), StepOutcome::Advance);
        assert!(store.guardian(GuardianKind::Paternal).unwrap().is_present());

        form.edit(Field::GuardianEmail, "broken", Instant::now());
        form.set_section_active(false, &mut store).unwrap();
        assert_eq!(
            store.guardian(GuardianKind::Paternal),
            Some(&GuardianRecord::absent())
        );
        assert!(form.draft().is_empty());
        assert!(form.errors().is_empty());
        assert!(!form.has_pending_validation(Field::GuardianEmail));

        assert_eq!(form.submit(&mut store), StepOutcome::Advance);
        assert_eq!(
            store.guardian(GuardianKind::Paternal),
            Some(&GuardianRecord::absent())
        );
    }

    #[test]
    fn test_active_guardian_requires_fields() {
        let mut store = WizardStore::new();
        let mut form = StepForm::new(GuardianStep::new(GuardianKind::Maternal), DEBOUNCE);
        form.set_section_active(true, &mut store).unwrap();
        let mut values = valid_guardian();
        values.retain(|(field, _)| *field != Field::GuardianHouseNumber);
        values.push((Field::GuardianEmail, "ana-at-example"));
        fill(&mut form, &values, Instant::now());

        let StepOutcome::Blocked(report) = form.submit(&mut store) else {
            panic!("expected blocked outcome");
        };
        assert!(report.contains_message(MSG_EMAIL));
        assert!(report
            .issues
            .iter()
            .any(|i| i.label == "Número da Casa"));
        assert!(!report
            .issues
            .iter()
            .any(|i| i.field == Field::GuardianWorkplace || i.field == Field::GuardianProfession));
        assert!(store.guardian(GuardianKind::Maternal).is_none());
    }

    #[test]
    fn test_transfer_requires_previous_school() {
        let mut store = WizardStore::new();
        let mut form = StepForm::new(ObservationsStep, DEBOUNCE);
        let mut values = initial_observations();
        values[0] = (Field::EnrollmentType, "transferencia_particular");
        fill(&mut form, &values, Instant::now());

        let StepOutcome::Blocked(report) = form.submit(&mut store) else {
            panic!("expected blocked outcome");
        };
        assert!(report.contains_message("Informe o nome da escola anterior"));
        assert!(form.visible_fields().contains(&Field::PreviousSchool));
    }

    #[test]
    fn test_observations_descriptions_follow_answers() {
        let mut store = WizardStore::new();
        let mut form = StepForm::new(ObservationsStep, DEBOUNCE);
        let now = Instant::now();
        fill(&mut form, &initial_observations(), now);
        form.edit(Field::HasAllergies, "sim", now);
        form.edit(Field::AllergyDescription, "Amendoim", now);
        form.edit(Field::SiblingNames, "ignored while closed", now);

        assert!(!form.visible_fields().contains(&Field::SiblingNames));
        assert_eq!(form.submit(&mut store), StepOutcome::Advance);
        let observations = store.observations().unwrap();
        assert_eq!(observations.enrollment_type, EnrollmentType::Initial);
        assert_eq!(observations.has_allergies, YesNo::Yes);
        assert_eq!(observations.allergies.as_deref(), Some("Amendoim"));
        assert_eq!(observations.sibling_names, None);
        assert_eq!(observations.previous_school, None);
    }

    #[test]
    fn test_closing_gate_clears_dependent_error() {
        let mut form = StepForm::new(ObservationsStep, DEBOUNCE);
        let now = Instant::now();
        form.edit(Field::HasMedication, "sim", now);
        form.edit(Field::MedicationDescription, "", now);
        form.flush();
        assert_eq!(
            form.error(Field::MedicationDescription),
            Some("Informe os medicamentos")
        );

        form.edit(Field::HasMedication, "não", now);
        assert_eq!(form.error(Field::MedicationDescription), None);
    }

    #[test]
    fn test_household_requires_observations_first() {
        let mut store = WizardStore::new();
        let mut form = StepForm::new(HouseholdStep, DEBOUNCE);
        fill(&mut form, &valid_household(), Instant::now());

        assert_eq!(
            form.submit(&mut store),
            StepOutcome::Failed(ADVANCE_FAILED.to_string())
        );
        assert!(store.household().is_none());
    }

    #[test]
    fn test_household_parses_pickup_list() {
        let mut store = WizardStore::new();
        let mut observations = StepForm::new(ObservationsStep, DEBOUNCE);
        fill(&mut observations, &initial_observations(), Instant::now());
        assert_eq!(observations.submit(&mut store), StepOutcome::Advance);

        let mut form = StepForm::new(HouseholdStep, DEBOUNCE);
        fill(&mut form, &valid_household(), Instant::now());
        assert_eq!(form.submit(&mut store), StepOutcome::Advance);
        let household = store.household().unwrap();
        assert_eq!(household.authorized_pickup.len(), 2);
        assert_eq!(household.financial_guardian_phone, "(21) 98765-4321");
    }

    #[test]
    fn test_household_blocks_separator_only_pickup() {
        let mut store = WizardStore::new();
        let mut observations = StepForm::new(ObservationsStep, DEBOUNCE);
        fill(&mut observations, &initial_observations(), Instant::now());
        assert_eq!(observations.submit(&mut store), StepOutcome::Advance);

        let mut form = StepForm::new(HouseholdStep, DEBOUNCE);
        fill(&mut form, &valid_household(), Instant::now());
        form.edit(Field::AuthorizedPickup, " , ", Instant::now());

        let StepOutcome::Blocked(report) = form.submit(&mut store) else {
            panic!("expected blocked outcome");
        };
        let fields: Vec<Field> = report.issues.iter().map(|i| i.field).collect();
        assert_eq!(fields, vec![Field::AuthorizedPickup]);
        assert!(report.summary().contains("Informe as pessoas autorizadas"));
        assert!(store.household().is_none());
    }

    #[test]
    fn test_cancel_discards_draft() {
        let mut form = StepForm::new(StudentStep, DEBOUNCE);
        fill(&mut form, &valid_student(), Instant::now());
        form.cancel();
        assert!(form.draft().is_empty());
        assert_eq!(form.validations_run(), 0);
    }
}
