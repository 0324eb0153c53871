//! Field catalogue and validators.
//!
//! Every input of the wizard is a [`Field`]. A field knows its label, the rule
//! it is validated with, the mask applied while typing, the options offered
//! when it is a choice, and which other field gates it when it is conditional.
//! [`validate`] is a pure function of the field, the raw value and a
//! [`ValidationContext`].

use super::mask::{digit_count, Mask};
use super::records::{
    BloodType, ChoiceOption, EnrollmentType, HouseholdRecord, Race, Sex, Shift, YesNo,
};
use chrono::{Datelike, NaiveDate};
use regex::Regex;
use std::sync::OnceLock;

pub const MSG_REQUIRED: &str = "Campo obrigatório";
pub const MSG_SELECT: &str = "Selecione uma opção";
pub const MSG_UNKNOWN_OPTION: &str = "Opção inválida";
pub const MSG_CPF: &str = "CPF inválido";
pub const MSG_GUARDIAN_CPF: &str = "CPF do responsável inválido";
pub const MSG_RG: &str = "RG inválido";
pub const MSG_CEP: &str = "CEP inválido";
pub const MSG_DATE: &str = "Data inválida";
pub const MSG_EMAIL: &str = "E-mail inválido";
pub const MSG_PHONE: &str = "Telefone inválido";

const CPF_DIGITS: usize = 11;
const RG_DIGITS: usize = 9;
const CEP_DIGITS: usize = 8;
const PHONE_DIGITS: usize = 11;

/// Identifies every input of the wizard.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    // Student
    StudentName,
    BirthDate,
    Birthplace,
    Nationality,
    Sex,
    StudentCpf,
    StudentRg,
    Term,
    Page,
    Book,
    Registration,
    Shift,
    BloodType,
    Race,
    AcademicYear,
    // Guardian (maternal and paternal sections share these)
    GuardianName,
    GuardianPostalCode,
    GuardianPhone,
    GuardianWorkplace,
    GuardianBirthDate,
    GuardianCpf,
    GuardianRg,
    GuardianEmail,
    GuardianWorkPhone,
    GuardianStreet,
    GuardianHouseNumber,
    GuardianProfession,
    // Observations
    EnrollmentType,
    PreviousSchool,
    HasSiblings,
    SiblingNames,
    HasSpecialist,
    SpecialistDescription,
    HasAllergies,
    AllergyDescription,
    HasMedication,
    MedicationDescription,
    // Household
    Residency,
    FinancialGuardianName,
    FinancialGuardianCpf,
    FinancialGuardianPhone,
    AuthorizedPickup,
}

/// How a field's value is checked.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rule {
    Required,
    Optional,
    /// Required only while the gating field opens it.
    Conditional,
    Cpf,
    Rg,
    Cep,
    Date,
    Email,
    Phone,
    Choice,
    /// Comma-separated names, at least one non-blank.
    People,
}

impl Field {
    /// Human label shown next to the input and in aggregated error lists.
    ///
    pub fn label(self) -> &'static str {
        match self {
            Field::StudentName => "Nome",
            Field::BirthDate | Field::GuardianBirthDate => "Data de Nascimento",
            Field::Birthplace => "Naturalidade",
            Field::Nationality => "Nacionalidade",
            Field::Sex => "Sexo",
            Field::StudentCpf | Field::GuardianCpf => "CPF",
            Field::StudentRg | Field::GuardianRg => "RG",
            Field::Term => "Termo",
            Field::Page => "Folha",
            Field::Book => "Livro",
            Field::Registration => "Matrícula",
            Field::Shift => "Turno",
            Field::BloodType => "Tipo Sanguíneo",
            Field::Race => "Raça",
            Field::AcademicYear => "Ano Letivo",
            Field::GuardianName => "Nome Completo",
            Field::GuardianPostalCode => "CEP",
            Field::GuardianPhone | Field::FinancialGuardianPhone => "Telefone",
            Field::GuardianWorkplace => "Local de Trabalho",
            Field::GuardianEmail => "E-mail",
            Field::GuardianWorkPhone => "Telefone do Trabalho",
            Field::GuardianStreet => "Endereço",
            Field::GuardianHouseNumber => "Número da Casa",
            Field::GuardianProfession => "Profissão",
            Field::EnrollmentType => "Tipo de Matrícula",
            Field::PreviousSchool => "Nome da Escola Anterior",
            Field::HasSiblings => "Possui Irmãos?",
            Field::SiblingNames => "Nomes dos Irmãos",
            Field::HasSpecialist => "Acompanhamento Especializado",
            Field::SpecialistDescription => "Tipo de Acompanhamento",
            Field::HasAllergies => "Possui Alergias?",
            Field::AllergyDescription => "Descrição das Alergias",
            Field::HasMedication => "Uso de Medicamentos",
            Field::MedicationDescription => "Medicamentos em Uso",
            Field::Residency => "Reside com",
            Field::FinancialGuardianName => "Responsável Financeiro",
            Field::FinancialGuardianCpf => "CPF do Responsável",
            Field::AuthorizedPickup => "Pessoas Autorizadas para Buscar",
        }
    }

    pub fn rule(self) -> Rule {
        match self {
            Field::Birthplace
            | Field::Nationality
            | Field::GuardianWorkplace
            | Field::GuardianWorkPhone
            | Field::GuardianProfession => Rule::Optional,
            Field::StudentCpf | Field::GuardianCpf | Field::FinancialGuardianCpf => Rule::Cpf,
            Field::StudentRg | Field::GuardianRg => Rule::Rg,
            Field::GuardianPostalCode => Rule::Cep,
            Field::BirthDate | Field::GuardianBirthDate => Rule::Date,
            Field::GuardianEmail => Rule::Email,
            Field::FinancialGuardianPhone => Rule::Phone,
            Field::Sex
            | Field::Shift
            | Field::BloodType
            | Field::Race
            | Field::EnrollmentType
            | Field::HasSiblings
            | Field::HasSpecialist
            | Field::HasAllergies
            | Field::HasMedication => Rule::Choice,
            Field::PreviousSchool
            | Field::SiblingNames
            | Field::SpecialistDescription
            | Field::AllergyDescription
            | Field::MedicationDescription => Rule::Conditional,
            Field::AuthorizedPickup => Rule::People,
            _ => Rule::Required,
        }
    }

    /// Mask applied to keystrokes, if the field has a fixed display pattern.
    ///
    pub fn mask(self) -> Option<Mask> {
        match self {
            Field::StudentCpf | Field::GuardianCpf | Field::FinancialGuardianCpf => {
                Some(Mask::cpf())
            }
            Field::StudentRg | Field::GuardianRg => Some(Mask::rg()),
            Field::BirthDate | Field::GuardianBirthDate => Some(Mask::date()),
            Field::GuardianPostalCode => Some(Mask::cep()),
            Field::GuardianPhone | Field::GuardianWorkPhone | Field::FinancialGuardianPhone => {
                Some(Mask::phone())
            }
            _ => None,
        }
    }

    /// Options offered by choice fields.
    ///
    pub fn options(self) -> Option<&'static [ChoiceOption]> {
        match self {
            Field::Sex => Some(Sex::OPTIONS),
            Field::Shift => Some(Shift::OPTIONS),
            Field::BloodType => Some(BloodType::OPTIONS),
            Field::Race => Some(Race::OPTIONS),
            Field::EnrollmentType => Some(EnrollmentType::OPTIONS),
            Field::HasSiblings
            | Field::HasSpecialist
            | Field::HasAllergies
            | Field::HasMedication => Some(YesNo::OPTIONS),
            _ => None,
        }
    }

    /// The field whose answer makes this one required.
    ///
    pub fn gate(self) -> Option<Field> {
        match self {
            Field::PreviousSchool => Some(Field::EnrollmentType),
            Field::SiblingNames => Some(Field::HasSiblings),
            Field::SpecialistDescription => Some(Field::HasSpecialist),
            Field::AllergyDescription => Some(Field::HasAllergies),
            Field::MedicationDescription => Some(Field::HasMedication),
            _ => None,
        }
    }

    /// Fields gated by this one.
    ///
    pub fn dependents(self) -> &'static [Field] {
        match self {
            Field::EnrollmentType => &[Field::PreviousSchool],
            Field::HasSiblings => &[Field::SiblingNames],
            Field::HasSpecialist => &[Field::SpecialistDescription],
            Field::HasAllergies => &[Field::AllergyDescription],
            Field::HasMedication => &[Field::MedicationDescription],
            _ => &[],
        }
    }

    /// Whether the gating field's current value opens this field.
    ///
    /// Fields without a gate are always open.
    ///
    pub fn is_opened_by(self, gate_value: &str) -> bool {
        match self.gate() {
            None => true,
            Some(Field::EnrollmentType) => EnrollmentType::from_value(gate_value)
                .map(|t| t.is_transfer())
                .unwrap_or(false),
            Some(_) => YesNo::from_value(gate_value)
                .map(|answer| answer.is_yes())
                .unwrap_or(false),
        }
    }

    /// Message shown when a required value is missing.
    ///
    pub fn required_message(self) -> &'static str {
        match self {
            Field::EnrollmentType => "Selecione o tipo de matrícula",
            Field::PreviousSchool => "Informe o nome da escola anterior",
            Field::SiblingNames => "Informe os nomes dos irmãos",
            Field::SpecialistDescription => "Informe o tipo de acompanhamento",
            Field::AllergyDescription => "Descreva as alergias",
            Field::MedicationDescription => "Informe os medicamentos",
            Field::Residency => "Campo \"Reside com\" é obrigatório",
            Field::FinancialGuardianName => "Nome do responsável é obrigatório",
            Field::AuthorizedPickup => "Informe as pessoas autorizadas",
            _ if self.rule() == Rule::Choice => MSG_SELECT,
            _ => MSG_REQUIRED,
        }
    }
}

/// Flags that change which checks apply to a field.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ValidationContext {
    /// False for a switched-off guardian section: nothing is checked.
    pub section_active: bool,
    /// For conditional fields, whether the gating answer requires a value.
    pub gate_open: bool,
}

impl ValidationContext {
    pub fn active() -> Self {
        ValidationContext {
            section_active: true,
            gate_open: true,
        }
    }

    pub fn inactive() -> Self {
        ValidationContext {
            section_active: false,
            gate_open: false,
        }
    }

    pub fn with_gate(self, gate_open: bool) -> Self {
        ValidationContext { gate_open, ..self }
    }
}

impl Default for ValidationContext {
    fn default() -> Self {
        ValidationContext::active()
    }
}

/// Validate a raw value. Returns the error message, or `None` when valid.
///
pub fn validate(field: Field, value: &str, context: ValidationContext) -> Option<&'static str> {
    if !context.section_active {
        return None;
    }
    let blank = value.trim().is_empty();
    match field.rule() {
        Rule::Optional => None,
        Rule::Required => blank.then(|| field.required_message()),
        Rule::Conditional => (context.gate_open && blank).then(|| field.required_message()),
        Rule::Cpf => (digit_count(value) != CPF_DIGITS).then_some(match field {
            Field::FinancialGuardianCpf => MSG_GUARDIAN_CPF,
            _ => MSG_CPF,
        }),
        Rule::Rg => (digit_count(value) != RG_DIGITS).then_some(MSG_RG),
        Rule::Cep => (digit_count(value) != CEP_DIGITS).then_some(MSG_CEP),
        Rule::Phone => (digit_count(value) != PHONE_DIGITS).then_some(MSG_PHONE),
        Rule::Date => (!is_valid_date(value)).then_some(MSG_DATE),
        Rule::Email => {
            if blank {
                Some(MSG_REQUIRED)
            } else if !is_valid_email(value.trim()) {
                Some(MSG_EMAIL)
            } else {
                None
            }
        }
        Rule::People => HouseholdRecord::parse_people(value)
            .is_empty()
            .then(|| field.required_message()),
        Rule::Choice => {
            if blank {
                Some(field.required_message())
            } else if !is_known_option(field, value) {
                Some(MSG_UNKNOWN_OPTION)
            } else {
                None
            }
        }
    }
}

fn is_known_option(field: Field, value: &str) -> bool {
    field
        .options()
        .map(|options| options.iter().any(|o| o.value == value))
        .unwrap_or(false)
}

fn date_regex() -> Option<&'static Regex> {
    static DATE: OnceLock<Option<Regex>> = OnceLock::new();
    DATE
        .get_or_init(|| Regex::new(r"^(\d{2})/(\d{2})/(\d{4})$").ok())
        .as_ref()
}

fn email_regex() -> Option<&'static Regex> {
    static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL
        .get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok())
        .as_ref()
}

/// Whether `value` is a `DD/MM/YYYY` date that exists on the calendar.
///
/// The parsed date must reconstruct the same day, month and year, which
/// rejects values such as 31/04 or 29/02 of a non-leap year.
///
pub fn is_valid_date(value: &str) -> bool {
    let Some(caps) = date_regex().and_then(|re| re.captures(value)) else {
        return false;
    };
    let (Ok(day), Ok(month), Ok(year)) = (
        caps[1].parse::<u32>(),
        caps[2].parse::<u32>(),
        caps[3].parse::<i32>(),
    ) else {
        return false;
    };
    NaiveDate::from_ymd_opt(year, month, day)
        .map(|date| date.day() == day && date.month() == month && date.year() == year)
        .unwrap_or(false)
}

/// Simple `local@domain.tld` shape check.
///
pub fn is_valid_email(value: &str) -> bool {
    email_regex().is_some_and(|re| re.is_match(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(field: Field, value: &str) -> Option<&'static str> {
        validate(field, value, ValidationContext::active())
    }

    #[test]
    fn test_cpf_digit_count() {
        assert_eq!(check(Field::StudentCpf, "123.456.789-0"), Some("CPF inválido"));
        assert_eq!(check(Field::StudentCpf, "123.456.789-01"), None);
        assert_eq!(check(Field::StudentCpf, ""), Some(MSG_CPF));
        assert_eq!(check(Field::StudentCpf, "123.456.789-012"), Some(MSG_CPF));
    }

    #[test]
    fn test_cpf_ignores_punctuation_placement() {
        for value in ["12345678901", "1.2.3.4.5.6.7.8.9.0.1", "123-456-789/01", " 123 456 789 01 "] {
            assert_eq!(check(Field::GuardianCpf, value), None, "{}", value);
        }
        for digits in 0..=15 {
            let value = "9".repeat(digits);
            let expected = if digits == 11 { None } else { Some(MSG_CPF) };
            assert_eq!(check(Field::StudentCpf, &value), expected);
        }
    }

    #[test]
    fn test_financial_guardian_cpf_message() {
        assert_eq!(
            check(Field::FinancialGuardianCpf, "987.654.321"),
            Some("CPF do responsável inválido")
        );
        assert_eq!(check(Field::FinancialGuardianCpf, "987.654.321-00"), None);
        assert_eq!(check(Field::GuardianCpf, "987.654.321"), Some(MSG_CPF));
    }

    #[test]
    fn test_authorized_pickup_needs_a_name() {
        let expected = Some("Informe as pessoas autorizadas");
        assert_eq!(check(Field::AuthorizedPickup, ""), expected);
        assert_eq!(check(Field::AuthorizedPickup, " , "), expected);
        assert_eq!(check(Field::AuthorizedPickup, ",,"), expected);
        assert_eq!(check(Field::AuthorizedPickup, " , Ana Souza"), None);
    }

    #[test]
    fn test_rg_and_cep_digit_counts() {
        assert_eq!(check(Field::StudentRg, "12.345.678-9"), None);
        assert_eq!(check(Field::StudentRg, "12.345.678"), Some(MSG_RG));
        assert_eq!(check(Field::GuardianPostalCode, "25950-000"), None);
        assert_eq!(check(Field::GuardianPostalCode, "25950-00"), Some(MSG_CEP));
    }

    #[test]
    fn test_dates_must_exist_on_calendar() {
        assert_eq!(check(Field::BirthDate, "31/02/2024"), Some(MSG_DATE));
        assert_eq!(check(Field::BirthDate, "30/02/2023"), Some(MSG_DATE));
        assert_eq!(check(Field::BirthDate, "00/01/2020"), Some(MSG_DATE));
        assert_eq!(check(Field::BirthDate, "31/04/2020"), Some(MSG_DATE));
        assert_eq!(check(Field::BirthDate, "29/02/2024"), None);
        assert_eq!(check(Field::BirthDate, "29/02/2023"), Some(MSG_DATE));
        assert_eq!(check(Field::GuardianBirthDate, "15/08/1985"), None);
    }

    #[test]
    fn test_dates_must_match_pattern() {
        assert_eq!(check(Field::BirthDate, "1/2/2020"), Some(MSG_DATE));
        assert_eq!(check(Field::BirthDate, "01-02-2020"), Some(MSG_DATE));
        assert_eq!(check(Field::BirthDate, "01/13/2020"), Some(MSG_DATE));
        assert_eq!(check(Field::BirthDate, ""), Some(MSG_DATE));
    }

    #[test]
    fn test_required_and_optional() {
        assert_eq!(check(Field::StudentName, "   "), Some(MSG_REQUIRED));
        assert_eq!(check(Field::StudentName, "Ana"), None);
        assert_eq!(check(Field::Birthplace, ""), None);
        assert_eq!(check(Field::Nationality, ""), None);
        assert_eq!(check(Field::GuardianWorkplace, ""), None);
        assert_eq!(check(Field::GuardianWorkPhone, ""), None);
        assert_eq!(check(Field::GuardianProfession, ""), None);
        assert_eq!(check(Field::GuardianStreet, ""), Some(MSG_REQUIRED));
    }

    #[test]
    fn test_email() {
        assert_eq!(check(Field::GuardianEmail, "mae@example.com"), None);
        assert_eq!(check(Field::GuardianEmail, "mae@example"), Some(MSG_EMAIL));
        assert_eq!(check(Field::GuardianEmail, "mae example@x.com"), Some(MSG_EMAIL));
        assert_eq!(check(Field::GuardianEmail, ""), Some(MSG_REQUIRED));
    }

    #[test]
    fn test_inactive_section_skips_everything() {
        let ctx = ValidationContext::inactive();
        assert_eq!(validate(Field::GuardianEmail, "not-an-email", ctx), None);
        assert_eq!(validate(Field::GuardianCpf, "", ctx), None);
        assert_eq!(validate(Field::GuardianName, "", ctx), None);
    }

    #[test]
    fn test_choices() {
        assert_eq!(check(Field::Sex, ""), Some(MSG_SELECT));
        assert_eq!(check(Field::Sex, "F"), None);
        assert_eq!(check(Field::Sex, "Z"), Some(MSG_UNKNOWN_OPTION));
        assert_eq!(check(Field::BloodType, "B-"), None);
        assert_eq!(check(Field::EnrollmentType, ""), Some("Selecione o tipo de matrícula"));
        assert_eq!(check(Field::HasSiblings, "não"), None);
    }

    #[test]
    fn test_conditional_fields_follow_gate() {
        let open = ValidationContext::active().with_gate(true);
        let closed = ValidationContext::active().with_gate(false);
        assert_eq!(
            validate(Field::PreviousSchool, "", open),
            Some("Informe o nome da escola anterior")
        );
        assert_eq!(validate(Field::PreviousSchool, "", closed), None);
        assert_eq!(validate(Field::SiblingNames, "João", open), None);
    }

    #[test]
    fn test_gates() {
        assert!(Field::PreviousSchool.is_opened_by("transferencia_particular"));
        assert!(Field::PreviousSchool.is_opened_by("transferencia_municipal_estadual"));
        assert!(!Field::PreviousSchool.is_opened_by("inicial"));
        assert!(Field::AllergyDescription.is_opened_by("sim"));
        assert!(!Field::AllergyDescription.is_opened_by("não"));
        assert!(!Field::AllergyDescription.is_opened_by(""));
        assert!(Field::StudentName.is_opened_by(""));
        for gate in [Field::EnrollmentType, Field::HasSiblings, Field::HasMedication] {
            for dependent in gate.dependents() {
                assert_eq!(dependent.gate(), Some(gate));
            }
        }
    }

    #[test]
    fn test_phone() {
        assert_eq!(check(Field::FinancialGuardianPhone, "(21) 98765-4321"), None);
        assert_eq!(check(Field::FinancialGuardianPhone, "(21) 8765-4321"), Some(MSG_PHONE));
    }

    #[test]
    fn test_masks_assigned() {
        assert_eq!(Field::StudentCpf.mask().map(|m| m.pattern()), Some("000.000.000-00"));
        assert_eq!(Field::GuardianPostalCode.mask().map(|m| m.pattern()), Some("00000-000"));
        assert!(Field::StudentName.mask().is_none());
    }
}
