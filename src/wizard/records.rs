//! Records captured by the wizard steps.
//!
//! Each record is built from its step's draft once the step validates, and is
//! read by the submission assembler. Choice fields are typed enums whose wire
//! value is what the enrollment API expects.

use fake::Dummy;
use serde::Serialize;

/// A selectable option: the value sent to the API and the label shown.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChoiceOption {
    pub value: &'static str,
    pub label: &'static str,
}

/// Declare a choice enum with its wire values and display labels.
///
macro_rules! choice {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => ($value:expr, $label:expr)),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Dummy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];
            pub const OPTIONS: &'static [ChoiceOption] = &[
                $(ChoiceOption { value: $value, label: $label }),+
            ];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value),+
                }
            }

            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }

            pub fn from_value(value: &str) -> Option<Self> {
                Self::ALL.iter().copied().find(|c| c.as_str() == value)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.label())
            }
        }

        impl Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }
    };
}

choice!(
    /// Student sex as offered on the enrollment form.
    Sex {
        Male => ("M", "Masculino"),
        Female => ("F", "Feminino"),
        NonBinary => ("Não-binário", "Não-binário"),
        Other => ("Outro", "Outro"),
        Undisclosed => ("Prefiro não informar", "Prefiro não informar"),
    }
);

choice!(
    /// School shift.
    Shift {
        Morning => ("Manhã", "Manhã"),
        Afternoon => ("Tarde", "Tarde"),
        FullDay => ("Integral", "Integral"),
    }
);

choice!(
    BloodType {
        APositive => ("A+", "A+"),
        ANegative => ("A-", "A-"),
        BPositive => ("B+", "B+"),
        BNegative => ("B-", "B-"),
        AbPositive => ("AB+", "AB+"),
        AbNegative => ("AB-", "AB-"),
        OPositive => ("O+", "O+"),
        ONegative => ("O-", "O-"),
    }
);

choice!(
    /// Race/ethnicity categories.
    Race {
        Yellow => ("Amarela", "Amarela"),
        White => ("Branca", "Branca"),
        Indigenous => ("Indígena", "Indígena"),
        Brown => ("Parda", "Parda"),
        Black => ("Preta", "Preta"),
    }
);

choice!(
    YesNo {
        Yes => ("sim", "Sim"),
        No => ("não", "Não"),
    }
);

choice!(
    /// How the student joins the school.
    EnrollmentType {
        Initial => ("inicial", "Inicial"),
        MunicipalTransfer => ("transferencia_municipal_estadual", "Transferência Municipal/Estadual"),
        PrivateTransfer => ("transferencia_particular", "Transferência Particular"),
    }
);

impl EnrollmentType {
    /// Transfers must name the previous school.
    ///
    pub fn is_transfer(&self) -> bool {
        matches!(
            self,
            EnrollmentType::MunicipalTransfer | EnrollmentType::PrivateTransfer
        )
    }
}

impl YesNo {
    pub fn is_yes(&self) -> bool {
        *self == YesNo::Yes
    }
}

/// Defines student data structure. Serializes to the student endpoint body.
///
#[derive(Clone, Debug, Dummy, PartialEq, Eq, Serialize)]
pub struct StudentRecord {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "dataNascimento")]
    pub birth_date: String,
    #[serde(rename = "naturalidade")]
    pub birthplace: String,
    #[serde(rename = "nacionalidade")]
    pub nationality: String,
    pub cpf: String,
    pub rg: String,
    #[serde(rename = "termo")]
    pub term: String,
    #[serde(rename = "folha")]
    pub page: String,
    #[serde(rename = "livro")]
    pub book: String,
    #[serde(rename = "matricula")]
    pub registration: String,
    #[serde(rename = "sexo")]
    pub sex: Sex,
    #[serde(rename = "turno")]
    pub shift: Shift,
    #[serde(rename = "tipoSanguineo")]
    pub blood_type: BloodType,
    #[serde(rename = "raca")]
    pub race: Race,
    #[serde(rename = "anoLetivo")]
    pub academic_year: String,
}

/// Which of the two guardian sections a record belongs to.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GuardianKind {
    Maternal,
    Paternal,
}

impl GuardianKind {
    /// Key suffix used by the guardian endpoints (`nomeMae`, `nomePai`).
    ///
    pub fn suffix(&self) -> &'static str {
        match self {
            GuardianKind::Maternal => "Mae",
            GuardianKind::Paternal => "Pai",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            GuardianKind::Maternal => "Responsável Materno",
            GuardianKind::Paternal => "Responsável Paterno",
        }
    }
}

/// Name given to a guardian the family chose not to inform.
///
pub const NOT_INFORMED: &str = "Não informado";

/// Defines guardian data structure, shared by both guardian sections.
///
/// The all-empty value (`Default`) is the absent representation written to
/// the store when a section is switched off.
///
#[derive(Clone, Debug, Default, Dummy, PartialEq, Eq)]
pub struct GuardianRecord {
    pub name: String,
    pub postal_code: String,
    pub phone: String,
    pub workplace: String,
    pub birth_date: String,
    pub cpf: String,
    pub rg: String,
    pub email: String,
    pub work_phone: String,
    pub street: String,
    pub house_number: String,
    pub profession: String,
}

impl GuardianRecord {
    /// The absent representation.
    ///
    pub fn absent() -> Self {
        GuardianRecord::default()
    }

    /// A guardian is present when at least one field carries data.
    ///
    pub fn is_present(&self) -> bool {
        self.fields().iter().any(|(_, v)| !v.trim().is_empty())
    }

    /// Record transmitted in place of an absent guardian.
    ///
    pub fn not_informed() -> Self {
        GuardianRecord {
            name: NOT_INFORMED.to_string(),
            ..GuardianRecord::default()
        }
    }

    /// Field values keyed by their API stem (before the guardian suffix).
    ///
    pub fn fields(&self) -> [(&'static str, &str); 12] {
        [
            ("nome", self.name.as_str()),
            ("cep", self.postal_code.as_str()),
            ("telefone", self.phone.as_str()),
            ("trabalho", self.workplace.as_str()),
            ("nascimento", self.birth_date.as_str()),
            ("cpf", self.cpf.as_str()),
            ("rg", self.rg.as_str()),
            ("email", self.email.as_str()),
            ("telefoneTrabalho", self.work_phone.as_str()),
            ("endereco", self.street.as_str()),
            ("numeroCasa", self.house_number.as_str()),
            ("profissao", self.profession.as_str()),
        ]
    }
}

/// Supplemental observations captured by the first observations sub-step.
///
/// Descriptions are `None` unless their gating answer is "sim" (or, for the
/// previous school, unless the enrollment is a transfer).
///
#[derive(Clone, Debug, Dummy, PartialEq, Eq)]
pub struct ObservationsRecord {
    pub enrollment_type: EnrollmentType,
    pub previous_school: Option<String>,
    pub has_siblings: YesNo,
    pub sibling_names: Option<String>,
    pub has_specialist: YesNo,
    pub specialist: Option<String>,
    pub has_allergies: YesNo,
    pub allergies: Option<String>,
    pub has_medication: YesNo,
    pub medication: Option<String>,
}

/// Household and pickup data captured by the final sub-step.
///
#[derive(Clone, Debug, Default, Dummy, PartialEq, Eq)]
pub struct HouseholdRecord {
    pub residency: String,
    pub financial_guardian_name: String,
    pub financial_guardian_cpf: String,
    pub financial_guardian_phone: String,
    pub authorized_pickup: Vec<String>,
}

impl HouseholdRecord {
    /// Split a comma separated list of names, dropping blanks.
    ///
    pub fn parse_people(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn authorized_pickup_text(&self) -> String {
        self.authorized_pickup.join(", ")
    }
}
