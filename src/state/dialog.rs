//! Modal dialogs shown over the current screen.

/// Specifying the different dialogs.
///
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Dialog {
    /// A step could not advance; lists every field to correct
    Blocked(String),
    /// Data-use consent asked before the final submission
    Consent,
    Error(String),
    Info { title: String, body: String },
}

impl Dialog {
    pub fn title(&self) -> &str {
        match self {
            Dialog::Blocked(_) => "Campos inválidos",
            Dialog::Consent => "Uso dos dados",
            Dialog::Error(_) => "Erro",
            Dialog::Info { title, .. } => title,
        }
    }

    pub fn body(&self) -> &str {
        match self {
            Dialog::Blocked(body) | Dialog::Error(body) | Dialog::Info { body, .. } => body,
            Dialog::Consent => CONSENT_TEXT,
        }
    }

    /// Key hints shown at the bottom of the dialog.
    ///
    pub fn controls(&self) -> &'static str {
        match self {
            Dialog::Blocked(_) => "Enter: corrigir, Esc: descartar etapa",
            Dialog::Consent => "y: aceitar e enviar, n: recusar",
            Dialog::Error(_) | Dialog::Info { .. } => "Enter: fechar",
        }
    }
}

pub const CONSENT_TEXT: &str = "Autorizo o uso dos dados informados para fins de matrícula, \
conforme os termos da escola (Ctrl+T exibe o link dos termos).";
