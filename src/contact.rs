//! Mail and link side channels.
//!
//! Nothing here sends anything: each function returns the link the user
//! opens in their own mail client or browser.

use reqwest::Url;

pub const DEFAULT_CONTACT_EMAIL: &str = "vanessalimapsicopedagoga@bol.com.br";
pub const DEFAULT_TERMS_URL: &str = "https://termos.tiiny.site";

const DOCUMENTS_SUBJECT: &str = "Envio de Documentos";
const DOCUMENTS_BODY: &str =
    "Segue em anexo os documentos necessários para matrícula de (Nome Completo do Aluno)";
const CHANGE_REQUEST_SUBJECT: &str = "Solicitação de Alteração de Dados";
const CHANGE_REQUEST_SIGNATURE: &str = "\n\nEnviado via App Escola";

/// Errors building a contact link.
#[derive(Debug, thiserror::Error)]
pub enum ContactError {
    /// The change request text is blank
    #[error("Descreva a alteração solicitada")]
    EmptyRequest,

    /// The configured address or URL does not form a valid link
    #[error("Invalid link '{link}': {message}")]
    InvalidLink { link: String, message: String },
}

/// `mailto:` link for sending the enrollment documents.
///
pub fn documents_mailto(address: &str, student_name: Option<&str>) -> Result<Url, ContactError> {
    let name = student_name.map(str::trim).unwrap_or_default();
    let (subject, body) = if name.is_empty() {
        (DOCUMENTS_SUBJECT.to_string(), DOCUMENTS_BODY.to_string())
    } else {
        (
            format!("{} - {}", DOCUMENTS_SUBJECT, name),
            format!("{} {}", DOCUMENTS_BODY, name),
        )
    };
    mailto(address, &subject, &body)
}

/// `mailto:` link carrying a data change request.
///
pub fn change_request_mailto(address: &str, request: &str) -> Result<Url, ContactError> {
    let request = request.trim();
    if request.is_empty() {
        return Err(ContactError::EmptyRequest);
    }
    let body = format!("{}{}", request, CHANGE_REQUEST_SIGNATURE);
    mailto(address, CHANGE_REQUEST_SUBJECT, &body)
}

/// Link to the school terms document.
///
pub fn terms_link(terms_url: &str) -> Result<Url, ContactError> {
    parse(terms_url.trim().to_string())
}

fn mailto(address: &str, subject: &str, body: &str) -> Result<Url, ContactError> {
    parse(format!(
        "mailto:{}?subject={}&body={}",
        address.trim(),
        encode_component(subject),
        encode_component(body)
    ))
}

fn parse(link: String) -> Result<Url, ContactError> {
    Url::parse(&link).map_err(|e| ContactError::InvalidLink {
        message: e.to_string(),
        link,
    })
}

/// Percent-encode everything except RFC 3986 unreserved characters, so
/// spaces become `%20` as mail clients expect in `mailto:` headers.
///
fn encode_component(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char)
            }
            _ => encoded.push_str(&format!("%{:02X}", byte)),
        }
    }
    encoded
}
