use serde_json::Value;
use std::fmt;

/// Identifier of a created student, sent back as the `alunoId` foreign key.
///
/// The backend may answer with a number or a string; the value is kept as
/// received so it is echoed back with the same JSON type.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StudentId(Value);

impl StudentId {
    /// Extract the `id` of a created resource.
    ///
    pub fn from_response(body: &Value) -> Option<StudentId> {
        match body.get("id")? {
            id @ Value::Number(_) => Some(StudentId(id.clone())),
            Value::String(id) if !id.trim().is_empty() => Some(StudentId(Value::String(id.clone()))),
            _ => None,
        }
    }

    pub fn to_json(&self) -> Value {
        self.0.clone()
    }
}

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Value::String(id) => f.write_str(id),
            other => write!(f, "{}", other),
        }
    }
}

impl From<u64> for StudentId {
    fn from(id: u64) -> Self {
        StudentId(Value::from(id))
    }
}
