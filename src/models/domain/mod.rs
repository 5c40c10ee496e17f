pub mod absence;
pub mod filiere;
pub mod question;
pub mod result;
pub mod section;
pub mod student;

pub use absence::Absence;
pub use filiere::Filiere;
pub use question::{Question, QuestionCategory};
pub use result::InterviewResult;
pub use section::Section;
pub use student::{RankedStudent, Student, StudentStatus};

/// Accepts numbers sent either as JSON numbers or as decimal strings
/// (`"35.50"`), which is how the backend serializes decimal columns.
pub mod lenient_number {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        })
    }
}
