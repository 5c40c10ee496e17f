use std::{borrow::Cow, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    errors::AppError,
    models::domain::lenient_number,
    services::list_filter::Searchable,
};

/// Lifecycle status of a student record. The wire spellings are the
/// backend's own, including `registred` and `attende`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StudentStatus {
    #[default]
    Registred,
    Attende,
    InInterview,
    Passed,
    Rejected,
}

impl StudentStatus {
    pub const ALL: [StudentStatus; 5] = [
        StudentStatus::Registred,
        StudentStatus::Attende,
        StudentStatus::InInterview,
        StudentStatus::Passed,
        StudentStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StudentStatus::Registred => "registred",
            StudentStatus::Attende => "attende",
            StudentStatus::InInterview => "in_interview",
            StudentStatus::Passed => "passed",
            StudentStatus::Rejected => "rejected",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StudentStatus::Registred => "Inscrit",
            StudentStatus::Attende => "En attente",
            StudentStatus::InInterview => "En entretien",
            StudentStatus::Passed => "Admis",
            StudentStatus::Rejected => "Refusé",
        }
    }
}

impl fmt::Display for StudentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StudentStatus {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        StudentStatus::ALL
            .into_iter()
            .find(|s| s.as_str() == value.trim())
            .ok_or_else(|| AppError::ValidationError(format!("Unknown student status '{}'", value)))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Student {
    pub id: i64,
    #[serde(default)]
    pub nom: String,
    #[serde(default)]
    pub prenom: String,
    #[serde(default)]
    pub cin: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub telephone: Option<String>,
    #[serde(default)]
    pub filiere: Option<String>,
    #[serde(default)]
    pub status: StudentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_id: Option<i64>,
}

impl Student {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.prenom, self.nom).trim().to_string()
    }
}

impl Searchable for Student {
    const SEARCH_FIELDS: &'static [&'static str] =
        &["nom", "prenom", "cin", "email", "telephone", "filiere"];

    fn field_value(&self, field: &str) -> Option<Cow<'_, str>> {
        match field {
            "nom" => Some(Cow::Borrowed(self.nom.as_str())),
            "prenom" => Some(Cow::Borrowed(self.prenom.as_str())),
            "cin" => self.cin.as_deref().map(Cow::Borrowed),
            "email" => self.email.as_deref().map(Cow::Borrowed),
            "telephone" => self.telephone.as_deref().map(Cow::Borrowed),
            "filiere" => self.filiere.as_deref().map(Cow::Borrowed),
            "status" => Some(Cow::Borrowed(self.status.as_str())),
            "full_name" => Some(Cow::Owned(self.full_name())),
            _ => None,
        }
    }

    fn category(&self) -> Option<&str> {
        self.filiere.as_deref()
    }
}

/// A student as listed by the Top30 ranking, with its interview total.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct RankedStudent {
    #[serde(flatten)]
    pub student: Student,
    #[serde(default, deserialize_with = "lenient_number::deserialize")]
    pub total: Option<f64>,
}

impl Searchable for RankedStudent {
    const SEARCH_FIELDS: &'static [&'static str] = Student::SEARCH_FIELDS;

    fn field_value(&self, field: &str) -> Option<Cow<'_, str>> {
        self.student.field_value(field)
    }

    fn category(&self) -> Option<&str> {
        self.student.category()
    }
}
