use std::borrow::Cow;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::services::list_filter::Searchable;

/// One recorded absence of a student from a section session.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Absence {
    pub id: i64,
    pub student_id: i64,
    #[serde(default)]
    pub nom: String,
    #[serde(default)]
    pub prenom: String,
    #[serde(default)]
    pub filiere: Option<String>,
    pub date: NaiveDate,
    #[serde(default)]
    pub justified: bool,
}

impl Searchable for Absence {
    const SEARCH_FIELDS: &'static [&'static str] = &["nom", "prenom", "filiere", "date"];

    fn field_value(&self, field: &str) -> Option<Cow<'_, str>> {
        match field {
            "nom" => Some(Cow::Borrowed(self.nom.as_str())),
            "prenom" => Some(Cow::Borrowed(self.prenom.as_str())),
            "filiere" => self.filiere.as_deref().map(Cow::Borrowed),
            "date" => Some(Cow::Owned(self.date.format("%Y-%m-%d").to_string())),
            _ => None,
        }
    }

    fn category(&self) -> Option<&str> {
        self.filiere.as_deref()
    }
}
