use std::borrow::Cow;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::services::list_filter::Searchable;

/// A scheduled cohort within a filière.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Section {
    pub id: i64,
    #[serde(alias = "nom")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filiere_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filiere: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl Searchable for Section {
    const SEARCH_FIELDS: &'static [&'static str] = &["name", "filiere", "status"];

    fn field_value(&self, field: &str) -> Option<Cow<'_, str>> {
        match field {
            "name" => Some(Cow::Borrowed(self.name.as_str())),
            "filiere" => self.filiere.as_deref().map(Cow::Borrowed),
            "status" => self.status.as_deref().map(Cow::Borrowed),
            _ => None,
        }
    }

    fn category(&self) -> Option<&str> {
        self.filiere.as_deref()
    }
}
