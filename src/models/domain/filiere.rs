use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::services::list_filter::Searchable;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Filiere {
    pub id: i64,
    #[serde(alias = "nom")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl Searchable for Filiere {
    const SEARCH_FIELDS: &'static [&'static str] = &["name"];

    fn field_value(&self, field: &str) -> Option<Cow<'_, str>> {
        match field {
            "name" => Some(Cow::Borrowed(self.name.as_str())),
            "status" => self.status.as_deref().map(Cow::Borrowed),
            _ => None,
        }
    }

    fn category(&self) -> Option<&str> {
        self.status.as_deref()
    }
}
