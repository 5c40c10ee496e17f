use std::fmt;

use serde::{Deserialize, Serialize};

/// `personal` questions are global; `technical` ones belong to one filière.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionCategory {
    #[default]
    Personal,
    Technical,
}

impl QuestionCategory {
    /// Single-letter code used by the scoring form (`P` / `T`).
    pub fn code(&self) -> char {
        match self {
            QuestionCategory::Personal => 'P',
            QuestionCategory::Technical => 'T',
        }
    }

    pub fn from_code(code: char) -> Option<Self> {
        match code.to_ascii_uppercase() {
            'P' => Some(QuestionCategory::Personal),
            'T' => Some(QuestionCategory::Technical),
            _ => None,
        }
    }

    /// Backend collection holding questions of this category.
    pub fn endpoint(&self) -> &'static str {
        match self {
            QuestionCategory::Personal => "personels",
            QuestionCategory::Technical => "techniques",
        }
    }
}

impl fmt::Display for QuestionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionCategory::Personal => f.write_str("personal"),
            QuestionCategory::Technical => f.write_str("technical"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Question {
    pub id: i64,
    pub question: String,
    #[serde(default)]
    pub category: QuestionCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filiere: Option<String>,
}

impl Question {
    pub fn personal(id: i64, question: &str) -> Self {
        Self {
            id,
            question: question.to_string(),
            category: QuestionCategory::Personal,
            filiere: None,
        }
    }

    pub fn technical(id: i64, question: &str, filiere: &str) -> Self {
        Self {
            id,
            question: question.to_string(),
            category: QuestionCategory::Technical,
            filiere: Some(filiere.to_string()),
        }
    }
}
