use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::domain::{QuestionCategory, StudentStatus};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FiliereRequest {
    #[validate(length(min = 1, max = 100, message = "Filière name is required"))]
    pub name: String,

    #[validate(range(min = 1, message = "Capacity must be at least 1"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_section_dates"))]
pub struct SectionRequest {
    #[validate(length(min = 1, max = 100, message = "Section name is required"))]
    pub name: String,

    #[validate(required(message = "A filière must be selected"))]
    pub filiere_id: Option<i64>,

    #[validate(range(min = 1, message = "Capacity must be at least 1"))]
    pub capacity: u32,

    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

fn validate_section_dates(request: &SectionRequest) -> Result<(), ValidationError> {
    if request.end_date < request.start_date {
        let mut err = ValidationError::new("date_range");
        err.message = Some("End date must not precede start date".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_question_scope"))]
pub struct QuestionRequest {
    #[validate(length(min = 1, max = 1000, message = "Question text is required"))]
    pub question: String,

    #[serde(skip)]
    pub category: QuestionCategory,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub filiere: Option<String>,
}

fn validate_question_scope(request: &QuestionRequest) -> Result<(), ValidationError> {
    let has_filiere = request
        .filiere
        .as_deref()
        .map(|f| !f.trim().is_empty())
        .unwrap_or(false);

    match request.category {
        QuestionCategory::Technical if !has_filiere => {
            let mut err = ValidationError::new("filiere_required");
            err.message = Some("Technical questions must target a filière".into());
            Err(err)
        }
        QuestionCategory::Personal if has_filiere => {
            let mut err = ValidationError::new("filiere_forbidden");
            err.message = Some("Personal questions are shared by every filière".into());
            Err(err)
        }
        _ => Ok(()),
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: StudentStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BulkStatusRequest {
    #[validate(length(min = 1, message = "Select at least one student"))]
    pub ids: Vec<i64>,
    pub status: StudentStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Validate)]
pub struct PaginationParams {
    #[validate(range(min = 1))]
    pub page: Option<u32>,

    #[validate(range(min = 1, max = 100))]
    pub per_page: Option<u32>,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: Some(1),
            per_page: Some(10),
        }
    }
}

impl PaginationParams {
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: Some(page),
            per_page: Some(per_page),
        }
    }

    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn per_page(&self) -> u32 {
        self.per_page.unwrap_or(10).clamp(1, 100)
    }

    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("page", self.page().to_string()),
            ("per_page", self.per_page().to_string()),
        ]
    }
}
