use std::sync::Arc;

use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{Filiere, Question, QuestionCategory, Section},
        dto::request::{FiliereRequest, QuestionRequest, SectionRequest},
    },
    repositories::{FiliereRepository, QuestionRepository, SectionRepository, StudentRepository},
};

/// Rewrites a backend rejection of a delete into a message naming what is
/// still attached to the record.
fn referenced(err: AppError, what: &str, id: i64, attached: &str) -> AppError {
    match err {
        AppError::Rejected(message) => {
            log::warn!("Delete of {} {} rejected: {}", what, id, message);
            AppError::Rejected(format!(
                "{} {} cannot be deleted while {} still reference it",
                what, id, attached
            ))
        }
        other => other,
    }
}

pub struct FiliereService {
    repository: Arc<dyn FiliereRepository>,
}

impl FiliereService {
    pub fn new(repository: Arc<dyn FiliereRepository>) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Filiere>> {
        self.repository.list().await
    }

    pub async fn create(&self, request: FiliereRequest) -> AppResult<Filiere> {
        request.validate()?;
        let filiere = self.repository.create(request).await?;
        log::info!("Created filière {} ({})", filiere.id, filiere.name);
        Ok(filiere)
    }

    pub async fn update(&self, id: i64, request: FiliereRequest) -> AppResult<Filiere> {
        request.validate()?;
        self.repository.update(id, request).await
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        self.repository
            .delete(id)
            .await
            .map_err(|e| referenced(e, "Filière", id, "sections or students"))?;
        log::info!("Deleted filière {}", id);
        Ok(())
    }
}

pub struct SectionService {
    repository: Arc<dyn SectionRepository>,
}

impl SectionService {
    pub fn new(repository: Arc<dyn SectionRepository>) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Section>> {
        self.repository.list().await
    }

    pub async fn create(&self, request: SectionRequest) -> AppResult<Section> {
        request.validate()?;
        let section = self.repository.create(request).await?;
        log::info!("Created section {} ({})", section.id, section.name);
        Ok(section)
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        self.repository
            .delete(id)
            .await
            .map_err(|e| referenced(e, "Section", id, "students"))?;
        log::info!("Deleted section {}", id);
        Ok(())
    }
}

/// Question bank maintenance. Edits never rescore past interviews.
pub struct QuestionBankService {
    repository: Arc<dyn QuestionRepository>,
}

impl QuestionBankService {
    pub fn new(repository: Arc<dyn QuestionRepository>) -> Self {
        Self { repository }
    }

    pub async fn personal(&self) -> AppResult<Vec<Question>> {
        self.repository.personal_questions().await
    }

    pub async fn technical(&self, filiere: &str) -> AppResult<Vec<Question>> {
        if filiere.trim().is_empty() {
            return Err(AppError::ValidationError(
                "A filière must be selected".to_string(),
            ));
        }
        self.repository.technical_questions(filiere.to_string()).await
    }

    pub async fn create(&self, request: QuestionRequest) -> AppResult<Question> {
        request.validate()?;
        self.repository.create(request).await
    }

    pub async fn update(&self, id: i64, request: QuestionRequest) -> AppResult<Question> {
        request.validate()?;
        self.repository.update(id, request).await
    }

    pub async fn delete(&self, category: QuestionCategory, id: i64) -> AppResult<()> {
        self.repository
            .delete(category, id)
            .await
            .map_err(|e| referenced(e, "Question", id, "recorded results"))
    }
}

/// Student administration outside the status workflow.
pub struct StudentService {
    repository: Arc<dyn StudentRepository>,
}

impl StudentService {
    pub fn new(repository: Arc<dyn StudentRepository>) -> Self {
        Self { repository }
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        self.repository
            .delete(id)
            .await
            .map_err(|e| referenced(e, "Student", id, "results or absences"))?;
        log::info!("Deleted student {}", id);
        Ok(())
    }
}
