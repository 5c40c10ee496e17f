use async_trait::async_trait;

use crate::{
    client::{decode_object, ApiClient, Listing},
    errors::AppResult,
    models::{
        domain::{Question, QuestionCategory},
        dto::request::QuestionRequest,
    },
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    async fn personal_questions(&self) -> AppResult<Vec<Question>>;
    /// Technical questions whose filière is exactly `filiere`.
    async fn technical_questions(&self, filiere: String) -> AppResult<Vec<Question>>;
    async fn create(&self, request: QuestionRequest) -> AppResult<Question>;
    async fn update(&self, id: i64, request: QuestionRequest) -> AppResult<Question>;
    async fn delete(&self, category: QuestionCategory, id: i64) -> AppResult<()>;
}

pub struct HttpQuestionRepository {
    api: ApiClient,
}

impl HttpQuestionRepository {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

fn tag(mut question: Question, category: QuestionCategory) -> Question {
    question.category = category;
    question
}

#[async_trait]
impl QuestionRepository for HttpQuestionRepository {
    async fn personal_questions(&self) -> AppResult<Vec<Question>> {
        let listing: Listing<Question> = self.api.get_list("personels", &[]).await?;
        Ok(listing
            .items
            .into_iter()
            .map(|q| tag(q, QuestionCategory::Personal))
            .collect())
    }

    async fn technical_questions(&self, filiere: String) -> AppResult<Vec<Question>> {
        let listing: Listing<Question> = self
            .api
            .get_list("techniques", &[("filiere", filiere.clone())])
            .await?;

        let total = listing.items.len();
        let questions: Vec<Question> = listing
            .items
            .into_iter()
            .map(|q| tag(q, QuestionCategory::Technical))
            .filter_map(|mut q| {
                let belongs = q.filiere.as_deref().map(|f| f == filiere).unwrap_or(true);
                if !belongs {
                    return None;
                }
                q.filiere.get_or_insert_with(|| filiere.clone());
                Some(q)
            })
            .collect();

        if questions.len() != total {
            log::warn!(
                "Dropped {} technical questions not belonging to filière '{}'",
                total - questions.len(),
                filiere
            );
        }

        Ok(questions)
    }

    async fn create(&self, request: QuestionRequest) -> AppResult<Question> {
        let category = request.category;
        let created = self.api.post(category.endpoint(), &request).await?;
        Ok(tag(decode_object(created)?, category))
    }

    async fn update(&self, id: i64, request: QuestionRequest) -> AppResult<Question> {
        let category = request.category;
        let updated = self
            .api
            .put(&format!("{}/{}", category.endpoint(), id), &request)
            .await?;
        Ok(tag(decode_object(updated)?, category))
    }

    async fn delete(&self, category: QuestionCategory, id: i64) -> AppResult<()> {
        self.api
            .delete(&format!("{}/{}", category.endpoint(), id))
            .await?;
        Ok(())
    }
}
