use async_trait::async_trait;

use crate::{client::ApiClient, errors::AppResult, models::domain::InterviewResult};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResultRepository: Send + Sync {
    /// Upserts the interview result of one student.
    async fn submit(&self, result: InterviewResult) -> AppResult<()>;
}

pub struct HttpResultRepository {
    api: ApiClient,
}

impl HttpResultRepository {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl ResultRepository for HttpResultRepository {
    async fn submit(&self, result: InterviewResult) -> AppResult<()> {
        self.api.post("resultats", &result).await?;
        Ok(())
    }
}
