use async_trait::async_trait;

use crate::{
    client::{ApiClient, Listing},
    errors::AppResult,
    models::domain::Absence,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AbsenceRepository: Send + Sync {
    async fn list(&self) -> AppResult<Vec<Absence>>;
}

pub struct HttpAbsenceRepository {
    api: ApiClient,
}

impl HttpAbsenceRepository {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl AbsenceRepository for HttpAbsenceRepository {
    async fn list(&self) -> AppResult<Vec<Absence>> {
        let listing: Listing<Absence> = self.api.get_list("absences", &[]).await?;
        Ok(listing.items)
    }
}
