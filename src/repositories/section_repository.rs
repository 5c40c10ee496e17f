use async_trait::async_trait;

use crate::{
    client::{decode_object, ApiClient, Listing},
    errors::AppResult,
    models::{
        domain::{Section, Student},
        dto::request::SectionRequest,
    },
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SectionRepository: Send + Sync {
    async fn list(&self) -> AppResult<Vec<Section>>;
    async fn students(&self, section_id: i64) -> AppResult<Vec<Student>>;
    async fn create(&self, request: SectionRequest) -> AppResult<Section>;
    async fn delete(&self, id: i64) -> AppResult<()>;
}

pub struct HttpSectionRepository {
    api: ApiClient,
}

impl HttpSectionRepository {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl SectionRepository for HttpSectionRepository {
    async fn list(&self) -> AppResult<Vec<Section>> {
        let listing: Listing<Section> = self.api.get_list("sections", &[]).await?;
        Ok(listing.items)
    }

    async fn students(&self, section_id: i64) -> AppResult<Vec<Student>> {
        let listing: Listing<Student> = self
            .api
            .get_list(&format!("sections/{}/students", section_id), &[])
            .await?;
        Ok(listing.items)
    }

    async fn create(&self, request: SectionRequest) -> AppResult<Section> {
        decode_object(self.api.post("sections", &request).await?)
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        self.api.delete(&format!("sections/{}", id)).await?;
        Ok(())
    }
}
