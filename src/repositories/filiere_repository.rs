use async_trait::async_trait;

use crate::{
    client::{decode_object, ApiClient, Listing},
    errors::AppResult,
    models::{domain::Filiere, dto::request::FiliereRequest},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FiliereRepository: Send + Sync {
    async fn list(&self) -> AppResult<Vec<Filiere>>;
    async fn create(&self, request: FiliereRequest) -> AppResult<Filiere>;
    async fn update(&self, id: i64, request: FiliereRequest) -> AppResult<Filiere>;
    async fn delete(&self, id: i64) -> AppResult<()>;
}

pub struct HttpFiliereRepository {
    api: ApiClient,
}

impl HttpFiliereRepository {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl FiliereRepository for HttpFiliereRepository {
    async fn list(&self) -> AppResult<Vec<Filiere>> {
        let listing: Listing<Filiere> = self.api.get_list("filieres", &[]).await?;
        Ok(listing.items)
    }

    async fn create(&self, request: FiliereRequest) -> AppResult<Filiere> {
        decode_object(self.api.post("filieres", &request).await?)
    }

    async fn update(&self, id: i64, request: FiliereRequest) -> AppResult<Filiere> {
        decode_object(self.api.put(&format!("filieres/{}", id), &request).await?)
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        self.api.delete(&format!("filieres/{}", id)).await?;
        Ok(())
    }
}
