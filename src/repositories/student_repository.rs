use async_trait::async_trait;

use crate::{
    client::{segments_path, ApiClient, Listing},
    errors::{AppError, AppResult},
    models::{
        domain::{RankedStudent, Student, StudentStatus},
        dto::{
            request::{BulkStatusRequest, PaginationParams, UpdateStatusRequest},
            response::BulkStatusResponse,
        },
    },
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StudentRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Student>>;
    async fn list_students(&self, params: PaginationParams) -> AppResult<Listing<Student>>;
    async fn list_waiting(&self) -> AppResult<Vec<Student>>;
    async fn top_ranked(&self, filiere: Option<String>) -> AppResult<Vec<RankedStudent>>;
    async fn update_status(&self, id: i64, status: StudentStatus) -> AppResult<()>;
    /// Returns the ids the backend actually updated.
    async fn bulk_update_status(&self, ids: Vec<i64>, status: StudentStatus) -> AppResult<Vec<i64>>;
    async fn delete(&self, id: i64) -> AppResult<()>;
}

pub struct HttpStudentRepository {
    api: ApiClient,
}

impl HttpStudentRepository {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl StudentRepository for HttpStudentRepository {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Student>> {
        match self.api.get(&format!("students/{}", id)).await {
            Ok(student) => Ok(Some(student)),
            Err(AppError::NotFound(_)) => Ok(None),
            Err(err) => Err(err),
        }
    }

    async fn list_students(&self, params: PaginationParams) -> AppResult<Listing<Student>> {
        self.api.get_list("students", &params.to_query()).await
    }

    async fn list_waiting(&self) -> AppResult<Vec<Student>> {
        let listing: Listing<Student> = self.api.get_list("students/attente", &[]).await?;
        Ok(listing.items)
    }

    async fn top_ranked(&self, filiere: Option<String>) -> AppResult<Vec<RankedStudent>> {
        let path = match filiere.as_deref() {
            Some(f) => segments_path(&["students", "top30", f])?,
            None => "students/top30".to_string(),
        };
        let listing: Listing<RankedStudent> = self.api.get_list(&path, &[]).await?;
        Ok(listing.items)
    }

    async fn update_status(&self, id: i64, status: StudentStatus) -> AppResult<()> {
        log::info!("Updating student {} status to {}", id, status);
        self.api
            .put(
                &format!("students/{}/status", id),
                &UpdateStatusRequest { status },
            )
            .await?;
        Ok(())
    }

    async fn bulk_update_status(&self, ids: Vec<i64>, status: StudentStatus) -> AppResult<Vec<i64>> {
        log::info!("Bulk updating {} students to {}", ids.len(), status);
        let body = BulkStatusRequest { ids, status };
        let response = self.api.post("students/update-status", &body).await?;
        Ok(BulkStatusResponse::from_value(response)?.updated_ids)
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        self.api.delete(&format!("students/{}", id)).await?;
        Ok(())
    }
}
