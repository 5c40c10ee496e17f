//! Remote-backed list screens: fetch, filter locally, refresh.
//!
//! Overlapping fetches are allowed but only the most recently issued one is
//! applied. A response arriving after its screen was dropped is ignored.

use std::{
    future::Future,
    sync::{Arc, Mutex, MutexGuard, Weak},
};

use async_trait::async_trait;
use futures::future::BoxFuture;

use crate::{
    client::{Listing, PageMeta},
    errors::{AppError, AppResult},
    models::{
        domain::{Absence, RankedStudent, Student, StudentStatus},
        dto::request::PaginationParams,
    },
    repositories::{AbsenceRepository, SectionRepository, StudentRepository},
    services::{
        guards::RequestSequence,
        list_filter::{FilteredView, ListQuery, Searchable},
        status_service::{reconcile, ListRefresher, StudentRecord},
    },
};

/// What a screen asks the backend for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListRequest {
    /// Filière tab or section id, depending on the screen.
    pub scope: Option<String>,
    /// Present for server-paged screens.
    pub page: Option<PaginationParams>,
}

impl ListRequest {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn scoped(scope: impl Into<String>) -> Self {
        Self {
            scope: Some(scope.into()),
            page: None,
        }
    }

    pub fn page(params: PaginationParams) -> Self {
        Self {
            scope: None,
            page: Some(params),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    /// A newer request was issued while this one was running.
    Stale,
    /// The screen no longer exists.
    Detached,
}

pub type Fetcher<T> =
    Arc<dyn Fn(ListRequest) -> BoxFuture<'static, AppResult<Listing<T>>> + Send + Sync>;

struct ListState<T> {
    view: FilteredView<T>,
    page: Option<PageMeta>,
    requested: Option<ListRequest>,
    loaded: Option<ListRequest>,
}

fn lock<T>(state: &Mutex<ListState<T>>) -> MutexGuard<'_, ListState<T>> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Weak handle used by in-flight fetches to apply their result.
pub struct ListHandle<T> {
    state: Weak<Mutex<ListState<T>>>,
    sequence: Arc<RequestSequence>,
    fetcher: Fetcher<T>,
}

impl<T> Clone for ListHandle<T> {
    fn clone(&self) -> Self {
        Self {
            state: Weak::clone(&self.state),
            sequence: Arc::clone(&self.sequence),
            fetcher: Arc::clone(&self.fetcher),
        }
    }
}

impl<T: Searchable + Clone + Send + Sync + 'static> ListHandle<T> {
    pub async fn load(&self, request: ListRequest) -> AppResult<LoadOutcome> {
        let ticket = self.sequence.issue();
        if let Some(state) = self.state.upgrade() {
            lock(&state).requested = Some(request.clone());
        }

        let result = (self.fetcher)(request.clone()).await;

        if !self.sequence.is_current(ticket) {
            log::warn!("Discarding stale list response for {:?}", request);
            return Ok(LoadOutcome::Stale);
        }

        let Some(state) = self.state.upgrade() else {
            log::debug!("List screen gone; dropping response for {:?}", request);
            return Ok(LoadOutcome::Detached);
        };

        let listing = result?;
        let mut state = lock(&state);
        state.view.set_records(listing.items);
        state.page = listing.page;
        state.loaded = Some(request);
        Ok(LoadOutcome::Applied)
    }
}

/// A list screen owning its fetched records and search state.
pub struct RemoteList<T> {
    state: Arc<Mutex<ListState<T>>>,
    handle: ListHandle<T>,
    page_size: u32,
}

impl<T: Searchable + Clone + Send + Sync + 'static> RemoteList<T> {
    pub fn new(fetcher: Fetcher<T>) -> Self {
        let state = Arc::new(Mutex::new(ListState {
            view: FilteredView::default(),
            page: None,
            requested: None,
            loaded: None,
        }));
        let handle = ListHandle {
            state: Arc::downgrade(&state),
            sequence: Arc::new(RequestSequence::new()),
            fetcher,
        };
        Self {
            state,
            handle,
            page_size: PaginationParams::default().per_page(),
        }
    }

    /// Page size used when navigating before any page was requested.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = PaginationParams::new(1, page_size).per_page();
        self
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Builds a screen from an async closure.
    pub fn from_fn<F, Fut>(fetch: F) -> Self
    where
        F: Fn(ListRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = AppResult<Listing<T>>> + Send + 'static,
    {
        Self::new(Arc::new(
            move |request: ListRequest| -> BoxFuture<'static, AppResult<Listing<T>>> {
                Box::pin(fetch(request))
            },
        ))
    }

    pub fn handle(&self) -> ListHandle<T> {
        self.handle.clone()
    }

    pub async fn load(&self, request: ListRequest) -> AppResult<LoadOutcome> {
        self.handle.load(request).await
    }

    /// Re-issues the most recently requested fetch.
    pub async fn reload(&self) -> AppResult<LoadOutcome> {
        let request = lock(&self.state).requested.clone().unwrap_or_default();
        self.handle.load(request).await
    }

    pub async fn go_to_page(&self, page: u32) -> AppResult<LoadOutcome> {
        let mut request = lock(&self.state).requested.clone().unwrap_or_default();
        let per_page = request.page.map(|p| p.per_page()).unwrap_or(self.page_size);
        request.page = Some(PaginationParams::new(page, per_page));
        self.handle.load(request).await
    }

    /// Search applies to the records currently loaded; on server-paged
    /// screens that is the current page only.
    pub fn set_query(&self, query: ListQuery) {
        lock(&self.state).view.set_query(query);
    }

    pub fn visible(&self) -> Vec<T> {
        lock(&self.state).view.view().to_vec()
    }

    pub fn records(&self) -> Vec<T> {
        lock(&self.state).view.records().to_vec()
    }

    pub fn page(&self) -> Option<PageMeta> {
        lock(&self.state).page.clone()
    }

    pub fn loaded_request(&self) -> Option<ListRequest> {
        lock(&self.state).loaded.clone()
    }

    pub fn update_records(&self, update: impl FnOnce(&mut Vec<T>)) {
        lock(&self.state).view.update_records(update);
    }
}

#[async_trait]
impl<T> ListRefresher for RemoteList<T>
where
    T: StudentRecord + Searchable + Clone + Send + Sync + 'static,
{
    async fn refresh(&self) -> AppResult<()> {
        self.reload().await.map(|_| ())
    }

    fn reconcile(&self, updated: &[i64], status: StudentStatus) -> usize {
        let mut changed = 0;
        self.update_records(|records| changed = reconcile(records, updated, status));
        changed
    }
}

/// Paged list of every student; `page_size` applies until a page is chosen.
pub fn students_screen(repo: Arc<dyn StudentRepository>, page_size: u32) -> RemoteList<Student> {
    RemoteList::from_fn(move |request: ListRequest| {
        let repo = Arc::clone(&repo);
        let params = request
            .page
            .unwrap_or_else(|| PaginationParams::new(1, page_size));
        async move { repo.list_students(params).await }
    })
    .with_page_size(page_size)
}

/// Students waiting for an interview.
pub fn waiting_screen(repo: Arc<dyn StudentRepository>) -> RemoteList<Student> {
    RemoteList::from_fn(move |_request: ListRequest| {
        let repo = Arc::clone(&repo);
        async move { Ok::<_, AppError>(Listing::unpaged(repo.list_waiting().await?)) }
    })
}

/// Top30 ranking; the scope is the filière tab, absent for all filières.
pub fn ranking_screen(repo: Arc<dyn StudentRepository>) -> RemoteList<RankedStudent> {
    RemoteList::from_fn(move |request: ListRequest| {
        let repo = Arc::clone(&repo);
        async move { Ok::<_, AppError>(Listing::unpaged(repo.top_ranked(request.scope).await?)) }
    })
}

/// Students of one section; the scope is the section id.
pub fn section_students_screen(repo: Arc<dyn SectionRepository>) -> RemoteList<Student> {
    RemoteList::from_fn(move |request: ListRequest| {
        let repo = Arc::clone(&repo);
        async move {
            let section_id = request
                .scope
                .as_deref()
                .and_then(|s| s.parse::<i64>().ok())
                .ok_or_else(|| AppError::ValidationError("A section must be selected".to_string()))?;
            Ok::<_, AppError>(Listing::unpaged(repo.students(section_id).await?))
        }
    })
}

pub fn absences_screen(repo: Arc<dyn AbsenceRepository>) -> RemoteList<Absence> {
    RemoteList::from_fn(move |_request: ListRequest| {
        let repo = Arc::clone(&repo);
        async move { Ok::<_, AppError>(Listing::unpaged(repo.list().await?)) }
    })
}
