use std::{
    collections::HashSet,
    sync::{Arc, Mutex, MutexGuard},
};

use async_trait::async_trait;
use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{RankedStudent, Student, StudentStatus},
        dto::request::BulkStatusRequest,
    },
    repositories::StudentRepository,
    services::{
        confirm::Confirmer,
        guards::InFlight,
        list_filter::{take_top, ListQuery, Searchable},
    },
};

/// The screen a status change is issued from. Each screen offers its own
/// fixed set of target statuses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScreenContext {
    /// Full student list.
    Students,
    /// Students waiting for an interview slot.
    Waiting,
    /// Interview scoring screen.
    Interview,
    /// Top30 ranking per filière.
    Ranking,
    /// Students of one section.
    Section,
}

impl ScreenContext {
    pub fn allowed_targets(&self) -> &'static [StudentStatus] {
        match self {
            ScreenContext::Students => &StudentStatus::ALL,
            ScreenContext::Waiting => &[
                StudentStatus::Passed,
                StudentStatus::InInterview,
                StudentStatus::Registred,
            ],
            ScreenContext::Interview => &[StudentStatus::Passed, StudentStatus::Rejected],
            ScreenContext::Ranking => &[StudentStatus::Passed],
            ScreenContext::Section => &[StudentStatus::Passed, StudentStatus::Rejected],
        }
    }

    pub fn allows(&self, status: StudentStatus) -> bool {
        self.allowed_targets().contains(&status)
    }

    fn check(&self, status: StudentStatus) -> AppResult<()> {
        if self.allows(status) {
            Ok(())
        } else {
            Err(AppError::ValidationError(format!(
                "Status '{}' cannot be set from the {:?} screen",
                status, self
            )))
        }
    }
}

/// The list a screen is displaying, as seen by the status controller.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListRefresher: Send + Sync {
    /// Re-fetches the list.
    async fn refresh(&self) -> AppResult<()>;

    /// Marks the given ids with `status` in the displayed records. Returns
    /// how many records changed.
    fn reconcile(&self, updated: &[i64], status: StudentStatus) -> usize;
}

/// Anything that wraps a student record in a list.
pub trait StudentRecord {
    fn student(&self) -> &Student;
    fn student_mut(&mut self) -> &mut Student;
}

impl StudentRecord for Student {
    fn student(&self) -> &Student {
        self
    }

    fn student_mut(&mut self) -> &mut Student {
        self
    }
}

impl StudentRecord for RankedStudent {
    fn student(&self) -> &Student {
        &self.student
    }

    fn student_mut(&mut self) -> &mut Student {
        &mut self.student
    }
}

/// Marks exactly the ids the backend reported as updated. Returns how many
/// local records changed.
pub fn reconcile<T: StudentRecord>(records: &mut [T], updated: &[i64], status: StudentStatus) -> usize {
    let updated: HashSet<i64> = updated.iter().copied().collect();
    let mut changed = 0;
    for record in records.iter_mut() {
        let student = record.student_mut();
        if updated.contains(&student.id) {
            student.status = status;
            changed += 1;
        }
    }
    changed
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusOutcome {
    Applied,
    /// Persisted, but re-fetching the displayed list failed.
    AppliedNotRefreshed,
    Declined,
    AlreadyInFlight,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BulkOutcome {
    Applied {
        requested: Vec<i64>,
        updated: Vec<i64>,
    },
    Declined,
    AlreadyInFlight,
}

impl BulkOutcome {
    /// Requested ids the backend did not update.
    pub fn skipped(&self) -> Vec<i64> {
        match self {
            BulkOutcome::Applied { requested, updated } => requested
                .iter()
                .copied()
                .filter(|id| !updated.contains(id))
                .collect(),
            _ => Vec::new(),
        }
    }
}

pub struct StatusController {
    context: ScreenContext,
    students: Arc<dyn StudentRepository>,
    refresher: Arc<dyn ListRefresher>,
    selected: Mutex<Option<Student>>,
    single: InFlight,
    bulk: InFlight,
}

impl StatusController {
    pub fn new(
        context: ScreenContext,
        students: Arc<dyn StudentRepository>,
        refresher: Arc<dyn ListRefresher>,
    ) -> Self {
        Self {
            context,
            students,
            refresher,
            selected: Mutex::new(None),
            single: InFlight::new(),
            bulk: InFlight::new(),
        }
    }

    pub fn context(&self) -> ScreenContext {
        self.context
    }

    fn selected_lock(&self) -> MutexGuard<'_, Option<Student>> {
        self.selected.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Sets the record shown in the open detail view, if any.
    pub fn select(&self, student: Option<Student>) {
        *self.selected_lock() = student;
    }

    pub fn selected(&self) -> Option<Student> {
        self.selected_lock().clone()
    }

    pub fn is_busy(&self) -> bool {
        self.single.is_busy() || self.bulk.is_busy()
    }

    fn patch_selected(&self, ids: &[i64], status: StudentStatus) {
        let mut selected = self.selected_lock();
        if let Some(student) = selected.as_mut() {
            if ids.contains(&student.id) {
                student.status = status;
            }
        }
    }

    pub async fn set_status(
        &self,
        student_id: i64,
        status: StudentStatus,
        confirmer: &dyn Confirmer,
    ) -> AppResult<StatusOutcome> {
        self.context.check(status)?;

        let Some(guard) = self.single.try_acquire() else {
            return Ok(StatusOutcome::AlreadyInFlight);
        };

        let prompt = format!(
            "Passer l'étudiant #{} au statut « {} » ?",
            student_id,
            status.label()
        );
        if !confirmer.confirm(&prompt).await {
            return Ok(StatusOutcome::Declined);
        }

        self.students.update_status(student_id, status).await?;
        self.patch_selected(&[student_id], status);
        drop(guard);

        log::info!("Student {} moved to {}", student_id, status);
        if let Err(err) = self.refresher.refresh().await {
            log::warn!("Student {} updated but list refresh failed: {}", student_id, err);
            return Ok(StatusOutcome::AppliedNotRefreshed);
        }
        Ok(StatusOutcome::Applied)
    }

    /// Applies one status to many students in a single request.
    pub async fn promote(
        &self,
        ids: Vec<i64>,
        status: StudentStatus,
        confirmer: &dyn Confirmer,
    ) -> AppResult<BulkOutcome> {
        self.context.check(status)?;
        BulkStatusRequest {
            ids: ids.clone(),
            status,
        }
        .validate()?;

        let Some(_guard) = self.bulk.try_acquire() else {
            return Ok(BulkOutcome::AlreadyInFlight);
        };

        let prompt = format!(
            "Passer {} étudiant(s) au statut « {} » ?",
            ids.len(),
            status.label()
        );
        if !confirmer.confirm(&prompt).await {
            return Ok(BulkOutcome::Declined);
        }

        let updated = self.students.bulk_update_status(ids.clone(), status).await?;
        self.patch_selected(&updated, status);
        let changed = self.refresher.reconcile(&updated, status);
        log::debug!("{} displayed record(s) marked {}", changed, status);

        if updated.len() != ids.len() {
            log::warn!(
                "Backend updated {} of {} requested students",
                updated.len(),
                ids.len()
            );
        }

        Ok(BulkOutcome::Applied {
            requested: ids,
            updated,
        })
    }

    /// Promotes the first `n` records of `records` matching `query`.
    pub async fn promote_top<T>(
        &self,
        records: &[T],
        query: &ListQuery,
        n: usize,
        status: StudentStatus,
        confirmer: &dyn Confirmer,
    ) -> AppResult<BulkOutcome>
    where
        T: StudentRecord + Searchable + Clone + Send + Sync,
    {
        let ids: Vec<i64> = take_top(records, query, n)
            .iter()
            .map(|r| r.student().id)
            .collect();

        self.promote(ids, status, confirmer).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        client::Listing,
        repositories::student_repository::MockStudentRepository,
        services::{
            confirm::{MockConfirmer, PresetAnswer},
            list_screen::{ListRequest, RemoteList},
        },
        test_utils::fixtures::{ranked, student},
    };
    use std::{
        sync::atomic::{AtomicUsize, Ordering},
        time::Duration,
    };

    fn refresher(times: usize) -> Arc<MockListRefresher> {
        let mut refresher = MockListRefresher::new();
        refresher.expect_refresh().times(times).returning(|| Ok(()));
        refresher.expect_reconcile().returning(|_, _| 0);
        Arc::new(refresher)
    }

    async fn ranking(records: Vec<RankedStudent>) -> Arc<RemoteList<RankedStudent>> {
        let screen = RemoteList::from_fn(move |_request: ListRequest| {
            let records = records.clone();
            async move { Ok::<_, AppError>(Listing::unpaged(records)) }
        });
        screen.load(ListRequest::all()).await.unwrap();
        Arc::new(screen)
    }

    fn statuses(screen: &RemoteList<RankedStudent>) -> Vec<StudentStatus> {
        screen.records().iter().map(|r| r.student.status).collect()
    }

    #[test]
    fn test_waiting_screen_targets() {
        let ctx = ScreenContext::Waiting;
        assert!(ctx.allows(StudentStatus::Passed));
        assert!(ctx.allows(StudentStatus::InInterview));
        assert!(ctx.allows(StudentStatus::Registred));
        assert!(!ctx.allows(StudentStatus::Rejected));
        assert!(!ctx.allows(StudentStatus::Attende));
        assert_eq!(ScreenContext::Students.allowed_targets().len(), 5);
    }

    #[tokio::test]
    async fn test_declined_confirmation_makes_no_call() {
        let mut students = MockStudentRepository::new();
        students.expect_update_status().times(0);

        let controller =
            StatusController::new(ScreenContext::Waiting, Arc::new(students), refresher(0));

        let confirmer = PresetAnswer::no();
        let outcome = controller
            .set_status(5, StudentStatus::Passed, &confirmer)
            .await
            .unwrap();

        assert_eq!(outcome, StatusOutcome::Declined);
        assert_eq!(confirmer.asked(), 1);
        assert!(!controller.is_busy());
    }

    #[tokio::test]
    async fn test_disallowed_target_fails_before_prompt() {
        let mut students = MockStudentRepository::new();
        students.expect_update_status().times(0);
        let mut confirmer = MockConfirmer::new();
        confirmer.expect_confirm().times(0);

        let controller =
            StatusController::new(ScreenContext::Ranking, Arc::new(students), refresher(0));

        let result = controller
            .set_status(5, StudentStatus::Rejected, &confirmer)
            .await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_confirmed_change_persists_refreshes_and_patches_detail() {
        let mut students = MockStudentRepository::new();
        students
            .expect_update_status()
            .withf(|id, status| *id == 5 && *status == StudentStatus::Passed)
            .times(1)
            .returning(|_, _| Ok(()));

        let controller =
            StatusController::new(ScreenContext::Waiting, Arc::new(students), refresher(1));
        controller.select(Some(student(5, "Alami", "Web", StudentStatus::Attende)));

        let outcome = controller
            .set_status(5, StudentStatus::Passed, &PresetAnswer::yes())
            .await
            .unwrap();

        assert_eq!(outcome, StatusOutcome::Applied);
        assert_eq!(controller.selected().unwrap().status, StudentStatus::Passed);
    }

    #[tokio::test]
    async fn test_other_selected_student_is_left_alone() {
        let mut students = MockStudentRepository::new();
        students.expect_update_status().returning(|_, _| Ok(()));

        let controller =
            StatusController::new(ScreenContext::Students, Arc::new(students), refresher(1));
        controller.select(Some(student(8, "Berrada", "Web", StudentStatus::Attende)));

        controller
            .set_status(5, StudentStatus::Rejected, &PresetAnswer::yes())
            .await
            .unwrap();

        assert_eq!(controller.selected().unwrap().status, StudentStatus::Attende);
    }

    #[tokio::test]
    async fn test_failure_surfaces_and_skips_refresh() {
        let mut students = MockStudentRepository::new();
        students
            .expect_update_status()
            .times(1)
            .returning(|_, _| Err(AppError::NetworkError("timeout".to_string())));

        let controller =
            StatusController::new(ScreenContext::Waiting, Arc::new(students), refresher(0));
        controller.select(Some(student(5, "Alami", "Web", StudentStatus::Attende)));

        let result = controller
            .set_status(5, StudentStatus::Passed, &PresetAnswer::yes())
            .await;

        assert!(matches!(result, Err(AppError::NetworkError(_))));
        assert_eq!(controller.selected().unwrap().status, StudentStatus::Attende);
        assert!(!controller.is_busy());
    }

    struct SlowStudents {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl StudentRepository for SlowStudents {
        async fn find_by_id(&self, _id: i64) -> AppResult<Option<Student>> {
            Ok(None)
        }
        async fn list_students(
            &self,
            _params: crate::models::dto::request::PaginationParams,
        ) -> AppResult<crate::client::Listing<Student>> {
            Ok(crate::client::Listing::unpaged(Vec::new()))
        }
        async fn list_waiting(&self) -> AppResult<Vec<Student>> {
            Ok(Vec::new())
        }
        async fn top_ranked(&self, _filiere: Option<String>) -> AppResult<Vec<RankedStudent>> {
            Ok(Vec::new())
        }
        async fn update_status(&self, _id: i64, _status: StudentStatus) -> AppResult<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            Ok(())
        }
        async fn bulk_update_status(
            &self,
            ids: Vec<i64>,
            _status: StudentStatus,
        ) -> AppResult<Vec<i64>> {
            Ok(ids)
        }
        async fn delete(&self, _id: i64) -> AppResult<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_double_click_issues_one_call() {
        let calls = Arc::new(AtomicUsize::new(0));
        let controller = StatusController::new(
            ScreenContext::Waiting,
            Arc::new(SlowStudents {
                calls: Arc::clone(&calls),
            }),
            refresher(1),
        );
        let confirmer = PresetAnswer::yes();

        let (first, second) = tokio::join!(
            controller.set_status(5, StudentStatus::Passed, &confirmer),
            controller.set_status(5, StudentStatus::Passed, &confirmer)
        );

        assert_eq!(first.unwrap(), StatusOutcome::Applied);
        assert_eq!(second.unwrap(), StatusOutcome::AlreadyInFlight);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_bulk_promote_marks_only_reported_ids() {
        let mut students = MockStudentRepository::new();
        students
            .expect_bulk_update_status()
            .withf(|ids, status| ids == &vec![1, 2, 3] && *status == StudentStatus::Passed)
            .times(1)
            .returning(|_, _| Ok(vec![1, 3]));

        let screen = ranking(vec![
            ranked(1, "Web", 55.0),
            ranked(2, "Web", 50.0),
            ranked(3, "Web", 48.0),
        ])
        .await;
        let controller =
            StatusController::new(ScreenContext::Ranking, Arc::new(students), screen.clone());

        let outcome = controller
            .promote(vec![1, 2, 3], StudentStatus::Passed, &PresetAnswer::yes())
            .await
            .unwrap();

        assert_eq!(outcome.skipped(), vec![2]);
        assert_eq!(
            statuses(&screen),
            vec![
                StudentStatus::Passed,
                StudentStatus::InInterview,
                StudentStatus::Passed
            ]
        );
    }

    #[tokio::test]
    async fn test_bulk_promote_reconciles_through_refresher() {
        let mut students = MockStudentRepository::new();
        students
            .expect_bulk_update_status()
            .returning(|_, _| Ok(vec![4]));

        let mut refresher = MockListRefresher::new();
        refresher.expect_refresh().times(0);
        refresher
            .expect_reconcile()
            .withf(|ids, status| ids.to_vec() == vec![4] && *status == StudentStatus::Passed)
            .times(1)
            .returning(|ids, _| ids.len());

        let controller =
            StatusController::new(ScreenContext::Ranking, Arc::new(students), Arc::new(refresher));
        controller
            .promote(vec![4, 5], StudentStatus::Passed, &PresetAnswer::yes())
            .await
            .unwrap();
    }

    #[test]
    fn test_reconcile_counts_changed_records() {
        let mut records = vec![ranked(1, "Web", 55.0), ranked(2, "Web", 50.0)];
        assert_eq!(reconcile(&mut records, &[2, 9], StudentStatus::Rejected), 1);
        assert_eq!(records[0].student.status, StudentStatus::InInterview);
        assert_eq!(records[1].student.status, StudentStatus::Rejected);
    }

    #[tokio::test]
    async fn test_bulk_promote_requires_ids() {
        let students = MockStudentRepository::new();
        let controller =
            StatusController::new(ScreenContext::Ranking, Arc::new(students), refresher(0));

        let result = controller
            .promote(Vec::new(), StudentStatus::Passed, &PresetAnswer::yes())
            .await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_promote_top_selects_filtered_prefix() {
        let mut students = MockStudentRepository::new();
        students
            .expect_bulk_update_status()
            .withf(|ids, _| ids == &vec![1, 3])
            .times(1)
            .returning(|ids, _| Ok(ids));

        let screen = ranking(vec![
            ranked(1, "Web", 60.0),
            ranked(2, "Data", 58.0),
            ranked(3, "Web", 55.0),
            ranked(4, "Web", 40.0),
        ])
        .await;
        let controller =
            StatusController::new(ScreenContext::Ranking, Arc::new(students), screen.clone());

        let outcome = controller
            .promote_top(
                &screen.records(),
                &ListQuery::new("").with_category("Web"),
                2,
                StudentStatus::Passed,
                &PresetAnswer::yes(),
            )
            .await
            .unwrap();

        assert_eq!(outcome.skipped(), Vec::<i64>::new());
        assert_eq!(
            statuses(&screen),
            vec![
                StudentStatus::Passed,
                StudentStatus::InInterview,
                StudentStatus::Passed,
                StudentStatus::InInterview
            ]
        );
    }

    #[tokio::test]
    async fn test_refresh_failure_still_reports_applied_change() {
        let mut students = MockStudentRepository::new();
        students.expect_update_status().times(1).returning(|_, _| Ok(()));

        let mut refresher = MockListRefresher::new();
        refresher
            .expect_refresh()
            .times(1)
            .returning(|| Err(AppError::NetworkError("reset".to_string())));

        let controller =
            StatusController::new(ScreenContext::Waiting, Arc::new(students), Arc::new(refresher));
        controller.select(Some(student(5, "Alami", "Web", StudentStatus::Attende)));

        let outcome = controller
            .set_status(5, StudentStatus::Passed, &PresetAnswer::yes())
            .await
            .unwrap();

        assert_eq!(outcome, StatusOutcome::AppliedNotRefreshed);
        assert_eq!(controller.selected().unwrap().status, StudentStatus::Passed);
        assert!(!controller.is_busy());
    }
}
