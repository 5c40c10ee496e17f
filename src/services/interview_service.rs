use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use crate::{
    errors::{AppError, AppResult},
    models::domain::{InterviewResult, QuestionCategory, Student},
    repositories::{QuestionRepository, ResultRepository, StudentRepository},
    services::{confirm::Confirmer, guards::InFlight, scoring::ScoreSheet},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Result stored; the interview is finalized.
    Submitted(InterviewResult),
    /// The incomplete-interview prompt was declined; nothing was sent.
    Declined,
    /// A submission for this interview is already running.
    AlreadyInFlight,
    /// This interview was already submitted successfully.
    AlreadySubmitted,
}

pub struct InterviewService {
    students: Arc<dyn StudentRepository>,
    questions: Arc<dyn QuestionRepository>,
    results: Arc<dyn ResultRepository>,
}

impl InterviewService {
    pub fn new(
        students: Arc<dyn StudentRepository>,
        questions: Arc<dyn QuestionRepository>,
        results: Arc<dyn ResultRepository>,
    ) -> Self {
        Self {
            students,
            questions,
            results,
        }
    }

    /// Loads the student and the questions applicable to their filière.
    pub async fn open_interview(&self, student_id: i64) -> AppResult<InterviewSession> {
        let student = self
            .students
            .find_by_id(student_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Student {} not found", student_id)))?;

        let technical = async {
            match student.filiere.clone() {
                Some(filiere) => self.questions.technical_questions(filiere).await,
                None => {
                    log::warn!("Student {} has no filière; no technical questions", student.id);
                    Ok(Vec::new())
                }
            }
        };

        let (personal, technical) =
            futures::try_join!(self.questions.personal_questions(), technical)?;

        log::info!(
            "Opened interview for student {} ({} personal, {} technical questions)",
            student.id,
            personal.len(),
            technical.len()
        );

        Ok(InterviewSession::new(
            student,
            ScoreSheet::new(personal, technical),
            Arc::clone(&self.results),
        ))
    }
}

/// Scoring state of one open interview.
pub struct InterviewSession {
    student: Student,
    sheet: ScoreSheet,
    results: Arc<dyn ResultRepository>,
    submitting: InFlight,
    finalized: AtomicBool,
}

impl InterviewSession {
    pub fn new(student: Student, sheet: ScoreSheet, results: Arc<dyn ResultRepository>) -> Self {
        Self {
            student,
            sheet,
            results,
            submitting: InFlight::new(),
            finalized: AtomicBool::new(false),
        }
    }

    pub fn student(&self) -> &Student {
        &self.student
    }

    pub fn sheet(&self) -> &ScoreSheet {
        &self.sheet
    }

    pub fn update_score(&mut self, question_id: i64, category: QuestionCategory, raw: &str) -> u8 {
        self.sheet.update_score(question_id, category, raw)
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.is_busy()
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized.load(Ordering::SeqCst)
    }

    /// Prompt shown when not every question has been scored.
    pub fn incomplete_prompt(&self) -> Option<String> {
        let filled = self.sheet.filled_count();
        let total = self.sheet.question_count();
        (filled < total).then(|| {
            format!(
                "Seulement {} question(s) sur {} ont été notées. Enregistrer quand même ?",
                filled, total
            )
        })
    }

    /// Submits the result once. On failure the scores stay in place so the
    /// caller can retry.
    pub async fn commit_result(&self, confirmer: &dyn Confirmer) -> AppResult<SubmitOutcome> {
        if self.is_finalized() {
            return Ok(SubmitOutcome::AlreadySubmitted);
        }

        let Some(_guard) = self.submitting.try_acquire() else {
            log::debug!("Submission already in flight for student {}", self.student.id);
            return Ok(SubmitOutcome::AlreadyInFlight);
        };

        if let Some(prompt) = self.incomplete_prompt() {
            if !confirmer.confirm(&prompt).await {
                log::info!("Incomplete interview for student {} not submitted", self.student.id);
                return Ok(SubmitOutcome::Declined);
            }
        }

        let result = self.sheet.to_result(self.student.id);
        if let Err(err) = self.results.submit(result).await {
            log::error!(
                "Failed to submit interview result for student {}: {}",
                self.student.id,
                err
            );
            return Err(err);
        }

        self.finalized.store(true, Ordering::SeqCst);
        log::info!(
            "Submitted interview result for student {} (total {})",
            self.student.id,
            result.total
        );
        Ok(SubmitOutcome::Submitted(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::domain::{Question, StudentStatus},
        repositories::{
            question_repository::MockQuestionRepository, result_repository::MockResultRepository,
            student_repository::MockStudentRepository,
        },
        services::confirm::{MockConfirmer, PresetAnswer},
        test_utils::fixtures::{sample_questions, student},
    };
    use async_trait::async_trait;
    use std::{sync::atomic::AtomicUsize, time::Duration};

    fn session_with(results: impl ResultRepository + 'static) -> InterviewSession {
        let (personal, technical) = sample_questions("Développement web");
        InterviewSession::new(
            student(5, "Alami", "Développement web", StudentStatus::InInterview),
            ScoreSheet::new(personal, technical),
            Arc::new(results),
        )
    }

    struct SlowResults {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl ResultRepository for SlowResults {
        async fn submit(&self, _result: InterviewResult) -> AppResult<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_open_interview_scopes_technical_questions_to_filiere() {
        let mut students = MockStudentRepository::new();
        students
            .expect_find_by_id()
            .withf(|id| *id == 5)
            .returning(|_| {
                Ok(Some(student(
                    5,
                    "Alami",
                    "Développement web",
                    StudentStatus::InInterview,
                )))
            });

        let mut question_repo = MockQuestionRepository::new();
        question_repo
            .expect_personal_questions()
            .times(1)
            .returning(|| Ok(vec![Question::personal(1, "p1")]));
        question_repo
            .expect_technical_questions()
            .withf(|filiere| filiere == "Développement web")
            .times(1)
            .returning(|f| Ok(vec![Question::technical(10, "t1", &f)]));

        let service = InterviewService::new(
            Arc::new(students),
            Arc::new(question_repo),
            Arc::new(MockResultRepository::new()),
        );

        let session = service.open_interview(5).await.expect("interview should open");
        assert_eq!(session.sheet().question_count(), 2);
        assert_eq!(
            session.sheet().technical_questions()[0].filiere.as_deref(),
            Some("Développement web")
        );
    }

    #[tokio::test]
    async fn test_open_interview_unknown_student() {
        let mut students = MockStudentRepository::new();
        students.expect_find_by_id().returning(|_| Ok(None));

        let service = InterviewService::new(
            Arc::new(students),
            Arc::new(MockQuestionRepository::new()),
            Arc::new(MockResultRepository::new()),
        );

        assert!(matches!(
            service.open_interview(99).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_empty_sheet_declined_makes_no_call() {
        let mut results = MockResultRepository::new();
        results.expect_submit().times(0);
        let session = session_with(results);

        let mut confirmer = MockConfirmer::new();
        confirmer
            .expect_confirm()
            .withf(|m| m.contains("0 question(s) sur 3"))
            .times(1)
            .returning(|_| false);

        let outcome = session.commit_result(&confirmer).await.unwrap();
        assert_eq!(outcome, SubmitOutcome::Declined);
        assert!(!session.is_submitting());
        assert!(!session.is_finalized());
    }

    #[tokio::test]
    async fn test_empty_sheet_accepted_posts_once() {
        let mut results = MockResultRepository::new();
        results
            .expect_submit()
            .withf(|r| r.id_stu == 5 && r.total == 0 && r.score_s == 0)
            .times(1)
            .returning(|_| Ok(()));
        let session = session_with(results);

        let confirmer = PresetAnswer::yes();
        let outcome = session.commit_result(&confirmer).await.unwrap();

        assert!(matches!(outcome, SubmitOutcome::Submitted(_)));
        assert_eq!(confirmer.asked(), 1);
        assert_eq!(
            session.commit_result(&confirmer).await.unwrap(),
            SubmitOutcome::AlreadySubmitted
        );
    }

    #[tokio::test]
    async fn test_complete_sheet_skips_confirmation() {
        let mut results = MockResultRepository::new();
        results
            .expect_submit()
            .withf(|r| r.score_p == 35 && r.score_t == 12 && r.total == 47)
            .times(1)
            .returning(|_| Ok(()));
        let mut session = session_with(results);
        session.update_score(1, QuestionCategory::Personal, "15");
        session.update_score(2, QuestionCategory::Personal, "25");
        session.update_score(10, QuestionCategory::Technical, "12");

        let mut confirmer = MockConfirmer::new();
        confirmer.expect_confirm().times(0);

        let outcome = session.commit_result(&confirmer).await.unwrap();
        assert_eq!(outcome, SubmitOutcome::Submitted(InterviewResult::new(5, 35, 12, 0)));
    }

    #[tokio::test]
    async fn test_failed_submit_keeps_scores_and_allows_retry() {
        let mut results = MockResultRepository::new();
        let mut seq = mockall::Sequence::new();
        results
            .expect_submit()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(AppError::NetworkError("connection reset".to_string())));
        results
            .expect_submit()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));

        let mut session = session_with(results);
        session.update_score(1, QuestionCategory::Personal, "9");
        let confirmer = PresetAnswer::yes();

        let first = session.commit_result(&confirmer).await;
        assert!(matches!(first, Err(AppError::NetworkError(_))));
        assert!(!session.is_submitting());
        assert_eq!(session.sheet().score(1, QuestionCategory::Personal), Some(9));

        let retry = session.commit_result(&confirmer).await.unwrap();
        assert!(matches!(retry, SubmitOutcome::Submitted(r) if r.score_p == 9));
    }

    #[tokio::test]
    async fn test_double_click_submits_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let session = session_with(SlowResults {
            calls: Arc::clone(&calls),
        });
        let confirmer = PresetAnswer::yes();

        let (first, second) = tokio::join!(
            session.commit_result(&confirmer),
            session.commit_result(&confirmer)
        );

        assert!(matches!(first.unwrap(), SubmitOutcome::Submitted(_)));
        assert_eq!(second.unwrap(), SubmitOutcome::AlreadyInFlight);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
