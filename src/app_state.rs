use std::sync::Arc;

use crate::{
    auth::{FileSession, SessionProvider, StaticSession},
    client::ApiClient,
    config::Config,
    errors::AppResult,
    models::domain::{Absence, RankedStudent, Student},
    repositories::{
        AbsenceRepository, HttpAbsenceRepository, HttpFiliereRepository, HttpQuestionRepository,
        HttpResultRepository, HttpSectionRepository, HttpStudentRepository, SectionRepository,
        StudentRepository,
    },
    services::{
        list_screen::{
            absences_screen, ranking_screen, section_students_screen, students_screen,
            waiting_screen, RemoteList,
        },
        status_service::ListRefresher,
        FiliereService, InterviewService, QuestionBankService, ScreenContext, SectionService,
        StatusController, StudentService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub interview_service: Arc<InterviewService>,
    pub filiere_service: Arc<FiliereService>,
    pub section_service: Arc<SectionService>,
    pub question_service: Arc<QuestionBankService>,
    pub student_service: Arc<StudentService>,
    pub student_repository: Arc<dyn StudentRepository>,
    pub section_repository: Arc<dyn SectionRepository>,
    pub absence_repository: Arc<dyn AbsenceRepository>,
    pub session: Arc<dyn SessionProvider>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Uses the configured static token when present, otherwise the
    /// persisted session file.
    pub fn new(config: Config) -> AppResult<Self> {
        let session: Arc<dyn SessionProvider> = match config.api_token.clone() {
            Some(token) => Arc::new(StaticSession::new(Some(token))),
            None => Arc::new(FileSession::new(config.session_store_path.clone())),
        };
        Self::with_session(config, session)
    }

    pub fn with_session(config: Config, session: Arc<dyn SessionProvider>) -> AppResult<Self> {
        let api = ApiClient::new(&config, Arc::clone(&session))?;

        let student_repository: Arc<dyn StudentRepository> =
            Arc::new(HttpStudentRepository::new(api.clone()));
        let section_repository: Arc<dyn SectionRepository> =
            Arc::new(HttpSectionRepository::new(api.clone()));
        let absence_repository: Arc<dyn AbsenceRepository> =
            Arc::new(HttpAbsenceRepository::new(api.clone()));
        let question_repository = Arc::new(HttpQuestionRepository::new(api.clone()));
        let result_repository = Arc::new(HttpResultRepository::new(api.clone()));
        let filiere_repository = Arc::new(HttpFiliereRepository::new(api));

        let interview_service = Arc::new(InterviewService::new(
            Arc::clone(&student_repository),
            question_repository.clone(),
            result_repository,
        ));
        let filiere_service = Arc::new(FiliereService::new(filiere_repository));
        let section_service = Arc::new(SectionService::new(Arc::clone(&section_repository)));
        let question_service = Arc::new(QuestionBankService::new(question_repository));
        let student_service = Arc::new(StudentService::new(Arc::clone(&student_repository)));

        Ok(Self {
            interview_service,
            filiere_service,
            section_service,
            question_service,
            student_service,
            student_repository,
            section_repository,
            absence_repository,
            session,
            config: Arc::new(config),
        })
    }

    pub fn status_controller(
        &self,
        context: ScreenContext,
        refresher: Arc<dyn ListRefresher>,
    ) -> StatusController {
        StatusController::new(context, Arc::clone(&self.student_repository), refresher)
    }

    pub fn students_screen(&self) -> RemoteList<Student> {
        let page_size = u32::try_from(self.config.page_size).unwrap_or(u32::MAX);
        students_screen(Arc::clone(&self.student_repository), page_size)
    }

    pub fn waiting_screen(&self) -> RemoteList<Student> {
        waiting_screen(Arc::clone(&self.student_repository))
    }

    pub fn ranking_screen(&self) -> RemoteList<RankedStudent> {
        ranking_screen(Arc::clone(&self.student_repository))
    }

    pub fn section_students_screen(&self) -> RemoteList<Student> {
        section_students_screen(Arc::clone(&self.section_repository))
    }

    pub fn absences_screen(&self) -> RemoteList<Absence> {
        absences_screen(Arc::clone(&self.absence_repository))
    }
}
