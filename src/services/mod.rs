pub mod confirm;
pub mod guards;
pub mod interview_service;
pub mod list_filter;
pub mod list_screen;
pub mod reference_service;
pub mod scoring;
pub mod status_service;

pub use confirm::{Confirmer, PresetAnswer};
pub use interview_service::{InterviewService, InterviewSession, SubmitOutcome};
pub use list_filter::{FilteredView, ListQuery, Searchable};
pub use list_screen::{ListRequest, LoadOutcome, RemoteList};
pub use reference_service::{FiliereService, QuestionBankService, SectionService, StudentService};
pub use scoring::ScoreSheet;
pub use status_service::{BulkOutcome, ScreenContext, StatusController, StatusOutcome};
