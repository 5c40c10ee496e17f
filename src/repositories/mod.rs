pub mod absence_repository;
pub mod filiere_repository;
pub mod question_repository;
pub mod result_repository;
pub mod section_repository;
pub mod student_repository;

pub use absence_repository::{AbsenceRepository, HttpAbsenceRepository};
pub use filiere_repository::{FiliereRepository, HttpFiliereRepository};
pub use question_repository::{HttpQuestionRepository, QuestionRepository};
pub use result_repository::{HttpResultRepository, ResultRepository};
pub use section_repository::{HttpSectionRepository, SectionRepository};
pub use student_repository::{HttpStudentRepository, StudentRepository};
