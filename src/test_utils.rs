#[cfg(test)]
pub mod fixtures {
    use crate::models::domain::{Question, RankedStudent, Student, StudentStatus};

    /// Creates a student with a derived email and CIN
    pub fn student(id: i64, nom: &str, filiere: &str, status: StudentStatus) -> Student {
        Student {
            id,
            nom: nom.to_string(),
            prenom: "Test".to_string(),
            cin: Some(format!("AB{:05}", id)),
            email: Some(format!("{}@example.com", nom.to_lowercase())),
            telephone: None,
            filiere: (!filiere.is_empty()).then(|| filiere.to_string()),
            status,
            section_id: None,
        }
    }

    /// Creates a Top30 entry; ranked students are always mid-interview
    pub fn ranked(id: i64, filiere: &str, total: f64) -> RankedStudent {
        RankedStudent {
            student: student(id, &format!("Etudiant{}", id), filiere, StudentStatus::InInterview),
            total: Some(total),
        }
    }

    pub fn sample_questions(filiere: &str) -> (Vec<Question>, Vec<Question>) {
        (
            vec![
                Question::personal(1, "Présentez-vous"),
                Question::personal(2, "Pourquoi cette formation ?"),
            ],
            vec![Question::technical(10, "Qu'est-ce que HTTP ?", filiere)],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use crate::models::domain::StudentStatus;

    #[test]
    fn test_fixtures_student() {
        let s = student(4, "Alami", "Web", StudentStatus::Attende);
        assert_eq!(s.email.as_deref(), Some("alami@example.com"));
        assert_eq!(s.filiere.as_deref(), Some("Web"));
        assert!(student(5, "Sans", "", StudentStatus::Registred).filiere.is_none());
    }

    #[test]
    fn test_fixtures_ranked() {
        let r = ranked(2, "Data", 51.5);
        assert_eq!(r.student.status, StudentStatus::InInterview);
        assert_eq!(r.total, Some(51.5));
    }

    #[test]
    fn test_fixtures_sample_questions() {
        let (personal, technical) = sample_questions("Web");
        assert_eq!(personal.len(), 2);
        assert_eq!(technical[0].filiere.as_deref(), Some("Web"));
    }
}
