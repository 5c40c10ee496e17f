use serde::{Deserialize, Serialize};

/// Interview result as submitted to `POST /resultats`.
///
/// `total` is always `score_p + score_t + score_s`; build it through
/// [`InterviewResult::new`] rather than by hand.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct InterviewResult {
    pub id_stu: i64,
    #[serde(rename = "scoreP")]
    pub score_p: u32,
    #[serde(rename = "scoreT")]
    pub score_t: u32,
    #[serde(rename = "scoreS")]
    pub score_s: u32,
    pub total: u32,
}

impl InterviewResult {
    pub fn new(id_stu: i64, score_p: u32, score_t: u32, score_s: u32) -> Self {
        Self {
            id_stu,
            score_p,
            score_t,
            score_s,
            total: score_p + score_t + score_s,
        }
    }

    pub fn is_consistent(&self) -> bool {
        self.total == self.score_p + self.score_t + self.score_s
    }
}
