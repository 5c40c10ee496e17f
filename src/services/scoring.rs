use std::collections::{HashMap, HashSet};

use crate::{
    errors::{AppError, AppResult},
    models::domain::{InterviewResult, Question, QuestionCategory},
};

pub const MIN_SCORE: u8 = 0;
pub const MAX_SCORE: u8 = 20;

/// Soft-skill score contributed by the interview flow. Soft skills are
/// scored elsewhere, so this stays at zero here.
pub const INTERVIEW_SOFT_SKILL_SCORE: u32 = 0;

/// Normalizes free-form field input into a score in `[0, 20]`.
///
/// Leading-integer parsing: `"12.7"` and `"12abc"` give 12, anything without
/// leading digits gives 0. Out-of-range values are clamped, never rejected.
pub fn clamp_score(raw: &str) -> u8 {
    clamp_value(parse_leading_int(raw).unwrap_or(0))
}

pub fn clamp_value(value: i64) -> u8 {
    value.clamp(MIN_SCORE as i64, MAX_SCORE as i64) as u8
}

fn parse_leading_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let mut seen_digit = false;
    let mut value: i64 = 0;
    for c in digits.chars() {
        let Some(d) = c.to_digit(10) else { break };
        seen_digit = true;
        value = value.saturating_mul(10).saturating_add(d as i64);
    }

    seen_digit.then_some(if negative { -value } else { value })
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScoreKey {
    pub question_id: i64,
    pub category: QuestionCategory,
}

impl ScoreKey {
    pub fn new(question_id: i64, category: QuestionCategory) -> Self {
        Self {
            question_id,
            category,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScoreTotals {
    pub score_p: u32,
    pub score_t: u32,
    pub score_s: u32,
    pub total: u32,
}

/// Transient per-question scores for one interview.
///
/// Totals are recomputed after every single edit, so [`ScoreSheet::totals`]
/// is never stale.
#[derive(Clone, Debug, Default)]
pub struct ScoreSheet {
    personal: Vec<Question>,
    technical: Vec<Question>,
    entries: HashMap<ScoreKey, u8>,
    totals: ScoreTotals,
}

impl ScoreSheet {
    pub fn new(personal: Vec<Question>, technical: Vec<Question>) -> Self {
        let mut sheet = Self {
            personal: unique_by_id(personal),
            technical: unique_by_id(technical),
            entries: HashMap::new(),
            totals: ScoreTotals::default(),
        };
        sheet.recompute();
        sheet
    }

    pub fn personal_questions(&self) -> &[Question] {
        &self.personal
    }

    pub fn technical_questions(&self) -> &[Question] {
        &self.technical
    }

    /// Replaces the loaded question set; entries for questions no longer
    /// loaded are kept but stop contributing.
    pub fn set_questions(&mut self, personal: Vec<Question>, technical: Vec<Question>) {
        self.personal = unique_by_id(personal);
        self.technical = unique_by_id(technical);
        self.recompute();
    }

    pub fn update_score(&mut self, question_id: i64, category: QuestionCategory, raw: &str) -> u8 {
        self.store(ScoreKey::new(question_id, category), clamp_score(raw))
    }

    pub fn update_score_value(
        &mut self,
        question_id: i64,
        category: QuestionCategory,
        value: i64,
    ) -> u8 {
        self.store(ScoreKey::new(question_id, category), clamp_value(value))
    }

    /// Form-field variant taking the `P` / `T` category code.
    pub fn update_score_code(&mut self, question_id: i64, code: char, raw: &str) -> AppResult<u8> {
        let category = QuestionCategory::from_code(code).ok_or_else(|| {
            AppError::ValidationError(format!("Unknown score category '{}'", code))
        })?;
        Ok(self.update_score(question_id, category, raw))
    }

    fn store(&mut self, key: ScoreKey, value: u8) -> u8 {
        self.entries.insert(key, value);
        self.recompute();
        value
    }

    pub fn score(&self, question_id: i64, category: QuestionCategory) -> Option<u8> {
        self.entries.get(&ScoreKey::new(question_id, category)).copied()
    }

    pub fn totals(&self) -> ScoreTotals {
        self.totals
    }

    pub fn question_count(&self) -> usize {
        self.personal.len() + self.technical.len()
    }

    /// Number of loaded questions that have a score.
    pub fn filled_count(&self) -> usize {
        self.loaded_keys()
            .filter(|key| self.entries.contains_key(key))
            .collect::<HashSet<_>>()
            .len()
    }

    pub fn is_complete(&self) -> bool {
        self.filled_count() >= self.question_count()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.recompute();
    }

    pub fn to_result(&self, student_id: i64) -> InterviewResult {
        InterviewResult::new(
            student_id,
            self.totals.score_p,
            self.totals.score_t,
            self.totals.score_s,
        )
    }

    fn loaded_keys(&self) -> impl Iterator<Item = ScoreKey> + '_ {
        let personal = self
            .personal
            .iter()
            .map(|q| ScoreKey::new(q.id, QuestionCategory::Personal));
        let technical = self
            .technical
            .iter()
            .map(|q| ScoreKey::new(q.id, QuestionCategory::Technical));
        personal.chain(technical)
    }

    fn category_sum(&self, questions: &[Question], category: QuestionCategory) -> u32 {
        questions
            .iter()
            .filter_map(|q| self.entries.get(&ScoreKey::new(q.id, category)))
            .map(|v| *v as u32)
            .sum()
    }

    fn recompute(&mut self) {
        let score_p = self.category_sum(&self.personal, QuestionCategory::Personal);
        let score_t = self.category_sum(&self.technical, QuestionCategory::Technical);
        let score_s = INTERVIEW_SOFT_SKILL_SCORE;

        self.totals = ScoreTotals {
            score_p,
            score_t,
            score_s,
            total: score_p + score_t + score_s,
        };
    }
}

/// Keeps the first question for each id.
fn unique_by_id(questions: Vec<Question>) -> Vec<Question> {
    let mut seen = HashSet::new();
    questions.into_iter().filter(|q| seen.insert(q.id)).collect()
}
