use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("catalog must contain at least one question")]
    Empty,

    #[error("question {index} has an empty prompt or answer")]
    BlankQuestion { index: usize },
}

/// A single prompt with its expected free-text answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    prompt: String,
    answer: String,
}

impl Question {
    #[must_use]
    pub fn new(prompt: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            answer: answer.into(),
        }
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn answer(&self) -> &str {
        &self.answer
    }

    /// Whether `given` matches the expected answer.
    ///
    /// Surrounding whitespace of `given` is ignored and the comparison is
    /// case-insensitive over full Unicode lowercase, so "  rīga " and "RĪGA"
    /// both match "Rīga".
    #[must_use]
    pub fn accepts(&self, given: &str) -> bool {
        given.trim().to_lowercase() == self.answer.to_lowercase()
    }
}

/// Fixed, ordered list of questions played every session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    questions: Vec<Question>,
}

impl Catalog {
    /// Number of questions in the standard catalog.
    pub const STANDARD_SIZE: usize = 5;

    /// Build a catalog from custom questions.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Empty` for an empty list and
    /// `CatalogError::BlankQuestion` if any prompt or answer is blank.
    pub fn new(questions: Vec<Question>) -> Result<Self, CatalogError> {
        if questions.is_empty() {
            return Err(CatalogError::Empty);
        }
        if let Some(index) = questions
            .iter()
            .position(|q| q.prompt.trim().is_empty() || q.answer.trim().is_empty())
        {
            return Err(CatalogError::BlankQuestion { index });
        }
        Ok(Self { questions })
    }

    /// The built-in math and general knowledge questions.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            questions: vec![
                Question::new("Cik ir 5 + 3?", "8"),
                Question::new("Kas ir Latvijas galvaspilsēta?", "Rīga"),
                Question::new("Kāds ir 2 * 6?", "12"),
                Question::new("Kurš ir lielākais planētas okeāns?", "Klusais"),
                Question::new("Cik ir 10 / 2?", "5"),
            ],
        }
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Always false for a constructed catalog.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Looks up the expected answer for a prompt.
    #[must_use]
    pub fn answer_for(&self, prompt: &str) -> Option<&str> {
        self.questions
            .iter()
            .find(|q| q.prompt == prompt)
            .map(Question::answer)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_catalog_has_five_questions() {
        let catalog = Catalog::standard();
        assert_eq!(catalog.len(), Catalog::STANDARD_SIZE);
        assert_eq!(catalog.answer_for("Cik ir 5 + 3?"), Some("8"));
        assert_eq!(catalog.answer_for("unknown"), None);
    }

    #[test]
    fn answers_are_trimmed_and_case_insensitive() {
        let question = Question::new("Kas ir Latvijas galvaspilsēta?", "Rīga");
        assert!(question.accepts("  rīga  "));
        assert!(question.accepts("RĪGA"));
        assert!(question.accepts("Rīga\n"));
        assert!(!question.accepts("Riga"));
        assert!(!question.accepts(""));
    }

    #[test]
    fn numeric_answers_need_exact_digits() {
        let question = Question::new("Kāds ir 2 * 6?", "12");
        assert!(question.accepts(" 12 "));
        assert!(!question.accepts("12.0"));
    }

    #[test]
    fn empty_catalog_is_rejected() {
        assert_eq!(Catalog::new(Vec::new()).unwrap_err(), CatalogError::Empty);
    }

    #[test]
    fn blank_question_is_rejected() {
        let err = Catalog::new(vec![Question::new("Q", "A"), Question::new("Q2", "  ")])
            .unwrap_err();
        assert_eq!(err, CatalogError::BlankQuestion { index: 1 });
    }
}
