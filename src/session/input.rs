use thiserror::Error;

/// Why a submission was not judged. None of these consume an attempt.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AnswerError {
    #[error("please type a number")]
    InvalidInput { raw: String },

    #[error("this question is already finished")]
    QuestionClosed,

    #[error("borrow first: the top digit is smaller than the bottom digit")]
    BorrowRequired,

    #[error("no borrow is needed in this column")]
    BorrowNotNeeded,
}

impl AnswerError {
    /// Blank submissions are ignored silently by front ends; everything else
    /// gets a message.
    pub fn is_blank_input(&self) -> bool {
        matches!(self, AnswerError::InvalidInput { raw } if raw.trim().is_empty())
    }
}

/// Parses a free-text answer as a whole number.
pub fn parse_answer(raw: &str) -> Result<i64, AnswerError> {
    let trimmed = raw.trim();
    trimmed.parse::<i64>().map_err(|_| AnswerError::InvalidInput {
        raw: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_number() {
        assert_eq!(parse_answer("42"), Ok(42));
        assert_eq!(parse_answer("  7 \n"), Ok(7));
        assert_eq!(parse_answer("-3"), Ok(-3));
    }

    #[test]
    fn test_parse_rejects_empty() {
        let err = parse_answer("   ").unwrap_err();
        assert!(err.is_blank_input());
    }

    #[test]
    fn test_parse_rejects_non_numeric() {
        let err = parse_answer("twelve").unwrap_err();
        assert_eq!(
            err,
            AnswerError::InvalidInput {
                raw: "twelve".to_string()
            }
        );
        assert!(!err.is_blank_input());
        assert!(parse_answer("12abc").is_err());
        assert!(parse_answer("1.5").is_err());
    }
}
