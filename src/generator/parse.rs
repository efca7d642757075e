//! Parsing and validation of raw model output.

use serde_json::Value;

use super::llm::LlmError;
use super::{AnswerLetter, QuizQuestion, OPTIONS_PER_QUESTION, QUIZ_LENGTH};

/// Reasons a quiz response is rejected
#[derive(thiserror::Error, Debug)]
pub enum QuizError {
    #[error("{0}")]
    Completion(#[from] LlmError),

    #[error("AI response is not in JSON format")]
    NotJson,

    #[error("Failed to parse AI response as JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("AI generated {0} questions instead of 10. Expected exactly 10.")]
    WrongQuestionCount(usize),

    #[error("Question {0} missing required fields")]
    MissingField(usize),

    #[error("Question {0} doesn't have exactly 4 options")]
    WrongOptionCount(usize),

    #[error("Question {0} has invalid correct_answer")]
    InvalidAnswerLetter(usize),

    #[error("Question {index} has a non-text {field}")]
    InvalidFieldType { index: usize, field: &'static str },
}

/// Split a numbered-list response into key points.
///
/// Lines starting with a single digit 1-9 followed by `.` are points, with the
/// text before the first `". "` stripped. Two-digit enumerators such as `10.`
/// do not qualify. When no line qualifies, every non-blank line becomes a point.
pub fn parse_key_points(raw: &str) -> Vec<String> {
    let lines = raw.trim().split('\n').map(str::trim);

    let numbered: Vec<String> = lines
        .clone()
        .filter(|line| has_single_digit_enumerator(line))
        .map(|line| line.split_once(". ").map_or(line, |(_, rest)| rest))
        .filter(|point| !point.is_empty())
        .map(str::to_string)
        .collect();

    if !numbered.is_empty() {
        return numbered;
    }

    lines
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn has_single_digit_enumerator(line: &str) -> bool {
    let mut chars = line.chars();
    matches!(
        (chars.next(), chars.next()),
        (Some('1'..='9'), Some('.'))
    )
}

/// Extract and validate the quiz JSON array from a model response.
///
/// The payload is the text between the first `[` and the last `]`. Checks run
/// in order and the first failure rejects the whole quiz: question count,
/// required fields, option count, answer letter. Option uniqueness is not
/// checked.
pub fn parse_quiz(raw: &str) -> Result<Vec<QuizQuestion>, QuizError> {
    let start = raw.find('[').ok_or(QuizError::NotJson)?;
    let end = raw.rfind(']').ok_or(QuizError::NotJson)?;

    let payload = if end > start { &raw[start..=end] } else { "" };
    let items: Vec<Value> = serde_json::from_str(payload)?;

    if items.len() != QUIZ_LENGTH {
        return Err(QuizError::WrongQuestionCount(items.len()));
    }

    items
        .iter()
        .enumerate()
        .map(|(i, item)| parse_question(i + 1, item))
        .collect()
}

fn parse_question(index: usize, item: &Value) -> Result<QuizQuestion, QuizError> {
    let (Some(question), Some(options), Some(answer)) = (
        item.get("question"),
        item.get("options"),
        item.get("correct_answer"),
    ) else {
        return Err(QuizError::MissingField(index));
    };

    let options = match options.as_array() {
        Some(options) if options.len() == OPTIONS_PER_QUESTION => options,
        _ => return Err(QuizError::WrongOptionCount(index)),
    };

    let correct_answer = answer
        .as_str()
        .and_then(AnswerLetter::from_letter)
        .ok_or(QuizError::InvalidAnswerLetter(index))?;

    let question = question
        .as_str()
        .ok_or(QuizError::InvalidFieldType {
            index,
            field: "question",
        })?
        .to_string();

    let options: Vec<String> = options
        .iter()
        .map(|option| option.as_str().map(str::to_string))
        .collect::<Option<_>>()
        .ok_or(QuizError::InvalidFieldType {
            index,
            field: "options",
        })?;

    let options = <[String; OPTIONS_PER_QUESTION]>::try_from(options)
        .map_err(|_| QuizError::WrongOptionCount(index))?;

    Ok(QuizQuestion {
        question,
        options,
        correct_answer,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn question_json(n: usize) -> Value {
        json!({
            "question": format!("Question {}?", n),
            "options": ["alpha", "beta", "gamma", "delta"],
            "correct_answer": "B"
        })
    }

    fn quiz_json(count: usize) -> Vec<Value> {
        (1..=count).map(question_json).collect()
    }

    #[test]
    fn test_parse_key_points_numbered() {
        let raw = "Here are the points:\n1. Define energy\n2. Explain conservation\n\n3. Apply formulas";
        assert_eq!(
            parse_key_points(raw),
            vec!["Define energy", "Explain conservation", "Apply formulas"]
        );
    }

    #[test]
    fn test_parse_key_points_fallback_to_lines() {
        let raw = "- Define energy\n\n- Explain conservation\n";
        assert_eq!(parse_key_points(raw), vec!["- Define energy", "- Explain conservation"]);
    }

    #[test]
    fn test_parse_key_points_ignores_two_digit_enumerators() {
        let raw = "1. First\n9. Ninth\n10. Tenth";
        assert_eq!(parse_key_points(raw), vec!["First", "Ninth"]);
    }

    #[test]
    fn test_parse_key_points_two_digit_only_falls_back_verbatim() {
        assert_eq!(parse_key_points("10. Something"), vec!["10. Something"]);
    }

    #[test]
    fn test_parse_key_points_without_space_after_period() {
        // No ". " separator, the whole line is kept
        assert_eq!(parse_key_points("1.Define energy"), vec!["1.Define energy"]);
    }

    #[test]
    fn test_parse_key_points_is_repeatable() {
        let raw = "1. Alpha\n2. Beta\n3. Gamma";
        assert_eq!(parse_key_points(raw), parse_key_points(raw));
    }

    #[test]
    fn test_parse_quiz_tolerates_surrounding_text() {
        let raw = format!(
            "Sure! Here is your quiz:\n{}\nGood luck [really].",
            serde_json::to_string(&quiz_json(10)).unwrap()
        );
        // The trailing bracket makes the payload invalid JSON
        assert!(matches!(parse_quiz(&raw), Err(QuizError::InvalidJson(_))));

        let raw = format!(
            "Sure! Here is your quiz:\n{}\nGood luck.",
            serde_json::to_string_pretty(&quiz_json(10)).unwrap()
        );
        let quiz = parse_quiz(&raw).unwrap();
        assert_eq!(quiz.len(), 10);
        assert_eq!(quiz[0].question, "Question 1?");
        assert_eq!(quiz[9].question, "Question 10?");
        assert_eq!(quiz[3].correct_answer, AnswerLetter::B);
    }

    #[test]
    fn test_parse_quiz_requires_brackets() {
        assert!(matches!(parse_quiz("no json here"), Err(QuizError::NotJson)));
        assert!(matches!(parse_quiz("{\"question\": 1}"), Err(QuizError::NotJson)));
        assert!(matches!(parse_quiz("] reversed ["), Err(QuizError::InvalidJson(_))));
    }

    #[test]
    fn test_parse_quiz_rejects_wrong_count() {
        let nine = serde_json::to_string(&quiz_json(9)).unwrap();
        let err = parse_quiz(&nine).unwrap_err();
        assert!(matches!(err, QuizError::WrongQuestionCount(9)));
        assert_eq!(
            err.to_string(),
            "AI generated 9 questions instead of 10. Expected exactly 10."
        );

        let eleven = serde_json::to_string(&quiz_json(11)).unwrap();
        assert!(matches!(parse_quiz(&eleven), Err(QuizError::WrongQuestionCount(11))));
    }

    #[test]
    fn test_parse_quiz_reports_first_invalid_question() {
        let mut items = quiz_json(10);
        items[2].as_object_mut().unwrap().remove("correct_answer");
        items[5]["options"] = json!(["only", "three", "options"]);
        let err = parse_quiz(&serde_json::to_string(&items).unwrap()).unwrap_err();
        assert!(matches!(err, QuizError::MissingField(3)));
        assert_eq!(err.to_string(), "Question 3 missing required fields");
    }

    #[test]
    fn test_parse_quiz_rejects_wrong_option_count() {
        let mut items = quiz_json(10);
        items[5]["options"] = json!(["a", "b", "c", "d", "e"]);
        let err = parse_quiz(&serde_json::to_string(&items).unwrap()).unwrap_err();
        assert!(matches!(err, QuizError::WrongOptionCount(6)));
    }

    #[test]
    fn test_parse_quiz_rejects_invalid_answer_letter() {
        for bad in [json!("E"), json!("a"), json!(1), json!("Option A")] {
            let mut items = quiz_json(10);
            items[9]["correct_answer"] = bad;
            let err = parse_quiz(&serde_json::to_string(&items).unwrap()).unwrap_err();
            assert!(matches!(err, QuizError::InvalidAnswerLetter(10)));
        }
    }

    #[test]
    fn test_parse_quiz_accepts_duplicate_options() {
        let items: Vec<Value> = (1..=10)
            .map(|n| {
                json!({
                    "question": format!("Q{}", n),
                    "options": ["same", "same", "same", "same"],
                    "correct_answer": "D"
                })
            })
            .collect();
        let quiz = parse_quiz(&serde_json::to_string(&items).unwrap()).unwrap();
        assert_eq!(quiz.len(), 10);
        assert!(quiz.iter().all(|q| q.options.iter().all(|o| o == "same")));
    }

    #[test]
    fn test_parse_quiz_rejects_non_text_question() {
        let mut items = quiz_json(10);
        items[0]["question"] = json!(42);
        let err = parse_quiz(&serde_json::to_string(&items).unwrap()).unwrap_err();
        assert!(matches!(
            err,
            QuizError::InvalidFieldType {
                index: 1,
                field: "question"
            }
        ));
    }
}
