//! Response validation and status parsing
//!
//! Every rule maps to a `ValidationError` variant instead of a panic, so the
//! poll loop can report a malformed response and carry on.

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::models::{HomeworkResponse, HomeworkStatus};

pub const HOMEWORKS_KEY: &str = "homeworks";
pub const CURRENT_DATE_KEY: &str = "current_date";
pub const HOMEWORK_NAME_KEY: &str = "homework_name";
pub const STATUS_KEY: &str = "status";

/// Coarse category of a validation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationKind {
    TypeError,
    MissingKey,
    UnexpectedValue,
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Ответ от API должен быть словарем, получен тип: {found}")]
    NotAnObject { found: &'static str },

    #[error("Ответ от API пуст")]
    EmptyResponse,

    #[error("Отсутствие ожидаемого ключа \"{0}\" в ответе API")]
    MissingKey(&'static str),

    #[error("Данные под ключом \"{key}\" должны быть типа {expected}, получен тип: {found}")]
    WrongType {
        key: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Неожиданный статус домашней работы: {0}")]
    UnexpectedStatus(String),
}

impl ValidationError {
    pub fn kind(&self) -> ValidationKind {
        match self {
            ValidationError::NotAnObject { .. } | ValidationError::WrongType { .. } => {
                ValidationKind::TypeError
            }
            ValidationError::EmptyResponse => ValidationKind::Empty,
            ValidationError::MissingKey(_) => ValidationKind::MissingKey,
            ValidationError::UnexpectedStatus(_) => ValidationKind::UnexpectedValue,
        }
    }
}

/// JSON type name used in error messages
fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Check the shape of a decoded API response.
///
/// Rules, in order: object, non-empty, `homeworks` present and an array,
/// `current_date` present and an integer.
pub fn check_response(response: &Value) -> Result<HomeworkResponse, ValidationError> {
    debug!("Checking API response: {}", response);

    let obj = response.as_object().ok_or(ValidationError::NotAnObject {
        found: json_type(response),
    })?;

    if obj.is_empty() {
        return Err(ValidationError::EmptyResponse);
    }

    let homeworks = obj
        .get(HOMEWORKS_KEY)
        .ok_or(ValidationError::MissingKey(HOMEWORKS_KEY))?;
    let homeworks = homeworks
        .as_array()
        .ok_or(ValidationError::WrongType {
            key: HOMEWORKS_KEY,
            expected: "array",
            found: json_type(homeworks),
        })?;

    let current_date = obj
        .get(CURRENT_DATE_KEY)
        .ok_or(ValidationError::MissingKey(CURRENT_DATE_KEY))?;
    let current_date = current_date
        .as_i64()
        .ok_or(ValidationError::WrongType {
            key: CURRENT_DATE_KEY,
            expected: "integer",
            found: json_type(current_date),
        })?;

    debug!(
        "API response passed validation ({} homeworks, current_date={})",
        homeworks.len(),
        current_date
    );

    Ok(HomeworkResponse {
        homeworks: homeworks.clone(),
        current_date,
    })
}

/// Build the chat message for a single homework record.
pub fn parse_status(homework: &Value) -> Result<String, ValidationError> {
    debug!("Parsing homework status: {}", homework);

    let record = homework.as_object().ok_or(ValidationError::WrongType {
        key: HOMEWORKS_KEY,
        expected: "object",
        found: json_type(homework),
    })?;

    let name = record
        .get(HOMEWORK_NAME_KEY)
        .ok_or(ValidationError::MissingKey(HOMEWORK_NAME_KEY))?;
    let name = name.as_str().ok_or(ValidationError::WrongType {
        key: HOMEWORK_NAME_KEY,
        expected: "string",
        found: json_type(name),
    })?;

    let status = record
        .get(STATUS_KEY)
        .ok_or(ValidationError::MissingKey(STATUS_KEY))?;
    let status: HomeworkStatus = match status.as_str() {
        Some(raw) => raw.parse::<HomeworkStatus>().map_err(ValidationError::UnexpectedStatus)?,
        None => return Err(ValidationError::UnexpectedStatus(status.to_string())),
    };

    let verdict = status.verdict();
    debug!("Parsed homework status: {} -> {}", status, verdict);

    Ok(format!(
        "Изменился статус проверки работы \"{}\". {}",
        name, verdict
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_check_response_accepts_empty_list() {
        let parsed = check_response(&json!({"homeworks": [], "current_date": 1})).unwrap();
        assert!(parsed.homeworks.is_empty());
        assert_eq!(parsed.current_date, 1);
    }

    #[test]
    fn test_check_response_keeps_order() {
        let parsed = check_response(&json!({
            "homeworks": [
                {"homework_name": "hw2", "status": "reviewing"},
                {"homework_name": "hw1", "status": "approved"}
            ],
            "current_date": 1700000000
        }))
        .unwrap();
        assert_eq!(parsed.homeworks.len(), 2);
        assert_eq!(parsed.latest().unwrap()["homework_name"], "hw2");
        assert_eq!(parsed.current_date, 1_700_000_000);
    }

    #[test]
    fn test_check_response_homeworks_not_a_list() {
        let err = check_response(&json!({"homeworks": "not-a-list", "current_date": 1}))
            .unwrap_err();
        assert_eq!(err.kind(), ValidationKind::TypeError);
        assert_eq!(
            err,
            ValidationError::WrongType {
                key: HOMEWORKS_KEY,
                expected: "array",
                found: "string",
            }
        );
    }

    #[test]
    fn test_check_response_homeworks_single_object() {
        let err = check_response(&json!({
            "homeworks": {"homework_name": "hw1", "status": "approved"},
            "current_date": 1
        }))
        .unwrap_err();
        assert_eq!(err.kind(), ValidationKind::TypeError);
    }

    #[test]
    fn test_check_response_empty_object() {
        let err = check_response(&json!({})).unwrap_err();
        assert_eq!(err, ValidationError::EmptyResponse);
        assert_eq!(err.kind(), ValidationKind::Empty);
    }

    #[test]
    fn test_check_response_not_an_object() {
        let err = check_response(&json!([{"homeworks": []}])).unwrap_err();
        assert_eq!(err, ValidationError::NotAnObject { found: "array" });

        let err = check_response(&json!(42)).unwrap_err();
        assert_eq!(err.kind(), ValidationKind::TypeError);
    }

    #[test]
    fn test_check_response_missing_keys() {
        let err = check_response(&json!({"current_date": 1})).unwrap_err();
        assert_eq!(err, ValidationError::MissingKey(HOMEWORKS_KEY));

        let err = check_response(&json!({"homeworks": []})).unwrap_err();
        assert_eq!(err, ValidationError::MissingKey(CURRENT_DATE_KEY));
        assert_eq!(err.kind(), ValidationKind::MissingKey);
    }

    #[test]
    fn test_check_response_current_date_must_be_integer() {
        let err = check_response(&json!({"homeworks": [], "current_date": "yesterday"}))
            .unwrap_err();
        assert_eq!(err.kind(), ValidationKind::TypeError);
    }

    #[test]
    fn test_parse_status_approved() {
        let message = parse_status(&json!({"homework_name": "hw1", "status": "approved"})).unwrap();
        assert_eq!(
            message,
            "Изменился статус проверки работы \"hw1\". Работа проверена: ревьюеру всё понравилось. Ура!"
        );
    }

    #[test]
    fn test_parse_status_all_known_statuses() {
        for status in HomeworkStatus::ALL {
            let message =
                parse_status(&json!({"homework_name": "hw", "status": status.as_str()})).unwrap();
            assert!(message.ends_with(status.verdict()));
        }
    }

    #[test]
    fn test_parse_status_unknown_status() {
        let err = parse_status(&json!({"homework_name": "hw1", "status": "unknown"})).unwrap_err();
        assert_eq!(err, ValidationError::UnexpectedStatus("unknown".to_string()));
        assert_eq!(err.kind(), ValidationKind::UnexpectedValue);
    }

    #[test]
    fn test_parse_status_non_string_status() {
        let err = parse_status(&json!({"homework_name": "hw1", "status": 3})).unwrap_err();
        assert_eq!(err.kind(), ValidationKind::UnexpectedValue);
    }

    #[test]
    fn test_parse_status_missing_name() {
        let err = parse_status(&json!({"status": "approved"})).unwrap_err();
        assert_eq!(err, ValidationError::MissingKey(HOMEWORK_NAME_KEY));
        assert_eq!(err.kind(), ValidationKind::MissingKey);
    }

    #[test]
    fn test_parse_status_missing_status() {
        let err = parse_status(&json!({"homework_name": "hw1"})).unwrap_err();
        assert_eq!(err, ValidationError::MissingKey(STATUS_KEY));
    }

    #[test]
    fn test_parse_status_record_not_object() {
        let err = parse_status(&json!("hw1")).unwrap_err();
        assert_eq!(err.kind(), ValidationKind::TypeError);
    }
}
