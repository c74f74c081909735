//! Field-by-field validation of inbound summary requests.
//!
//! Works on the raw JSON value so that every violation is reported at once,
//! each with the exact path of the offending field.

use serde_json::{Map, Value};

use crate::errors::{FieldError, PathSegment};
use crate::summary::models::SummaryRequest;

struct Collector {
    errors: Vec<FieldError>,
}

impl Collector {
    fn push(&mut self, path: Vec<PathSegment>, message: &str) {
        self.errors.push(FieldError::new(path, message));
    }
}

fn path_of(base: &[PathSegment], key: &str) -> Vec<PathSegment> {
    let mut path = base.to_vec();
    path.push(PathSegment::from(key));
    path
}

fn require_text(obj: &Map<String, Value>, key: &str, base: &[PathSegment], c: &mut Collector) {
    match obj.get(key) {
        None | Some(Value::Null) => c.push(path_of(base, key), "is required"),
        Some(Value::String(s)) if s.trim().is_empty() => {
            c.push(path_of(base, key), "must not be empty")
        }
        Some(Value::String(_)) => {}
        Some(_) => c.push(path_of(base, key), "must be a string"),
    }
}

fn optional_text(obj: &Map<String, Value>, key: &str, base: &[PathSegment], c: &mut Collector) {
    match obj.get(key) {
        None | Some(Value::Null) | Some(Value::String(_)) => {}
        Some(_) => c.push(path_of(base, key), "must be a string or null"),
    }
}

fn require_id(obj: &Map<String, Value>, key: &str, base: &[PathSegment], c: &mut Collector) {
    match obj.get(key) {
        None | Some(Value::Null) => c.push(path_of(base, key), "is required"),
        Some(Value::Number(n)) => match n.as_i64() {
            Some(id) if id > 0 => {}
            Some(_) => c.push(path_of(base, key), "must be a positive integer"),
            None if n.is_u64() => {
                c.push(path_of(base, key), "is out of range")
            }
            None => c.push(path_of(base, key), "must be an integer"),
        },
        Some(_) => c.push(path_of(base, key), "must be a positive integer"),
    }
}

fn optional_duration(
    obj: &Map<String, Value>,
    key: &str,
    base: &[PathSegment],
    c: &mut Collector,
) {
    match obj.get(key) {
        None | Some(Value::Null) => {}
        Some(Value::Number(n)) if n.is_u64() => {}
        Some(Value::Number(n)) if n.as_i64().is_some_and(|v| v < 0) => {
            c.push(path_of(base, key), "must not be negative")
        }
        Some(_) => c.push(path_of(base, key), "must be a non-negative integer"),
    }
}

fn validate_answer(item: &Value, index: usize, c: &mut Collector) {
    let base = vec![PathSegment::from("answers"), PathSegment::from(index)];
    let Some(obj) = item.as_object() else {
        c.push(base, "must be an object");
        return;
    };

    require_id(obj, "questionId", &base, c);
    require_text(obj, "questionText", &base, c);
    optional_text(obj, "answer", &base, c);
    optional_text(obj, "transcript", &base, c);
    optional_duration(obj, "durationSeconds", &base, c);
}

/// Validates `value` against the summary request schema and, when it
/// passes, returns the typed request. On failure returns every violation
/// found, in document order.
pub fn validate_request(value: &Value) -> Result<SummaryRequest, Vec<FieldError>> {
    let mut c = Collector { errors: Vec::new() };

    let Some(obj) = value.as_object() else {
        return Err(vec![FieldError::new(vec![], "must be a JSON object")]);
    };

    require_text(obj, "username", &[], &mut c);
    require_id(obj, "applicantId", &[], &mut c);
    require_id(obj, "interviewId", &[], &mut c);
    require_text(obj, "applicantName", &[], &mut c);
    require_text(obj, "jobRole", &[], &mut c);

    match obj.get("answers") {
        None | Some(Value::Null) => c.push(vec!["answers".into()], "is required"),
        Some(Value::Array(items)) => {
            for (index, item) in items.iter().enumerate() {
                validate_answer(item, index, &mut c);
            }
        }
        Some(_) => c.push(vec!["answers".into()], "must be an array"),
    }

    optional_text(obj, "skillsSummary", &[], &mut c);

    if !c.errors.is_empty() {
        return Err(c.errors);
    }

    serde_json::from_value(value.clone())
        .map_err(|e| vec![FieldError::new(vec![], format!("could not be read: {e}"))])
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn valid() -> Value {
        json!({
            "username": "alice",
            "applicantId": 12,
            "interviewId": 4,
            "applicantName": "Ada Lovelace",
            "jobRole": "Backend Engineer",
            "answers": [
                {
                    "questionId": 1,
                    "questionText": "Describe a system you built",
                    "answer": "A message broker in Rust",
                    "transcript": null,
                    "durationSeconds": 95
                },
                {
                    "questionId": 2,
                    "questionText": "How do you debug production issues?",
                    "answer": null,
                    "transcript": "I start from the metrics"
                }
            ],
            "skillsSummary": "Rust, Postgres"
        })
    }

    fn paths(errors: &[FieldError]) -> Vec<Value> {
        errors
            .iter()
            .map(|e| serde_json::to_value(&e.path).unwrap())
            .collect()
    }

    #[test]
    fn test_valid_request_passes() {
        let request = validate_request(&valid()).unwrap();
        assert_eq!(request.applicant_id, 12);
        assert_eq!(request.answers.len(), 2);
        assert_eq!(request.answers[0].duration_seconds, Some(95));
        assert_eq!(request.skills_summary.as_deref(), Some("Rust, Postgres"));
    }

    #[test]
    fn test_missing_applicant_id() {
        let mut body = valid();
        body.as_object_mut().unwrap().remove("applicantId");

        let errors = validate_request(&body).unwrap_err();
        assert_eq!(paths(&errors), vec![json!(["applicantId"])]);
        assert_eq!(errors[0].message, "is required");
    }

    #[test]
    fn test_every_violation_is_reported() {
        let mut body = valid();
        body["interviewId"] = json!(0);
        body["jobRole"] = json!(42);
        body["answers"][1]["durationSeconds"] = json!(-3);
        body["answers"][0]["questionText"] = json!("");

        let errors = validate_request(&body).unwrap_err();
        assert_eq!(
            paths(&errors),
            vec![
                json!(["interviewId"]),
                json!(["jobRole"]),
                json!(["answers", 0, "questionText"]),
                json!(["answers", 1, "durationSeconds"]),
            ]
        );
        assert_eq!(errors[3].message, "must not be negative");
    }

    #[test]
    fn test_negative_identity_is_rejected() {
        let mut body = valid();
        body["applicantId"] = json!(-1);
        let errors = validate_request(&body).unwrap_err();
        assert_eq!(errors[0].message, "must be a positive integer");
    }

    #[test]
    fn test_fractional_identity_is_rejected() {
        let mut body = valid();
        body["applicantId"] = json!(1.5);
        let errors = validate_request(&body).unwrap_err();
        assert_eq!(errors[0].message, "must be an integer");
    }

    #[test]
    fn test_string_identity_is_rejected() {
        let mut body = valid();
        body["interviewId"] = json!("4");
        let errors = validate_request(&body).unwrap_err();
        assert_eq!(paths(&errors), vec![json!(["interviewId"])]);
    }

    #[test]
    fn test_fractional_duration_is_rejected() {
        let mut body = valid();
        body["answers"][0]["durationSeconds"] = json!(2.5);
        let errors = validate_request(&body).unwrap_err();
        assert_eq!(errors[0].message, "must be a non-negative integer");
    }

    #[test]
    fn test_answers_must_be_array_of_objects() {
        let mut body = valid();
        body["answers"] = json!("none");
        assert_eq!(
            paths(&validate_request(&body).unwrap_err()),
            vec![json!(["answers"])]
        );

        body["answers"] = json!([7]);
        assert_eq!(
            paths(&validate_request(&body).unwrap_err()),
            vec![json!(["answers", 0])]
        );
    }

    #[test]
    fn test_empty_answers_are_allowed() {
        let mut body = valid();
        body["answers"] = json!([]);
        assert!(validate_request(&body).is_ok());
    }

    #[test]
    fn test_nullable_fields_accept_null() {
        let mut body = valid();
        body["skillsSummary"] = json!(null);
        body["answers"][0]["answer"] = json!(null);
        body["answers"][0]["durationSeconds"] = json!(null);
        let request = validate_request(&body).unwrap();
        assert_eq!(request.skills_summary, None);
        assert_eq!(request.answers[0].duration_seconds, None);
    }

    #[test]
    fn test_wrong_type_for_nullable_text() {
        let mut body = valid();
        body["answers"][1]["transcript"] = json!(["a"]);
        body["skillsSummary"] = json!(false);
        assert_eq!(
            paths(&validate_request(&body).unwrap_err()),
            vec![json!(["answers", 1, "transcript"]), json!(["skillsSummary"])]
        );
    }

    #[test]
    fn test_non_object_body() {
        let errors = validate_request(&json!([1, 2])).unwrap_err();
        assert_eq!(paths(&errors), vec![json!([])]);
    }

    #[test]
    fn test_blank_username_is_rejected() {
        let mut body = valid();
        body["username"] = json!("   ");
        let errors = validate_request(&body).unwrap_err();
        assert_eq!(paths(&errors), vec![json!(["username"])]);
        assert_eq!(errors[0].message, "must not be empty");
    }
}
