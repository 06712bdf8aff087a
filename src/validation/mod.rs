//! Submission validation.
//!
//! # Data Flow
//! ```text
//! untyped body (JSON object or decoded form)
//!     → email rule → rating rule → message rule → agent rule
//!     → NewFeedback            (every rule passed)
//!     → Vec<FieldError>        (one entry per failing field)
//! ```
//!
//! # Design Decisions
//! - Rules are pure functions of the submitted value
//! - All fields are checked; errors are not short-circuited
//! - Sanitizing (trim, email canonicalization) happens inside the rule that accepts the value

pub mod email;

use serde::Serialize;
use serde_json::{Map, Value};

use self::email::{is_valid_email, normalize_email};

use crate::storage::NewFeedback;

/// Longest accepted `message` or `agent`, in characters, after trimming.
pub const MAX_TEXT_LEN: usize = 1000;

pub const MIN_RATING: i64 = 1;
pub const MAX_RATING: i64 = 5;

/// An untyped submission as decoded from the request body.
pub type Submission = Map<String, Value>;

/// One rejected field, serialized into the `errors` array of a 400 response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    pub msg: &'static str,
    pub path: &'static str,
    pub location: &'static str,
}

impl FieldError {
    fn new(path: &'static str, value: Option<Value>, msg: &'static str) -> Self {
        Self {
            kind: "field",
            value,
            msg,
            path,
            location: "body",
        }
    }
}

type Rule<T> = fn(Option<&Value>) -> Result<T, &'static str>;

/// Run every field rule over a submission.
pub fn validate_submission(input: &Submission) -> Result<NewFeedback, Vec<FieldError>> {
    let email = apply(input, "email", email_rule);
    let rating = apply(input, "rating", rating_rule);
    let message = apply(input, "message", text_rule);
    let agent = apply(input, "agent", text_rule);

    match (email, rating, message, agent) {
        (Ok(email), Ok(rating), Ok(message), Ok(agent)) => Ok(NewFeedback {
            email,
            rating,
            message,
            agent,
        }),
        (email, rating, message, agent) => Err([email.err(), rating.err(), message.err(), agent.err()]
            .into_iter()
            .flatten()
            .collect()),
    }
}

fn apply<T>(input: &Submission, field: &'static str, rule: Rule<T>) -> Result<T, FieldError> {
    let value = input.get(field);
    rule(value).map_err(|msg| FieldError::new(field, value.cloned(), msg))
}

fn email_rule(value: Option<&Value>) -> Result<String, &'static str> {
    match value {
        Some(Value::String(s)) if is_valid_email(s) => Ok(normalize_email(s)),
        _ => Err("Must be a valid email address"),
    }
}

fn rating_rule(value: Option<&Value>) -> Result<i64, &'static str> {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0)
                .map(|f| f as i64)
        }),
        Some(Value::String(s)) => s.parse::<i64>().ok(),
        _ => None,
    };

    parsed
        .filter(|r| (MIN_RATING..=MAX_RATING).contains(r))
        .ok_or("Rating must be an integer between 1 and 5")
}

fn text_rule(value: Option<&Value>) -> Result<String, &'static str> {
    match value {
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.chars().count() > MAX_TEXT_LEN {
                Err("Must be at most 1000 characters")
            } else {
                Ok(trimmed.to_string())
            }
        }
        _ => Err("Must be a string"),
    }
}
