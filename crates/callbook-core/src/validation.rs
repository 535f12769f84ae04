// SPDX-FileCopyrightText: 2026 Callbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Field validation for contact submissions.
//!
//! A [`ContactDraft`] carries the raw fields exactly as a client sent them.
//! Validation checks every field and collects all failures (it does not
//! fail fast), producing either a [`Contact`] or a [`ValidationErrors`] list.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use thiserror::Error;

use crate::dates::parse_day;
use crate::types::Contact;

/// Basic `local@domain.tld` shape.
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\S+@\S+\.\S+$").unwrap());

/// Shortest contact name ever accepted; configuration may raise it, never lower it.
pub const MIN_NAME_CHARS: usize = 2;

/// Limits applied to a submission before it may reach the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationRules {
    /// Minimum number of characters in the trimmed name.
    pub min_name_chars: usize,
    /// Minimum number of ASCII digits in the phone number.
    pub min_phone_digits: usize,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            min_name_chars: MIN_NAME_CHARS,
            min_phone_digits: 10,
        }
    }
}

/// A call counter as submitted: a JSON integer, a string, or anything else.
///
/// `Other` keeps fractions, booleans, and out-of-range numbers deserializable
/// so they are reported as a `timesCalled` field error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CountInput {
    Number(i64),
    Text(String),
    Other(serde_json::Value),
}

impl CountInput {
    fn parse(&self) -> Option<u32> {
        match self {
            CountInput::Number(n) => u32::try_from(*n).ok(),
            CountInput::Text(s) => s.trim().parse::<u32>().ok(),
            CountInput::Other(_) => None,
        }
    }
}

impl From<u32> for CountInput {
    fn from(n: u32) -> Self {
        CountInput::Number(i64::from(n))
    }
}

impl From<&str> for CountInput {
    fn from(s: &str) -> Self {
        CountInput::Text(s.to_string())
    }
}

/// An unvalidated contact submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub next_call_date: Option<String>,
    #[serde(default)]
    pub times_called: Option<CountInput>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Names of the validated fields, as they appear on the wire.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum ContactField {
    Name,
    Phone,
    Email,
    NextCallDate,
    TimesCalled,
}

/// A single field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: ContactField,
    pub message: String,
}

/// Every field error found in one submission.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("invalid contact: {}", summarize(.0))]
#[serde(transparent)]
pub struct ValidationErrors(pub Vec<FieldError>);

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationErrors {
    pub fn fields(&self) -> impl Iterator<Item = ContactField> + '_ {
        self.0.iter().map(|e| e.field)
    }

    pub fn contains(&self, field: ContactField) -> bool {
        self.fields().any(|f| f == field)
    }
}

impl ContactDraft {
    /// Normalized form of the submitted name, as used for lookups.
    pub fn normalized_name(&self) -> &str {
        self.name.trim()
    }

    /// Check every field against `rules`.
    pub fn validate(&self, rules: &ValidationRules) -> Result<Contact, ValidationErrors> {
        let mut errors = Vec::new();

        let name = self.normalized_name();
        let min_name_chars = rules.min_name_chars.max(MIN_NAME_CHARS);
        if name.chars().count() < min_name_chars {
            errors.push(FieldError {
                field: ContactField::Name,
                message: format!("name must be at least {min_name_chars} characters"),
            });
        }

        let phone = self.phone.trim();
        let digits = phone.chars().filter(|c| c.is_ascii_digit()).count();
        if digits < rules.min_phone_digits {
            errors.push(FieldError {
                field: ContactField::Phone,
                message: format!(
                    "phone number must have at least {} digits",
                    rules.min_phone_digits
                ),
            });
        }

        let email = self.email.trim();
        if !EMAIL_PATTERN.is_match(email) {
            errors.push(FieldError {
                field: ContactField::Email,
                message: "email must look like local@domain.tld".to_string(),
            });
        }

        let next_call_date = match self.next_call_date.as_deref().map(str::trim) {
            None | Some("") => {
                errors.push(FieldError {
                    field: ContactField::NextCallDate,
                    message: "a date for the next call is required".to_string(),
                });
                None
            }
            Some(raw) => match parse_day(raw) {
                Ok(day) => Some(day),
                Err(_) => {
                    errors.push(FieldError {
                        field: ContactField::NextCallDate,
                        message: format!("`{raw}` is not a valid date (expected YYYY-MM-DD)"),
                    });
                    None
                }
            },
        };

        let times_called = match self.times_called.as_ref().map(CountInput::parse) {
            Some(Some(n)) => Some(n),
            _ => {
                errors.push(FieldError {
                    field: ContactField::TimesCalled,
                    message: "times called must be a non-negative integer".to_string(),
                });
                None
            }
        };

        match (next_call_date, times_called) {
            (Some(next_call_date), Some(times_called)) if errors.is_empty() => Ok(Contact {
                name: name.to_string(),
                phone: phone.to_string(),
                email: email.to_string(),
                next_call_date,
                times_called,
                description: self.description.clone(),
            }),
            _ => Err(ValidationErrors(errors)),
        }
    }
}
