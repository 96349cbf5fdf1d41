//! Structured payload validation results.
//!
//! Request parsing collects every failed field instead of stopping at the
//! first one, so a client can fix a payload in a single round trip.

use std::fmt;

use serde::Serialize;

/// Constraint a field failed to satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum Constraint {
    Required,
    Email,
    MinLength { min: usize },
    MaxLength { max: usize },
    NonNegative,
    Finite,
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Required => write!(f, "is required"),
            Constraint::Email => write!(f, "must be a valid email address"),
            Constraint::MinLength { min } => write!(f, "must be at least {} characters", min),
            Constraint::MaxLength { max } => write!(f, "must be at most {} characters", max),
            Constraint::NonNegative => write!(f, "must not be negative"),
            Constraint::Finite => write!(f, "must be a finite number"),
        }
    }
}

/// A single failed field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: &'static str,
    #[serde(flatten)]
    pub constraint: Constraint,
}

/// Every violation found in one payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    violations: Vec<FieldViolation>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, constraint: Constraint) {
        self.violations.push(FieldViolation { field, constraint });
    }

    /// Record `Required` when `value` is blank.
    ///
    /// # Returns
    /// True when the value is present
    pub fn require(&mut self, field: &'static str, value: &str) -> bool {
        if value.trim().is_empty() {
            self.add(field, Constraint::Required);
            false
        } else {
            true
        }
    }

    /// Record length violations for `value`, counted in characters.
    pub fn check_length(&mut self, field: &'static str, value: &str, min: usize, max: usize) {
        let length = value.chars().count();
        if length < min {
            self.add(field, Constraint::MinLength { min });
        } else if length > max {
            self.add(field, Constraint::MaxLength { max });
        }
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    pub fn has_violation(&self, field: &str, constraint: Constraint) -> bool {
        self.violations
            .iter()
            .any(|v| v.field == field && v.constraint == constraint)
    }

    /// Turn the collected result into `Ok(value)` when nothing failed.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid payload")?;
        for (i, violation) in self.violations.iter().enumerate() {
            let separator = if i == 0 { ": " } else { ", " };
            write!(
                f,
                "{}{} {}",
                separator, violation.field, violation.constraint
            )?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}
