// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration validation log
//!
//! Messages are templates with positional `{0}`, `{1}` placeholders, so the
//! same template can be matched in tests regardless of its arguments.

/// Severity of a validation entry
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// A single recorded validation message
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationEntry {
    pub severity: Severity,
    pub template: String,
    pub args: Vec<String>,
}

impl ValidationEntry {
    /// The template with its arguments substituted
    pub fn message(&self) -> String {
        format_message(&self.template, &self.args)
    }
}

/// Sink for validation errors and warnings
pub trait ValidationLog: Send {
    fn add_error(&mut self, message: &str, args: &[&str]);
    fn add_warning(&mut self, message: &str, args: &[&str]);
    fn number_of_errors(&self) -> usize;
    fn number_of_warnings(&self) -> usize;
    fn entries(&self) -> &[ValidationEntry];
    fn reset(&mut self);
}

/// Validation log that keeps every entry in memory
#[derive(Clone, Debug, Default)]
pub struct CollectingValidationLog {
    entries: Vec<ValidationEntry>,
}

impl CollectingValidationLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, severity: Severity, message: &str, args: &[&str]) {
        let entry = ValidationEntry {
            severity,
            template: message.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        };
        match severity {
            Severity::Error => tracing::error!(message = %entry.message(), "validation error"),
            Severity::Warning => tracing::warn!(message = %entry.message(), "validation warning"),
        }
        self.entries.push(entry);
    }

    fn count(&self, severity: Severity) -> usize {
        self.entries.iter().filter(|e| e.severity == severity).count()
    }
}

impl ValidationLog for CollectingValidationLog {
    fn add_error(&mut self, message: &str, args: &[&str]) {
        self.push(Severity::Error, message, args);
    }

    fn add_warning(&mut self, message: &str, args: &[&str]) {
        self.push(Severity::Warning, message, args);
    }

    fn number_of_errors(&self) -> usize {
        self.count(Severity::Error)
    }

    fn number_of_warnings(&self) -> usize {
        self.count(Severity::Warning)
    }

    fn entries(&self) -> &[ValidationEntry] {
        &self.entries
    }

    fn reset(&mut self) {
        self.entries.clear();
    }
}

/// Substitute `{n}` placeholders with positional arguments.
///
/// Placeholders without a matching argument are left untouched.
pub fn format_message(template: &str, args: &[String]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let replaced = after.find('}').and_then(|close| {
            let index: usize = after[..close].parse().ok()?;
            let arg = args.get(index)?;
            Some((arg, close))
        });
        match replaced {
            Some((arg, close)) => {
                out.push_str(arg);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
#[path = "validation_tests.rs"]
mod tests;
