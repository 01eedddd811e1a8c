//! Plain-text summaries of a form session for the command line

use crate::state::{FormSession, ValidationFeedback};
use crate::transport::SubmissionReceipt;
use std::fmt::Write;

/// Category outline with required markers and current values
pub fn outline(session: &FormSession) -> String {
    let mut out = String::new();
    for group in session.groups() {
        let marker = if group.is_required { " *" } else { "" };
        let fold = if group.default_expanded() { "v" } else { ">" };
        let _ = writeln!(out, "{fold} {}{marker}", group.category.display_label());

        for field in &group.fields {
            let marker = if field.required { " *" } else { "" };
            let value = session
                .values()
                .get(&field.name)
                .map(|v| v.display_value())
                .unwrap_or_default();
            let value = if value.is_empty() {
                "(empty)".to_string()
            } else {
                value
            };
            let _ = writeln!(out, "    {}{marker}: {value}", field.label_id);
        }
    }
    out
}

/// Checkbox lines shown under the form
pub fn consent_lines(session: &FormSession, site_name: &str) -> Vec<String> {
    let check = |on: bool| if on { "[x]" } else { "[ ]" };
    vec![
        format!(
            "{} Email me about this sighting on {site_name}",
            check(session.accept_emails())
        ),
        format!(
            "{} I accept the terms and conditions",
            check(session.terms_accepted())
        ),
    ]
}

/// Error lines for a blocked submission, terms first
pub fn feedback_lines(feedback: &ValidationFeedback) -> Vec<String> {
    let mut lines = Vec::new();
    if feedback.terms_error {
        lines.push("You must accept the terms and conditions.".to_string());
    }
    lines.extend(
        feedback
            .incomplete_fields
            .iter()
            .map(|f| format!("Incomplete field: {}", f.label_id)),
    );
    lines
}

pub fn receipt_line(receipt: &SubmissionReceipt) -> String {
    format!(
        "Sighting {} submitted at {}",
        receipt.id,
        receipt.submitted_at.format("%Y-%m-%d %H:%M:%S UTC")
    )
}
