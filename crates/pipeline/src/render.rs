//! Text rendering of submission outcomes and report details.

use fixmyroad_core::report::Report;

use crate::coordinator::SubmissionReceipt;
use crate::error::SubmissionError;

/// Confirmation shown after a successful submission.
pub fn render_receipt(receipt: &SubmissionReceipt) -> String {
    let c = &receipt.classification;
    let mut out = format!(
        "Report submitted successfully!\n\
         \n  Report ID:   {}\
         \n  Ticket ID:   {}\
         \n  Severity:    {} ({})\
         \n  Department:  {}\n",
        receipt.report.id, c.ticket_id, c.severity_score, c.severity_level, c.assigned_department,
    );
    if let Some(message) = &c.ai_message {
        out.push_str(&format!("\n{message}\n"));
    }
    out
}

/// Failure text with the stage-specific wording.
pub fn render_error(err: &SubmissionError) -> String {
    format!("Submission failed.\n  {}\n", err.user_message())
}

/// Full detail of one report, including its progress stages.
pub fn render_report(report: &Report) -> String {
    let mut out = format!(
        "{}  {}  [{}]\n  Location:    {}\n  Description: {}\n  Submitted:   {}\n",
        report.id,
        report.category,
        report.status.label(),
        report.location,
        report.description,
        report.submitted_at.format("%Y-%m-%d %H:%M UTC"),
    );
    if let Some(ticket) = &report.ticket_id {
        out.push_str(&format!("  Ticket:      {ticket}\n"));
    }
    if let Some(severity) = &report.severity {
        out.push_str(&format!("  Severity:    {severity}\n"));
    }
    if let Some(department) = &report.department {
        out.push_str(&format!("  Department:  {department}\n"));
    }
    out.push_str(&format!("  Progress:    {}\n", report.progress.join(" > ")));
    out
}
