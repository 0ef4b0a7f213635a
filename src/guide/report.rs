//! User-facing failure payload.

use std::fmt;

use crate::error::StudyBuddyError;

/// Longest diagnostic shown to the user, in characters.
const MAX_DIAGNOSTIC_CHARS: usize = 300;

/// Markdown shown in place of a study guide when anything fails.
///
/// Always starts with [`ErrorReport::HEADING`], followed by an apology line
/// and the diagnostic in a code span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport {
    markdown: String,
    diagnostic: String,
}

impl ErrorReport {
    /// First line of every report.
    pub const HEADING: &'static str = "# An Error Occurred";

    /// Builds a report around a short diagnostic.
    ///
    /// The diagnostic is flattened to one line, stripped of backticks and
    /// shortened so it renders as a single code span.
    ///
    /// ```
    /// use study_buddy::guide::ErrorReport;
    ///
    /// let report = ErrorReport::new("connection refused");
    /// assert!(report.markdown().starts_with(ErrorReport::HEADING));
    /// assert!(report.markdown().ends_with("**Error:**\n`connection refused`"));
    /// ```
    pub fn new(diagnostic: impl fmt::Display) -> Self {
        let diagnostic = sanitize(&diagnostic.to_string());
        let markdown = format!(
            "{}\n\nSorry, there was a problem generating the study guide. \
             Please check the console for more details.\n\n**Error:**\n`{}`",
            Self::HEADING,
            diagnostic
        );

        Self { markdown, diagnostic }
    }

    /// Builds a report for an error.
    pub fn from_error(error: &StudyBuddyError) -> Self {
        Self::new(error)
    }

    /// The full Markdown payload.
    pub fn markdown(&self) -> &str {
        &self.markdown
    }

    /// The diagnostic as shown inside the report.
    pub fn diagnostic(&self) -> &str {
        &self.diagnostic
    }

    /// Consumes the report, returning its Markdown.
    pub fn into_markdown(self) -> String {
        self.markdown
    }
}

impl From<&StudyBuddyError> for ErrorReport {
    fn from(error: &StudyBuddyError) -> Self {
        Self::from_error(error)
    }
}

impl fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.markdown)
    }
}

fn sanitize(raw: &str) -> String {
    let flattened = raw
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace('`', "'");

    if flattened.is_empty() {
        return "unknown error".to_string();
    }

    if flattened.chars().count() > MAX_DIAGNOSTIC_CHARS {
        let mut shortened: String = flattened.chars().take(MAX_DIAGNOSTIC_CHARS).collect();
        shortened.push_str("...");
        shortened
    } else {
        flattened
    }
}
