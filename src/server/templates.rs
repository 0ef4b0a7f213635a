//! Page templates.

use askama::Template;

/// Page title shared by every template.
pub(crate) const TITLE: &str = "Multimodal Study Buddy";

/// The submission form.
#[derive(Template)]
#[template(path = "index.html")]
pub(crate) struct IndexTemplate {
    pub(crate) title: &'static str,
    pub(crate) max_upload_mib: usize,
}

/// A finished guide, or the report that replaced it.
#[derive(Template)]
#[template(path = "guide.html")]
pub(crate) struct GuideTemplate {
    pub(crate) title: &'static str,
    pub(crate) guide_html: String,
    pub(crate) failed: bool,
}

/// A short error page.
#[derive(Template)]
#[template(path = "error.html")]
pub(crate) struct ErrorTemplate {
    pub(crate) title: &'static str,
    pub(crate) message: String,
}
