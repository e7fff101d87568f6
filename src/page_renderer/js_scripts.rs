//! In-page scripts evaluated through CDP

use crate::utils::PDF_ANCHOR_SELECTOR;

/// Every anchor's raw `href` attribute (null when absent) and trimmed text.
///
/// Reads the live DOM, so links inserted by client-side rendering after the
/// initial load are included.
pub const ANCHORS_SCRIPT: &str = r"
    (() => Array.from(document.querySelectorAll('a')).map(a => ({
        href: a.getAttribute('href'),
        text: (a.textContent || '').trim()
    })))()
";

/// Document readiness plus the number of resources fetched so far.
///
/// A stable resource count after `readyState === 'complete'` stands in for
/// network quiescence.
pub const NETWORK_STATE_SCRIPT: &str = r"
    (() => ({
        readyState: document.readyState,
        resources: performance.getEntriesByType('resource').length
    }))()
";

/// Boolean probe for the first PDF-shaped anchor.
#[must_use]
pub fn pdf_anchor_probe_script() -> String {
    format!("!!document.querySelector('{PDF_ANCHOR_SELECTOR}')")
}
