//! Page rendering.
//!
//! `PageRenderer` is the seam between the extraction pipeline and the
//! browser: it loads one URL and returns every anchor of the rendered DOM.
//! `ChromiumRenderer` is the production engine; tests substitute their own.

pub mod chromium;
pub mod js_scripts;
pub mod page_timeout;

use async_trait::async_trait;

use crate::error::RenderError;
use crate::store::RawAnchor;

pub use chromium::ChromiumRenderer;

#[async_trait]
pub trait PageRenderer: Send + Sync {
    /// Load `url`, let client-side rendering settle, and return the
    /// `href`/text of every `<a>` element in DOM order.
    async fn render(&self, url: &str) -> Result<Vec<RawAnchor>, RenderError>;
}
