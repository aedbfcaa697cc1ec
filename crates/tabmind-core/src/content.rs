//! Page-content probe port.

use async_trait::async_trait;

use crate::error::Result;
use crate::tab::TabId;

/// One-shot extraction of a page's visible text.
#[async_trait]
pub trait PageContentProbe: Send + Sync {
    /// Returns at most `max_chars` characters of the tab's visible text.
    async fn visible_text(&self, tab_id: TabId, max_chars: usize) -> Result<String>;
}
