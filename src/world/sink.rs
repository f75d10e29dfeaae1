use slotmap::SlotMap;

use crate::error::SinkError;
use crate::link::LinkSpan;

use super::LinkSink;

slotmap::new_key_type! {
    /// Handle for a link held by a [`MemoryLinkSink`].
    pub struct LinkHandle;
}

/// In-memory link sink.
///
/// Handles are generational keys, so a revoked handle never aliases a
/// link submitted later.
#[derive(Debug, Default)]
pub struct MemoryLinkSink {
    links: SlotMap<LinkHandle, LinkSpan>,
    min_width: f64,
}

impl MemoryLinkSink {
    /// Creates an empty sink that accepts every link.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a sink that rejects links narrower than `min_width`.
    #[must_use]
    pub fn with_min_width(min_width: f64) -> Self {
        Self {
            links: SlotMap::with_key(),
            min_width,
        }
    }

    /// Number of links currently held.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.links.len()
    }

    #[must_use]
    pub fn get(&self, handle: LinkHandle) -> Option<&LinkSpan> {
        self.links.get(handle)
    }

    pub fn iter(&self) -> impl Iterator<Item = (LinkHandle, &LinkSpan)> {
        self.links.iter()
    }
}

impl LinkSink for MemoryLinkSink {
    type Handle = LinkHandle;

    fn submit(&mut self, span: &LinkSpan) -> Result<LinkHandle, SinkError> {
        if span.width < self.min_width {
            return Err(SinkError::Rejected(format!(
                "width {} is below the minimum {}",
                span.width, self.min_width
            )));
        }
        Ok(self.links.insert(*span))
    }

    fn revoke(&mut self, handle: LinkHandle) -> bool {
        self.links.remove(handle).is_some()
    }
}
