//! Published selection snapshot and the internal memento.

use core_events::WidgetId;
use core_geometry::Position;
use core_host::{SelectionRange, TextHost};
use serde::Serialize;

/// Immutable view of the tracked selection.
///
/// Fields are private so the invariant holds by construction:
/// `is_selected` is true exactly when text, both offsets and the element are
/// present, and `position` is never present without a selection.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextSelection {
    selected_text: Option<String>,
    position: Option<Position>,
    selection_start: Option<usize>,
    selection_end: Option<usize>,
    is_selected: bool,
    element: Option<WidgetId>,
}

impl TextSelection {
    /// Nothing selected.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A non-collapsed selection. A collapsed `range` produces `empty()`.
    pub fn selected(
        text: impl Into<String>,
        range: SelectionRange,
        element: WidgetId,
        position: Option<Position>,
    ) -> Self {
        if range.is_collapsed() {
            return Self::empty();
        }
        Self {
            selected_text: Some(text.into()),
            position,
            selection_start: Some(range.start),
            selection_end: Some(range.end),
            is_selected: true,
            element: Some(element),
        }
    }

    /// Same selection with the anchor hidden.
    pub fn without_position(&self) -> Self {
        Self {
            position: None,
            ..self.clone()
        }
    }

    /// Same selection with a new anchor. Ignored when nothing is selected.
    pub fn with_position(&self, position: Option<Position>) -> Self {
        Self {
            position: if self.is_selected { position } else { None },
            ..self.clone()
        }
    }

    pub fn selected_text(&self) -> Option<&str> {
        self.selected_text.as_deref()
    }

    pub fn position(&self) -> Option<Position> {
        self.position
    }

    pub fn selection_start(&self) -> Option<usize> {
        self.selection_start
    }

    pub fn selection_end(&self) -> Option<usize> {
        self.selection_end
    }

    pub fn range(&self) -> Option<SelectionRange> {
        Some(SelectionRange::new(self.selection_start?, self.selection_end?))
    }

    pub fn is_selected(&self) -> bool {
        self.is_selected
    }

    pub fn element(&self) -> Option<WidgetId> {
        self.element
    }
}

/// Last applied selection, kept to detect whether a delayed recompute still
/// applies to what the widget holds now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SelectionMemento {
    pub range: SelectionRange,
    pub text: String,
    pub element: WidgetId,
}

impl SelectionMemento {
    /// True when the host still shows the same widget focused, the same range
    /// selected, and the same characters at those offsets.
    pub fn still_matches<H: TextHost + ?Sized>(&self, host: &H) -> bool {
        if host.active_selectable_widget() != Some(self.element) {
            return false;
        }
        if host.selection_range(self.element) != Some(self.range) {
            return false;
        }
        let current = host.text(self.element);
        core_text::slice_chars(&current, self.range.start, self.range.end) == self.text
    }
}
