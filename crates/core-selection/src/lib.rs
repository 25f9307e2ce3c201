//! Selection tracking and caret geometry for text controls.
//!
//! `Engine` listens to a host's selection, pointer, scroll, resize and focus
//! signals and keeps a `TextSelection` snapshot current: the selected text,
//! its character offsets, the owning widget, and an anchor point where a
//! floating overlay (toolbar, tooltip) can be placed above the selection.
//!
//! The anchor is measured with an off-screen mirror of the widget (see
//! [`mirror`]) and positioned by [`resolver`]. During scrolls and resizes the
//! anchor is hidden and recomputed once the layout has been quiet for the
//! debounce window.

pub mod config;
pub mod engine;
pub mod lifecycle;
pub mod machine;
pub mod mirror;
pub mod observers;
pub mod resolver;
pub mod snapshot;

pub use config::{ClipPolicy, CoordinateSpace, EngineConfig, ResolveOptions, SelectionCallback};
pub use engine::{Engine, TickReport};
pub use machine::SelectionState;
pub use mirror::MeasureError;
pub use observers::{ObserverId, ObserverMode};
pub use resolver::resolve;
pub use snapshot::TextSelection;
