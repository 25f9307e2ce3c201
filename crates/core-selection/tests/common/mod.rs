#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use core_events::WidgetId;
use core_geometry::{Rect, TextStyle};
use core_host::{HeadlessHost, WidgetSpec};
use core_selection::{Engine, EngineConfig, TextSelection};

/// Text area at document (100, 50), 200x100.
pub const AREA: Rect = Rect::new(100.0, 50.0, 200.0, 100.0);

pub fn ten_rows() -> String {
    (0..10).map(|i| format!("row{i}")).collect::<Vec<_>>().join("\n")
}

/// `[start, end)` of row `k` in `ten_rows()`.
pub fn row(k: usize) -> (usize, usize) {
    (k * 5, k * 5 + 4)
}

pub fn line20() -> TextStyle {
    TextStyle {
        line_height: Some(20.0),
        ..TextStyle::default()
    }
}

pub fn host_with_area(text: &str) -> (HeadlessHost, WidgetId) {
    let mut host = HeadlessHost::new();
    let w = host.add_widget(WidgetSpec::text_area(text, AREA).with_style(line20()));
    (host, w)
}

pub type Recorded = Rc<RefCell<Vec<TextSelection>>>;

pub fn recording(config: EngineConfig) -> (EngineConfig, Recorded) {
    let log: Recorded = Rc::new(RefCell::new(Vec::new()));
    let sink = log.clone();
    (config.on_selection_change(move |s| sink.borrow_mut().push(s.clone())), log)
}

pub fn engine(text: &str, config: EngineConfig) -> (Engine<HeadlessHost>, WidgetId, Recorded) {
    let (host, w) = host_with_area(text);
    let (config, log) = recording(config);
    (Engine::start(host, config), w, log)
}

pub fn ms(base: Instant, ms: u64) -> Instant {
    base + Duration::from_millis(ms)
}
