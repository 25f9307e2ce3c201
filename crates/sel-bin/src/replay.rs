//! Drives an `Engine` over `HeadlessHost` from a script and streams every
//! published snapshot as a JSON line.

use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::Result;
use core_events::WidgetId;
use core_geometry::Rect;
use core_host::{HeadlessHost, WidgetSpec};
use core_selection::{Engine, EngineConfig, ObserverMode, TextSelection};
use serde::Serialize;
use tracing::debug;

use crate::script::{Script, Step, WidgetScript};

/// Frame interval used while waiting.
pub const FRAME: Duration = Duration::from_millis(16);

#[derive(Serialize)]
struct Line<'a> {
    t_ms: u64,
    #[serde(flatten)]
    selection: &'a TextSelection,
}

pub struct Replay {
    engine: Engine<HeadlessHost>,
    widget: WidgetId,
    outside: WidgetId,
    start: Instant,
    now: Instant,
    published: Rc<RefCell<Vec<TextSelection>>>,
}

impl Replay {
    pub fn new(spec: &WidgetScript, config: EngineConfig) -> Self {
        let mut host = HeadlessHost::new();
        let (vw, vh) = host.viewport();
        let scope = host.add_widget(WidgetSpec::container(Rect::new(0.0, 0.0, vw, vh)));
        let mut widget_spec = if spec.multiline {
            WidgetSpec::text_area(spec.text.clone(), spec.rect)
        } else {
            WidgetSpec::text_input(spec.text.clone(), spec.rect)
        };
        if let Some(style) = spec.style.clone() {
            widget_spec = widget_spec.with_style(style);
        }
        let widget = host.add_widget(widget_spec.with_parent(scope));
        let outside = host.add_widget(WidgetSpec::container(Rect::new(vw, vh, 1.0, 1.0)));

        let config = if spec.scoped {
            config.scope_container(scope)
        } else {
            config
        };
        let mut engine = Engine::start(host, config);
        let published = Rc::new(RefCell::new(Vec::new()));
        let sink = published.clone();
        engine.subscribe(ObserverMode::Persistent, move |s: &TextSelection| {
            sink.borrow_mut().push(s.clone())
        });

        let start = Instant::now();
        Self {
            engine,
            widget,
            outside,
            start,
            now: start,
            published,
        }
    }

    pub fn apply(&mut self, step: &Step) {
        debug!(target: "runtime", step = step.name(), t_ms = self.elapsed_ms(), "step");
        let widget = self.widget;
        let host = self.engine.host_mut();
        match step {
            Step::Select { start, end } => host.select(widget, *start, *end),
            Step::PointerDown { on_widget } => {
                let target = if *on_widget { widget } else { self.outside };
                host.pointer_down(Some(target));
            }
            Step::Scroll { dx, dy, page } => {
                if *page {
                    host.scroll_page(*dx, *dy);
                } else {
                    host.scroll_widget(widget, *dx, *dy);
                }
            }
            Step::Resize { width, height } => host.resize(*width, *height, None),
            Step::FocusLost => host.blur(),
            Step::Edit { text } => host.set_text(widget, text.clone()),
            Step::WaitMs { ms } => {
                self.advance(Duration::from_millis(*ms));
                return;
            }
        }
        self.engine.tick(self.now);
    }

    /// Tick frame by frame until `by` has elapsed.
    pub fn advance(&mut self, by: Duration) {
        let end = self.now + by;
        while self.now < end {
            self.now = (self.now + FRAME).min(end);
            self.engine.tick(self.now);
        }
    }

    /// Run any pending reposition to completion.
    pub fn settle(&mut self) {
        while let Some(deadline) = self.engine.reposition_deadline() {
            self.now = self.now.max(deadline);
            self.engine.tick(self.now);
        }
    }

    /// Write snapshots published since the last flush. Returns how many.
    pub fn flush<W: Write>(&mut self, out: &mut W) -> Result<usize> {
        let t_ms = self.elapsed_ms();
        let drained: Vec<TextSelection> = self.published.borrow_mut().drain(..).collect();
        for selection in &drained {
            serde_json::to_writer(&mut *out, &Line { t_ms, selection })?;
            writeln!(out)?;
        }
        Ok(drained.len())
    }

    /// Stop the engine, removing its listeners from the host.
    pub fn finish(mut self) -> bool {
        self.engine.stop()
    }

    fn elapsed_ms(&self) -> u64 {
        self.now.duration_since(self.start).as_millis() as u64
    }
}

/// Replay `script` and write one JSON line per published snapshot.
pub fn run<W: Write>(script: &Script, config: EngineConfig, out: &mut W) -> Result<usize> {
    let mut replay = Replay::new(&script.widget, config);
    let mut written = 0;
    for step in &script.steps {
        replay.apply(step);
        written += replay.flush(out)?;
    }
    replay.settle();
    written += replay.flush(out)?;
    replay.finish();
    Ok(written)
}
