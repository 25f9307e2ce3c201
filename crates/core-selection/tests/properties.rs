mod common;

use std::io::Write;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

use common::*;
use core_selection::{Engine, EngineConfig, ResolveOptions, resolve};
use proptest::prelude::*;
use tracing::Level;
use tracing::subscriber::with_default;
use tracing_subscriber::fmt::MakeWriter;

#[derive(Clone)]
struct BufferWriter {
    inner: Arc<Mutex<Vec<u8>>>,
}

struct LockedWriter<'a> {
    guard: MutexGuard<'a, Vec<u8>>,
}

impl Write for LockedWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.guard.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for BufferWriter {
    type Writer = LockedWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        LockedWriter {
            guard: self.inner.lock().expect("log buffer poisoned"),
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn selected_text_matches_offsets(text in "[a-zé😀 \n]{0,40}", a in 0usize..48, b in 0usize..48) {
        let (mut engine, w, _log) = engine(&text, EngineConfig::default());
        engine.host_mut().select(w, a, b);
        engine.tick(Instant::now());
        let s = engine.current_selection();
        if s.is_selected() {
            let start = s.selection_start().unwrap();
            let end = s.selection_end().unwrap();
            prop_assert!(start < end);
            prop_assert_eq!(s.selected_text().unwrap(), core_text::slice_chars(&text, start, end));
        } else {
            prop_assert_eq!(s.selected_text(), None);
            prop_assert_eq!(s.position(), None);
            prop_assert_eq!(s.element(), None);
        }
        prop_assert_eq!(engine.host().attached_mirror_count(), 0);
    }

    #[test]
    fn resolve_never_leaks_mirrors(text in "[a-z \n]{1,60}", a in 0usize..64, b in 0usize..64) {
        let (mut host, w) = host_with_area(&text);
        let first = resolve(&mut host, w, a, b, &ResolveOptions::default());
        let second = resolve(&mut host, w, a, b, &ResolveOptions::default());
        prop_assert_eq!(first, second);
        prop_assert_eq!(host.attached_mirror_count(), 0);
    }
}

#[test]
fn logs_never_contain_selected_text() {
    let buffer = Arc::new(Mutex::new(Vec::new()));
    let writer = BufferWriter { inner: buffer.clone() };
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(Level::TRACE)
        .with_target(true)
        .with_ansi(false)
        .without_time()
        .with_writer(writer)
        .finish();

    with_default(subscriber, || {
        let t0 = Instant::now();
        let (host, w) = host_with_area("hunter2 is my password");
        let mut engine = Engine::start(host, EngineConfig::default());
        engine.host_mut().select(w, 0, 7);
        engine.tick(t0);
        engine.host_mut().scroll_page(0.0, 4.0);
        engine.tick(ms(t0, 1));
        engine.tick(ms(t0, 101));
        engine.stop();
    });

    let log_output = String::from_utf8(buffer.lock().unwrap().clone()).unwrap();
    assert!(log_output.contains("selection.machine"));
    assert!(log_output.contains("selection.lifecycle"));
    assert!(!log_output.contains("hunter2"));
    assert!(!log_output.contains("password"));
}
