//! Host capability flags.
//!
//! Queried once when the engine starts. A host lacking style introspection
//! or off-screen nodes still gets correct selection tracking; only the
//! overlay anchor degrades to always absent.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub struct HostCapabilities {
    pub style_introspection: bool,
    pub offscreen_mirror: bool,
}

impl HostCapabilities {
    pub const fn full() -> Self {
        Self {
            style_introspection: true,
            offscreen_mirror: true,
        }
    }

    pub const fn without_style() -> Self {
        Self {
            style_introspection: false,
            offscreen_mirror: true,
        }
    }

    /// Whether caret geometry can be measured at all.
    pub fn can_measure(&self) -> bool {
        self.style_introspection && self.offscreen_mirror
    }
}

impl Default for HostCapabilities {
    fn default() -> Self {
        Self::full()
    }
}
