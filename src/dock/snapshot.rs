//! Window snapshot provider
//!
//! Turns raw enumeration into the ordered list of dock candidates for one
//! tick. Raw enumeration returns hundreds of invisible helpers; the filter
//! keeps visible, titled, parentless, reasonably sized application windows.

use serde::Serialize;

use crate::config::FilterConfig;
use crate::platform::{RawWindow, WindowHandle, WindowSystem};
use crate::screen::Rect;

/// One dock candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WindowSnapshotEntry {
    pub handle: WindowHandle,
    pub rect: Rect,
}

/// Candidates for a single tick, front-most first. Never kept across ticks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WindowSnapshot {
    entries: Vec<WindowSnapshotEntry>,
}

impl WindowSnapshot {
    pub fn new(entries: Vec<WindowSnapshotEntry>) -> Self {
        Self { entries }
    }

    pub fn find(&self, handle: WindowHandle) -> Option<&WindowSnapshotEntry> {
        self.entries.iter().find(|e| e.handle == handle)
    }

    pub fn iter(&self) -> impl Iterator<Item = &WindowSnapshotEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Filters raw enumeration into a [`WindowSnapshot`]
#[derive(Debug, Clone, Default)]
pub struct SnapshotProvider {
    config: FilterConfig,
}

impl SnapshotProvider {
    pub fn new(config: FilterConfig) -> Self {
        Self { config }
    }

    pub fn set_config(&mut self, config: FilterConfig) {
        self.config = config;
    }

    /// Query the window system and filter. Failure yields an empty snapshot.
    pub fn snapshot<W: WindowSystem + ?Sized>(
        &self,
        ws: &W,
        avatar: WindowHandle,
    ) -> WindowSnapshot {
        match ws.enumerate_top_level_windows() {
            Ok(raw) => self.filter(&raw, avatar),
            Err(e) => {
                tracing::debug!("window enumeration failed, no candidates this tick: {}", e);
                WindowSnapshot::default()
            }
        }
    }

    /// Filter a raw window list, preserving its order
    pub fn filter(&self, raw: &[RawWindow], avatar: WindowHandle) -> WindowSnapshot {
        let entries = raw
            .iter()
            .filter(|w| w.handle != avatar && self.accepts(w))
            .map(|w| WindowSnapshotEntry {
                handle: w.handle,
                rect: w.rect,
            })
            .collect();
        WindowSnapshot::new(entries)
    }

    /// Whether a single raw window qualifies as a candidate
    pub fn accepts(&self, window: &RawWindow) -> bool {
        window.visible
            && window.rect.width() >= self.config.min_width
            && window.rect.height() >= self.config.min_height
            && !window.has_parent
            && window.title_len > 0
            && !self.is_denied_class(&window.class_name)
    }

    fn is_denied_class(&self, class_name: &str) -> bool {
        self.config.denied_classes.iter().any(|c| c == class_name)
            || self
                .config
                .denied_class_prefixes
                .iter()
                .any(|p| class_name.starts_with(p.as_str()))
            || self
                .config
                .denied_class_substrings
                .iter()
                .any(|s| class_name.contains(s.as_str()))
    }
}
