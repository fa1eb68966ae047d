//! Scenario simulator
//!
//! Replays a scripted desktop (windows, monitors and user input per step)
//! against the in-memory window system and collects one [`TickReport`] per
//! tick. Backs the `simulate` command.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use crate::config::Config;
use crate::dock::{DockingEngine, TickInput, TickReport};
use crate::platform::{FakeMonitor, FakeWindow, FakeWindowSystem, WindowHandle};
use crate::screen::{Rect, WorldPoint};

/// Scenario errors
#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Duplicate window handle: {0}")]
    DuplicateHandle(WindowHandle),

    #[error("Step {step}: unknown window {handle}")]
    UnknownWindow { step: usize, handle: WindowHandle },
}

pub type ScenarioResult<T> = Result<T, ScenarioError>;

/// A window placed by position and size
#[derive(Debug, Clone, Deserialize)]
pub struct WindowSpec {
    pub handle: isize,
    #[serde(default)]
    pub title: String,
    /// Window class, defaults to a plain application class
    pub class_name: Option<String>,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub topmost: bool,
}

impl WindowSpec {
    fn to_fake(&self) -> FakeWindow {
        let mut window = FakeWindow::new(
            self.handle,
            &self.title,
            Rect::from_xywh(self.x, self.y, self.width, self.height),
        );
        if let Some(class_name) = &self.class_name {
            window = window.with_class(class_name);
        }
        if !self.visible {
            window = window.hidden();
        }
        if self.topmost {
            window = window.topmost();
        }
        window
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonitorSpec {
    pub bounds: Rect,
    /// Explicit work area; wins over `taskbar_height`
    pub work_area: Option<Rect>,
    /// Height of a bottom taskbar
    #[serde(default)]
    pub taskbar_height: i32,
    #[serde(default = "default_dpi")]
    pub dpi: u32,
}

impl MonitorSpec {
    fn to_fake(&self) -> FakeMonitor {
        let mut monitor = FakeMonitor::with_bottom_taskbar(self.bounds, self.taskbar_height);
        if let Some(work_area) = self.work_area {
            monitor.work_area = work_area;
        }
        monitor.dpi = self.dpi;
        monitor
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct MoveTo {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct MoveWindow {
    pub handle: isize,
    pub x: i32,
    pub y: i32,
}

/// One scripted step: desktop changes, then `repeat` ticks with the given input
#[derive(Debug, Clone, Deserialize)]
pub struct Step {
    #[serde(default)]
    pub dragging: bool,
    #[serde(default = "default_true")]
    pub focused: bool,
    pub body_point: Option<WorldPoint>,
    /// User drag of the avatar, applied before ticking
    pub move_avatar: Option<MoveTo>,
    pub move_window: Option<MoveWindow>,
    pub close_window: Option<isize>,
    pub raise_window: Option<isize>,
    #[serde(default)]
    pub fail_enumeration: bool,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

/// A complete scripted desktop session
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub avatar: WindowSpec,
    /// Engine configuration override
    pub config: Option<Config>,
    #[serde(default, rename = "window")]
    pub windows: Vec<WindowSpec>,
    #[serde(default, rename = "monitor")]
    pub monitors: Vec<MonitorSpec>,
    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

fn default_true() -> bool {
    true
}

fn default_dpi() -> u32 {
    96
}

fn default_repeat() -> u32 {
    1
}

impl Scenario {
    pub fn load(path: &Path) -> ScenarioResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> ScenarioResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Build the initial desktop. The avatar goes first; windows follow in
    /// listed order, front-most first.
    pub fn build_desktop(&self) -> ScenarioResult<FakeWindowSystem> {
        let mut ws = FakeWindowSystem::new();
        for spec in std::iter::once(&self.avatar).chain(&self.windows) {
            let handle = WindowHandle(spec.handle);
            if ws.window(handle).is_some() {
                return Err(ScenarioError::DuplicateHandle(handle));
            }
            ws.add_window(spec.to_fake());
        }
        for monitor in &self.monitors {
            ws.add_monitor(monitor.to_fake());
        }
        Ok(ws)
    }
}

/// A running scenario: desktop plus engine
pub struct Simulation {
    ws: FakeWindowSystem,
    engine: DockingEngine,
    steps: Vec<Step>,
}

impl Simulation {
    /// `config` is used unless the scenario carries its own
    pub fn new(scenario: Scenario, config: Config) -> ScenarioResult<Self> {
        let ws = scenario.build_desktop()?;
        let config = scenario.config.unwrap_or(config);
        let engine = DockingEngine::new(WindowHandle(scenario.avatar.handle), config);
        Ok(Self {
            ws,
            engine,
            steps: scenario.steps,
        })
    }

    pub fn desktop(&self) -> &FakeWindowSystem {
        &self.ws
    }

    pub fn engine(&self) -> &DockingEngine {
        &self.engine
    }

    /// Run every step, returning all tick reports in order
    pub fn run(&mut self) -> ScenarioResult<Vec<TickReport>> {
        let steps = std::mem::take(&mut self.steps);
        let mut reports = Vec::new();
        for (index, step) in steps.iter().enumerate() {
            reports.extend(self.run_step(index, step)?);
        }
        Ok(reports)
    }

    fn run_step(&mut self, index: usize, step: &Step) -> ScenarioResult<Vec<TickReport>> {
        let unknown = |handle: isize| ScenarioError::UnknownWindow {
            step: index,
            handle: WindowHandle(handle),
        };
        let avatar = self.engine.avatar();

        if let Some(to) = step.move_avatar {
            self.ws.set_position(avatar, to.x, to.y);
        }
        if let Some(m) = step.move_window {
            if !self.ws.set_position(WindowHandle(m.handle), m.x, m.y) {
                return Err(unknown(m.handle));
            }
        }
        if let Some(handle) = step.close_window {
            self.ws
                .remove_window(WindowHandle(handle))
                .ok_or_else(|| unknown(handle))?;
        }
        if let Some(handle) = step.raise_window {
            if !self.ws.raise(WindowHandle(handle)) {
                return Err(unknown(handle));
            }
        }
        self.ws.fail_enumeration = step.fail_enumeration;
        self.ws.dragging = step.dragging;
        self.ws.focused = step.focused;

        let input = TickInput {
            body_point: step.body_point,
            ..TickInput::from_host(&self.ws, avatar)
        };
        let reports = (0..step.repeat)
            .map(|_| self.engine.tick(&mut self.ws, input))
            .collect();
        tracing::trace!("step {} done ({} ticks)", index, step.repeat);
        Ok(reports)
    }
}

/// Sample scenario printed by `perch simulate --sample`
pub fn sample_scenario() -> &'static str {
    r#"# Drag the avatar onto a Notes title bar, move Notes, then close it
[avatar]
handle = 100
title = "Buddy"
x = 200
y = 0
width = 200
height = 105
topmost = true

[[monitor]]
bounds = { left = 0, top = 0, right = 1920, bottom = 1080 }
taskbar_height = 40

[[window]]
handle = 1
title = "Notes"
x = 100
y = 100
width = 400
height = 300

[[step]]
dragging = true

[[step]]
repeat = 2

[[step]]
move_window = { handle = 1, x = 150, y = 140 }

[[step]]
close_window = 1
"#
}
