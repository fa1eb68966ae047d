//! Taskbar proximity detection
//!
//! Decides whether the avatar's body point is close enough to the taskbar to
//! switch to the sitting pose. The last answer is held while the avatar window
//! is unfocused.

use super::mapper::{WorldPoint, WorldRect};

/// Configuration for taskbar detection
#[derive(Debug, Clone)]
pub struct TaskbarDetectorConfig {
    /// Whether detection runs at all
    pub enabled: bool,
    /// Sitting triggers at or below this distance, in world units
    pub detection_radius: f32,
}

impl Default for TaskbarDetectorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            detection_radius: 0.5,
        }
    }
}

/// Result of one detection pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TaskbarDetectResult {
    /// Host unfocused, previous value kept
    Frozen { sitting: bool },
    /// No taskbar on this monitor, or detection disabled
    NoTaskbar,
    /// Distance measured this tick
    Measured { distance: f32, sitting: bool },
}

impl TaskbarDetectResult {
    pub fn is_sitting(&self) -> bool {
        match self {
            TaskbarDetectResult::Frozen { sitting } => *sitting,
            TaskbarDetectResult::NoTaskbar => false,
            TaskbarDetectResult::Measured { sitting, .. } => *sitting,
        }
    }
}

/// Tracks the sitting flag across ticks
#[derive(Debug, Default)]
pub struct TaskbarDetector {
    config: TaskbarDetectorConfig,
    sitting: bool,
}

impl TaskbarDetector {
    pub fn new(config: TaskbarDetectorConfig) -> Self {
        Self {
            config,
            sitting: false,
        }
    }

    /// Check the body point against the taskbar rect (world space)
    pub fn check(
        &mut self,
        focused: bool,
        taskbar: Option<WorldRect>,
        body_point: WorldPoint,
    ) -> TaskbarDetectResult {
        if !focused {
            return TaskbarDetectResult::Frozen {
                sitting: self.sitting,
            };
        }

        let result = match taskbar {
            Some(rect) if self.config.enabled => {
                let distance = rect.distance_to(body_point);
                TaskbarDetectResult::Measured {
                    distance,
                    sitting: distance <= self.config.detection_radius,
                }
            }
            _ => TaskbarDetectResult::NoTaskbar,
        };

        self.sitting = result.is_sitting();
        result
    }

    /// Swap tunables, keeping the current flag until the next measurement
    pub fn set_config(&mut self, config: TaskbarDetectorConfig) {
        self.config = config;
    }

    /// Current sitting flag
    pub fn is_sitting(&self) -> bool {
        self.sitting
    }
}
