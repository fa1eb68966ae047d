//! Docking engine
//!
//! One engine per avatar window. The host calls [`DockingEngine::tick`] once
//! per frame; each call takes a fresh snapshot, advances the state machine,
//! issues move/z-order commands and returns a [`TickReport`]. Nothing but the
//! dock state and configuration survives between ticks.

use super::events::{DebugGeometry, EngineEvent, PoseFlags, ReleaseReason, TickReport};
use super::follow;
use super::snapshot::{SnapshotProvider, WindowSnapshot, WindowSnapshotEntry};
use super::state::{DockBinding, DockPhase, DockState};
use super::zorder::ZOrderController;
use crate::config::Config;
use crate::platform::{HostSignals, WindowHandle, WindowSystem};
use crate::screen::{
    compute_snap_zone, monitor, CoordinateMapper, Rect, TaskbarDetector, WorldPoint, WorldRect,
};

/// Host input for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    /// User is dragging the avatar window
    pub dragging: bool,
    /// Avatar window has focus; the sitting flag is frozen otherwise
    pub focused: bool,
    /// Live body point from the animation layer, in world units
    pub body_point: Option<WorldPoint>,
}

impl TickInput {
    /// Read drag and focus state from the host
    pub fn from_host<H: HostSignals + ?Sized>(host: &H, avatar: WindowHandle) -> Self {
        Self {
            dragging: host.is_dragging(avatar),
            focused: host.is_focused(avatar),
            body_point: None,
        }
    }
}

/// Result of scanning a snapshot for a title bar under the snap zone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Front-most candidate whose title-bar strip overlaps the zone
    Dock(WindowSnapshotEntry),
    /// A window body covers the zone before any title bar was hit
    Occluded(WindowHandle),
    Nothing,
}

/// Scan front to back. A title-bar strip hit docks; a full-rect hit blocks
/// everything behind it.
pub fn find_dock_target(
    snapshot: &WindowSnapshot,
    snap_zone: &Rect,
    title_bar_height: i32,
) -> SearchOutcome {
    for entry in snapshot.iter() {
        if entry.rect.top_strip(title_bar_height).overlaps(snap_zone) {
            return SearchOutcome::Dock(*entry);
        }
        if entry.rect.overlaps(snap_zone) {
            return SearchOutcome::Occluded(entry.handle);
        }
    }
    SearchOutcome::Nothing
}

/// Geometry gathered once at the start of a tick
struct Frame {
    snapshot: WindowSnapshot,
    avatar_rect: Rect,
    snap_zone: Rect,
    dpi: f32,
}

/// Window docking and snap engine for one avatar window
pub struct DockingEngine {
    avatar: WindowHandle,
    config: Config,
    snapshots: SnapshotProvider,
    zorder: ZOrderController,
    taskbar: TaskbarDetector,
    state: DockState,
    ticks: u64,
}

impl DockingEngine {
    pub fn new(avatar: WindowHandle, config: Config) -> Self {
        Self {
            avatar,
            snapshots: SnapshotProvider::new(config.filter.clone()),
            zorder: ZOrderController::new(avatar),
            taskbar: TaskbarDetector::new(config.taskbar.detector_config()),
            config,
            state: DockState::Free,
            ticks: 0,
        }
    }

    pub fn avatar(&self) -> WindowHandle {
        self.avatar
    }

    pub fn state(&self) -> &DockState {
        &self.state
    }

    pub fn phase(&self) -> DockPhase {
        self.state.phase()
    }

    pub fn is_docked(&self) -> bool {
        self.state.is_docked()
    }

    pub fn is_sitting(&self) -> bool {
        self.taskbar.is_sitting()
    }

    /// Ticks run so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Swap in new tunables; they take effect on the next tick
    pub fn set_config(&mut self, config: Config) {
        self.snapshots.set_config(config.filter.clone());
        self.taskbar.set_config(config.taskbar.detector_config());
        self.config = config;
    }

    /// Run one decision cycle
    pub fn tick<W: WindowSystem + ?Sized>(&mut self, ws: &mut W, input: TickInput) -> TickReport {
        self.ticks += 1;
        let mut events = Vec::new();

        let snapshot = self.snapshots.snapshot(&*ws, self.avatar);
        let avatar_rect = match ws.window_rect(self.avatar) {
            Ok(rect) if !rect.is_empty() => Some(rect),
            Ok(rect) => {
                tracing::debug!("avatar rect degenerate ({:?}), skipping tick", rect);
                None
            }
            Err(e) => {
                tracing::debug!("avatar rect unavailable, skipping tick: {}", e);
                None
            }
        };
        let Some(avatar_rect) = avatar_rect else {
            // No geometry to act on, but a vanished target still ends the binding
            self.release_if_target_lost(ws, &snapshot, &mut events);
            return self.report(events, None);
        };

        let dpi = monitor::dpi_scale(&*ws, self.avatar);
        let frame = Frame {
            snap_zone: self.snap_zone(&avatar_rect, dpi),
            snapshot,
            avatar_rect,
            dpi,
        };

        let state = std::mem::take(&mut self.state);
        self.state = self.advance(ws, state, &input, &frame, &mut events);

        if matches!(self.state, DockState::Free) {
            if let Err(e) = self.zorder.set_topmost(ws, true) {
                tracing::debug!("failed to keep avatar topmost: {}", e);
            }
        }

        // Taskbar math uses where the avatar ended up this tick
        let placed = ws.window_rect(self.avatar).unwrap_or(frame.avatar_rect);
        let mapper = CoordinateMapper::new(
            placed,
            self.config.render.pixels_per_unit,
            dpi,
            self.config.render.desktop_scale,
        );
        self.update_taskbar(&*ws, mapper.as_ref(), &input, &mut events);

        let debug = if self.config.debug.visualize {
            mapper
                .as_ref()
                .map(|m| self.debug_geometry(&*ws, &frame, m))
        } else {
            None
        };

        self.report(events, debug)
    }

    /// Drop any binding and go back to floating topmost
    pub fn release<W: WindowSystem + ?Sized>(&mut self, ws: &mut W) -> Option<EngineEvent> {
        let target = self.state.binding()?.target;
        let mut events = Vec::new();
        self.state = self.release_binding(ws, target, ReleaseReason::Requested, &mut events);
        events.pop()
    }

    fn snap_zone(&self, avatar_rect: &Rect, dpi: f32) -> Rect {
        let docking = &self.config.docking;
        let scale = if docking.scale_with_dpi { dpi } else { 1.0 };
        compute_snap_zone(
            avatar_rect,
            docking.snap_zone_offset.scaled(scale),
            docking.snap_zone_size.scaled(scale),
        )
    }

    fn advance<W: WindowSystem + ?Sized>(
        &mut self,
        ws: &mut W,
        state: DockState,
        input: &TickInput,
        frame: &Frame,
        events: &mut Vec<EngineEvent>,
    ) -> DockState {
        match state {
            DockState::Free | DockState::SearchingWhileDragging => {
                if input.dragging {
                    self.search(ws, frame, events)
                } else {
                    DockState::Free
                }
            }
            DockState::DockedWhileDragging(binding) if input.dragging => {
                self.slide(ws, binding, 0, frame, events)
            }
            // Re-drag: the avatar still carries the follow trim
            DockState::DockedFollowing(binding) if input.dragging => {
                self.slide(ws, binding, binding.vertical_trim, frame, events)
            }
            DockState::DockedWhileDragging(binding) | DockState::DockedFollowing(binding) => {
                self.follow(ws, binding, frame, events)
            }
        }
    }

    fn search<W: WindowSystem + ?Sized>(
        &mut self,
        ws: &mut W,
        frame: &Frame,
        events: &mut Vec<EngineEvent>,
    ) -> DockState {
        let title_bar_height = self.config.docking.title_bar_height;
        match find_dock_target(&frame.snapshot, &frame.snap_zone, title_bar_height) {
            SearchOutcome::Dock(entry) => {
                let binding = DockBinding::commit(
                    entry.handle,
                    &frame.avatar_rect,
                    &entry.rect,
                    self.config.docking.vertical_offset,
                );
                if let Err(e) = self.zorder.set_order_above_target(ws, entry.handle) {
                    tracing::debug!("failed to order avatar above {}: {}", entry.handle, e);
                }
                tracing::info!(
                    "Docked to {} at offset ({}, {})",
                    entry.handle,
                    binding.dx,
                    binding.dy
                );
                events.push(EngineEvent::Docked {
                    target: entry.handle,
                });
                DockState::DockedWhileDragging(binding)
            }
            SearchOutcome::Occluded(handle) => {
                tracing::trace!("snap zone covered by {}", handle);
                DockState::SearchingWhileDragging
            }
            SearchOutcome::Nothing => DockState::SearchingWhileDragging,
        }
    }

    /// `trim` is the vertical trim currently applied to the avatar rect; the
    /// recheck runs against the untrimmed slide anchor.
    fn slide<W: WindowSystem + ?Sized>(
        &mut self,
        ws: &mut W,
        mut binding: DockBinding,
        trim: i32,
        frame: &Frame,
        events: &mut Vec<EngineEvent>,
    ) -> DockState {
        let Some(target) = frame.snapshot.find(binding.target) else {
            return self.release_binding(ws, binding.target, ReleaseReason::TargetLost, events);
        };

        let snap_zone = if trim == 0 {
            frame.snap_zone
        } else {
            self.snap_zone(&frame.avatar_rect.translated(0, -trim), frame.dpi)
        };
        let strip = target
            .rect
            .top_strip(self.config.docking.title_bar_height);
        if !strip.overlaps(&snap_zone) {
            return self.release_binding(ws, binding.target, ReleaseReason::DraggedAway, events);
        }

        // Horizontal slide is free, vertical attachment stays rigid
        binding.dx = frame.avatar_rect.left - target.rect.left;
        let position = follow::slide_position(&binding, &target.rect);
        if let Err(e) = follow::move_avatar(ws, self.avatar, &frame.avatar_rect, position) {
            tracing::debug!("failed to move avatar: {}", e);
        }

        DockState::DockedWhileDragging(binding)
    }

    fn follow<W: WindowSystem + ?Sized>(
        &mut self,
        ws: &mut W,
        binding: DockBinding,
        frame: &Frame,
        events: &mut Vec<EngineEvent>,
    ) -> DockState {
        let Some(target) = frame.snapshot.find(binding.target) else {
            return self.release_binding(ws, binding.target, ReleaseReason::TargetLost, events);
        };

        let position = follow::follow_position(&binding, &target.rect);
        if let Err(e) = follow::move_avatar(ws, self.avatar, &frame.avatar_rect, position) {
            tracing::debug!("failed to move avatar: {}", e);
        }
        if let Err(e) = self.zorder.set_order_above_target(ws, binding.target) {
            tracing::debug!("failed to order avatar above {}: {}", binding.target, e);
        }

        DockState::DockedFollowing(binding)
    }

    fn release_if_target_lost<W: WindowSystem + ?Sized>(
        &mut self,
        ws: &mut W,
        snapshot: &WindowSnapshot,
        events: &mut Vec<EngineEvent>,
    ) {
        let Some(target) = self.state.binding().map(|b| b.target) else {
            return;
        };
        if snapshot.find(target).is_none() {
            self.state = self.release_binding(ws, target, ReleaseReason::TargetLost, events);
        }
    }

    fn release_binding<W: WindowSystem + ?Sized>(
        &mut self,
        ws: &mut W,
        target: WindowHandle,
        reason: ReleaseReason,
        events: &mut Vec<EngineEvent>,
    ) -> DockState {
        if let Err(e) = self.zorder.set_topmost(ws, true) {
            tracing::debug!("failed to restore topmost: {}", e);
        }
        tracing::info!("Released from {} ({:?})", target, reason);
        events.push(EngineEvent::Released { target, reason });
        DockState::Free
    }

    fn update_taskbar<W: WindowSystem + ?Sized>(
        &mut self,
        ws: &W,
        mapper: Option<&CoordinateMapper>,
        input: &TickInput,
        events: &mut Vec<EngineEvent>,
    ) {
        // Degenerate geometry: hold the current value
        let Some(mapper) = mapper else {
            return;
        };

        let was_sitting = self.taskbar.is_sitting();
        let taskbar = if input.focused {
            monitor::taskbar(ws, self.avatar).map(|t| mapper.rect_to_engine(t.rect))
        } else {
            None
        };
        let body_point = input.body_point.unwrap_or(self.config.taskbar.body_point);
        let result = self.taskbar.check(input.focused, taskbar, body_point);

        if result.is_sitting() != was_sitting {
            tracing::debug!("sitting changed to {} ({:?})", result.is_sitting(), result);
            events.push(EngineEvent::SittingChanged {
                sitting: result.is_sitting(),
            });
        }
    }

    fn debug_geometry<W: WindowSystem + ?Sized>(
        &self,
        ws: &W,
        frame: &Frame,
        mapper: &CoordinateMapper,
    ) -> DebugGeometry {
        let to_world = |rect: Rect| -> Option<WorldRect> {
            (!rect.is_empty()).then(|| mapper.rect_to_engine(rect))
        };
        let target_world = self
            .state
            .binding()
            .and_then(|b| frame.snapshot.find(b.target))
            .and_then(|e| to_world(e.rect));

        DebugGeometry {
            snap_zone: frame.snap_zone,
            snap_zone_world: to_world(frame.snap_zone),
            candidates_world: frame
                .snapshot
                .iter()
                .filter_map(|e| to_world(e.rect))
                .collect(),
            target_world,
            taskbar_world: monitor::taskbar(ws, self.avatar).and_then(|t| to_world(t.rect)),
        }
    }

    fn report(&self, events: Vec<EngineEvent>, debug: Option<DebugGeometry>) -> TickReport {
        TickReport {
            tick: self.ticks,
            phase: self.state.phase(),
            target: self.state.binding().map(|b| b.target),
            pose: PoseFlags {
                is_docked: self.state.is_docked(),
                is_sitting: self.taskbar.is_sitting(),
            },
            events,
            debug,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{FakeMonitor, FakeWindow, FakeWindowSystem};
    use crate::screen::Point;

    const AVATAR: WindowHandle = WindowHandle(100);
    const NOTES: WindowHandle = WindowHandle(1);
    const OTHER: WindowHandle = WindowHandle(2);

    /// Avatar 200x105 at (200, 0): snap zone is (250, 100)-(350, 110)
    fn desktop() -> FakeWindowSystem {
        let mut ws = FakeWindowSystem::new();
        ws.add_window(FakeWindow::new(100, "Buddy", Rect::from_xywh(200, 0, 200, 105)).topmost());
        ws.add_monitor(FakeMonitor::with_bottom_taskbar(Rect::new(0, 0, 1920, 1080), 40));
        ws
    }

    fn with_notes() -> FakeWindowSystem {
        let mut ws = desktop();
        ws.add_window(FakeWindow::new(1, "Notes", Rect::new(100, 100, 500, 400)));
        ws
    }

    fn engine() -> DockingEngine {
        DockingEngine::new(AVATAR, Config::default())
    }

    fn drag() -> TickInput {
        TickInput {
            dragging: true,
            focused: true,
            body_point: None,
        }
    }

    fn idle() -> TickInput {
        TickInput {
            dragging: false,
            focused: true,
            body_point: None,
        }
    }

    fn avatar_pos(ws: &FakeWindowSystem) -> Point {
        ws.window_rect(AVATAR).unwrap().top_left()
    }

    /// Dock to Notes and let go
    fn docked_following(ws: &mut FakeWindowSystem) -> DockingEngine {
        let mut engine = engine();
        engine.tick(ws, drag());
        engine.tick(ws, idle());
        assert_eq!(engine.phase(), DockPhase::DockedFollowing);
        engine
    }

    #[test]
    fn test_no_windows_stays_free() {
        let mut ws = desktop();
        let mut engine = engine();

        for _ in 0..5 {
            let report = engine.tick(&mut ws, idle());
            assert_eq!(report.phase, DockPhase::Free);
            assert!(!report.is_docked());
        }

        let report = engine.tick(&mut ws, drag());
        assert_eq!(report.phase, DockPhase::SearchingWhileDragging);
        assert!(!report.is_docked());

        let report = engine.tick(&mut ws, idle());
        assert_eq!(report.phase, DockPhase::Free);
        assert!(ws.is_topmost(AVATAR));
    }

    #[test]
    fn test_drag_over_title_bar_docks() {
        let mut ws = with_notes();
        let mut engine = engine();

        let report = engine.tick(&mut ws, drag());
        assert_eq!(report.phase, DockPhase::DockedWhileDragging);
        assert_eq!(report.target, Some(NOTES));
        assert!(report.is_docked());
        assert_eq!(report.events, vec![EngineEvent::Docked { target: NOTES }]);

        let binding = engine.state().binding().copied().unwrap();
        // (avatarX - 100, 100 - avatarY)
        assert_eq!((binding.dx, binding.dy), (100, 100));

        // Ordered directly above the target, out of the topmost band
        assert!(!ws.is_topmost(AVATAR));
        assert_eq!(ws.window_above(NOTES).unwrap(), Some(AVATAR));
    }

    #[test]
    fn test_idle_over_title_bar_does_not_dock() {
        let mut ws = with_notes();
        let mut engine = engine();
        let report = engine.tick(&mut ws, idle());
        assert_eq!(report.phase, DockPhase::Free);
    }

    #[test]
    fn test_follows_target_movement() {
        let mut ws = with_notes();
        let mut engine = docked_following(&mut ws);
        assert_eq!(avatar_pos(&ws), Point::new(200, 0));

        ws.set_position(NOTES, 150, 140);
        engine.tick(&mut ws, idle());
        assert_eq!(avatar_pos(&ws), Point::new(250, 40));
    }

    #[test]
    fn test_offset_stability() {
        let mut ws = with_notes();
        let mut engine = docked_following(&mut ws);

        let moves = [(37, -12), (-200, 300), (0, 1), (999, 0), (-5, -5)];
        for (dx, dy) in moves {
            let before = avatar_pos(&ws);
            let target = ws.window_rect(NOTES).unwrap();
            ws.set_position(NOTES, target.left + dx, target.top + dy);

            let report = engine.tick(&mut ws, idle());
            assert!(report.is_docked());
            let after = avatar_pos(&ws);
            assert_eq!((after.x - before.x, after.y - before.y), (dx, dy));
        }
    }

    #[test]
    fn test_vertical_trim_applies_while_following() {
        let mut ws = with_notes();
        let mut config = Config::default();
        config.docking.vertical_offset = 4;
        let mut engine = DockingEngine::new(AVATAR, config);

        engine.tick(&mut ws, drag());
        assert_eq!(avatar_pos(&ws), Point::new(200, 0));
        engine.tick(&mut ws, idle());
        assert_eq!(avatar_pos(&ws), Point::new(200, 4));

        ws.set_position(NOTES, 110, 120);
        engine.tick(&mut ws, idle());
        assert_eq!(avatar_pos(&ws), Point::new(210, 24));
    }

    #[test]
    fn test_target_closed_releases_in_one_tick() {
        let mut ws = with_notes();
        let mut engine = docked_following(&mut ws);

        ws.remove_window(NOTES);
        let report = engine.tick(&mut ws, idle());
        assert_eq!(report.phase, DockPhase::Free);
        assert!(!report.is_docked());
        assert_eq!(
            report.events,
            vec![EngineEvent::Released {
                target: NOTES,
                reason: ReleaseReason::TargetLost,
            }]
        );
        assert!(ws.is_topmost(AVATAR));
    }

    #[test]
    fn test_target_hidden_or_shrunk_releases() {
        let mut ws = with_notes();
        let mut engine = docked_following(&mut ws);
        ws.window_mut(NOTES).unwrap().rect = Rect::new(100, 100, 180, 400);
        assert!(!engine.tick(&mut ws, idle()).is_docked());

        let mut ws = with_notes();
        let mut engine = docked_following(&mut ws);
        ws.window_mut(NOTES).unwrap().visible = false;
        assert!(!engine.tick(&mut ws, idle()).is_docked());
    }

    #[test]
    fn test_enumeration_failure_while_docked_releases() {
        let mut ws = with_notes();
        let mut engine = docked_following(&mut ws);
        ws.fail_enumeration = true;
        let report = engine.tick(&mut ws, idle());
        assert_eq!(report.phase, DockPhase::Free);
    }

    #[test]
    fn test_front_most_candidate_wins() {
        let mut ws = desktop();
        ws.add_window(FakeWindow::new(1, "A", Rect::new(100, 100, 500, 400)));
        ws.add_window(FakeWindow::new(2, "B", Rect::new(150, 100, 600, 450)));

        let report = engine().tick(&mut ws, drag());
        assert_eq!(report.target, Some(NOTES));

        // Same layout with B in front
        let mut ws = desktop();
        ws.add_window(FakeWindow::new(1, "A", Rect::new(100, 100, 500, 400)));
        ws.add_window(FakeWindow::new(2, "B", Rect::new(150, 100, 600, 450)));
        ws.raise(OTHER);

        let report = engine().tick(&mut ws, drag());
        assert_eq!(report.target, Some(OTHER));
    }

    #[test]
    fn test_tie_break_is_deterministic() {
        for _ in 0..10 {
            let mut ws = desktop();
            ws.add_window(FakeWindow::new(1, "A", Rect::new(100, 100, 500, 400)));
            ws.add_window(FakeWindow::new(2, "B", Rect::new(100, 100, 500, 400)));
            let report = engine().tick(&mut ws, drag());
            assert_eq!(report.target, Some(NOTES));
        }
    }

    #[test]
    fn test_occluding_window_blocks_dock() {
        let mut ws = desktop();
        // Body covers the snap zone, its own title bar sits higher up
        ws.add_window(FakeWindow::new(2, "Cover", Rect::new(0, 50, 800, 600)));
        ws.add_window(FakeWindow::new(1, "Notes", Rect::new(100, 100, 500, 400)));
        let mut engine = engine();

        for _ in 0..3 {
            let report = engine.tick(&mut ws, drag());
            assert_eq!(report.phase, DockPhase::SearchingWhileDragging);
            assert!(!report.is_docked());
        }

        // Bring Notes to the front and the title bar becomes reachable
        ws.raise(NOTES);
        let report = engine.tick(&mut ws, drag());
        assert_eq!(report.target, Some(NOTES));
    }

    #[test]
    fn test_search_outcomes() {
        let zone = Rect::new(250, 100, 350, 110);
        let snapshot = WindowSnapshot::new(vec![
            WindowSnapshotEntry {
                handle: OTHER,
                rect: Rect::new(0, 50, 800, 600),
            },
            WindowSnapshotEntry {
                handle: NOTES,
                rect: Rect::new(100, 100, 500, 400),
            },
        ]);
        assert_eq!(
            find_dock_target(&snapshot, &zone, 5),
            SearchOutcome::Occluded(OTHER)
        );
        assert_eq!(
            find_dock_target(&WindowSnapshot::default(), &zone, 5),
            SearchOutcome::Nothing
        );
    }

    #[test]
    fn test_slide_along_title_bar() {
        let mut ws = with_notes();
        let mut engine = engine();
        engine.tick(&mut ws, drag());

        // User drags right and a little down; x follows, y snaps back
        ws.set_position(AVATAR, 260, 3);
        let report = engine.tick(&mut ws, drag());
        assert_eq!(report.phase, DockPhase::DockedWhileDragging);
        assert_eq!(avatar_pos(&ws), Point::new(260, 0));
        assert_eq!(engine.state().binding().map(|b| (b.dx, b.dy)), Some((160, 100)));

        // Let go, then the new horizontal offset sticks while following
        engine.tick(&mut ws, idle());
        ws.set_position(NOTES, 0, 100);
        engine.tick(&mut ws, idle());
        assert_eq!(avatar_pos(&ws), Point::new(160, 0));
    }

    #[test]
    fn test_drag_away_releases() {
        let mut ws = with_notes();
        let mut engine = engine();
        engine.tick(&mut ws, drag());

        ws.set_position(AVATAR, 200, 60);
        let report = engine.tick(&mut ws, drag());
        assert_eq!(report.phase, DockPhase::Free);
        assert_eq!(
            report.events,
            vec![EngineEvent::Released {
                target: NOTES,
                reason: ReleaseReason::DraggedAway,
            }]
        );
        assert!(ws.is_topmost(AVATAR));

        // Still dragging: searching again next tick
        let report = engine.tick(&mut ws, drag());
        assert_eq!(report.phase, DockPhase::SearchingWhileDragging);
    }

    #[test]
    fn test_redrag_from_following_keeps_binding() {
        let mut ws = with_notes();
        let mut engine = docked_following(&mut ws);

        let report = engine.tick(&mut ws, drag());
        assert_eq!(report.phase, DockPhase::DockedWhileDragging);
        assert!(report.events.is_empty());
        assert_eq!(report.target, Some(NOTES));
    }

    #[test]
    fn test_following_reasserts_above_target() {
        let mut ws = with_notes();
        ws.add_window(FakeWindow::new(2, "Mail", Rect::new(900, 500, 1500, 900)));
        let mut engine = docked_following(&mut ws);

        // Target gets clicked to the front; the avatar must climb with it
        ws.raise(NOTES);
        engine.tick(&mut ws, idle());
        assert_eq!(ws.window_above(NOTES).unwrap(), Some(AVATAR));
        assert!(!ws.is_topmost(AVATAR));
        assert!(ws
            .z_order_calls()
            .iter()
            .all(|c| c.flags.no_activate && c.flags.no_move && c.flags.no_size));
        assert!(ws.z_order_calls().iter().all(|c| c.handle == AVATAR));
    }

    #[test]
    fn test_explicit_release() {
        let mut ws = with_notes();
        let mut engine = docked_following(&mut ws);
        let event = engine.release(&mut ws);
        assert_eq!(
            event,
            Some(EngineEvent::Released {
                target: NOTES,
                reason: ReleaseReason::Requested,
            })
        );
        assert_eq!(engine.phase(), DockPhase::Free);
        assert!(ws.is_topmost(AVATAR));
        assert_eq!(engine.release(&mut ws), None);
    }

    #[test]
    fn test_missing_avatar_skips_tick() {
        let mut ws = with_notes();
        let mut engine = docked_following(&mut ws);
        ws.remove_window(AVATAR);
        let report = engine.tick(&mut ws, idle());
        assert_eq!(report.phase, DockPhase::DockedFollowing);
    }

    #[test]
    fn test_unsupported_platform_is_inert() {
        let mut ws = crate::platform::UnsupportedWindowSystem;
        let mut engine = engine();
        for input in [drag(), idle(), drag()] {
            let report = engine.tick(&mut ws, input);
            assert!(!report.is_docked());
            assert!(!report.is_sitting());
        }
    }

    #[test]
    fn test_lost_target_releases_even_when_avatar_rect_degenerate() {
        let mut ws = with_notes();
        let mut engine = docked_following(&mut ws);

        ws.remove_window(NOTES);
        ws.window_mut(AVATAR).unwrap().rect = Rect::zero();
        let report = engine.tick(&mut ws, idle());
        assert_eq!(report.phase, DockPhase::Free);
        assert_eq!(report.target, None);
        assert_eq!(
            report.events,
            vec![EngineEvent::Released {
                target: NOTES,
                reason: ReleaseReason::TargetLost,
            }]
        );
        assert!(ws.is_topmost(AVATAR));
    }

    #[test]
    fn test_redrag_with_vertical_trim_stays_docked() {
        let mut ws = with_notes();
        let mut config = Config::default();
        config.docking.vertical_offset = 5;
        let mut engine = DockingEngine::new(AVATAR, config);

        engine.tick(&mut ws, drag());
        engine.tick(&mut ws, idle());
        assert_eq!(avatar_pos(&ws), Point::new(200, 5));

        let report = engine.tick(&mut ws, drag());
        assert_eq!(report.phase, DockPhase::DockedWhileDragging);
        assert!(report.events.is_empty());
        // Sliding uses the untrimmed anchor
        assert_eq!(avatar_pos(&ws), Point::new(200, 0));

        let report = engine.tick(&mut ws, drag());
        assert_eq!(report.phase, DockPhase::DockedWhileDragging);

        engine.tick(&mut ws, idle());
        assert_eq!(avatar_pos(&ws), Point::new(200, 5));
    }

    #[test]
    fn test_monitor_switch_changes_scale_and_taskbar() {
        let mut ws = FakeWindowSystem::new();
        ws.add_window(FakeWindow::new(100, "Buddy", Rect::from_xywh(800, 600, 200, 400)));
        ws.add_monitor(FakeMonitor::with_bottom_taskbar(Rect::new(0, 0, 1920, 1080), 40));
        ws.add_monitor(FakeMonitor {
            bounds: Rect::new(1920, 0, 5760, 2160),
            work_area: Rect::new(1920, 0, 5760, 2160),
            dpi: 192,
        });
        let mut config = Config::default();
        config.debug.visualize = true;
        let mut engine = DockingEngine::new(AVATAR, config);

        // 96 DPI monitor, body point over the bottom taskbar
        let report = engine.tick(&mut ws, idle());
        assert!(report.is_sitting());
        let debug = report.debug.unwrap();
        assert_eq!(debug.snap_zone, Rect::new(850, 995, 950, 1005));
        assert!(debug.taskbar_world.is_some());

        // Across to the 192 DPI monitor, which has no taskbar
        ws.set_position(AVATAR, 2800, 600);
        let report = engine.tick(&mut ws, idle());
        assert!(!report.is_sitting());
        assert_eq!(
            report.events,
            vec![EngineEvent::SittingChanged { sitting: false }]
        );
        let debug = report.debug.unwrap();
        assert_eq!(debug.snap_zone, Rect::new(2800, 990, 3000, 1010));
        assert!(debug.taskbar_world.is_none());

        // And back again
        ws.set_position(AVATAR, 800, 600);
        let report = engine.tick(&mut ws, idle());
        assert!(report.is_sitting());
        assert_eq!(report.debug.unwrap().snap_zone, Rect::new(850, 995, 950, 1005));
    }

    #[test]
    fn test_snap_zone_scales_with_dpi() {
        let mut ws = FakeWindowSystem::new();
        ws.add_window(FakeWindow::new(100, "Buddy", Rect::from_xywh(200, 0, 200, 105)));
        ws.add_monitor(FakeMonitor {
            bounds: Rect::new(0, 0, 3840, 2160),
            work_area: Rect::new(0, 0, 3840, 2080),
            dpi: 192,
        });
        let mut config = Config::default();
        config.debug.visualize = true;
        let mut engine = DockingEngine::new(AVATAR, config);

        let report = engine.tick(&mut ws, idle());
        let debug = report.debug.unwrap();
        assert_eq!(debug.snap_zone, Rect::new(200, 95, 400, 115));
        assert!(debug.taskbar_world.is_some());
    }

    #[test]
    fn test_debug_geometry_is_optional() {
        let mut ws = with_notes();
        let report = engine().tick(&mut ws, drag());
        assert!(report.debug.is_none());

        let mut config = Config::default();
        config.debug.visualize = true;
        let mut engine = DockingEngine::new(AVATAR, config);
        let report = engine.tick(&mut ws, drag());
        let debug = report.debug.unwrap();
        assert_eq!(debug.candidates_world.len(), 1);
        assert!(debug.target_world.is_some());
    }

    /// Avatar 200x400: center is 200 px above the bottom, body point 250 px
    /// below center with the default config
    fn taskbar_desktop(avatar_y: i32) -> FakeWindowSystem {
        let mut ws = FakeWindowSystem::new();
        ws.add_window(FakeWindow::new(100, "Buddy", Rect::from_xywh(800, avatar_y, 200, 400)));
        ws.add_monitor(FakeMonitor::with_bottom_taskbar(Rect::new(0, 0, 1920, 1080), 40));
        ws
    }

    #[test]
    fn test_sitting_near_taskbar() {
        // Body point lands at y = 1050, inside the taskbar
        let mut ws = taskbar_desktop(600);
        let mut engine = engine();
        let report = engine.tick(&mut ws, idle());
        assert!(report.is_sitting());
        assert_eq!(report.events, vec![EngineEvent::SittingChanged { sitting: true }]);

        ws.set_position(AVATAR, 800, 100);
        let report = engine.tick(&mut ws, idle());
        assert!(!report.is_sitting());
    }

    #[test]
    fn test_sitting_frozen_while_unfocused() {
        let mut ws = taskbar_desktop(600);
        let mut engine = engine();
        assert!(engine.tick(&mut ws, idle()).is_sitting());

        ws.set_position(AVATAR, 800, 100);
        let unfocused = TickInput {
            focused: false,
            ..idle()
        };
        for _ in 0..3 {
            let report = engine.tick(&mut ws, unfocused);
            assert!(report.is_sitting());
            assert!(report.events.is_empty());
        }

        let report = engine.tick(&mut ws, idle());
        assert!(!report.is_sitting());
    }

    #[test]
    fn test_host_body_point_overrides_config() {
        let mut ws = taskbar_desktop(100);
        let mut engine = engine();
        // Center at y = 300; taskbar top 1040 is 7.4 units below
        let input = TickInput {
            body_point: Some(WorldPoint::new(0.0, -7.2)),
            ..idle()
        };
        assert!(engine.tick(&mut ws, input).is_sitting());
    }

    #[test]
    fn test_tick_counter_and_from_host() {
        let mut ws = with_notes();
        ws.dragging = true;
        let mut engine = engine();
        let input = TickInput::from_host(&ws, AVATAR);
        assert!(input.dragging && input.focused);
        assert_eq!(engine.tick(&mut ws, input).tick, 1);
        assert_eq!(engine.tick(&mut ws, input).tick, 2);
    }
}
