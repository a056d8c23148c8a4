//! Viewport controller: turns input into axis, camera and parameter edits and drives the
//! fixed-rate navigation loop.
//!
//! The controller is single threaded and never blocks. Hosts feed it [`InputEvent`]s, poll
//! [`ViewportController::next_frame_schedule`] to decide how long to sleep, call
//! [`ViewportController::on_frame_due`] once that time is reached and composite a frame whenever
//! [`ViewportController::needs_redraw`] is set.

mod dispatch;
mod parameters;

pub use dispatch::{move_op, ButtonState, MoveOp, ZoomTarget};

use crate::config::NavigatorConfig;
use crate::error::NavigatorError;
use crate::inertia::{DirectionKey, KeyInertia, SelectionKeys};
use crate::input::{InputEvent, KeyCommand};
use crate::modifiers::{ButtonMask, ModifierMode, Modifiers};
use crate::plot::{ChangeKind, FrameRequest, PlotCommand, PlotDocument};
use crate::scheduler::AnimationScheduler;
use crate::undo::{EditGate, UndoCategory};
use glam::DVec2;
use parameters::IntegerThrottle;
use smallvec::SmallVec;
use tracing::{debug, warn};

/// Tunables of the controller, usually taken from [`NavigatorConfig`].
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerSettings {
    pub fps: f64,
    pub max_catch_up_frames: f64,
    pub parameter_period: f64,
    pub wheel_step: f64,
    pub dynamic_quality: bool,
    pub coalesce_timeout: f64,
    pub integer_edit_interval: f64,
}

impl ControllerSettings {
    pub fn from_config(config: &NavigatorConfig) -> Self {
        Self {
            fps: config.animation.fps,
            max_catch_up_frames: config.animation.max_catch_up_frames,
            parameter_period: config.animation.parameter_period,
            wheel_step: config.navigation.wheel_step,
            dynamic_quality: config.navigation.dynamic_quality,
            coalesce_timeout: config.navigation.coalesce_timeout,
            integer_edit_interval: config.parameters.integer_edit_interval,
        }
    }
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self::from_config(&NavigatorConfig::default())
    }
}

pub struct ViewportController<D: PlotDocument> {
    doc: D,
    settings: ControllerSettings,
    keys: KeyInertia,
    selection: SelectionKeys,
    scheduler: AnimationScheduler,
    gate: EditGate,
    integer_throttle: IntegerThrottle,
    modifiers: Modifiers,
    buttons: ButtonMask,
    viewport: (u32, u32),
    /// Time of the event or frame being processed.
    now: f64,
    closed: bool,
    need_redraw: bool,
    message: Option<String>,
}

impl<D: PlotDocument> ViewportController<D> {
    pub fn new(doc: D, settings: ControllerSettings) -> Self {
        Self {
            doc,
            scheduler: AnimationScheduler::new(settings.fps, settings.max_catch_up_frames),
            gate: EditGate::new(settings.coalesce_timeout),
            integer_throttle: IntegerThrottle::new(settings.integer_edit_interval),
            settings,
            keys: KeyInertia::new(),
            selection: SelectionKeys::default(),
            modifiers: Modifiers::empty(),
            buttons: ButtonMask::empty(),
            viewport: (0, 0),
            now: 0.0,
            closed: false,
            need_redraw: true,
            message: None,
        }
    }

    pub fn document(&self) -> &D {
        &self.doc
    }

    pub fn document_mut(&mut self) -> &mut D {
        &mut self.doc
    }

    pub fn into_document(self) -> D {
        self.doc
    }

    pub fn settings(&self) -> &ControllerSettings {
        &self.settings
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn is_animating(&self) -> bool {
        self.scheduler.is_animating()
    }

    /// Absolute time the next frame is due, `None` while idle.
    pub fn next_frame_schedule(&self) -> Option<f64> {
        self.scheduler.next_frame()
    }

    pub fn scheduler(&self) -> &AnimationScheduler {
        &self.scheduler
    }

    pub fn needs_redraw(&self) -> bool {
        self.need_redraw
    }

    pub fn redraw(&mut self) {
        self.need_redraw = true;
    }

    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    pub fn inertia(&self, key: DirectionKey) -> Option<f64> {
        self.keys.inertia(key)
    }

    pub fn selection(&self) -> &SelectionKeys {
        &self.selection
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    pub fn in_gesture(&self) -> bool {
        self.gate.in_gesture()
    }

    /// Takes the pending user-visible error message, if an edit failed since the last call.
    pub fn take_message(&mut self) -> Option<String> {
        self.message.take()
    }

    pub fn start_animations(&mut self, now: f64) {
        self.scheduler.start(now);
    }

    pub fn stop_animations(&mut self) {
        self.scheduler.stop();
    }

    /// Applies one input event. Returns whether the event was consumed.
    pub fn handle_event(&mut self, event: &InputEvent, now: f64) -> bool {
        self.now = now;
        match event {
            InputEvent::CloseRequested => {
                self.closed = true;
                true
            }
            InputEvent::Exposed => {
                self.redraw();
                true
            }
            InputEvent::Resized { width, height } => {
                self.reshape(*width, *height);
                true
            }
            InputEvent::ModifiersChanged(modifiers) => {
                self.modifiers = *modifiers;
                false
            }
            InputEvent::FocusLost => {
                self.release_all();
                true
            }
            InputEvent::Key { command, pressed, modifiers } => {
                self.modifiers = *modifiers;
                let result = if *pressed { self.key_pressed(*command, now) } else { Ok(self.key_released(*command)) };
                match result {
                    Ok(handled) => handled,
                    Err(err) => {
                        self.report(err);
                        true
                    }
                }
            }
            InputEvent::PointerMoved { delta, buttons, modifiers, .. } => {
                self.modifiers = *modifiers;
                self.buttons = *buttons;
                if !buttons.is_empty() {
                    self.move_view(delta.x, delta.y, 0.0, false, *buttons);
                }
                true
            }
            InputEvent::Button { button, pressed, modifiers } => {
                self.modifiers = *modifiers;
                self.buttons.set(*button, *pressed);
                self.gate.end_gesture();
                true
            }
            InputEvent::Wheel { precise, coarse, position, buttons, modifiers } => {
                self.modifiers = *modifiers;
                self.buttons = *buttons;
                self.wheel(*precise, *coarse, *position, *buttons);
                true
            }
            InputEvent::Gesture { pinch, modifiers, .. } => {
                self.modifiers = *modifiers;
                self.move_view(0.0, 0.0, self.settings.wheel_step * pinch, false, ButtonMask::empty());
                true
            }
        }
    }

    fn wheel(&mut self, precise: DVec2, coarse: DVec2, position: Option<DVec2>, buttons: ButtonMask) {
        let step = self.settings.wheel_step;
        if precise != coarse {
            self.move_view(-step * precise.x, step * precise.y, 0.0, false, ButtonMask::empty());
        } else if buttons.contains(ButtonMask::SECONDARY) {
            self.zoom(-step * (coarse.x + coarse.y), ZoomTarget::Axis, position);
        } else {
            self.move_view(0.0, 0.0, -step * (coarse.x + coarse.y), false, ButtonMask::empty());
        }
    }

    fn key_pressed(&mut self, command: KeyCommand, now: f64) -> Result<bool, NavigatorError> {
        let mode = self.modifiers.mode();
        let shift = self.modifiers.contains(Modifiers::SHIFT);
        match command {
            KeyCommand::Direction(key) => {
                if self.keys.press(key) {
                    debug!(?key, "direction key held");
                }
                self.start_animations(now);
                Ok(true)
            }
            KeyCommand::Select(digit) => {
                if let Some(slot) = SelectionKeys::slot_for_digit(digit) {
                    if self.selection.press(slot) {
                        self.redraw();
                    }
                }
                Ok(true)
            }
            KeyCommand::ToggleAnimation => {
                self.toggle_selected_animations(now);
                Ok(true)
            }
            KeyCommand::StopAnimations => {
                self.stop_all_parameter_animations()?;
                Ok(true)
            }
            KeyCommand::Quit => {
                if mode == ModifierMode::Ctrl {
                    self.closed = true;
                }
                Ok(true)
            }
            KeyCommand::ToggleAxis => Ok(mode.is_none() && self.plot_command(PlotCommand::ToggleAxis)),
            KeyCommand::ToggleGrid => Ok(mode.is_none() && self.plot_command(PlotCommand::ToggleGrid)),
            KeyCommand::ToggleDisco => Ok(mode.is_none() && self.plot_command(PlotCommand::ToggleDisco)),
            KeyCommand::VectorField => {
                let step = if shift { -1 } else { 1 };
                Ok(self.plot_command(PlotCommand::CycleVectorField { step }))
            }
            KeyCommand::Clip => Ok(match mode {
                ModifierMode::None => self.plot_command(PlotCommand::ToggleClip),
                ModifierMode::Shift => self.plot_command(PlotCommand::ToggleClipCustom),
                _ => false,
            }),
            KeyCommand::ClipLock => Ok(match mode {
                ModifierMode::None => self.plot_command(PlotCommand::ToggleClipLock),
                ModifierMode::Shift => self.plot_command(PlotCommand::ResetClipLock),
                _ => false,
            }),
            KeyCommand::ViewTop => {
                self.view_preset(0.0, if shift { -90.0 } else { 90.0 });
                Ok(true)
            }
            KeyCommand::ViewFront => {
                self.view_preset(if shift { 180.0 } else { 0.0 }, 0.3);
                Ok(true)
            }
            KeyCommand::ViewSide => {
                self.view_preset(if shift { 90.0 } else { -90.0 }, 0.3);
                Ok(true)
            }
            KeyCommand::ResetCenter => {
                if !mode.is_none() || !self.doc.navigation().is_valid() {
                    return Ok(false);
                }
                self.gate.begin(&mut self.doc, UndoCategory::AxisMove, now);
                self.doc.axis_mut().reset_center();
                self.doc.update(ChangeKind::AxisRange);
                self.redraw();
                Ok(true)
            }
        }
    }

    fn key_released(&mut self, command: KeyCommand) -> bool {
        match command {
            KeyCommand::Direction(key) => {
                self.keys.release(key);
                if self.keys.is_empty() {
                    self.gate.end_gesture();
                }
                true
            }
            KeyCommand::Select(digit) => {
                if let Some(slot) = SelectionKeys::slot_for_digit(digit) {
                    if self.selection.release(slot) {
                        self.redraw();
                    }
                }
                self.gate.end_gesture();
                true
            }
            _ => false,
        }
    }

    fn plot_command(&mut self, command: PlotCommand) -> bool {
        let applied = self.doc.command(command);
        if applied {
            self.redraw();
        }
        applied
    }

    /// Replaces the camera orientation with a preset; only meaningful in the 3D model.
    fn view_preset(&mut self, azimuth: f64, elevation: f64) -> bool {
        if self.doc.navigation() != crate::plot::NavigationModel::Free3D {
            return false;
        }
        self.gate.begin(&mut self.doc, UndoCategory::Camera, self.now);
        self.doc.camera_mut().set_angles(azimuth, elevation, 0.0);
        self.redraw();
        true
    }

    fn release_all(&mut self) {
        self.keys.clear();
        self.selection.clear();
        self.buttons = ButtonMask::empty();
        self.modifiers = Modifiers::empty();
        self.gate.end_gesture();
        self.redraw();
    }

    fn report(&mut self, err: NavigatorError) {
        warn!("edit failed: {err}");
        self.message = Some(err.to_string());
        self.gate.end_gesture();
        self.redraw();
    }

    /// Updates the viewport size and propagates it to the document.
    pub fn reshape(&mut self, width: u32, height: u32) {
        if self.viewport == (width, height) {
            return;
        }
        self.viewport = (width, height);
        if width == 0 || height == 0 {
            return;
        }
        self.doc.set_viewport(width, height);
        self.redraw();
    }

    /// Runs one scheduled frame. `t` is the deadline being served, `now` the current time.
    pub fn on_frame_due(&mut self, t: f64, now: f64) {
        debug_assert!(self.scheduler.is_due(t), "frame fired while idle or before its deadline");
        if !self.scheduler.is_due(t) {
            return;
        }
        self.now = now;
        let dt = self.scheduler.frame_delta(t);
        let driving = !self.keys.is_empty();
        let sample = self.keys.tick(dt);

        if !self.selection.is_empty() {
            if sample.steps.x != 0 || sample.steps.y != 0 {
                let delta = DVec2::new(sample.steps.x as f64, -(sample.steps.y as f64));
                let slots: SmallVec<[usize; 10]> = self.selection.iter().collect();
                for slot in slots {
                    if let Err(err) = self.change_parameter(slot, delta, now) {
                        self.report(err);
                    }
                }
            }
        } else if driving {
            let motion = sample.delta * dt;
            self.move_view(motion.x, motion.y, motion.z, true, ButtonMask::empty());
        }

        let animated = self.advance_parameter_animations(t);
        self.draw(now);

        if animated == 0 && self.keys.is_empty() && self.selection.is_empty() && self.doc.navigation().is_valid()
        {
            self.stop_animations();
            return;
        }
        self.scheduler.reschedule(t, now);
    }

    /// Composites a frame through the document and clears the redraw request.
    pub fn draw(&mut self, now: f64) {
        self.scheduler.mark_drawn(now);
        let (width, height) = self.viewport;
        if width == 0 || height == 0 {
            // Nothing to show while minimized; the next non-empty reshape asks again.
            self.need_redraw = false;
            return;
        }
        if !self.doc.navigation().is_valid() {
            let frame = FrameRequest { interactive: false, placeholder: true, time: now, status: Vec::new() };
            self.doc.draw(&frame);
            self.need_redraw = false;
            // The placeholder is animated.
            self.start_animations(now);
            return;
        }
        let interactive = self.settings.dynamic_quality && (!self.keys.is_empty() || !self.buttons.is_empty());
        if !interactive && !self.doc.at_full_quality() {
            self.doc.update(ChangeKind::Refine);
        }
        let frame = FrameRequest { interactive, placeholder: false, time: now, status: self.status_entries() };
        self.doc.draw(&frame);
        self.need_redraw = !self.doc.at_full_quality();
    }
}
