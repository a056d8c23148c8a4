use crate::camera::Axis;
use crate::camera3d::Camera;
use crate::error::{NavigatorError, NavigatorResult};
use crate::parameter::{Parameter, ParameterKind};
use crate::undo::UndoCategory;
use glam::DVec2;
use std::str::FromStr;
use tracing::trace;

/// Which navigation model governs how input deltas are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NavigationModel {
    /// No plottable surface is loaded.
    #[default]
    Invalid,
    Rect2D,
    Free3D,
}

impl NavigationModel {
    pub fn is_valid(self) -> bool {
        self != NavigationModel::Invalid
    }

    pub fn label(self) -> &'static str {
        match self {
            NavigationModel::Invalid => "none",
            NavigationModel::Rect2D => "rect",
            NavigationModel::Free3D => "free3d",
        }
    }
}

impl FromStr for NavigationModel {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "none" | "invalid" => Ok(NavigationModel::Invalid),
            "rect" | "rect2d" | "2d" => Ok(NavigationModel::Rect2D),
            "free3d" | "3d" => Ok(NavigationModel::Free3D),
            other => Err(format!("unknown surface '{other}' (expected rect, free3d or none)")),
        }
    }
}

/// What part of the plot a mutation touched, so the document can refresh only that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    AxisRange,
    InRange,
    Viewport,
    /// Refine a frame that was drawn below full quality.
    Refine,
}

/// Document-level toggles reachable from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlotCommand {
    ToggleAxis,
    ToggleGrid,
    CycleVectorField { step: i32 },
    ToggleDisco,
    ToggleClip,
    ToggleClipCustom,
    ToggleClipLock,
    ResetClipLock,
}

/// Opaque handle of a parameter owned by the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParamId(usize);

impl ParamId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

/// One label of the parameter status bar.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusEntry {
    pub name: String,
    pub kind: ParameterKind,
    pub value: DVec2,
    pub selected: bool,
    pub animating: bool,
}

/// Everything the document needs to composite one frame.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FrameRequest {
    /// Reduced quality is acceptable because the view is moving.
    pub interactive: bool,
    /// No surface is loaded; draw the waiting placeholder at time `time`.
    pub placeholder: bool,
    pub time: f64,
    pub status: Vec<StatusEntry>,
}

/// The plot document driven by the viewport controller.
///
/// The controller never owns geometry, rendering or expression evaluation; it mutates the axis,
/// camera and parameters through this trait and always follows a mutation with a change
/// notification, a recalculation or a redraw.
pub trait PlotDocument {
    fn navigation(&self) -> NavigationModel;

    fn axis(&self) -> &Axis;
    fn axis_mut(&mut self) -> &mut Axis;
    fn camera(&self) -> &Camera;
    fn camera_mut(&mut self) -> &mut Camera;

    /// Size of one viewport pixel in world units.
    fn pixel_size(&self) -> f64;

    fn update(&mut self, change: ChangeKind);

    /// Parameters the current plot depends on, in no particular order.
    fn used_parameters(&self) -> Vec<ParamId>;
    fn all_parameters(&self) -> Vec<ParamId>;
    fn parameter(&self, id: ParamId) -> Option<&Parameter>;
    fn parameter_mut(&mut self, id: ParamId) -> Option<&mut Parameter>;

    /// Recomputes everything depending on `id`. Returns whether the visible result changed.
    fn recalc(&mut self, id: ParamId) -> NavigatorResult<bool>;

    fn begin_transaction(&mut self, category: &UndoCategory);

    /// Returns `false` when the command does not apply to this document.
    fn command(&mut self, _command: PlotCommand) -> bool {
        false
    }

    fn set_viewport(&mut self, width: u32, height: u32);

    fn draw(&mut self, frame: &FrameRequest);

    fn at_full_quality(&self) -> bool {
        true
    }
}

/// Display toggles flipped by [`PlotCommand`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlotToggles {
    pub axis: bool,
    pub grid: bool,
    pub disco: bool,
    pub clip: bool,
    pub clip_custom: bool,
    pub clip_lock: bool,
    pub vector_field_mode: i32,
}

/// In-memory document that records every request it receives.
///
/// Serves as the demo surface of the binary and as the observable collaborator in tests.
#[derive(Debug, Clone, Default)]
pub struct Plot {
    pub navigation: NavigationModel,
    pub axis: Axis,
    pub camera: Camera,
    pub parameters: Vec<Parameter>,
    /// Indices into `parameters` the plot currently depends on.
    pub used: Vec<usize>,
    pub viewport: (u32, u32),
    pub toggles: PlotToggles,
    pub transactions: Vec<UndoCategory>,
    pub changes: Vec<ChangeKind>,
    pub recalcs: Vec<ParamId>,
    pub frames: usize,
    pub last_frame: Option<FrameRequest>,
    /// Frames still needed before the plot reports full quality.
    pub refinement_frames: usize,
    /// Parameter names whose recalculation fails, for exercising error paths.
    pub failing: Vec<String>,
    pub invisible_recalcs: bool,
}

impl Plot {
    pub fn new(navigation: NavigationModel) -> Self {
        Self { navigation, toggles: PlotToggles { axis: true, ..PlotToggles::default() }, ..Self::default() }
    }

    /// Adds a parameter the plot depends on and returns its handle.
    pub fn add_parameter(&mut self, parameter: Parameter) -> ParamId {
        let index = self.parameters.len();
        self.parameters.push(parameter);
        self.used.push(index);
        ParamId(index)
    }

    /// Adds a parameter that exists in the namespace but is not used by this plot.
    pub fn add_unused_parameter(&mut self, parameter: Parameter) -> ParamId {
        self.parameters.push(parameter);
        ParamId(self.parameters.len() - 1)
    }

    pub fn find(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name() == name)
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut Parameter> {
        self.parameters.iter_mut().find(|p| p.name() == name)
    }

    pub fn clear_logs(&mut self) {
        self.transactions.clear();
        self.changes.clear();
        self.recalcs.clear();
        self.frames = 0;
        self.last_frame = None;
    }
}

impl PlotDocument for Plot {
    fn navigation(&self) -> NavigationModel {
        self.navigation
    }

    fn axis(&self) -> &Axis {
        &self.axis
    }

    fn axis_mut(&mut self) -> &mut Axis {
        &mut self.axis
    }

    fn camera(&self) -> &Camera {
        &self.camera
    }

    fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    fn pixel_size(&self) -> f64 {
        self.axis.pixel_size(self.viewport.0)
    }

    fn update(&mut self, change: ChangeKind) {
        if change == ChangeKind::Refine {
            self.refinement_frames = self.refinement_frames.saturating_sub(1);
        }
        self.changes.push(change);
    }

    fn used_parameters(&self) -> Vec<ParamId> {
        self.used.iter().copied().map(ParamId).collect()
    }

    fn all_parameters(&self) -> Vec<ParamId> {
        (0..self.parameters.len()).map(ParamId).collect()
    }

    fn parameter(&self, id: ParamId) -> Option<&Parameter> {
        self.parameters.get(id.0)
    }

    fn parameter_mut(&mut self, id: ParamId) -> Option<&mut Parameter> {
        self.parameters.get_mut(id.0)
    }

    fn recalc(&mut self, id: ParamId) -> NavigatorResult<bool> {
        let parameter = self.parameters.get(id.0).ok_or(NavigatorError::MissingParameter(id))?;
        if self.failing.iter().any(|name| name == parameter.name()) {
            return Err(NavigatorError::Recalc {
                name: parameter.name().to_string(),
                reason: "value outside the function's domain".to_string(),
            });
        }
        self.recalcs.push(id);
        Ok(!self.invisible_recalcs && self.used.contains(&id.0))
    }

    fn begin_transaction(&mut self, category: &UndoCategory) {
        self.transactions.push(category.clone());
    }

    fn command(&mut self, command: PlotCommand) -> bool {
        let toggles = &mut self.toggles;
        match command {
            PlotCommand::ToggleAxis => toggles.axis = !toggles.axis,
            PlotCommand::ToggleGrid => toggles.grid = !toggles.grid,
            PlotCommand::CycleVectorField { step } => {
                toggles.vector_field_mode = (toggles.vector_field_mode + step).rem_euclid(4)
            }
            PlotCommand::ToggleDisco => toggles.disco = !toggles.disco,
            PlotCommand::ToggleClip => toggles.clip = !toggles.clip,
            PlotCommand::ToggleClipCustom => toggles.clip_custom = !toggles.clip_custom,
            PlotCommand::ToggleClipLock => toggles.clip_lock = !toggles.clip_lock,
            PlotCommand::ResetClipLock => toggles.clip_lock = false,
        }
        true
    }

    fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = (width, height);
        self.camera.viewport(width, height);
        self.changes.push(ChangeKind::Viewport);
    }

    fn draw(&mut self, frame: &FrameRequest) {
        trace!(interactive = frame.interactive, placeholder = frame.placeholder, "frame");
        self.frames += 1;
        self.last_frame = Some(frame.clone());
    }

    fn at_full_quality(&self) -> bool {
        self.refinement_frames == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surface_names_parse() {
        assert_eq!("rect".parse::<NavigationModel>(), Ok(NavigationModel::Rect2D));
        assert_eq!("Free3D".parse::<NavigationModel>(), Ok(NavigationModel::Free3D));
        assert_eq!("none".parse::<NavigationModel>(), Ok(NavigationModel::Invalid));
        assert!("sphere".parse::<NavigationModel>().is_err());
    }

    #[test]
    fn recalc_reports_missing_and_failing_parameters() {
        let mut plot = Plot::new(NavigationModel::Rect2D);
        let a = plot.add_parameter(Parameter::new("a", ParameterKind::Real));
        assert_eq!(plot.recalc(a), Ok(true));
        assert_eq!(plot.recalc(ParamId::new(7)), Err(NavigatorError::MissingParameter(ParamId::new(7))));
        plot.failing.push("a".to_string());
        assert!(matches!(plot.recalc(a), Err(NavigatorError::Recalc { .. })));
    }

    #[test]
    fn vector_field_mode_cycles_both_ways() {
        let mut plot = Plot::new(NavigationModel::Rect2D);
        plot.command(PlotCommand::CycleVectorField { step: -1 });
        assert_eq!(plot.toggles.vector_field_mode, 3);
        plot.command(PlotCommand::CycleVectorField { step: 1 });
        assert_eq!(plot.toggles.vector_field_mode, 0);
    }
}
