use super::ViewportController;
use crate::camera::Axis;
use crate::modifiers::{ButtonMask, ModifierMode};
use crate::plot::{ChangeKind, NavigationModel, PlotDocument};
use crate::undo::UndoCategory;
use glam::DVec2;

/// Deltas smaller than this are floating noise, not a zoom request.
const MIN_ZOOM_DELTA: f64 = 0.001;

/// Which pointer button a motion delta belongs to, after folding keyboard and wheel input into the
/// primary slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonState {
    Primary,
    Secondary,
    Tertiary,
}

impl ButtonState {
    pub fn classify(from_keyboard: bool, buttons: ButtonMask) -> Self {
        if from_keyboard || buttons.is_empty() || buttons.contains(ButtonMask::PRIMARY) {
            ButtonState::Primary
        } else if buttons.contains(ButtonMask::SECONDARY) {
            ButtonState::Secondary
        } else {
            ButtonState::Tertiary
        }
    }
}

/// Operation selected for one motion delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveOp {
    /// Pan the axis by whole pixels and zoom it by `dz`.
    PanAxis,
    ZoomAxis,
    /// Move the in-range view by pixels (2D) or by a fixed fraction (3D).
    MoveInRange,
    /// Exponential in-range zoom driven directly by the delta.
    ScaleInRange,
    /// Rotate the camera and zoom it by `dz`.
    RotateCamera,
    ZoomCamera,
    PanCamera,
    ZoomInRangeOut,
}

/// What a zoom request rescales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZoomTarget {
    Axis,
    Camera,
    InRange,
}

const RECT_OPS: [(ModifierMode, MoveOp); 4] = [
    (ModifierMode::None, MoveOp::PanAxis),
    (ModifierMode::Shift, MoveOp::ZoomAxis),
    (ModifierMode::Alt, MoveOp::MoveInRange),
    (ModifierMode::ShiftAlt, MoveOp::ScaleInRange),
];

const FREE_OPS: [(ModifierMode, MoveOp); 6] = [
    (ModifierMode::None, MoveOp::RotateCamera),
    (ModifierMode::Shift, MoveOp::ZoomCamera),
    (ModifierMode::ShiftCtrl, MoveOp::ZoomAxis),
    (ModifierMode::Ctrl, MoveOp::PanCamera),
    (ModifierMode::ShiftAlt, MoveOp::ZoomInRangeOut),
    (ModifierMode::Alt, MoveOp::MoveInRange),
];

fn lookup(table: &[(ModifierMode, MoveOp)], mode: ModifierMode) -> Option<MoveOp> {
    table.iter().find(|(entry, _)| *entry == mode).map(|(_, op)| *op)
}

/// Selects the operation for a motion delta. `None` means the gesture is ignored.
pub fn move_op(navigation: NavigationModel, mode: ModifierMode, buttons: ButtonState) -> Option<MoveOp> {
    match (navigation, buttons) {
        (NavigationModel::Invalid, _) => None,
        (NavigationModel::Rect2D, ButtonState::Primary) => lookup(&RECT_OPS, mode),
        (NavigationModel::Rect2D, _) => None,
        (NavigationModel::Free3D, ButtonState::Primary) => lookup(&FREE_OPS, mode),
        (NavigationModel::Free3D, ButtonState::Secondary) => Some(MoveOp::PanCamera),
        (NavigationModel::Free3D, ButtonState::Tertiary) => Some(MoveOp::MoveInRange),
    }
}

fn absmax(a: f64, b: f64) -> f64 {
    if a.abs() >= b.abs() {
        a
    } else {
        b
    }
}

impl<D: PlotDocument> ViewportController<D> {
    /// Applies a motion delta according to the navigation model, the live modifiers and the held
    /// buttons. Returns whether any operation ran.
    pub fn move_view(&mut self, dx: f64, dy: f64, dz: f64, from_keyboard: bool, buttons: ButtonMask) -> bool {
        let navigation = self.doc.navigation();
        let mut mode = self.modifiers.mode();
        // Shift is how "+" is typed on most layouts, so a keyboard zoom alone ignores it.
        if from_keyboard && dx == 0.0 && dy == 0.0 && mode == ModifierMode::Shift {
            mode = ModifierMode::None;
        }
        let Some(op) = move_op(navigation, mode, ButtonState::classify(from_keyboard, buttons)) else {
            return false;
        };
        let pixel = self.doc.pixel_size();
        let now = self.now;
        let flat = navigation == NavigationModel::Rect2D;
        match op {
            MoveOp::PanAxis => {
                self.gate.begin(&mut self.doc, UndoCategory::AxisMove, now);
                self.doc.axis_mut().translate(-dx * pixel, dy * pixel, 0.0);
                self.doc.update(ChangeKind::AxisRange);
                self.zoom(dz, ZoomTarget::Axis, None);
                self.redraw();
            }
            MoveOp::ZoomAxis => self.zoom(0.5 * absmax(dx, dy), ZoomTarget::Axis, None),
            MoveOp::MoveInRange => {
                self.gate.begin(&mut self.doc, UndoCategory::InRange, now);
                let (mx, my) = if flat { (dx * pixel, -dy * pixel) } else { (dx * 0.01, -dy * 0.01) };
                self.doc.axis_mut().in_move(mx, my);
                self.doc.update(ChangeKind::InRange);
                self.redraw();
            }
            MoveOp::ScaleInRange => {
                self.gate.begin(&mut self.doc, UndoCategory::InRange, now);
                self.doc.axis_mut().in_zoom((absmax(dx, dy) * 0.01).exp());
                self.doc.update(ChangeKind::InRange);
                self.redraw();
            }
            MoveOp::RotateCamera => {
                self.gate.begin(&mut self.doc, UndoCategory::Camera, now);
                self.doc.camera_mut().rotate(0.01 * dy, 0.0, 0.01 * dx);
                self.zoom(dz, ZoomTarget::Camera, None);
                self.redraw();
            }
            MoveOp::ZoomCamera => self.zoom(0.5 * absmax(dx, dy), ZoomTarget::Camera, None),
            MoveOp::PanCamera => {
                self.gate.begin(&mut self.doc, UndoCategory::Camera, now);
                let scale = self.doc.camera().scale_factor();
                let (sx, sy) = (dx / scale, dy / scale);
                let camera = self.doc.camera().clone();
                camera.move_axis(self.doc.axis_mut(), -sx * pixel, sy * pixel, 0.0);
                self.doc.update(ChangeKind::AxisRange);
                self.redraw();
            }
            MoveOp::ZoomInRangeOut => self.zoom(-0.5 * absmax(dx, dy), ZoomTarget::InRange, None),
        }
        true
    }

    /// Zooms `target` by `exp(-delta * 0.02)`. In the 2D model an axis zoom keeps the world point
    /// under `pivot` (viewport pixels) fixed on screen.
    pub fn zoom(&mut self, delta: f64, target: ZoomTarget, pivot: Option<DVec2>) {
        let navigation = self.doc.navigation();
        if delta.abs() < MIN_ZOOM_DELTA || !navigation.is_valid() {
            return;
        }
        let factor = (-delta * 0.02).exp();
        let now = self.now;
        self.redraw();

        match (navigation, target) {
            (_, ZoomTarget::InRange) => {
                self.gate.begin(&mut self.doc, UndoCategory::InRange, now);
                self.doc.axis_mut().in_zoom(1.0 / factor);
                self.doc.update(ChangeKind::InRange);
            }
            (NavigationModel::Rect2D, _) => {
                self.gate.begin(&mut self.doc, UndoCategory::AxisMove, now);
                let (width, height) = self.viewport;
                let unit = pivot.and_then(|p| Axis::pixel_to_unit(p, width, height));
                let axis = self.doc.axis_mut();
                let before = unit.map(|u| axis.unit_to_world(u));
                axis.zoom(factor);
                if let (Some(u), Some(before)) = (unit, before) {
                    let shift = before - axis.unit_to_world(u);
                    axis.translate(shift.x, shift.y, 0.0);
                }
                self.doc.update(ChangeKind::AxisRange);
            }
            (_, ZoomTarget::Axis) => {
                self.gate.begin(&mut self.doc, UndoCategory::AxisMove, now);
                self.doc.axis_mut().zoom(factor);
                self.doc.update(ChangeKind::AxisRange);
            }
            (_, ZoomTarget::Camera) => {
                self.gate.begin(&mut self.doc, UndoCategory::Camera, now);
                self.doc.camera_mut().zoom(factor);
            }
        }
    }
}
