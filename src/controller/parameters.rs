use super::ViewportController;
use crate::error::{NavigatorError, NavigatorResult};
use crate::inertia::SelectionKeys;
use crate::parameter::{ParameterKind, DEGREES_PER_RADIAN};
use crate::plot::{ParamId, PlotDocument, StatusEntry};
use crate::undo::UndoCategory;
use glam::DVec2;
use smallvec::SmallVec;
use tracing::debug;

/// Fraction of a parameter's span covered by one full-strength nudge.
const SPAN_FRACTION: f64 = 0.4;
/// Step applied per nudge on top of the span scaling.
const NUDGE: f64 = 0.1;

/// Rate limit shared by all integer parameters so held keys do not race through their values.
#[derive(Debug, Clone)]
pub(crate) struct IntegerThrottle {
    last_edit: Option<f64>,
    interval: f64,
}

impl IntegerThrottle {
    pub(crate) fn new(interval: f64) -> Self {
        Self { last_edit: None, interval: interval.max(0.0) }
    }

    pub(crate) fn ready(&self, now: f64) -> bool {
        self.last_edit.map_or(true, |last| now - last >= self.interval)
    }

    pub(crate) fn accept(&mut self, now: f64) {
        self.last_edit = Some(now);
    }
}

impl<D: PlotDocument> ViewportController<D> {
    /// Parameters the plot uses, sorted by name. Slot `i` of the selection keys addresses entry `i`.
    pub fn sorted_parameters(&self) -> Vec<ParamId> {
        let mut ids: Vec<ParamId> =
            self.doc.used_parameters().into_iter().filter(|id| self.doc.parameter(*id).is_some()).collect();
        ids.sort_by(|a, b| {
            let name = |id: ParamId| self.doc.parameter(id).map(|p| p.name()).unwrap_or_default();
            name(*a).cmp(name(*b)).then(a.cmp(b))
        });
        ids.dedup();
        ids
    }

    /// Nudges the `index`th sorted parameter by `delta`. Returns `Ok(false)` for the silent
    /// no-op cases: no such parameter, the parameter is animating, or an integer edit came too
    /// soon after the previous one.
    pub fn change_parameter(&mut self, index: usize, delta: DVec2, now: f64) -> NavigatorResult<bool> {
        let Some(id) = self.sorted_parameters().get(index).copied() else {
            return Ok(false);
        };
        let param = self.doc.parameter(id).ok_or(NavigatorError::MissingParameter(id))?;
        if param.is_animating() {
            return Ok(false);
        }
        let kind = param.kind();
        let value = param.value();
        let bounds = *param.bounds();
        let next = match kind {
            ParameterKind::Angle | ParameterKind::ComplexAngle => {
                let delta = if param.angle_in_radians() { delta } else { delta * DEGREES_PER_RADIAN };
                DVec2::new(value.x + NUDGE * delta.x, value.y)
            }
            ParameterKind::Integer => {
                if !self.integer_throttle.ready(now) {
                    return Ok(false);
                }
                DVec2::new(value.x + delta.x, value.y)
            }
            ParameterKind::Real => {
                let scale = bounds.real_span().map_or(1.0, |span| span * SPAN_FRACTION);
                value + delta * scale * NUDGE
            }
            ParameterKind::Complex => {
                let scale = bounds
                    .rmax
                    .map(|r| 2.0 * r)
                    .or_else(|| bounds.real_span())
                    .or_else(|| bounds.imag_span())
                    .map_or(1.0, |span| span * SPAN_FRACTION);
                value + delta * scale * NUDGE
            }
        };
        let category = UndoCategory::Parameter(param.name().to_string());
        if kind == ParameterKind::Integer {
            self.integer_throttle.accept(now);
        }

        let visible = self.gate.scoped(&mut self.doc, category, now, |doc| {
            doc.parameter_mut(id).ok_or(NavigatorError::MissingParameter(id))?.set_value(next);
            doc.recalc(id)
        })?;
        if visible {
            self.redraw();
        }
        Ok(true)
    }

    /// Toggles the animation of every parameter addressed by a held selection key.
    pub fn toggle_selected_animations(&mut self, now: f64) {
        if self.selection.is_empty() {
            return;
        }
        let ids = self.sorted_parameters();
        let slots: SmallVec<[usize; SelectionKeys::SLOTS]> = self.selection.iter().collect();
        let period = self.settings.parameter_period;
        for slot in slots {
            let Some(&id) = ids.get(slot) else {
                continue;
            };
            let Some(param) = self.doc.parameter_mut(id) else {
                continue;
            };
            if param.is_animating() {
                param.stop_animation();
                debug!(name = param.name(), "parameter animation stopped");
                self.redraw();
            } else if param.start_animation(now, period) {
                let category = UndoCategory::Parameter(param.name().to_string());
                debug!(%category, "parameter animation started");
                self.gate.begin(&mut self.doc, category, now);
                self.start_animations(now);
                self.redraw();
            }
        }
    }

    /// Stops every animating parameter and recalculates it at its resting value. Keeps going past
    /// failures and returns the first one.
    pub(crate) fn stop_all_parameter_animations(&mut self) -> NavigatorResult<()> {
        let mut first_error = None;
        for id in self.doc.all_parameters() {
            let Some(param) = self.doc.parameter_mut(id) else {
                continue;
            };
            if !param.is_animating() {
                continue;
            }
            param.stop_animation();
            match self.doc.recalc(id) {
                Ok(_) => {}
                Err(err) => {
                    first_error.get_or_insert(err);
                }
            }
        }
        self.redraw();
        first_error.map_or(Ok(()), Err)
    }

    /// Moves every animating parameter to time `t` and recalculates it. A parameter whose
    /// recalculation fails stops animating. Returns how many parameters are still animating.
    pub(crate) fn advance_parameter_animations(&mut self, t: f64) -> usize {
        let mut animating = 0;
        for id in self.doc.used_parameters() {
            let Some(param) = self.doc.parameter_mut(id) else {
                continue;
            };
            if !param.is_animating() {
                continue;
            }
            param.animate(t);
            match self.doc.recalc(id) {
                Ok(visible) => {
                    animating += 1;
                    if visible {
                        self.redraw();
                    }
                }
                Err(err) => {
                    if let Some(param) = self.doc.parameter_mut(id) {
                        param.stop_animation();
                    }
                    self.report(err);
                }
            }
        }
        animating
    }

    /// Labels for the status bar, in selection order.
    pub fn status_entries(&self) -> Vec<StatusEntry> {
        self.sorted_parameters()
            .into_iter()
            .enumerate()
            .filter_map(|(slot, id)| {
                let param = self.doc.parameter(id)?;
                Some(StatusEntry {
                    name: param.name().to_string(),
                    kind: param.kind(),
                    value: param.value(),
                    selected: slot < SelectionKeys::SLOTS && self.selection.contains(slot),
                    animating: param.is_animating(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn throttle_opens_after_the_interval() {
        let mut throttle = IntegerThrottle::new(0.25);
        assert!(throttle.ready(0.0));
        throttle.accept(1.0);
        assert!(!throttle.ready(1.2));
        assert!(throttle.ready(1.3));
    }
}
