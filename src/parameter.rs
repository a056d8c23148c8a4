use glam::DVec2;
use std::f64::consts::{PI, TAU};

/// Value type of a plot parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterKind {
    Angle,
    ComplexAngle,
    Integer,
    Real,
    Complex,
}

impl ParameterKind {
    pub fn label(self) -> &'static str {
        match self {
            ParameterKind::Angle => "angle",
            ParameterKind::ComplexAngle => "complex angle",
            ParameterKind::Integer => "integer",
            ParameterKind::Real => "real",
            ParameterKind::Complex => "complex",
        }
    }

    pub fn is_angle(self) -> bool {
        matches!(self, ParameterKind::Angle | ParameterKind::ComplexAngle)
    }
}

/// Optional limits. `min`/`max` bound the real part, `imin`/`imax` the imaginary part and `rmax`
/// the modulus.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ParameterBounds {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub imin: Option<f64>,
    pub imax: Option<f64>,
    pub rmax: Option<f64>,
}

impl ParameterBounds {
    pub fn real(min: f64, max: f64) -> Self {
        Self { min: Some(min), max: Some(max), ..Self::default() }
    }

    pub fn radius(rmax: f64) -> Self {
        Self { rmax: Some(rmax), ..Self::default() }
    }

    pub fn real_span(&self) -> Option<f64> {
        Some(self.max? - self.min?)
    }

    pub fn imag_span(&self) -> Option<f64> {
        Some(self.imax? - self.imin?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Oscillation {
    started: f64,
    period: f64,
    origin: DVec2,
    phase: f64,
}

/// A named value the plot depends on. Values are complex; real kinds only use `x`.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    name: String,
    kind: ParameterKind,
    value: DVec2,
    bounds: ParameterBounds,
    angle_in_radians: bool,
    animation: Option<Oscillation>,
}

impl Parameter {
    pub fn new(name: impl Into<String>, kind: ParameterKind) -> Self {
        Self {
            name: name.into(),
            kind,
            value: DVec2::ZERO,
            bounds: ParameterBounds::default(),
            angle_in_radians: true,
            animation: None,
        }
    }

    pub fn with_value(mut self, value: DVec2) -> Self {
        self.value = value;
        self
    }

    pub fn with_real(self, value: f64) -> Self {
        self.with_value(DVec2::new(value, 0.0))
    }

    pub fn with_bounds(mut self, bounds: ParameterBounds) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn in_degrees(mut self) -> Self {
        self.angle_in_radians = false;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ParameterKind {
        self.kind
    }

    pub fn bounds(&self) -> &ParameterBounds {
        &self.bounds
    }

    pub fn angle_in_radians(&self) -> bool {
        self.angle_in_radians
    }

    pub fn value(&self) -> DVec2 {
        self.value
    }

    pub fn real(&self) -> f64 {
        self.value.x
    }

    pub fn set_value(&mut self, value: DVec2) {
        self.value = match self.kind {
            ParameterKind::Complex => value,
            _ => DVec2::new(value.x, 0.0),
        };
    }

    pub fn set_real(&mut self, value: f64) {
        self.set_value(DVec2::new(value, self.value.y));
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Starts oscillating from the current value. Returns `false` when there is nothing to sweep
    /// (an integer without both bounds) or the value is not finite.
    pub fn start_animation(&mut self, now: f64, period: f64) -> bool {
        if self.animation.is_some() {
            return true;
        }
        if !self.value.is_finite() || period <= 0.0 {
            return false;
        }
        let phase = match self.kind {
            ParameterKind::Integer => {
                let Some((lo, hi)) = self.bounds.min.zip(self.bounds.max) else {
                    return false;
                };
                sine_phase(self.value.x, lo, hi)
            }
            ParameterKind::Real => match self.bounds.min.zip(self.bounds.max) {
                Some((lo, hi)) => sine_phase(self.value.x, lo, hi),
                None => 0.0,
            },
            ParameterKind::Complex => self.value.y.atan2(self.value.x),
            ParameterKind::Angle | ParameterKind::ComplexAngle => 0.0,
        };
        self.animation = Some(Oscillation { started: now, period, origin: self.value, phase });
        true
    }

    pub fn stop_animation(&mut self) {
        self.animation = None;
    }

    /// Advances an active animation to wall-clock time `now`.
    pub fn animate(&mut self, now: f64) {
        let Some(anim) = self.animation else {
            return;
        };
        let turn = (now - anim.started) / anim.period * TAU;
        let value = match self.kind {
            ParameterKind::Angle | ParameterKind::ComplexAngle => {
                let full = if self.angle_in_radians { TAU } else { 360.0 };
                let swept = (anim.origin.x + turn / TAU * full).rem_euclid(full);
                DVec2::new(swept, 0.0)
            }
            ParameterKind::Integer | ParameterKind::Real => {
                let x = match self.bounds.min.zip(self.bounds.max) {
                    Some((lo, hi)) => lerp_sine(lo, hi, anim.phase + turn),
                    None => anim.origin.x + anim.origin.x.abs().max(1.0) * turn.sin(),
                };
                let x = if self.kind == ParameterKind::Integer { x.round() } else { x };
                DVec2::new(x, 0.0)
            }
            ParameterKind::Complex => {
                let radius = match self.bounds.rmax {
                    Some(rmax) if anim.origin.length() == 0.0 => rmax,
                    _ => anim.origin.length().max(f64::EPSILON),
                };
                DVec2::from_angle(anim.phase + turn) * radius
            }
        };
        self.value = value;
    }
}

fn sine_phase(value: f64, lo: f64, hi: f64) -> f64 {
    let half = (hi - lo) * 0.5;
    if half.abs() <= f64::EPSILON {
        return 0.0;
    }
    ((value - lo - half) / half).clamp(-1.0, 1.0).asin()
}

fn lerp_sine(lo: f64, hi: f64, phase: f64) -> f64 {
    let half = (hi - lo) * 0.5;
    lo + half + half * phase.sin()
}

/// Degrees per radian, used when nudging angles stored in degrees.
pub const DEGREES_PER_RADIAN: f64 = 180.0 / PI;
