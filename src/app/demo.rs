use crate::camera::Axis;
use crate::parameter::{Parameter, ParameterBounds, ParameterKind};
use crate::plot::{NavigationModel, Plot, StatusEntry};
use glam::{DVec2, DVec3};
use std::fmt::Write;

/// Document opened by the binary: a few parameters of every kind over a unit-ish axis.
pub fn demo_plot(navigation: NavigationModel) -> Plot {
    let mut plot = Plot::new(navigation);
    plot.axis = Axis::new(DVec3::ZERO, DVec3::new(4.0, 3.0, 2.0));
    plot.add_parameter(
        Parameter::new("a", ParameterKind::Real).with_real(2.0).with_bounds(ParameterBounds::real(0.0, 10.0)),
    );
    plot.add_parameter(
        Parameter::new("n", ParameterKind::Integer).with_real(3.0).with_bounds(ParameterBounds::real(1.0, 8.0)),
    );
    plot.add_parameter(Parameter::new("phi", ParameterKind::Angle).with_real(30.0).in_degrees());
    plot.add_parameter(
        Parameter::new("z", ParameterKind::Complex)
            .with_value(DVec2::new(0.5, 0.5))
            .with_bounds(ParameterBounds::radius(1.0)),
    );
    plot
}

/// Window title showing the surface and the parameter status bar. Selected parameters are marked
/// with `*`, animating ones with `~`.
pub fn status_title(base: &str, navigation: NavigationModel, status: &[StatusEntry]) -> String {
    let mut title = format!("{base} [{}]", navigation.label());
    for entry in status {
        let marker = match (entry.selected, entry.animating) {
            (true, _) => "*",
            (false, true) => "~",
            (false, false) => "",
        };
        let _ = match entry.kind {
            ParameterKind::Integer => write!(title, "  {marker}{}={}", entry.name, entry.value.x),
            ParameterKind::Complex => {
                write!(title, "  {marker}{}={:.3}{:+.3}i", entry.name, entry.value.x, entry.value.y)
            }
            _ => write!(title, "  {marker}{}={:.3}", entry.name, entry.value.x),
        };
    }
    title
}
