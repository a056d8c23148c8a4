use glam::{DVec2, DVec3};
use plot_navigator::camera::Axis;
use plot_navigator::camera3d::Camera;
use plot_navigator::controller::{ControllerSettings, ViewportController, ZoomTarget};
use plot_navigator::inertia::DirectionKey;
use plot_navigator::input::{InputEvent, KeyCommand};
use plot_navigator::modifiers::{ButtonMask, Modifiers};
use plot_navigator::plot::{ChangeKind, NavigationModel, Plot};
use plot_navigator::undo::UndoCategory;

const WIDTH: u32 = 800;
const HEIGHT: u32 = 600;

fn controller(navigation: NavigationModel) -> ViewportController<Plot> {
    let mut plot = Plot::new(navigation);
    plot.axis = Axis::new(DVec3::ZERO, DVec3::new(4.0, 3.0, 2.0));
    let mut controller = ViewportController::new(plot, ControllerSettings::default());
    controller.reshape(WIDTH, HEIGHT);
    controller.draw(0.0);
    controller.document_mut().clear_logs();
    controller
}

fn drag(delta: DVec2, buttons: ButtonMask, modifiers: Modifiers) -> InputEvent {
    InputEvent::PointerMoved { delta, position: DVec2::new(400.0, 300.0), buttons, modifiers }
}

fn assert_close(a: DVec3, b: DVec3) {
    assert!((a - b).length() < 1e-9, "{a:?} != {b:?}");
}

#[test]
fn plain_drag_pans_the_rect_axis_by_pixels() {
    let mut c = controller(NavigationModel::Rect2D);
    c.handle_event(&drag(DVec2::new(10.0, 5.0), ButtonMask::PRIMARY, Modifiers::empty()), 1.0);

    // One pixel is 2 * 4 / 800 world units.
    assert_close(c.document().axis.center(), DVec3::new(-0.1, 0.05, 0.0));
    assert_eq!(c.document().transactions, vec![UndoCategory::AxisMove]);
    assert!(c.document().changes.contains(&ChangeKind::AxisRange));
    assert!(c.needs_redraw());
}

#[test]
fn shift_drag_zooms_the_rect_axis_by_the_larger_delta() {
    let mut c = controller(NavigationModel::Rect2D);
    c.handle_event(&drag(DVec2::new(10.0, -20.0), ButtonMask::PRIMARY, Modifiers::SHIFT), 1.0);

    let factor = (10.0f64 * 0.02).exp();
    assert_close(c.document().axis.range(), DVec3::new(4.0, 3.0, 2.0) * factor);
    assert_close(c.document().axis.center(), DVec3::ZERO);
}

#[test]
fn alt_drag_moves_the_in_range_view() {
    let mut c = controller(NavigationModel::Rect2D);
    c.handle_event(&drag(DVec2::new(10.0, 5.0), ButtonMask::PRIMARY, Modifiers::ALT), 1.0);

    let in_range = c.document().axis.in_range();
    assert!((in_range.center - DVec2::new(0.1, -0.05)).length() < 1e-9);
    assert_eq!(c.document().transactions, vec![UndoCategory::InRange]);
    assert_close(c.document().axis.center(), DVec3::ZERO);
}

#[test]
fn alt_shift_drag_scales_the_in_range_view_exponentially() {
    let mut c = controller(NavigationModel::Rect2D);
    c.handle_event(&drag(DVec2::new(3.0, -8.0), ButtonMask::PRIMARY, Modifiers::ALT | Modifiers::SHIFT), 1.0);
    let scale = c.document().axis.in_range().scale;
    assert!((scale - (-0.08f64).exp()).abs() < 1e-12);
}

#[test]
fn unrecognized_modifiers_and_buttons_are_ignored() {
    let mut c = controller(NavigationModel::Rect2D);
    let before = c.document().axis.clone();
    c.handle_event(&drag(DVec2::new(10.0, 5.0), ButtonMask::PRIMARY, Modifiers::CTRL), 1.0);
    c.handle_event(&drag(DVec2::new(10.0, 5.0), ButtonMask::PRIMARY, Modifiers::all()), 1.1);
    c.handle_event(&drag(DVec2::new(10.0, 5.0), ButtonMask::SECONDARY, Modifiers::empty()), 1.2);
    assert_eq!(c.document().axis, before);
    assert!(c.document().transactions.is_empty());
}

#[test]
fn axis_zoom_keeps_the_pivot_fixed() {
    let pivots = [DVec2::ZERO, DVec2::new(800.0, 600.0), DVec2::new(123.0, 456.0), DVec2::new(400.0, 300.0)];
    for pivot in pivots {
        for delta in [5.0, -7.5, 0.3, 42.0] {
            let mut c = controller(NavigationModel::Rect2D);
            c.document_mut().axis.translate(1.5, -0.25, 0.0);
            let before = c.document().axis.view_to_world(pivot, WIDTH, HEIGHT).expect("viewport has a size");
            c.zoom(delta, ZoomTarget::Axis, Some(pivot));
            let after = c.document().axis.view_to_world(pivot, WIDTH, HEIGHT).expect("viewport has a size");
            assert!((before - after).length() < 1e-9, "pivot {pivot:?} drifted for delta {delta}");
            assert_ne!(c.document().axis.range(), DVec3::new(4.0, 3.0, 2.0));
        }
    }
}

#[test]
fn tiny_zoom_is_a_silent_no_op() {
    for navigation in [NavigationModel::Rect2D, NavigationModel::Free3D] {
        let mut c = controller(navigation);
        assert!(!c.needs_redraw());
        let axis = c.document().axis.clone();
        let camera = c.document().camera.clone();
        for target in [ZoomTarget::Axis, ZoomTarget::Camera, ZoomTarget::InRange] {
            c.zoom(0.0009, target, Some(DVec2::new(10.0, 10.0)));
            c.zoom(-0.0005, target, None);
        }
        assert_eq!(c.document().axis, axis);
        assert_eq!(c.document().camera, camera);
        assert!(!c.needs_redraw());
        assert!(c.document().transactions.is_empty());
    }
}

#[test]
fn wheel_clicks_zoom_and_trackpad_deltas_pan() {
    let mut c = controller(NavigationModel::Rect2D);
    c.handle_event(&InputEvent::wheel_lines(DVec2::new(0.0, 1.0)), 1.0);
    assert_close(c.document().axis.range(), DVec3::new(4.0, 3.0, 2.0) * (0.1f64).exp());

    let mut c = controller(NavigationModel::Rect2D);
    let trackpad = InputEvent::Wheel {
        precise: DVec2::new(0.5, 0.25),
        coarse: DVec2::ZERO,
        position: None,
        buttons: ButtonMask::empty(),
        modifiers: Modifiers::empty(),
    };
    c.handle_event(&trackpad, 1.0);
    // Panned by (-5 * 0.5, 5 * 0.25) pixels.
    assert_close(c.document().axis.center(), DVec3::new(0.025, 0.0125, 0.0));
    assert_close(c.document().axis.range(), DVec3::new(4.0, 3.0, 2.0));
}

#[test]
fn wheel_with_secondary_button_zooms_around_the_cursor() {
    let mut c = controller(NavigationModel::Rect2D);
    let cursor = DVec2::new(600.0, 150.0);
    let before = c.document().axis.view_to_world(cursor, WIDTH, HEIGHT).expect("sized");
    let wheel = InputEvent::Wheel {
        precise: DVec2::new(0.0, 2.0),
        coarse: DVec2::new(0.0, 2.0),
        position: Some(cursor),
        buttons: ButtonMask::SECONDARY,
        modifiers: Modifiers::empty(),
    };
    c.handle_event(&wheel, 1.0);
    let after = c.document().axis.view_to_world(cursor, WIDTH, HEIGHT).expect("sized");
    assert!((before - after).length() < 1e-9);
    assert_close(c.document().axis.range(), DVec3::new(4.0, 3.0, 2.0) * (0.2f64).exp());
}

#[test]
fn pinch_out_zooms_in() {
    let mut c = controller(NavigationModel::Rect2D);
    c.handle_event(&InputEvent::Gesture { pinch: 0.5, rotation: 0.2, modifiers: Modifiers::empty() }, 1.0);
    assert!(c.document().axis.range().x < 4.0);
}

#[test]
fn free3d_primary_drag_rotates_the_camera() {
    let mut c = controller(NavigationModel::Free3D);
    let before = c.document().camera.orientation();
    c.handle_event(&drag(DVec2::new(20.0, 10.0), ButtonMask::PRIMARY, Modifiers::empty()), 1.0);

    let mut expected = Camera::default();
    expected.rotate(0.1, 0.0, 0.2);
    assert_ne!(c.document().camera.orientation(), before);
    assert!(c.document().camera.orientation().abs_diff_eq(expected.orientation(), 1e-12));
    assert_eq!(c.document().transactions, vec![UndoCategory::Camera]);
    assert_close(c.document().axis.center(), DVec3::ZERO);
}

#[test]
fn free3d_secondary_drag_pans_regardless_of_modifiers() {
    let mut c = controller(NavigationModel::Free3D);
    c.handle_event(&drag(DVec2::new(20.0, 0.0), ButtonMask::SECONDARY, Modifiers::ALT), 1.0);
    assert!(c.document().axis.center().length() > 0.0);
    assert_eq!(c.document().transactions, vec![UndoCategory::Camera]);
    assert_eq!(c.document().camera.orientation(), Camera::default().orientation());
}

#[test]
fn free3d_tertiary_drag_moves_the_in_range_view() {
    let mut c = controller(NavigationModel::Free3D);
    c.handle_event(&drag(DVec2::new(20.0, 10.0), ButtonMask::TERTIARY, Modifiers::empty()), 1.0);
    assert!((c.document().axis.in_range().center - DVec2::new(0.2, -0.1)).length() < 1e-12);
}

#[test]
fn free3d_shift_zooms_camera_and_shift_ctrl_zooms_axis() {
    let mut c = controller(NavigationModel::Free3D);
    c.handle_event(&drag(DVec2::new(0.0, -10.0), ButtonMask::PRIMARY, Modifiers::SHIFT), 1.0);
    assert!((c.document().camera.scale_factor() - (-0.1f64).exp()).abs() < 1e-12);
    assert_close(c.document().axis.range(), DVec3::new(4.0, 3.0, 2.0));

    c.handle_event(&drag(DVec2::new(0.0, -10.0), ButtonMask::PRIMARY, Modifiers::SHIFT | Modifiers::CTRL), 1.1);
    assert_close(c.document().axis.range(), DVec3::new(4.0, 3.0, 2.0) * (0.1f64).exp());
}

#[test]
fn invalid_model_ignores_navigation() {
    let mut c = controller(NavigationModel::Invalid);
    let axis = c.document().axis.clone();
    c.handle_event(&drag(DVec2::new(10.0, 5.0), ButtonMask::PRIMARY, Modifiers::empty()), 1.0);
    c.handle_event(&InputEvent::wheel_lines(DVec2::new(0.0, 3.0)), 1.1);
    c.zoom(10.0, ZoomTarget::Axis, None);
    assert_eq!(c.document().axis, axis);
    assert!(c.document().transactions.is_empty());
}

#[test]
fn view_presets_only_apply_in_3d() {
    let mut c = controller(NavigationModel::Free3D);
    let shifted = InputEvent::Key { command: KeyCommand::ViewTop, pressed: true, modifiers: Modifiers::SHIFT };
    c.handle_event(&shifted, 1.0);
    let mut expected = Camera::default();
    expected.set_angles(0.0, -90.0, 0.0);
    assert_eq!(c.document().camera.orientation(), expected.orientation());
    assert_eq!(c.document().transactions, vec![UndoCategory::Camera]);

    let mut flat = controller(NavigationModel::Rect2D);
    flat.handle_event(&InputEvent::key(KeyCommand::ViewFront, true), 1.0);
    assert_eq!(flat.document().camera, Camera::default());
}

#[test]
fn reset_center_restores_the_home_center() {
    let mut c = controller(NavigationModel::Rect2D);
    c.document_mut().axis.translate(3.0, 2.0, 1.0);
    c.handle_event(&InputEvent::Key { command: KeyCommand::ResetCenter, pressed: true, modifiers: Modifiers::SHIFT }, 1.0);
    assert_close(c.document().axis.center(), DVec3::new(3.0, 2.0, 1.0));

    c.handle_event(&InputEvent::key(KeyCommand::ResetCenter, true), 1.1);
    assert_close(c.document().axis.center(), DVec3::ZERO);
    assert_eq!(c.document().transactions, vec![UndoCategory::AxisMove]);
}

#[test]
fn display_shortcuts_respect_modifiers() {
    let mut c = controller(NavigationModel::Rect2D);
    assert!(c.document().toggles.axis);
    c.handle_event(&InputEvent::key(KeyCommand::ToggleAxis, true), 1.0);
    assert!(!c.document().toggles.axis);
    c.handle_event(&InputEvent::Key { command: KeyCommand::ToggleGrid, pressed: true, modifiers: Modifiers::CTRL }, 1.0);
    assert!(!c.document().toggles.grid);

    c.handle_event(&InputEvent::Key { command: KeyCommand::VectorField, pressed: true, modifiers: Modifiers::SHIFT }, 1.0);
    assert_eq!(c.document().toggles.vector_field_mode, 3);

    c.handle_event(&InputEvent::Key { command: KeyCommand::Clip, pressed: true, modifiers: Modifiers::SHIFT }, 1.0);
    assert!(c.document().toggles.clip_custom && !c.document().toggles.clip);
}

#[test]
fn quit_needs_ctrl_and_close_request_always_closes() {
    let mut c = controller(NavigationModel::Rect2D);
    c.handle_event(&InputEvent::key(KeyCommand::Quit, true), 1.0);
    assert!(!c.is_closed());
    c.handle_event(&InputEvent::Key { command: KeyCommand::Quit, pressed: true, modifiers: Modifiers::CTRL }, 1.0);
    assert!(c.is_closed());

    let mut other = controller(NavigationModel::Invalid);
    other.handle_event(&InputEvent::CloseRequested, 1.0);
    assert!(other.is_closed());
}

#[test]
fn resize_propagates_once_and_skips_empty_sizes() {
    let mut c = controller(NavigationModel::Free3D);
    c.handle_event(&InputEvent::Resized { width: WIDTH, height: HEIGHT }, 1.0);
    assert!(c.document().changes.is_empty(), "unchanged size is ignored");

    c.handle_event(&InputEvent::Resized { width: 0, height: 300 }, 1.1);
    assert!(c.document().changes.is_empty());
    assert_eq!(c.document().viewport, (WIDTH, HEIGHT));

    c.handle_event(&InputEvent::Resized { width: 1024, height: 768 }, 1.2);
    assert_eq!(c.document().viewport, (1024, 768));
    assert_eq!(c.document().changes, vec![ChangeKind::Viewport]);
}

#[test]
fn minimized_window_stops_asking_for_frames() {
    let mut c = controller(NavigationModel::Rect2D);
    c.handle_event(&InputEvent::Resized { width: 0, height: 0 }, 1.0);
    c.redraw();
    c.draw(1.1);
    assert!(!c.needs_redraw());
    assert_eq!(c.document().frames, 0, "nothing is drawn into an empty viewport");

    c.handle_event(&InputEvent::Resized { width: WIDTH, height: HEIGHT }, 1.2);
    assert!(c.needs_redraw());
}

#[test]
fn shifted_plus_key_still_zooms() {
    let mut c = controller(NavigationModel::Rect2D);
    let plus = KeyCommand::Direction(DirectionKey::Plus);
    c.handle_event(&InputEvent::Key { command: plus, pressed: true, modifiers: Modifiers::SHIFT }, 1.0);
    let due = c.next_frame_schedule().expect("scheduled");
    c.on_frame_due(due, due);
    assert!(c.document().axis.range().x < 4.0, "plus typed with shift zooms in");
    assert_eq!(c.document().transactions, vec![UndoCategory::AxisMove]);
}

#[test]
fn shifted_arrow_keys_keep_the_shift_zoom() {
    let mut c = controller(NavigationModel::Rect2D);
    let right = KeyCommand::Direction(DirectionKey::Right);
    c.handle_event(&InputEvent::Key { command: right, pressed: true, modifiers: Modifiers::SHIFT }, 1.0);
    let due = c.next_frame_schedule().expect("scheduled");
    c.on_frame_due(due, due);
    assert_close(c.document().axis.center(), DVec3::ZERO);
    assert!(c.document().axis.range().x != 4.0, "shift turns arrow motion into zoom");
}
