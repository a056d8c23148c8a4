mod demo;

pub use demo::{demo_plot, status_title};

use crate::config::{AppConfigOverrides, NavigatorConfig};
use crate::controller::{ControllerSettings, ViewportController};
use crate::input::Input;
use crate::plot::{NavigationModel, Plot, PlotDocument};
use crate::time::Time;
use anyhow::{Context, Result};
use tracing::{error, info, warn};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

const CONFIG_PATH: &str = "config/navigator.json";
const INPUT_CONFIG_PATH: &str = "config/input.json";

pub fn run() -> Result<()> {
    run_with_overrides(AppConfigOverrides::default(), NavigationModel::Rect2D)
}

pub fn run_with_overrides(overrides: AppConfigOverrides, surface: NavigationModel) -> Result<()> {
    let mut config = NavigatorConfig::load_or_default(CONFIG_PATH);
    if !overrides.is_empty() {
        info!(fields = ?overrides.applied_fields(), "applying command line overrides");
        config.apply_overrides(&overrides);
    }
    let event_loop = EventLoop::new().context("Failed to create winit event loop")?;
    let mut app = App::new(config, demo_plot(surface));
    event_loop.run_app(&mut app).context("Event loop execution failed")?;
    Ok(())
}

/// Hosts a [`ViewportController`] in a winit window.
///
/// The controller never blocks; the host sleeps with `ControlFlow::WaitUntil` while a frame is
/// scheduled and with `ControlFlow::Wait` otherwise.
pub struct App {
    config: NavigatorConfig,
    window: Option<Window>,
    time: Time,
    input: Input,
    controller: ViewportController<Plot>,
    title: String,
}

impl App {
    pub fn new(config: NavigatorConfig, plot: Plot) -> Self {
        let mut input = Input::from_config(INPUT_CONFIG_PATH);
        input.set_pixels_per_line(config.navigation.pixels_per_line);
        let controller = ViewportController::new(plot, ControllerSettings::from_config(&config));
        Self { window: None, time: Time::new(), input, controller, title: String::new(), config }
    }

    pub fn controller(&self) -> &ViewportController<Plot> {
        &self.controller
    }

    fn present(&mut self) {
        let Some(window) = self.window.as_ref() else {
            return;
        };
        if let Some(message) = self.controller.take_message() {
            window.set_title(&format!("{}  ({message})", self.config.window.title));
            self.title.clear();
            return;
        }
        let doc = self.controller.document();
        let title = status_title(&self.config.window.title, doc.navigation(), &self.controller.status_entries());
        if title != self.title {
            window.set_title(&title);
            self.title = title;
        }
    }

    fn request_redraw(&self) {
        if self.controller.needs_redraw() {
            if let Some(window) = &self.window {
                window.request_redraw();
            }
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let attributes = Window::default_attributes()
            .with_title(self.config.window.title.clone())
            .with_inner_size(LogicalSize::new(self.config.window.width, self.config.window.height));
        match event_loop.create_window(attributes) {
            Ok(window) => {
                let size = window.inner_size();
                self.controller.reshape(size.width, size.height);
                window.request_redraw();
                self.window = Some(window);
            }
            Err(err) => {
                error!("Failed to create window: {err}");
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, _el: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let now = self.time.now();
        if let WindowEvent::RedrawRequested = event {
            self.controller.draw(now);
            self.present();
            return;
        }
        if let Some(input) = self.input.translate(&event) {
            self.controller.handle_event(&input, now);
        }
        self.request_redraw();
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.controller.is_closed() {
            event_loop.exit();
            return;
        }
        let now = self.time.now();
        if let Some(due) = self.controller.next_frame_schedule() {
            if now >= due {
                self.controller.on_frame_due(due, now);
                self.present();
            }
        }
        match self.controller.next_frame_schedule() {
            Some(next) => event_loop.set_control_flow(ControlFlow::WaitUntil(self.time.instant_at(next))),
            None => event_loop.set_control_flow(ControlFlow::Wait),
        }
        self.request_redraw();
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(message) = self.controller.take_message() {
            warn!("Unreported edit failure at exit: {message}");
        }
        info!("viewport closed");
    }
}
