mod engine;
use crate::app::engine::{Engine, WindowConfig};
use winit::{
    application::ApplicationHandler, event::WindowEvent, event_loop::ActiveEventLoop,
    window::WindowId,
};

#[derive(Default)]
pub struct App {
    window: WindowConfig,
    engine: Option<Engine>,
    error: Option<anyhow::Error>,
}

impl App {
    /// The initialization failure that stopped the event loop, if any.
    pub fn take_error(&mut self) -> Option<anyhow::Error> {
        self.error.take()
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.engine.is_some() || self.error.is_some() {
            return;
        }

        match Engine::new(event_loop, &self.window) {
            Ok(engine) => self.engine = Some(engine),
            Err(error) => {
                tracing::error!("Failed to initialize the rendering context: {:#}", error);
                self.error = Some(error);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if let Some(engine) = self.engine.as_mut() {
            engine.window_event(event_loop, window_id, event);
        }
    }

    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        self.engine = None;
    }
}
