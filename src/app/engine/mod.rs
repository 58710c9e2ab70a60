use anyhow::Result;
use renderer::Renderer;
use std::sync::Arc;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowId};

mod renderer;

/// Geometry and title of the window the engine renders to.
#[derive(Clone, Debug)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub resizable: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Test Window".to_string(),
            width: 800,
            height: 600,
            resizable: false,
        }
    }
}

/// One window and the renderer bound to it.
pub struct Engine {
    renderer: Renderer,
}

impl Engine {
    pub fn new(event_loop: &ActiveEventLoop, config: &WindowConfig) -> Result<Self> {
        let attributes = Window::default_attributes()
            .with_title(config.title.clone())
            .with_inner_size(LogicalSize::new(config.width, config.height))
            .with_resizable(config.resizable);
        let window = Arc::new(event_loop.create_window(attributes)?);
        let renderer = Renderer::new(window)?;

        Ok(Self { renderer })
    }

    pub fn window_id(&self) -> WindowId {
        self.renderer.window().id()
    }

    pub fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if window_id != self.window_id() {
            return;
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::RedrawRequested => {
                tracing::trace!(
                    "Redraw requested ({} image views ready).",
                    self.renderer.context().swapchain.image_views.len()
                );
            }
            _ => {}
        }
    }
}
