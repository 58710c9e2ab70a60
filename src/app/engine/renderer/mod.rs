use anyhow::Result;
use context::{Context, ContextConfig};
use std::sync::Arc;
use winit::window::Window;

mod context;

pub struct Renderer {
    // Declared before `window` so the surface goes away first.
    context: Context,
    window: Arc<Window>,
}

impl Renderer {
    pub fn new(window: Arc<Window>) -> Result<Self> {
        let config = ContextConfig::default();

        // SAFETY: the renderer keeps the window alive for as long as the context.
        let context = unsafe { Context::create(window.as_ref(), &config)? };

        tracing::info!(
            "Renderer ready: {} swapchain images, {:?}, {}x{}.",
            context.swapchain.images.len(),
            context.swapchain.format,
            context.swapchain.extent.width,
            context.swapchain.extent.height,
        );

        Ok(Self { context, window })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn context(&self) -> &Context {
        &self.context
    }
}
