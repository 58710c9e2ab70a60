use crate::app::App;
use anyhow::Result;
use tracing_subscriber::EnvFilter;
use winit::event_loop::EventLoop;

mod app;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut app = App::default();
    let event_loop = EventLoop::new()?;

    event_loop.run_app(&mut app)?;

    match app.take_error() {
        Some(error) => Err(error),
        None => Ok(()),
    }
}
