use anyhow::Result;
use vulkanalia::loader::{LIBRARY, LibloadingLoader};
use vulkanalia::prelude::v1_0::*;
use vulkanalia::vk::{ExtDebugUtilsExtension, KhrSurfaceExtension};
use vulkanalia::window as vk_window;
use winit::raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use winit::window::Window;

pub use config::ContextConfig;

use device::{Queues, SelectedDevice, create_logical_device, pick_physical_device};
use error::{DriverResultExt, InitError};
use instance::{create_debug_messenger, create_instance};
use probe::SurfaceProbe;
use release::ReleaseStack;
use swapchain::{Swapchain, SwapchainPlan, SwapchainSupport, create_swapchain};

mod config;
mod device;
mod error;
mod instance;
mod probe;
mod queue;
mod release;
mod support;
mod swapchain;

/// A window the context can present to.
pub trait PresentationTarget: HasWindowHandle + HasDisplayHandle {
    /// Current framebuffer size in pixels.
    fn framebuffer_size(&self) -> (u32, u32);
}

impl PresentationTarget for Window {
    fn framebuffer_size(&self) -> (u32, u32) {
        let size = self.inner_size();
        (size.width, size.height)
    }
}

/// Everything needed to start rendering to one window. Dropping it destroys
/// the owned handles in reverse creation order.
pub struct Context {
    release: ReleaseStack,
    pub physical_device: vk::PhysicalDevice,
    pub messenger: Option<vk::DebugUtilsMessengerEXT>,
    pub surface: vk::SurfaceKHR,
    pub queues: Queues,
    pub swapchain: Swapchain,
    pub device: Device,
    pub instance: Instance,
    pub entry: Entry,
}

impl Context {
    /// # Safety
    ///
    /// `window` must outlive the returned context.
    pub unsafe fn create<W: PresentationTarget>(window: &W, config: &ContextConfig) -> Result<Self> {
        let loader = unsafe { LibloadingLoader::new(LIBRARY) }
            .map_err(|e| InitError::Loader(e.to_string()))?;
        let entry =
            unsafe { Entry::new(loader) }.map_err(|e| InitError::Loader(e.to_string()))?;
        let mut release = ReleaseStack::default();

        let instance = unsafe { create_instance(window, &entry, config)? };
        release.push("instance", {
            let instance = instance.clone();
            move || unsafe { instance.destroy_instance(None) }
        });

        let messenger = if config.validation {
            let messenger = unsafe { create_debug_messenger(&instance)? };
            release.push("debug messenger", {
                let instance = instance.clone();
                move || unsafe { instance.destroy_debug_utils_messenger_ext(messenger, None) }
            });
            Some(messenger)
        } else {
            None
        };

        let surface = unsafe { vk_window::create_surface(&instance, window, window) }
            .during("creating the window surface")?;
        release.push("surface", {
            let instance = instance.clone();
            move || unsafe { instance.destroy_surface_khr(surface, None) }
        });

        let probe = unsafe { SurfaceProbe::new(&instance, surface) };
        let SelectedDevice {
            device: physical_device,
            families,
        } = pick_physical_device(&probe, &config.device_extensions)?;

        let (device, queues) =
            unsafe { create_logical_device(&entry, &instance, physical_device, families, config)? };
        release.push("logical device", {
            let device = device.clone();
            move || unsafe { device.destroy_device(None) }
        });

        let support = SwapchainSupport::query(&probe, physical_device)
            .during("querying swapchain support")?;
        let plan = SwapchainPlan::negotiate(&support, families, window.framebuffer_size())?;
        let swapchain = unsafe { create_swapchain(&device, surface, &plan, &mut release)? };
        tracing::debug!("Context owns {} releasable handles.", release.len());

        Ok(Self {
            release,
            physical_device,
            messenger,
            surface,
            queues,
            swapchain,
            device,
            instance,
            entry,
        })
    }
}

impl Drop for Context {
    fn drop(&mut self) {
        if let Err(error) = unsafe { self.device.device_wait_idle() } {
            tracing::warn!("Failed to wait for device idle before teardown: {}", error);
        }
        self.release.release_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::probe::fake::{FakeDevice, FakeProbe};

    #[test]
    fn single_device_negotiates_a_fixed_size_swapchain() {
        let config = ContextConfig {
            validation: false,
            ..ContextConfig::default()
        };
        let probe = FakeProbe::new(vec![FakeDevice {
            capabilities: vk::SurfaceCapabilitiesKHR {
                min_image_count: 1,
                max_image_count: 0,
                current_extent: vk::Extent2D {
                    width: u32::MAX,
                    height: u32::MAX,
                },
                min_image_extent: vk::Extent2D {
                    width: 640,
                    height: 480,
                },
                max_image_extent: vk::Extent2D {
                    width: 640,
                    height: 480,
                },
                ..Default::default()
            },
            ..FakeDevice::capable("integrated")
        }]);

        let selected = pick_physical_device(&probe, &config.device_extensions).unwrap();
        assert_eq!(selected.device, 0);
        assert!(selected.families.is_shared());

        let support = SwapchainSupport::query(&probe, selected.device).unwrap();
        for window_size in [(800, 600), (3840, 2160)] {
            let plan = SwapchainPlan::negotiate(&support, selected.families, window_size).unwrap();
            assert_eq!(plan.image_count, 2);
            assert_eq!(plan.surface_format.format, vk::Format::B8G8R8A8_SRGB);
            assert_eq!(plan.surface_format.color_space, vk::ColorSpaceKHR::SRGB_NONLINEAR);
            assert_eq!(plan.present_mode, vk::PresentModeKHR::FIFO);
            assert_eq!((plan.extent.width, plan.extent.height), (640, 480));
            assert_eq!(plan.sharing.mode, vk::SharingMode::EXCLUSIVE);
            assert!(plan.sharing.families.is_empty());
        }
    }
}
