use anyhow::Result;
use vulkanalia::prelude::v1_0::*;

use super::config::{ContextConfig, PORTABILITY_MACOS_VERSION};
use super::error::{DriverResultExt, InitError, SuitabilityError};
use super::probe::CapabilityProbe;
use super::queue::{QueueFamilies, QueueFamilyIndices};
use super::support::device_extensions_supported;
use super::swapchain::SwapchainSupport;

#[derive(Copy, Clone, Debug)]
pub struct SelectedDevice<D> {
    pub device: D,
    pub families: QueueFamilies,
}

#[derive(Copy, Clone, Debug)]
pub struct Queues {
    pub graphics: vk::Queue,
    pub present: vk::Queue,
}

/// Picks the first enumerated device that is suitable; there is no ranking.
pub fn pick_physical_device<P: CapabilityProbe>(
    probe: &P,
    required_extensions: &[vk::ExtensionName],
) -> Result<SelectedDevice<P::Device>, InitError> {
    let devices = probe
        .devices()
        .during("enumerating physical devices")?;

    if devices.is_empty() {
        return Err(InitError::NoDevices);
    }

    for device in devices {
        match check_physical_device(probe, device, required_extensions) {
            Ok(families) => {
                tracing::info!("Selected physical device (`{}`).", probe.device_name(device));
                return Ok(SelectedDevice { device, families });
            }
            Err(error) => tracing::warn!(
                "Skipping physical device (`{}`): {}",
                probe.device_name(device),
                error
            ),
        }
    }

    Err(InitError::NoSuitableDevice)
}

fn check_physical_device<P: CapabilityProbe>(
    probe: &P,
    device: P::Device,
    required_extensions: &[vk::ExtensionName],
) -> Result<QueueFamilies, SuitabilityError> {
    let families = QueueFamilyIndices::resolve(probe, device).complete()?;

    if !device_extensions_supported(probe, device, required_extensions)
        .map_err(SuitabilityError::Query)?
    {
        return Err(SuitabilityError::Extensions);
    }

    let support = SwapchainSupport::query(probe, device).map_err(SuitabilityError::Query)?;
    if !support.is_adequate() {
        return Err(SuitabilityError::Swapchain);
    }

    Ok(families)
}

/// Creates the logical device with one queue per unique family and fetches the
/// graphics and present queues, which alias when the family is shared.
pub unsafe fn create_logical_device(
    entry: &Entry,
    instance: &Instance,
    physical_device: vk::PhysicalDevice,
    families: QueueFamilies,
    config: &ContextConfig,
) -> Result<(Device, Queues)> {
    let queue_priorities = &[1.0];
    let queue_infos = families
        .unique()
        .into_iter()
        .map(|family| {
            vk::DeviceQueueCreateInfo::builder()
                .queue_family_index(family)
                .queue_priorities(queue_priorities)
        })
        .collect::<Vec<_>>();

    let layers = config
        .enabled_layers()
        .iter()
        .map(|l| l.as_ptr())
        .collect::<Vec<_>>();

    let mut extensions = config
        .device_extensions
        .iter()
        .map(|e| e.as_ptr())
        .collect::<Vec<_>>();

    // Required by Vulkan SDK on macOS since 1.3.216.
    if cfg!(target_os = "macos")
        && unsafe { entry.version() }.during("querying the loader version")?
            >= PORTABILITY_MACOS_VERSION
    {
        extensions.push(vk::KHR_PORTABILITY_SUBSET_EXTENSION.name.as_ptr());
    }

    let features = vk::PhysicalDeviceFeatures::builder();

    let info = vk::DeviceCreateInfo::builder()
        .queue_create_infos(&queue_infos)
        .enabled_layer_names(&layers)
        .enabled_extension_names(&extensions)
        .enabled_features(&features);

    let device = unsafe { instance.create_device(physical_device, &info, None) }
        .during("creating the logical device")?;

    let queues = unsafe {
        Queues {
            graphics: device.get_device_queue(families.graphics, 0),
            present: device.get_device_queue(families.present, 0),
        }
    };

    Ok((device, queues))
}
