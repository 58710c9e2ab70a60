use vulkanalia::VkResult;
use vulkanalia::prelude::v1_0::*;

use super::probe::CapabilityProbe;

/// Exact-name membership test; stops at the first requested name that is not
/// advertised.
pub fn all_supported(advertised: &[vk::ExtensionName], requested: &[vk::ExtensionName]) -> bool {
    requested.iter().all(|name| advertised.contains(name))
}

pub fn missing<'a>(
    advertised: &[vk::ExtensionName],
    requested: &'a [vk::ExtensionName],
) -> impl Iterator<Item = &'a vk::ExtensionName> {
    let advertised = advertised.to_vec();
    requested
        .iter()
        .filter(move |name| !advertised.contains(*name))
}

pub unsafe fn instance_extensions_supported(
    entry: &Entry,
    requested: &[vk::ExtensionName],
) -> VkResult<bool> {
    let advertised = unsafe { entry.enumerate_instance_extension_properties(None)? }
        .iter()
        .map(|e| e.extension_name)
        .collect::<Vec<_>>();

    for name in missing(&advertised, requested) {
        tracing::warn!("Missing instance extension `{}`.", name);
    }

    Ok(all_supported(&advertised, requested))
}

pub unsafe fn validation_layers_supported(
    entry: &Entry,
    requested: &[vk::ExtensionName],
) -> VkResult<bool> {
    let advertised = unsafe { entry.enumerate_instance_layer_properties()? }
        .iter()
        .map(|l| l.layer_name)
        .collect::<Vec<_>>();

    tracing::debug!("Available layers:");
    for layer in &advertised {
        tracing::debug!("  {}", layer);
    }

    Ok(all_supported(&advertised, requested))
}

pub fn device_extensions_supported<P: CapabilityProbe>(
    probe: &P,
    device: P::Device,
    requested: &[vk::ExtensionName],
) -> VkResult<bool> {
    let advertised = probe.device_extensions(device)?;

    for name in missing(&advertised, requested) {
        tracing::debug!("{:?} lacks device extension `{}`.", device, name);
    }

    Ok(all_supported(&advertised, requested))
}
