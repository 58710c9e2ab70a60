use anyhow::Result;
use vulkanalia::VkResult;
use vulkanalia::prelude::v1_0::*;
use vulkanalia::vk::KhrSwapchainExtension;

use super::error::{DriverResultExt, InitError};
use super::probe::CapabilityProbe;
use super::queue::QueueFamilies;
use super::release::ReleaseStack;

/// Width reported in `current_extent` when the surface lets the swapchain
/// decide its own size.
pub const UNDEFINED_EXTENT: u32 = u32::MAX;

#[derive(Clone, Debug)]
pub struct SwapchainSupport {
    pub capabilities: vk::SurfaceCapabilitiesKHR,
    pub formats: Vec<vk::SurfaceFormatKHR>,
    pub present_modes: Vec<vk::PresentModeKHR>,
}

impl SwapchainSupport {
    pub fn query<P: CapabilityProbe>(probe: &P, device: P::Device) -> VkResult<Self> {
        Ok(Self {
            capabilities: probe.surface_capabilities(device)?,
            formats: probe.surface_formats(device)?,
            present_modes: probe.present_modes(device)?,
        })
    }

    pub fn is_adequate(&self) -> bool {
        !self.formats.is_empty() && !self.present_modes.is_empty()
    }
}

/// Prefers 8-bit BGRA with the sRGB non-linear color space, else the first
/// advertised format.
pub fn choose_surface_format(formats: &[vk::SurfaceFormatKHR]) -> Option<vk::SurfaceFormatKHR> {
    formats
        .iter()
        .copied()
        .find(|f| {
            f.format == vk::Format::B8G8R8A8_SRGB
                && f.color_space == vk::ColorSpaceKHR::SRGB_NONLINEAR
        })
        .or_else(|| formats.first().copied())
}

/// Mailbox when advertised; FIFO is always available.
pub fn choose_present_mode(present_modes: &[vk::PresentModeKHR]) -> vk::PresentModeKHR {
    if present_modes.contains(&vk::PresentModeKHR::MAILBOX) {
        vk::PresentModeKHR::MAILBOX
    } else {
        vk::PresentModeKHR::FIFO
    }
}

pub fn choose_extent(
    capabilities: &vk::SurfaceCapabilitiesKHR,
    framebuffer_size: (u32, u32),
) -> vk::Extent2D {
    if capabilities.current_extent.width != UNDEFINED_EXTENT {
        return capabilities.current_extent;
    }

    let (width, height) = framebuffer_size;
    vk::Extent2D {
        width: width.clamp(
            capabilities.min_image_extent.width,
            capabilities.max_image_extent.width,
        ),
        height: height.clamp(
            capabilities.min_image_extent.height,
            capabilities.max_image_extent.height,
        ),
    }
}

/// One more than the minimum, capped by the maximum unless that is zero.
pub fn choose_image_count(capabilities: &vk::SurfaceCapabilitiesKHR) -> u32 {
    let count = capabilities.min_image_count + 1;
    if capabilities.max_image_count != 0 {
        count.min(capabilities.max_image_count)
    } else {
        count
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageSharing {
    pub mode: vk::SharingMode,
    pub families: Vec<u32>,
}

impl ImageSharing {
    pub fn for_families(families: QueueFamilies) -> Self {
        if families.is_shared() {
            Self {
                mode: vk::SharingMode::EXCLUSIVE,
                families: Vec::new(),
            }
        } else {
            Self {
                mode: vk::SharingMode::CONCURRENT,
                families: vec![families.graphics, families.present],
            }
        }
    }
}

/// Every parameter of the swapchain, decided before anything is created.
#[derive(Clone, Debug)]
pub struct SwapchainPlan {
    pub surface_format: vk::SurfaceFormatKHR,
    pub present_mode: vk::PresentModeKHR,
    pub extent: vk::Extent2D,
    pub image_count: u32,
    pub sharing: ImageSharing,
    pub pre_transform: vk::SurfaceTransformFlagsKHR,
}

impl SwapchainPlan {
    pub fn negotiate(
        support: &SwapchainSupport,
        families: QueueFamilies,
        framebuffer_size: (u32, u32),
    ) -> Result<Self, InitError> {
        let surface_format =
            choose_surface_format(&support.formats).ok_or(InitError::NoSurfaceFormats)?;

        Ok(Self {
            surface_format,
            present_mode: choose_present_mode(&support.present_modes),
            extent: choose_extent(&support.capabilities, framebuffer_size),
            image_count: choose_image_count(&support.capabilities),
            sharing: ImageSharing::for_families(families),
            pre_transform: support.capabilities.current_transform,
        })
    }
}

pub struct Swapchain {
    pub handle: vk::SwapchainKHR,
    pub format: vk::Format,
    pub extent: vk::Extent2D,
    pub images: Vec<vk::Image>,
    pub image_views: Vec<vk::ImageView>,
}

/// Creates the swapchain and one color view per image, registering each
/// handle with `release` as soon as it exists.
pub unsafe fn create_swapchain(
    device: &Device,
    surface: vk::SurfaceKHR,
    plan: &SwapchainPlan,
    release: &mut ReleaseStack,
) -> Result<Swapchain> {
    let info = vk::SwapchainCreateInfoKHR::builder()
        .surface(surface)
        .min_image_count(plan.image_count)
        .image_format(plan.surface_format.format)
        .image_color_space(plan.surface_format.color_space)
        .image_extent(plan.extent)
        .image_array_layers(1)
        .image_usage(vk::ImageUsageFlags::COLOR_ATTACHMENT)
        .image_sharing_mode(plan.sharing.mode)
        .queue_family_indices(&plan.sharing.families)
        .pre_transform(plan.pre_transform)
        .composite_alpha(vk::CompositeAlphaFlagsKHR::OPAQUE)
        .present_mode(plan.present_mode)
        .clipped(true)
        .old_swapchain(vk::SwapchainKHR::null());

    let handle = unsafe { device.create_swapchain_khr(&info, None) }
        .during("creating the swapchain")?;
    release.push("swapchain", {
        let device = device.clone();
        move || unsafe { device.destroy_swapchain_khr(handle, None) }
    });

    let images = unsafe { device.get_swapchain_images_khr(handle) }
        .during("fetching swapchain images")?;

    let mut image_views = Vec::with_capacity(images.len());
    for &image in &images {
        let view = unsafe { create_image_view(device, image, plan.surface_format.format) }
            .during("creating a swapchain image view")?;
        release.push("swapchain image view", {
            let device = device.clone();
            move || unsafe { device.destroy_image_view(view, None) }
        });
        image_views.push(view);
    }

    tracing::info!(
        "Created swapchain: {} images, {:?}/{:?}, {:?}, {}x{}, {:?}.",
        images.len(),
        plan.surface_format.format,
        plan.surface_format.color_space,
        plan.present_mode,
        plan.extent.width,
        plan.extent.height,
        plan.sharing.mode,
    );

    Ok(Swapchain {
        handle,
        format: plan.surface_format.format,
        extent: plan.extent,
        images,
        image_views,
    })
}

unsafe fn create_image_view(
    device: &Device,
    image: vk::Image,
    format: vk::Format,
) -> VkResult<vk::ImageView> {
    let components = vk::ComponentMapping::builder()
        .r(vk::ComponentSwizzle::IDENTITY)
        .g(vk::ComponentSwizzle::IDENTITY)
        .b(vk::ComponentSwizzle::IDENTITY)
        .a(vk::ComponentSwizzle::IDENTITY);

    let subresource_range = vk::ImageSubresourceRange::builder()
        .aspect_mask(vk::ImageAspectFlags::COLOR)
        .base_mip_level(0)
        .level_count(1)
        .base_array_layer(0)
        .layer_count(1);

    let info = vk::ImageViewCreateInfo::builder()
        .image(image)
        .view_type(vk::ImageViewType::_2D)
        .format(format)
        .components(components)
        .subresource_range(subresource_range);

    unsafe { device.create_image_view(&info, None) }
}
