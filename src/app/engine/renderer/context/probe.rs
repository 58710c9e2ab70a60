use std::fmt;
use vulkanalia::VkResult;
use vulkanalia::prelude::v1_0::*;
use vulkanalia::vk::KhrSurfaceExtension;

/// Read-only capability queries against a device and the surface it would
/// present to.
pub trait CapabilityProbe {
    type Device: Copy + fmt::Debug;

    fn devices(&self) -> VkResult<Vec<Self::Device>>;

    fn device_name(&self, device: Self::Device) -> String;

    fn queue_families(&self, device: Self::Device) -> Vec<vk::QueueFamilyProperties>;

    fn presentation_support(&self, device: Self::Device, family: u32) -> VkResult<bool>;

    fn device_extensions(&self, device: Self::Device) -> VkResult<Vec<vk::ExtensionName>>;

    fn surface_capabilities(&self, device: Self::Device)
    -> VkResult<vk::SurfaceCapabilitiesKHR>;

    fn surface_formats(&self, device: Self::Device) -> VkResult<Vec<vk::SurfaceFormatKHR>>;

    fn present_modes(&self, device: Self::Device) -> VkResult<Vec<vk::PresentModeKHR>>;
}

pub struct SurfaceProbe<'a> {
    instance: &'a Instance,
    surface: vk::SurfaceKHR,
}

impl<'a> SurfaceProbe<'a> {
    /// # Safety
    ///
    /// `surface` must be a live surface created from `instance`.
    pub unsafe fn new(instance: &'a Instance, surface: vk::SurfaceKHR) -> Self {
        Self { instance, surface }
    }
}

// SAFETY (all methods): the instance and surface are alive for 'a, and
// physical device handles come from this instance's enumeration.
impl CapabilityProbe for SurfaceProbe<'_> {
    type Device = vk::PhysicalDevice;

    fn devices(&self) -> VkResult<Vec<vk::PhysicalDevice>> {
        unsafe { self.instance.enumerate_physical_devices() }
    }

    fn device_name(&self, device: vk::PhysicalDevice) -> String {
        let properties = unsafe { self.instance.get_physical_device_properties(device) };
        properties.device_name.to_string()
    }

    fn queue_families(&self, device: vk::PhysicalDevice) -> Vec<vk::QueueFamilyProperties> {
        unsafe {
            self.instance
                .get_physical_device_queue_family_properties(device)
        }
    }

    fn presentation_support(&self, device: vk::PhysicalDevice, family: u32) -> VkResult<bool> {
        unsafe {
            self.instance
                .get_physical_device_surface_support_khr(device, family, self.surface)
        }
    }

    fn device_extensions(&self, device: vk::PhysicalDevice) -> VkResult<Vec<vk::ExtensionName>> {
        let properties = unsafe {
            self.instance
                .enumerate_device_extension_properties(device, None)?
        };
        Ok(properties.iter().map(|e| e.extension_name).collect())
    }

    fn surface_capabilities(
        &self,
        device: vk::PhysicalDevice,
    ) -> VkResult<vk::SurfaceCapabilitiesKHR> {
        unsafe {
            self.instance
                .get_physical_device_surface_capabilities_khr(device, self.surface)
        }
    }

    fn surface_formats(&self, device: vk::PhysicalDevice) -> VkResult<Vec<vk::SurfaceFormatKHR>> {
        unsafe {
            self.instance
                .get_physical_device_surface_formats_khr(device, self.surface)
        }
    }

    fn present_modes(&self, device: vk::PhysicalDevice) -> VkResult<Vec<vk::PresentModeKHR>> {
        unsafe {
            self.instance
                .get_physical_device_surface_present_modes_khr(device, self.surface)
        }
    }
}

/// In-memory devices for exercising selection and negotiation without a driver.
#[cfg(test)]
pub(crate) mod fake {
    use super::*;

    #[derive(Clone, Debug, Default)]
    pub struct FakeDevice {
        pub name: &'static str,
        pub families: Vec<vk::QueueFamilyProperties>,
        pub presentable: Vec<u32>,
        pub extensions: Vec<vk::ExtensionName>,
        pub capabilities: vk::SurfaceCapabilitiesKHR,
        pub formats: Vec<vk::SurfaceFormatKHR>,
        pub present_modes: Vec<vk::PresentModeKHR>,
        pub lost: bool,
    }

    impl FakeDevice {
        /// A device with one graphics+present family that passes every check.
        pub fn capable(name: &'static str) -> Self {
            Self {
                name,
                families: vec![family(vk::QueueFlags::GRAPHICS, 1)],
                presentable: vec![0],
                extensions: vec![vk::KHR_SWAPCHAIN_EXTENSION.name],
                capabilities: vk::SurfaceCapabilitiesKHR {
                    min_image_count: 2,
                    max_image_count: 8,
                    current_extent: vk::Extent2D {
                        width: 800,
                        height: 600,
                    },
                    ..Default::default()
                },
                formats: vec![vk::SurfaceFormatKHR {
                    format: vk::Format::B8G8R8A8_SRGB,
                    color_space: vk::ColorSpaceKHR::SRGB_NONLINEAR,
                }],
                present_modes: vec![vk::PresentModeKHR::FIFO],
                lost: false,
            }
        }
    }

    pub fn family(flags: vk::QueueFlags, count: u32) -> vk::QueueFamilyProperties {
        vk::QueueFamilyProperties {
            queue_flags: flags,
            queue_count: count,
            ..Default::default()
        }
    }

    #[derive(Clone, Debug, Default)]
    pub struct FakeProbe {
        pub devices: Vec<FakeDevice>,
    }

    impl FakeProbe {
        pub fn new(devices: Vec<FakeDevice>) -> Self {
            Self { devices }
        }

        fn get(&self, device: usize) -> VkResult<&FakeDevice> {
            let device = &self.devices[device];
            if device.lost {
                Err(vk::ErrorCode::DEVICE_LOST)
            } else {
                Ok(device)
            }
        }
    }

    impl CapabilityProbe for FakeProbe {
        type Device = usize;

        fn devices(&self) -> VkResult<Vec<usize>> {
            Ok((0..self.devices.len()).collect())
        }

        fn device_name(&self, device: usize) -> String {
            self.devices[device].name.to_string()
        }

        fn queue_families(&self, device: usize) -> Vec<vk::QueueFamilyProperties> {
            self.devices[device].families.clone()
        }

        fn presentation_support(&self, device: usize, family: u32) -> VkResult<bool> {
            Ok(self.get(device)?.presentable.contains(&family))
        }

        fn device_extensions(&self, device: usize) -> VkResult<Vec<vk::ExtensionName>> {
            Ok(self.get(device)?.extensions.clone())
        }

        fn surface_capabilities(&self, device: usize) -> VkResult<vk::SurfaceCapabilitiesKHR> {
            Ok(self.get(device)?.capabilities)
        }

        fn surface_formats(&self, device: usize) -> VkResult<Vec<vk::SurfaceFormatKHR>> {
            Ok(self.get(device)?.formats.clone())
        }

        fn present_modes(&self, device: usize) -> VkResult<Vec<vk::PresentModeKHR>> {
            Ok(self.get(device)?.present_modes.clone())
        }
    }
}
