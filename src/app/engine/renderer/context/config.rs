use vulkanalia::Version;
use vulkanalia::vk;

pub const VALIDATION_ENABLED: bool = cfg!(debug_assertions);

pub const VALIDATION_LAYER: vk::ExtensionName =
    vk::ExtensionName::from_bytes(b"VK_LAYER_KHRONOS_validation");

pub const DEVICE_EXTENSIONS: &[vk::ExtensionName] = &[vk::KHR_SWAPCHAIN_EXTENSION.name];

/// Vulkan SDK version from which MoltenVK needs the portability extensions.
pub const PORTABILITY_MACOS_VERSION: Version = Version::new(1, 3, 216);

pub const APPLICATION_NAME: &[u8] = b"Vulkan App\0";
pub const ENGINE_NAME: &[u8] = b"No Engine\0";

/// Static settings the context is built from.
#[derive(Clone, Debug)]
pub struct ContextConfig {
    pub validation: bool,
    pub validation_layers: Vec<vk::ExtensionName>,
    pub device_extensions: Vec<vk::ExtensionName>,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            validation: VALIDATION_ENABLED,
            validation_layers: vec![VALIDATION_LAYER],
            device_extensions: DEVICE_EXTENSIONS.to_vec(),
        }
    }
}

impl ContextConfig {
    /// Layers to enable on the instance and device, empty when validation is off.
    pub fn enabled_layers(&self) -> &[vk::ExtensionName] {
        if self.validation {
            &self.validation_layers
        } else {
            &[]
        }
    }
}
