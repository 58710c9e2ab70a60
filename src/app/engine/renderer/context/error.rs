use thiserror::Error;
use vulkanalia::VkResult;
use vulkanalia::vk;

/// Why a physical device was skipped during selection.
#[derive(Debug, Error)]
pub enum SuitabilityError {
    #[error("Missing required queue families (graphics: {graphics:?}, present: {present:?}).")]
    QueueFamilies {
        graphics: Option<u32>,
        present: Option<u32>,
    },
    #[error("Missing required device extensions.")]
    Extensions,
    #[error("Insufficient swapchain support.")]
    Swapchain,
    #[error("Capability query failed ({0}).")]
    Query(vk::ErrorCode),
}

/// Fatal failures of the context initialization sequence.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("Failed to load the Vulkan library: {0}")]
    Loader(String),
    #[error("Validation layer requested but not supported.")]
    ValidationLayersUnavailable,
    #[error("Instance does not support the required extensions.")]
    InstanceExtensionsUnavailable,
    #[error("Failed to find GPUs with Vulkan support.")]
    NoDevices,
    #[error("Failed to find a suitable physical device.")]
    NoSuitableDevice,
    #[error("Surface reports no formats.")]
    NoSurfaceFormats,
    #[error("Driver rejected {step} ({code}).")]
    Driver {
        step: &'static str,
        code: vk::ErrorCode,
    },
}

/// Tags a raw driver result with the initialization step it came from.
pub trait DriverResultExt<T> {
    fn during(self, step: &'static str) -> Result<T, InitError>;
}

impl<T> DriverResultExt<T> for VkResult<T> {
    fn during(self, step: &'static str) -> Result<T, InitError> {
        self.map_err(|code| InitError::Driver { step, code })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn driver_errors_name_the_step() {
        let result: VkResult<()> = Err(vk::ErrorCode::DEVICE_LOST);
        let error = result.during("creating the swapchain").unwrap_err();
        assert!(matches!(
            error,
            InitError::Driver {
                step: "creating the swapchain",
                ..
            }
        ));
        assert!(error.to_string().starts_with("Driver rejected creating the swapchain"));
    }

    #[test]
    fn successful_results_pass_through() {
        let result: VkResult<u32> = Ok(7);
        assert_eq!(result.during("anything").unwrap(), 7);
    }
}
