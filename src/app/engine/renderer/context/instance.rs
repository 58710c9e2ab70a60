use anyhow::Result;
use std::ffi::CStr;
use std::os::raw::c_void;
use vulkanalia::prelude::v1_0::*;
use vulkanalia::vk::ExtDebugUtilsExtension;
use vulkanalia::window as vk_window;
use winit::raw_window_handle::HasWindowHandle;

use super::config::{APPLICATION_NAME, ContextConfig, ENGINE_NAME, PORTABILITY_MACOS_VERSION};
use super::error::{DriverResultExt, InitError};
use super::support::{instance_extensions_supported, validation_layers_supported};

pub unsafe fn create_instance(
    window: &dyn HasWindowHandle,
    entry: &Entry,
    config: &ContextConfig,
) -> Result<Instance> {
    let app_info = vk::ApplicationInfo::builder()
        .application_name(APPLICATION_NAME)
        .application_version(vk::make_version(1, 0, 0))
        .engine_name(ENGINE_NAME)
        .engine_version(vk::make_version(1, 0, 0))
        .api_version(vk::make_version(1, 0, 0));

    if config.validation
        && !unsafe { validation_layers_supported(entry, &config.validation_layers) }
            .during("enumerating instance layers")?
    {
        return Err(InitError::ValidationLayersUnavailable.into());
    }

    let layers = config
        .enabled_layers()
        .iter()
        .map(|l| l.as_ptr())
        .collect::<Vec<_>>();

    let mut required = vk_window::get_required_instance_extensions(window)
        .iter()
        .map(|e| **e)
        .collect::<Vec<_>>();

    if config.validation {
        required.push(vk::EXT_DEBUG_UTILS_EXTENSION.name);
    }

    // Enable portability extensions for MoltenVK on macOS
    let flags = if cfg!(target_os = "macos")
        && unsafe { entry.version() }.during("querying the loader version")?
            >= PORTABILITY_MACOS_VERSION
    {
        required.push(vk::KHR_GET_PHYSICAL_DEVICE_PROPERTIES2_EXTENSION.name);
        required.push(vk::KHR_PORTABILITY_ENUMERATION_EXTENSION.name);
        vk::InstanceCreateFlags::ENUMERATE_PORTABILITY_KHR
    } else {
        vk::InstanceCreateFlags::empty()
    };

    if !unsafe { instance_extensions_supported(entry, &required) }
        .during("enumerating instance extensions")?
    {
        return Err(InitError::InstanceExtensionsUnavailable.into());
    }

    let extensions = required.iter().map(|e| e.as_ptr()).collect::<Vec<_>>();

    let mut info = vk::InstanceCreateInfo::builder()
        .application_info(&app_info)
        .enabled_layer_names(&layers)
        .enabled_extension_names(&extensions)
        .flags(flags);

    // Also covers messages emitted while the instance itself is created and destroyed.
    let mut debug_info = debug_messenger_info();
    if config.validation {
        info = info.push_next(&mut debug_info);
    }

    let instance =
        unsafe { entry.create_instance(&info, None) }.during("creating the instance")?;
    Ok(instance)
}

pub unsafe fn create_debug_messenger(instance: &Instance) -> Result<vk::DebugUtilsMessengerEXT> {
    let info = debug_messenger_info();
    let messenger = unsafe { instance.create_debug_utils_messenger_ext(&info, None) }
        .during("installing the debug messenger")?;
    Ok(messenger)
}

fn debug_messenger_info() -> vk::DebugUtilsMessengerCreateInfoEXTBuilder<'static> {
    vk::DebugUtilsMessengerCreateInfoEXT::builder()
        .message_severity(vk::DebugUtilsMessageSeverityFlagsEXT::all())
        .message_type(
            vk::DebugUtilsMessageTypeFlagsEXT::GENERAL
                | vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION
                | vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE,
        )
        .user_callback(Some(debug_callback))
}

extern "system" fn debug_callback(
    severity: vk::DebugUtilsMessageSeverityFlagsEXT,
    type_: vk::DebugUtilsMessageTypeFlagsEXT,
    data: *const vk::DebugUtilsMessengerCallbackDataEXT,
    _: *mut c_void,
) -> vk::Bool32 {
    let data = unsafe { *data };
    let message = unsafe { CStr::from_ptr(data.message) }.to_string_lossy();

    if severity >= vk::DebugUtilsMessageSeverityFlagsEXT::ERROR {
        tracing::error!("({:?}) {}", type_, message);
    } else if severity >= vk::DebugUtilsMessageSeverityFlagsEXT::WARNING {
        tracing::warn!("({:?}) {}", type_, message);
    } else if severity >= vk::DebugUtilsMessageSeverityFlagsEXT::INFO {
        tracing::debug!("({:?}) {}", type_, message);
    } else {
        tracing::trace!("({:?}) {}", type_, message);
    }

    vk::FALSE
}
