use vulkanalia::vk;

use super::error::SuitabilityError;
use super::probe::CapabilityProbe;

/// Queue families found on a device; either may still be unset.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct QueueFamilyIndices {
    pub graphics: Option<u32>,
    pub present: Option<u32>,
}

impl QueueFamilyIndices {
    /// Scans the device's queue families in reported order, keeping the first
    /// graphics-capable family and the first family that can present to the
    /// probe's surface.
    pub fn resolve<P: CapabilityProbe>(probe: &P, device: P::Device) -> Self {
        let mut indices = Self::default();

        for (index, properties) in probe.queue_families(device).iter().enumerate() {
            let index = index as u32;

            if indices.graphics.is_none()
                && properties.queue_count > 0
                && properties.queue_flags.contains(vk::QueueFlags::GRAPHICS)
            {
                indices.graphics = Some(index);
            }

            if indices.present.is_none() {
                match probe.presentation_support(device, index) {
                    Ok(true) => indices.present = Some(index),
                    Ok(false) => {}
                    Err(error) => tracing::warn!(
                        "Presentation query failed for queue family {} on {:?}: {}",
                        index,
                        device,
                        error
                    ),
                }
            }

            if indices.is_complete() {
                break;
            }
        }

        indices
    }

    pub fn is_complete(&self) -> bool {
        self.graphics.is_some() && self.present.is_some()
    }

    pub fn complete(self) -> Result<QueueFamilies, SuitabilityError> {
        match (self.graphics, self.present) {
            (Some(graphics), Some(present)) => Ok(QueueFamilies { graphics, present }),
            (graphics, present) => Err(SuitabilityError::QueueFamilies { graphics, present }),
        }
    }
}

/// Resolved graphics and presentation families of the selected device.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct QueueFamilies {
    pub graphics: u32,
    pub present: u32,
}

impl QueueFamilies {
    pub fn is_shared(&self) -> bool {
        self.graphics == self.present
    }

    /// Families that need a queue created, graphics first, without duplicates.
    pub fn unique(&self) -> Vec<u32> {
        if self.is_shared() {
            vec![self.graphics]
        } else {
            vec![self.graphics, self.present]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::engine::renderer::context::probe::fake::{FakeDevice, FakeProbe, family};

    fn probe(families: Vec<vk::QueueFamilyProperties>, presentable: Vec<u32>) -> FakeProbe {
        FakeProbe::new(vec![FakeDevice {
            families,
            presentable,
            ..FakeDevice::capable("gpu")
        }])
    }

    #[test]
    fn no_queue_families_is_incomplete() {
        let indices = QueueFamilyIndices::resolve(&probe(vec![], vec![]), 0);
        assert_eq!(indices, QueueFamilyIndices::default());
        assert!(!indices.is_complete());
    }

    #[test]
    fn present_stays_unset_without_presentation_support() {
        let families = vec![
            family(vk::QueueFlags::GRAPHICS, 1),
            family(vk::QueueFlags::COMPUTE, 1),
        ];
        let indices = QueueFamilyIndices::resolve(&probe(families, vec![]), 0);
        assert_eq!(indices.graphics, Some(0));
        assert_eq!(indices.present, None);
        assert!(matches!(
            indices.complete(),
            Err(SuitabilityError::QueueFamilies {
                graphics: Some(0),
                present: None
            })
        ));
    }

    #[test]
    fn first_matching_family_wins() {
        let families = vec![
            family(vk::QueueFlags::TRANSFER, 1),
            family(vk::QueueFlags::GRAPHICS | vk::QueueFlags::COMPUTE, 4),
            family(vk::QueueFlags::GRAPHICS, 1),
        ];
        let indices = QueueFamilyIndices::resolve(&probe(families, vec![2, 1]), 0);
        assert_eq!(indices.graphics, Some(1));
        assert_eq!(indices.present, Some(1));
    }

    #[test]
    fn graphics_and_present_may_differ() {
        let families = vec![
            family(vk::QueueFlags::GRAPHICS, 1),
            family(vk::QueueFlags::TRANSFER, 1),
        ];
        let indices = QueueFamilyIndices::resolve(&probe(families, vec![1]), 0);
        let families = indices.complete().unwrap();
        assert_eq!(families, QueueFamilies { graphics: 0, present: 1 });
        assert!(!families.is_shared());
        assert_eq!(families.unique(), vec![0, 1]);
    }

    #[test]
    fn empty_graphics_family_is_skipped() {
        let families = vec![
            family(vk::QueueFlags::GRAPHICS, 0),
            family(vk::QueueFlags::GRAPHICS, 2),
        ];
        let indices = QueueFamilyIndices::resolve(&probe(families, vec![0]), 0);
        assert_eq!(indices.graphics, Some(1));
        assert_eq!(indices.present, Some(0));
    }

    #[test]
    fn failed_presentation_query_counts_as_unsupported() {
        let probe = FakeProbe::new(vec![FakeDevice {
            lost: true,
            ..FakeDevice::capable("lost")
        }]);
        let indices = QueueFamilyIndices::resolve(&probe, 0);
        assert_eq!(indices.graphics, Some(0));
        assert_eq!(indices.present, None);
    }

    #[test]
    fn shared_family_is_created_once() {
        let families = QueueFamilies {
            graphics: 3,
            present: 3,
        };
        assert!(families.is_shared());
        assert_eq!(families.unique(), vec![3]);
    }
}
