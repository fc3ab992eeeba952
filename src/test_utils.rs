//! Test utilities for property-based testing
//!
//! This module provides generators and helpers for proptest.

#[cfg(test)]
pub mod generators {
    use proptest::prelude::*;

    use crate::core::platform::{Detection, Platform};
    use crate::core::settings::SkipFlags;

    /// Generate a repository short name (lowercase alphanumeric with hyphens)
    pub fn repo_short_name() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9-]{0,15}"
    }

    /// Generate a git branch name
    pub fn branch_name() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9._-]{0,20}"
    }

    /// Generate a requested job count, 0 meaning one per CPU
    pub fn job_count() -> impl Strategy<Value = usize> {
        0usize..64
    }

    /// Generate any combination of requested skips
    pub fn skip_flags() -> impl Strategy<Value = SkipFlags> {
        (any::<bool>(), any::<bool>(), any::<bool>()).prop_map(|(openocd, vscode, uart)| {
            SkipFlags {
                openocd,
                vscode,
                uart,
            }
        })
    }

    /// Generate a successful detection on a supported platform
    pub fn detection() -> impl Strategy<Value = Detection> {
        prop_oneof![
            Just(Detection {
                platform: Platform::RaspberryPi,
                model: Some("Raspberry Pi 4 Model B Rev 1.4".to_string()),
            }),
            Just(Detection {
                platform: Platform::OtherLinux,
                model: None,
            }),
            Just(Detection {
                platform: Platform::WindowsMingw64,
                model: None,
            }),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::generators::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn test_repo_short_name_generator(name in repo_short_name()) {
            prop_assert!(!name.is_empty());
            prop_assert!(name.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
        }

        #[test]
        fn test_branch_name_generator(branch in branch_name()) {
            prop_assert!(!branch.is_empty());
            prop_assert!(!branch.contains(' '));
        }

        #[test]
        fn test_detection_generator_is_supported(detection in detection()) {
            prop_assert!(detection.platform != crate::core::platform::Platform::WindowsMsysUnsupported);
        }
    }
}
