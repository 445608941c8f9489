//! Platform capability descriptors
//!
//! Generated adapters are driven by these values instead of probing the
//! runtime while generating.

use capsule_parser::Platform;
use serde::{Deserialize, Serialize};

/// What a target platform offers to generated code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformCapabilities {
    pub supports_file_system: bool,
    pub supports_network: bool,
    pub supports_console_colors: bool,
    pub supports_local_storage: bool,
    pub supports_process_env: bool,
}

impl PlatformCapabilities {
    pub fn for_platform(platform: Platform) -> Self {
        match platform {
            Platform::Node => Self {
                supports_file_system: true,
                supports_network: true,
                supports_console_colors: true,
                supports_local_storage: false,
                supports_process_env: true,
            },
            Platform::Web => Self {
                supports_file_system: false,
                supports_network: true,
                supports_console_colors: false,
                supports_local_storage: true,
                supports_process_env: false,
            },
            Platform::Universal => Self {
                supports_file_system: false,
                supports_network: false,
                supports_console_colors: false,
                supports_local_storage: false,
                supports_process_env: false,
            },
        }
    }

    /// TypeScript object literal with camelCase keys
    pub fn to_ts_literal(&self, indent: &str) -> String {
        let fields = [
            ("supportsFileSystem", self.supports_file_system),
            ("supportsNetwork", self.supports_network),
            ("supportsConsoleColors", self.supports_console_colors),
            ("supportsLocalStorage", self.supports_local_storage),
            ("supportsProcessEnv", self.supports_process_env),
        ];

        let mut literal = String::from("{\n");
        for (key, value) in fields {
            literal.push_str(&format!("{indent}  {key}: {value},\n"));
        }
        literal.push_str(&format!("{indent}}}"));
        literal
    }
}

/// Concrete adapter class emitted for a platform
pub fn adapter_class(platform: Platform) -> &'static str {
    match platform {
        Platform::Node => "NodeAdapter",
        Platform::Web => "WebAdapter",
        Platform::Universal => "UniversalAdapter",
    }
}

/// Runtime detection of a platform, as a TypeScript boolean expression over `g`
pub fn detection_expression(platform: Platform) -> &'static str {
    match platform {
        Platform::Node => {
            "typeof g['process'] === 'object' && g['process'] !== null && typeof (g['process'] as { versions?: { node?: string } }).versions?.node === 'string'"
        }
        Platform::Web => "typeof g['window'] === 'object' && typeof g['document'] === 'object'",
        Platform::Universal => "true",
    }
}

/// Platforms in adapter-selection priority: specific checks first, universal last
pub fn selection_order(platforms: &[Platform]) -> Vec<Platform> {
    let mut ordered: Vec<Platform> = [Platform::Node, Platform::Web]
        .into_iter()
        .filter(|p| platforms.contains(p))
        .collect();
    ordered.push(Platform::Universal);
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capabilities_per_platform() {
        let node = PlatformCapabilities::for_platform(Platform::Node);
        assert!(node.supports_file_system && node.supports_process_env);

        let web = PlatformCapabilities::for_platform(Platform::Web);
        assert!(web.supports_local_storage && !web.supports_file_system);

        let universal = PlatformCapabilities::for_platform(Platform::Universal);
        assert_eq!(
            universal.to_ts_literal(""),
            "{\n  supportsFileSystem: false,\n  supportsNetwork: false,\n  supportsConsoleColors: false,\n  supportsLocalStorage: false,\n  supportsProcessEnv: false,\n}"
        );
    }

    #[test]
    fn test_selection_order_ends_with_universal() {
        assert_eq!(
            selection_order(&[Platform::Web, Platform::Node]),
            vec![Platform::Node, Platform::Web, Platform::Universal]
        );
        assert_eq!(
            selection_order(&[Platform::Universal, Platform::Web]),
            vec![Platform::Web, Platform::Universal]
        );
    }
}
