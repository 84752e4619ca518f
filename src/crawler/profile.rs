//! Device identity profiles
//!
//! A closed catalog mapping a device name to the `User-Agent` string sent with
//! every request of a crawl.

use std::fmt;

/// Device a crawl pretends to be
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DeviceProfile {
    /// Windows desktop running Chrome
    #[default]
    Desktop,
    /// iPhone running Mobile Safari
    Mobile,
    /// Android phone running Chrome
    Android,
    /// macOS laptop running Chrome
    Laptop,
}

impl DeviceProfile {
    /// Every profile in the catalog
    pub const ALL: [DeviceProfile; 4] = [
        DeviceProfile::Desktop,
        DeviceProfile::Mobile,
        DeviceProfile::Android,
        DeviceProfile::Laptop,
    ];

    /// Looks up a profile by name (case-insensitive)
    ///
    /// `macbook` is accepted as an alias for [`DeviceProfile::Laptop`].
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "desktop" => Some(Self::Desktop),
            "mobile" | "iphone" => Some(Self::Mobile),
            "android" => Some(Self::Android),
            "laptop" | "macbook" => Some(Self::Laptop),
            _ => None,
        }
    }

    /// Looks up a profile by name, using `fallback` for unknown names
    pub fn from_name_or(name: &str, fallback: Self) -> Self {
        Self::from_name(name).unwrap_or_else(|| {
            tracing::debug!("Unknown device profile '{}', using {}", name, fallback);
            fallback
        })
    }

    /// Canonical name, as stored alongside generated sitemaps
    pub fn name(&self) -> &'static str {
        match self {
            Self::Desktop => "desktop",
            Self::Mobile => "mobile",
            Self::Android => "android",
            Self::Laptop => "laptop",
        }
    }

    /// `User-Agent` header value for this device
    pub fn user_agent(&self) -> &'static str {
        match self {
            Self::Desktop => "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
            Self::Mobile => "Mozilla/5.0 (iPhone; CPU iPhone OS 14_6 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/14.0.3 Mobile/15E148 Safari/604.1",
            Self::Android => "Mozilla/5.0 (Linux; Android 11; SM-G991B) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.120 Mobile Safari/537.36",
            Self::Laptop => "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
        }
    }
}

impl fmt::Display for DeviceProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name() {
        assert_eq!(DeviceProfile::from_name("desktop"), Some(DeviceProfile::Desktop));
        assert_eq!(DeviceProfile::from_name("Mobile"), Some(DeviceProfile::Mobile));
        assert_eq!(DeviceProfile::from_name("ANDROID"), Some(DeviceProfile::Android));
        assert_eq!(DeviceProfile::from_name("laptop"), Some(DeviceProfile::Laptop));
        assert_eq!(DeviceProfile::from_name("macbook"), Some(DeviceProfile::Laptop));
        assert_eq!(DeviceProfile::from_name("smartwatch"), None);
    }

    #[test]
    fn test_unknown_falls_back() {
        assert_eq!(
            DeviceProfile::from_name_or("smartwatch", DeviceProfile::Desktop),
            DeviceProfile::Desktop
        );
        assert_eq!(
            DeviceProfile::from_name_or("", DeviceProfile::Android),
            DeviceProfile::Android
        );
        assert_eq!(
            DeviceProfile::from_name_or("mobile", DeviceProfile::Desktop),
            DeviceProfile::Mobile
        );
    }

    #[test]
    fn test_name_roundtrip() {
        for profile in DeviceProfile::ALL {
            assert_eq!(DeviceProfile::from_name(profile.name()), Some(profile));
        }
    }

    #[test]
    fn test_user_agents_are_distinct() {
        let agents: std::collections::HashSet<_> =
            DeviceProfile::ALL.iter().map(|p| p.user_agent()).collect();
        assert_eq!(agents.len(), DeviceProfile::ALL.len());
        assert!(DeviceProfile::Mobile.user_agent().contains("iPhone"));
        assert!(DeviceProfile::Android.user_agent().contains("Android"));
    }

    #[test]
    fn test_default_is_desktop() {
        assert_eq!(DeviceProfile::default(), DeviceProfile::Desktop);
    }
}
