//! User-agent sniffing for coarse device classes.

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

/// User agent reported when no `navigator` is available (server-side rendering).
pub const SSR_USER_AGENT: &str = "SSR";

static SSR: Lazy<Option<Regex>> = Lazy::new(|| case_insensitive("SSR"));
static ANDROID: Lazy<Option<Regex>> = Lazy::new(|| case_insensitive("Android"));
static IOS: Lazy<Option<Regex>> = Lazy::new(|| case_insensitive("iPhone|iPad|iPod"));

fn case_insensitive(pattern: &str) -> Option<Regex> {
    RegexBuilder::new(pattern).case_insensitive(true).build().ok()
}

fn matches_pattern(pattern: Option<&Regex>, user_agent: &str) -> bool {
    pattern.is_some_and(|pattern| pattern.is_match(user_agent))
}

/// Device classification derived from a user-agent string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceProfile {
    user_agent: String,
}

impl DeviceProfile {
    /// Classify `user_agent`; `None` means no navigator and reads as [`SSR_USER_AGENT`].
    #[must_use]
    pub fn from_user_agent(user_agent: Option<&str>) -> Self {
        Self {
            user_agent: user_agent.unwrap_or(SSR_USER_AGENT).to_string(),
        }
    }

    /// Raw user-agent string the profile was built from.
    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Rendering outside a browser.
    #[must_use]
    pub fn is_ssr(&self) -> bool {
        matches_pattern(Option::as_ref(&SSR), &self.user_agent)
    }

    /// Android phone or tablet.
    #[must_use]
    pub fn is_android(&self) -> bool {
        matches_pattern(Option::as_ref(&ANDROID), &self.user_agent)
    }

    /// iPhone, iPad, or iPod.
    #[must_use]
    pub fn is_ios(&self) -> bool {
        matches_pattern(Option::as_ref(&IOS), &self.user_agent)
    }

    /// Any Android or iOS device.
    #[must_use]
    pub fn is_mobile(&self) -> bool {
        self.is_android() || self.is_ios()
    }

    /// A browser that is neither mobile nor server-side.
    #[must_use]
    pub fn is_desktop(&self) -> bool {
        !self.is_mobile() && !self.is_ssr()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PIXEL: &str = "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Mobile Safari/537.36";
    const IPAD: &str = "Mozilla/5.0 (iPad; CPU OS 17_4 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Mobile/15E148 Safari/604.1";
    const FIREFOX: &str =
        "Mozilla/5.0 (X11; Linux x86_64; rv:125.0) Gecko/20100101 Firefox/125.0";

    #[test]
    fn android_is_mobile_not_desktop() {
        let profile = DeviceProfile::from_user_agent(Some(PIXEL));
        assert!(profile.is_android());
        assert!(!profile.is_ios());
        assert!(profile.is_mobile());
        assert!(!profile.is_desktop());
        assert!(!profile.is_ssr());
    }

    #[test]
    fn ipad_is_ios() {
        let profile = DeviceProfile::from_user_agent(Some(IPAD));
        assert!(profile.is_ios());
        assert!(profile.is_mobile());
        assert!(!profile.is_desktop());
    }

    #[test]
    fn desktop_browser_is_desktop() {
        let profile = DeviceProfile::from_user_agent(Some(FIREFOX));
        assert!(profile.is_desktop());
        assert!(!profile.is_mobile());
    }

    #[test]
    fn missing_navigator_reads_as_ssr() {
        let profile = DeviceProfile::from_user_agent(None);
        assert_eq!(profile.user_agent(), SSR_USER_AGENT);
        assert!(profile.is_ssr());
        assert!(!profile.is_desktop());
        assert!(!profile.is_mobile());
    }

    #[test]
    fn device_patterns_compile() {
        assert!(SSR.is_some());
        assert!(ANDROID.is_some());
        assert!(IOS.is_some());
    }

    #[test]
    fn matching_ignores_case() {
        let profile = DeviceProfile::from_user_agent(Some("custom-ANDROID-shell"));
        assert!(profile.is_android());
        assert!(DeviceProfile::from_user_agent(Some("ipod touch")).is_ios());
    }
}
