//! Session capabilities sent when opening a remote session.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Chrome flags the harness runs with by default.
///
/// Self-signed certificates are accepted and media devices are synthetic, so
/// a station can stream without a camera and nothing prompts for permission.
pub const DEFAULT_CHROME_ARGS: &[&str] = &[
    "--ignore-certificate-errors",
    "--allow-file-access-from-files",
    "--disable-translate",
    "--use-fake-ui-for-media-stream",
    "--use-fake-device-for-media-stream",
    "--mute-audio",
];

/// Browser capabilities for a new session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    /// W3C `browserName`.
    pub browser_name: String,
    /// Command line arguments passed to the browser.
    pub args: Vec<String>,
    /// W3C `acceptInsecureCerts`.
    pub accept_insecure_certs: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::chrome()
    }
}

impl Capabilities {
    /// Chrome with the default harness flags.
    pub fn chrome() -> Self {
        Self {
            browser_name: "chrome".into(),
            args: DEFAULT_CHROME_ARGS.iter().map(|a| a.to_string()).collect(),
            accept_insecure_certs: true,
        }
    }

    /// Build the `capabilities` object of a W3C new-session request.
    pub fn to_w3c(&self) -> Value {
        let mut always_match = json!({
            "browserName": self.browser_name,
            "acceptInsecureCerts": self.accept_insecure_certs,
        });

        let vendor_key = match self.browser_name.as_str() {
            "chrome" => Some("goog:chromeOptions"),
            "MicrosoftEdge" => Some("ms:edgeOptions"),
            "firefox" => Some("moz:firefoxOptions"),
            _ => None,
        };
        if let (Some(key), Some(map)) = (vendor_key, always_match.as_object_mut()) {
            map.insert(key.to_string(), json!({ "args": self.args }));
        }

        json!({ "alwaysMatch": always_match })
    }
}
