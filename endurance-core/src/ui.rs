//! Element ids of the web client.

/// Navigation link to the station view.
pub const NAV_STATION: &str = "nav-link-baby";
/// Navigation link to the observer view.
pub const NAV_OBSERVER: &str = "nav-link-parent";
/// Confirms the camera/microphone permission prompt.
pub const MEDIA_PERMISSION_CONTINUE: &str = "button-continue-media-stream-permission-check";
/// Video capture device picker.
pub const VIDEO_DEVICE_SELECT: &str = "select-video-device";
/// Starts and stops the station session.
pub const SESSION_TOGGLE: &str = "session-toggle";
/// Station picker on the observer view.
pub const SESSION_DROPDOWN: &str = "session-dropdown";
/// Stream surface on the observer view.
pub const STREAM_VIDEO: &str = "video-parent-station";
/// Landing page shown after login.
pub const PAGE_INDEX: &str = "page-index";

/// Toggle label while the station is streaming.
pub const TOGGLE_STREAMING_TEXT: &str = "Stop";
/// Suffix marking a station as unavailable in the dropdown.
pub const UNAVAILABLE_MARKER: &str = " 🔴";

/// Option index used for both the video device and the station picker.
/// Index 0 is a placeholder.
pub const FIRST_REAL_OPTION: usize = 1;

/// Account creation form.
pub mod create_account {
    /// The form.
    pub const FORM: &str = "form-create-account";
    /// Email input.
    pub const EMAIL: &str = "input-create-account-email";
    /// Password input.
    pub const PASSWORD: &str = "input-create-account-password";
    /// Submit button.
    pub const SUBMIT: &str = "submit-button-create-account";
}

/// Login form.
pub mod login {
    /// Navigation button opening the form.
    pub const NAV: &str = "nav-button-login";
    /// The form.
    pub const FORM: &str = "form-login";
    /// Email input.
    pub const EMAIL: &str = "input-login-email";
    /// Password input.
    pub const PASSWORD: &str = "input-login-password";
    /// Submit button.
    pub const SUBMIT: &str = "submit-button-login";
}
