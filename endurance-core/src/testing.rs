//! Scriptable stand-in for the web client.
//!
//! [`FakeApp`] lays out a [`MockPage`] with every element the harness
//! touches, wired so the happy path works: forms submit, the session toggle
//! flips between `Start` and `Stop`, and the stream surface is visible.
//! Tests then break individual pieces.

use crate::ui;
use endurance_driver::{MockElement, MockLauncher, MockPage};

/// In-memory web client plus the launcher that opens sessions on it.
#[derive(Debug, Clone)]
pub struct FakeApp {
    launcher: MockLauncher,
}

impl Default for FakeApp {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeApp {
    /// The selectable video capture device.
    pub const VIDEO_DEVICE: &'static str = "video-device-1";
    /// The selectable station in the observer's dropdown.
    pub const STATION_OPTION: &'static str = "session-option-1";
    /// Label of [`Self::STATION_OPTION`].
    pub const STATION_LABEL: &'static str = "Nursery";

    const VIDEO_PLACEHOLDER: &'static str = "video-device-placeholder";
    const SESSION_PLACEHOLDER: &'static str = "session-option-placeholder";

    /// A fully working client.
    pub fn new() -> Self {
        let page = MockPage::new();
        page.with(|dom| {
            dom.insert(ui::PAGE_INDEX, MockElement::visible(""));

            {
                use ui::create_account::*;
                dom.insert(
                    FORM,
                    MockElement::visible("")
                        .tagged("form")
                        .with_children(&[EMAIL, PASSWORD, SUBMIT]),
                );
                dom.insert(EMAIL, MockElement::visible("").tagged("input"));
                dom.insert(PASSWORD, MockElement::visible("").tagged("input"));
                dom.insert(SUBMIT, MockElement::visible("Create account").tagged("button"));
            }
            {
                use ui::login::*;
                dom.insert(NAV, MockElement::visible("Login").tagged("button"));
                dom.insert(
                    FORM,
                    MockElement::visible("")
                        .tagged("form")
                        .with_children(&[EMAIL, PASSWORD, SUBMIT]),
                );
                dom.insert(EMAIL, MockElement::visible("").tagged("input"));
                dom.insert(PASSWORD, MockElement::visible("").tagged("input"));
                dom.insert(SUBMIT, MockElement::visible("Login").tagged("button"));
            }

            dom.insert(ui::NAV_STATION, MockElement::visible("Baby").tagged("a"));
            dom.insert(
                ui::MEDIA_PERMISSION_CONTINUE,
                MockElement::visible("Continue").tagged("button"),
            );
            dom.insert(
                ui::VIDEO_DEVICE_SELECT,
                MockElement::visible("")
                    .tagged("select")
                    .with_children(&[Self::VIDEO_PLACEHOLDER, Self::VIDEO_DEVICE]),
            );
            dom.insert(
                Self::VIDEO_PLACEHOLDER,
                MockElement::visible("Select a camera").tagged("option"),
            );
            dom.insert(
                Self::VIDEO_DEVICE,
                MockElement::visible("fake_device_0").tagged("option"),
            );
            dom.insert(ui::SESSION_TOGGLE, MockElement::visible("Start").tagged("button"));
            dom.on_click(ui::SESSION_TOGGLE, |dom| {
                let next = match dom.element(ui::SESSION_TOGGLE).map(|e| e.text.as_str()) {
                    Some("Start") => "Stop",
                    _ => "Start",
                };
                dom.set_text(ui::SESSION_TOGGLE, next);
            });

            dom.insert(ui::NAV_OBSERVER, MockElement::visible("Parent").tagged("a"));
            dom.insert(
                ui::SESSION_DROPDOWN,
                MockElement::visible("")
                    .tagged("select")
                    .with_children(&[Self::SESSION_PLACEHOLDER, Self::STATION_OPTION]),
            );
            dom.insert(
                Self::SESSION_PLACEHOLDER,
                MockElement::visible("Select a session").tagged("option"),
            );
            dom.insert(
                Self::STATION_OPTION,
                MockElement::visible(Self::STATION_LABEL).tagged("option"),
            );
            dom.insert(ui::STREAM_VIDEO, MockElement::visible("").tagged("video"));
        });

        Self {
            launcher: MockLauncher::new(page),
        }
    }

    /// Launcher opening sessions on this client.
    pub fn launcher(&self) -> &MockLauncher {
        &self.launcher
    }

    /// The shared page.
    pub fn page(&self) -> &MockPage {
        self.launcher.page()
    }

    /// Make the stream surface invisible.
    pub fn hide_stream(&self) {
        self.page().with(|dom| dom.set_displayed(ui::STREAM_VIDEO, false));
    }

    /// The session toggle ignores clicks, so the station never starts streaming.
    pub fn stall_station(&self) {
        self.page().with(|dom| dom.on_click(ui::SESSION_TOGGLE, |_| {}));
    }

    /// The station stops streaming on its own.
    pub fn stop_streaming(&self) {
        self.page().with(|dom| dom.set_text(ui::SESSION_TOGGLE, "Start"));
    }

    /// List the station as unavailable to observers.
    pub fn mark_station_unavailable(&self) {
        let label = format!("{}{}", Self::STATION_LABEL, ui::UNAVAILABLE_MARKER);
        self.page().with(|dom| dom.set_text(Self::STATION_OPTION, &label));
    }

    /// List the station as available to observers.
    pub fn mark_station_available(&self) {
        self.page()
            .with(|dom| dom.set_text(Self::STATION_OPTION, Self::STATION_LABEL));
    }
}
