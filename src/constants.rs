//! Application-wide constants
//!
//! Setting keys, defaults and ranges shared by the controller, the settings
//! panel and the tests.

/// Persistence keys for every declared setting
pub mod keys {
    pub const TRACKING_VISIBLE: &str = "trackingVisible";
    pub const TRACKING_FORBIDDEN: &str = "trackingForbidden";
    pub const ZOOM_FOR_TRACKING: &str = "zoomForTracking";
    pub const VISIBILITY_MARGIN: &str = "visibilityMargin";
    pub const CLAMP_TIP_TO_SCREEN: &str = "clampTipToScreen";
    pub const CLAMP_MARGIN: &str = "clampMargin";
    pub const HIGHLIGHT_OPACITY: &str = "highlightOpacity";
    pub const SHOW_ROW_TIPS: &str = "showTips";
    pub const COUNT_IN_STORAGE: &str = "countInStorage";
    pub const COUNT_FORBIDDEN: &str = "countForbidden";
    pub const TIP_X_POSITION: &str = "tooltipXPosition";
    pub const TIP_Y_POSITION: &str = "tooltipYPosition";
    pub const TRANSFER_SELECTION: &str = "transferSel";

    /// Backing boolean of the overlay toggle (hidden, never persisted)
    pub const SHOULD_DRAW_TOOLTIP: &str = "shouldDrawTooltip";
}

/// Default values used at declaration time
pub mod defaults {
    pub const VISIBILITY_MARGIN: i32 = 100;
    pub const CLAMP_MARGIN: i32 = 10;
    pub const HIGHLIGHT_OPACITY: f32 = 0.10;
    pub const TIP_X_POSITION: i32 = 8;
    pub const TIP_Y_POSITION: i32 = 2;

    /// Screen height assumed when the host does not report one
    pub const SCREEN_HEIGHT: i32 = 1080;
}

/// Validation bounds and spinner steps
pub mod limits {
    /// Increment used by the margin spinners
    pub const MARGIN_STEP: f64 = 10.0;

    /// Highlight opacity slider bounds
    pub const OPACITY_MIN: f32 = 0.0;
    pub const OPACITY_MAX: f32 = 0.25;

    /// Slider quantization step (1/100)
    pub const OPACITY_STEP: f32 = 1.0 / 100.0;

    /// Tooltip anchor position is a percentage of the screen
    pub const TIP_POSITION_MIN: i32 = 0;
    pub const TIP_POSITION_MAX: i32 = 100;
}

/// Input event constants (from evdev)
pub mod input {
    /// Key press event value
    pub const KEY_PRESS: i32 = 1;

    /// Key release event value
    pub const KEY_RELEASE: i32 = 0;

    /// Key repeat event value
    pub const KEY_REPEAT: i32 = 2;
}

/// Filesystem paths
pub mod paths {
    /// Directory holding evdev input device nodes
    pub const DEV_INPUT: &str = "/dev/input";
}

/// Permission hints for evdev access
pub mod permissions {
    pub const INPUT_GROUP: &str = "input";
    pub const ADD_TO_INPUT_GROUP: &str = "sudo usermod -aG input $USER";
}

/// Settings file location
pub mod config {
    pub const APP_DIR: &str = "totals-tip";
    pub const FILENAME: &str = "settings.toml";
}
