use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, RwLock};

use crate::ruler_navigation::{
    DEFAULT_SNAP_POINTS, DRAG_EASING, DRAG_THRESHOLD_PX, IDLE_EASING, PAGE_COUNT, RulerConfig,
};
use crate::typing_effect::default_roles;

pub const CURRENT_VERSION: u32 = 1;
const SETTINGS_FILENAME: &str = "config.yaml";
const APP_NAME: &str = "folio";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SettingsError {
    #[error("fps must be at least 1")]
    ZeroFps,
    #[error("cell_width_px must be positive, got {0}")]
    CellWidth(f64),
    #[error("{name} must be in (0, 1], got {value}")]
    Easing { name: &'static str, value: f64 },
    #[error("drag_threshold must not be negative, got {0}")]
    DragThreshold(f64),
    #[error("failure_rate must be in [0, 1], got {0}")]
    FailureRate(f64),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RulerSettings {
    #[serde(default = "default_snap_points")]
    pub snap_points: [f64; PAGE_COUNT],

    #[serde(default = "default_drag_threshold")]
    pub drag_threshold: f64,

    #[serde(default = "default_idle_easing")]
    pub idle_easing: f64,

    #[serde(default = "default_drag_easing")]
    pub drag_easing: f64,
}

impl Default for RulerSettings {
    fn default() -> Self {
        Self {
            snap_points: default_snap_points(),
            drag_threshold: default_drag_threshold(),
            idle_easing: default_idle_easing(),
            drag_easing: default_drag_easing(),
        }
    }
}

impl From<&RulerSettings> for RulerConfig {
    fn from(settings: &RulerSettings) -> Self {
        RulerConfig {
            snap_points: settings.snap_points,
            drag_threshold: settings.drag_threshold,
            idle_easing: settings.idle_easing,
            drag_easing: settings.drag_easing,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactSettings {
    /// Probability that the simulated submission fails.
    #[serde(default = "default_failure_rate")]
    pub failure_rate: f64,

    #[serde(default = "default_submit_delay_ms")]
    pub submit_delay_ms: u64,
}

impl Default for ContactSettings {
    fn default() -> Self {
        Self {
            failure_rate: default_failure_rate(),
            submit_delay_ms: default_submit_delay_ms(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default = "default_owner_name")]
    pub owner_name: String,

    #[serde(default = "default_roles")]
    pub roles: Vec<String>,

    #[serde(default = "default_fps")]
    pub fps: u32,

    /// Width of one terminal cell in pixels, used to map pointer columns.
    #[serde(default = "default_cell_width_px")]
    pub cell_width_px: f64,

    /// When false, transitions jump straight to their end state.
    #[serde(default = "default_true")]
    pub animations: bool,

    /// Show the progress screen for two seconds on start.
    #[serde(default = "default_true")]
    pub loading_screen: bool,

    #[serde(default)]
    pub ruler: RulerSettings,

    #[serde(default)]
    pub contact: ContactSettings,
}

fn default_true() -> bool {
    true
}

fn default_version() -> u32 {
    CURRENT_VERSION
}

fn default_owner_name() -> String {
    "Pulitha Sethnindu".to_string()
}

fn default_fps() -> u32 {
    60
}

fn default_cell_width_px() -> f64 {
    10.0
}

fn default_snap_points() -> [f64; PAGE_COUNT] {
    DEFAULT_SNAP_POINTS
}

fn default_drag_threshold() -> f64 {
    DRAG_THRESHOLD_PX
}

fn default_idle_easing() -> f64 {
    IDLE_EASING
}

fn default_drag_easing() -> f64 {
    DRAG_EASING
}

fn default_failure_rate() -> f64 {
    0.1
}

fn default_submit_delay_ms() -> u64 {
    1500
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            owner_name: default_owner_name(),
            roles: default_roles(),
            fps: default_fps(),
            cell_width_px: default_cell_width_px(),
            animations: true,
            loading_screen: true,
            ruler: RulerSettings::default(),
            contact: ContactSettings::default(),
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.fps == 0 {
            return Err(SettingsError::ZeroFps);
        }
        if !(self.cell_width_px > 0.0) {
            return Err(SettingsError::CellWidth(self.cell_width_px));
        }
        if !(self.ruler.drag_threshold >= 0.0) {
            return Err(SettingsError::DragThreshold(self.ruler.drag_threshold));
        }
        for (name, value) in [
            ("idle_easing", self.ruler.idle_easing),
            ("drag_easing", self.ruler.drag_easing),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(SettingsError::Easing { name, value });
            }
        }
        if !(0.0..=1.0).contains(&self.contact.failure_rate) {
            return Err(SettingsError::FailureRate(self.contact.failure_rate));
        }
        Ok(())
    }
}

static SETTINGS: LazyLock<RwLock<Settings>> = LazyLock::new(|| RwLock::new(Settings::default()));

fn preferred_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|config| config.join(APP_NAME).join(SETTINGS_FILENAME))
}

/// Load settings from `explicit` if given, else from the config directory.
/// A missing default config file is created with the defaults.
pub fn load_settings(explicit: Option<&Path>) {
    if let Some(path) = explicit {
        load_settings_from_path(path);
        return;
    }

    let Some(path) = preferred_config_path() else {
        warn!("Could not determine config directory, using default settings");
        return;
    };
    if path.exists() {
        load_settings_from_path(&path);
    } else {
        info!("Settings file not found, creating with defaults at {path:?}");
        if let Ok(settings) = SETTINGS.read() {
            save_settings_to_file(&settings, &path);
        }
    }
}

pub fn load_settings_from_path(path: &Path) {
    match fs::read_to_string(path) {
        Ok(content) => match serde_yaml::from_str::<Settings>(&content) {
            Ok(mut settings) => {
                debug!("Loaded settings from {path:?}");

                if let Err(e) = settings.validate() {
                    error!("Invalid settings in {path:?}: {e}, using defaults");
                    return;
                }

                if settings.version < CURRENT_VERSION {
                    migrate_settings(&mut settings);
                    save_settings_to_file(&settings, path);
                }

                if let Ok(mut global) = SETTINGS.write() {
                    *global = settings;
                }
            }
            Err(e) => {
                error!("Failed to parse settings file {path:?}: {e}");
            }
        },
        Err(e) => {
            error!("Failed to read settings file {path:?}: {e}");
        }
    }
}

fn migrate_settings(settings: &mut Settings) {
    info!(
        "Migrating settings from v{} to v{}",
        settings.version, CURRENT_VERSION
    );
    settings.version = CURRENT_VERSION;
}

fn save_settings_to_file(settings: &Settings, path: &Path) {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            if let Err(e) = fs::create_dir_all(parent) {
                error!("Failed to create config directory {parent:?}: {e}");
                return;
            }
        }
    }

    let body = match serde_yaml::to_string(settings) {
        Ok(body) => body,
        Err(e) => {
            error!("Failed to serialize settings: {e}");
            return;
        }
    };

    match fs::write(path, format!("{SETTINGS_HEADER}{body}")) {
        Ok(()) => debug!("Saved settings to {path:?}"),
        Err(e) => error!("Failed to save settings to {path:?}: {e}"),
    }
}

const SETTINGS_HEADER: &str = r#"# ============================================================================
# folio settings
# ============================================================================
# ruler.snap_points: resting ruler offset (px) for Home, About, Contact
# ruler.drag_threshold: drag distance (px) needed to switch page
# cell_width_px: pixels per terminal column when mapping the mouse
# animations: false makes every transition instant
# loading_screen: false skips the start-up progress screen

"#;

pub fn get_settings() -> Settings {
    SETTINGS.read().map(|s| s.clone()).unwrap_or_default()
}
