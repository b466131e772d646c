use gmusic::config;

/// Settings plus the reason defaults were used instead, if they were.
///
/// Logging is configured from the settings, so problems are reported
/// after the subscriber is installed.
pub struct LoadedSettings {
    pub settings: config::Settings,
    pub fallback_reason: Option<String>,
}

pub fn load_settings() -> LoadedSettings {
    match config::Settings::load() {
        Ok(s) => match s.validate() {
            Ok(()) => LoadedSettings {
                settings: s,
                fallback_reason: None,
            },
            Err(msg) => LoadedSettings {
                settings: config::Settings::default(),
                fallback_reason: Some(format!("invalid config: {msg}")),
            },
        },
        // Config is optional; failures should not prevent the app from starting.
        Err(e) => LoadedSettings {
            settings: config::Settings::default(),
            fallback_reason: Some(format!("failed to load config: {e}")),
        },
    }
}
