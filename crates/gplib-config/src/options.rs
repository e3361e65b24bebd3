/// File name used when the caller has no preference.
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// Options controlling how a configuration file is loaded.
#[derive(Clone, Debug)]
pub struct LoadOptions {
    /// Emit `tracing` events for bootstrap and repair. Turning this off
    /// changes observability only, never the loaded values.
    pub log: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self { log: true }
    }
}

impl LoadOptions {
    /// Options with the loader's own log events switched off.
    pub fn quiet() -> Self {
        Self { log: false }
    }
}
