// ABOUTME: Centralized constants for the way2enjoy CLI application
// ABOUTME: Config file locations, accepted resize methods and output naming

/// Config file names and directories
pub mod config_files {
    /// Project-local config, looked up in the working directory
    pub const PROJECT_FILE: &str = "way2enjoy.toml";

    /// Directory under the XDG config home
    pub const APP_DIR: &str = "way2enjoy";

    pub const USER_FILE: &str = "config.toml";
}

pub mod resize_methods {
    pub const ALL: [&str; 4] = ["scale", "fit", "cover", "thumb"];
}

/// Output naming when `-o` is not given
pub mod output {
    /// Inserted before the extension, e.g. `photo.min.png`
    pub const DEFAULT_SUFFIX: &str = "min";

    /// Used when the input has no usable file name (URL inputs)
    pub const FALLBACK_STEM: &str = "way2enjoy-output";
}
