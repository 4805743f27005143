//! Configuration describing where the custom report fonts live.

use std::env;
use std::path::{Path, PathBuf};

use crate::fonts::BuiltinFamily;

/// Environment variable that overrides the directory searched for custom fonts.
pub const FONTS_DIR_ENV: &str = "REPORT_FONTS_DIR";

/// Logical name the custom family is registered under.
pub const DEFAULT_FAMILY_NAME: &str = "Arial";

/// File name of the regular weight.
pub const DEFAULT_REGULAR_FILE: &str = "Arial.ttf";

/// File name of the bold weight.
pub const DEFAULT_BOLD_FILE: &str = "Arial Bold.ttf";

/// Location and naming of the custom font pair plus the built-in family used when the pair is
/// unavailable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FontConfig {
    directory: PathBuf,
    family: String,
    regular_file: String,
    bold_file: String,
    fallback: BuiltinFamily,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            family: DEFAULT_FAMILY_NAME.to_owned(),
            regular_file: DEFAULT_REGULAR_FILE.to_owned(),
            bold_file: DEFAULT_BOLD_FILE.to_owned(),
            fallback: BuiltinFamily::default(),
        }
    }
}

impl FontConfig {
    /// Creates the default configuration: `Arial.ttf` and `Arial Bold.ttf` in the working
    /// directory, falling back to Helvetica.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the default configuration, taking the font directory from
    /// [`FONTS_DIR_ENV`] when it is set to a non-blank value.
    pub fn from_env() -> Self {
        let config = Self::default();
        match env::var_os(FONTS_DIR_ENV) {
            Some(value) if !value.to_string_lossy().trim().is_empty() => {
                config.with_directory(PathBuf::from(value))
            }
            _ => config,
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn regular_file(&self) -> &str {
        &self.regular_file
    }

    pub fn bold_file(&self) -> &str {
        &self.bold_file
    }

    pub fn fallback(&self) -> BuiltinFamily {
        self.fallback
    }

    /// Full path of the regular weight.
    pub fn regular_path(&self) -> PathBuf {
        self.directory.join(&self.regular_file)
    }

    /// Full path of the bold weight.
    pub fn bold_path(&self) -> PathBuf {
        self.directory.join(&self.bold_file)
    }

    /// Sets the directory searched for both font files.
    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = directory.into();
        self
    }

    /// Sets the logical name the custom family is registered under.
    pub fn with_family(mut self, family: impl Into<String>) -> Self {
        self.family = family.into();
        self
    }

    /// Sets the file name of the regular weight.
    pub fn with_regular_file(mut self, file: impl Into<String>) -> Self {
        self.regular_file = file.into();
        self
    }

    /// Sets the file name of the bold weight.
    pub fn with_bold_file(mut self, file: impl Into<String>) -> Self {
        self.bold_file = file.into();
        self
    }

    /// Sets the built-in family used when the custom pair cannot be loaded.
    pub fn with_fallback(mut self, fallback: BuiltinFamily) -> Self {
        self.fallback = fallback;
        self
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn defaults_point_at_working_directory() {
        let config = FontConfig::default();
        assert_eq!(config.regular_path(), Path::new(".").join("Arial.ttf"));
        assert_eq!(config.bold_path(), Path::new(".").join("Arial Bold.ttf"));
        assert_eq!(config.family(), "Arial");
        assert_eq!(config.fallback(), BuiltinFamily::Helvetica);
    }

    #[test]
    fn setters_override_every_field() {
        let config = FontConfig::new()
            .with_directory("/srv/fonts")
            .with_family("DejaVu")
            .with_regular_file("DejaVuSans.ttf")
            .with_bold_file("DejaVuSans-Bold.ttf")
            .with_fallback(BuiltinFamily::Times);

        assert_eq!(config.regular_path(), Path::new("/srv/fonts/DejaVuSans.ttf"));
        assert_eq!(config.bold_path(), Path::new("/srv/fonts/DejaVuSans-Bold.ttf"));
        assert_eq!(config.family(), "DejaVu");
        assert_eq!(config.fallback(), BuiltinFamily::Times);
    }

    #[test]
    fn env_directory_is_honoured_unless_blank() {
        let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let original = env::var_os(FONTS_DIR_ENV);

        env::set_var(FONTS_DIR_ENV, "/opt/report-fonts");
        assert_eq!(
            FontConfig::from_env().directory(),
            Path::new("/opt/report-fonts")
        );

        env::set_var(FONTS_DIR_ENV, "   ");
        assert_eq!(FontConfig::from_env().directory(), Path::new("."));

        match original {
            Some(value) => env::set_var(FONTS_DIR_ENV, value),
            None => env::remove_var(FONTS_DIR_ENV),
        }
    }
}
