//! Resolution of the report font: a custom TrueType pair when available, a built-in PDF family
//! otherwise.
//!
//! [`resolve`] runs once at startup and yields a [`ResolvedFonts`] value. Rendering code receives
//! that value by reference; nothing is registered globally. The pair loads as a unit: when either
//! weight is missing, unreadable or malformed, the whole attempt fails and the configured
//! [`BuiltinFamily`] becomes the active setting.

mod builtin;

use std::borrow::Cow;
use std::fmt;
use std::fs;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use genpdf::error::{Error, ErrorKind};
use genpdf::fonts::{FontData, FontFamily};
use log::{debug, info, warn};
use ttf_parser::{Face, RawFace};

use crate::config::FontConfig;

pub use builtin::{BuiltinFamily, UnknownBuiltinFamily};

/// The font every later rendering step should use.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum FontSetting {
    /// The custom pair loaded and is registered under `family`.
    Custom { family: String },
    /// The custom pair was unavailable; the built-in family is used instead.
    Fallback(BuiltinFamily),
}

impl FontSetting {
    /// Logical font name recorded for this setting.
    pub fn identifier(&self) -> &str {
        match self {
            FontSetting::Custom { family } => family,
            FontSetting::Fallback(builtin) => builtin.identifier(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, FontSetting::Fallback(_))
    }

    /// Adapts `text` to what the active font can display.
    ///
    /// Custom fonts are embedded and take the text as is. Built-in fonts are limited to WinAnsi,
    /// which lacks ğ, ı, ş and their capitals; those are replaced by the nearest ASCII letter.
    /// Any other character outside WinAnsi (Greek, CJK, ...) is passed through unchanged and will
    /// not display correctly with a built-in font.
    pub fn prepare_text<'a>(&self, text: &'a str) -> Cow<'a, str> {
        match self {
            FontSetting::Custom { .. } => Cow::Borrowed(text),
            FontSetting::Fallback(_) => builtin::fold_to_winansi(text),
        }
    }
}

impl fmt::Display for FontSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

/// Why the custom pair could not be used.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnavailableReason {
    Missing,
    PermissionDenied,
    Malformed,
    Unreadable,
}

impl UnavailableReason {
    fn of(err: &Error) -> Self {
        match err.kind() {
            ErrorKind::IoError(io_err) => match io_err.kind() {
                io::ErrorKind::NotFound => UnavailableReason::Missing,
                io::ErrorKind::PermissionDenied => UnavailableReason::PermissionDenied,
                io::ErrorKind::InvalidData => UnavailableReason::Malformed,
                _ => UnavailableReason::Unreadable,
            },
            ErrorKind::InvalidData => UnavailableReason::Malformed,
            _ => UnavailableReason::Unreadable,
        }
    }
}

impl fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UnavailableReason::Missing => "font file missing",
            UnavailableReason::PermissionDenied => "permission denied",
            UnavailableReason::Malformed => "malformed font data",
            UnavailableReason::Unreadable => "font file unreadable",
        })
    }
}

/// A single weight read from disk and accepted by the font parser.
pub struct LoadedFont {
    path: PathBuf,
    bytes: Vec<u8>,
    data: FontData,
}

impl LoadedFont {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw font program, suitable for embedding.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn data(&self) -> &FontData {
        &self.data
    }
}

impl fmt::Debug for LoadedFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedFont")
            .field("path", &self.path)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// The regular and bold weights of the custom family.
#[derive(Debug)]
pub struct FontPair {
    family: String,
    regular: LoadedFont,
    bold: LoadedFont,
}

impl FontPair {
    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn regular(&self) -> &LoadedFont {
        &self.regular
    }

    pub fn bold(&self) -> &LoadedFont {
        &self.bold
    }

    /// Converts the pair into a `genpdf` family. Italic styles reuse the upright weights.
    pub fn into_font_family(self) -> Result<FontFamily<FontData>, Error> {
        let italic = FontData::new(self.regular.bytes, None)?;
        let bold_italic = FontData::new(self.bold.bytes, None)?;
        Ok(FontFamily {
            regular: self.regular.data,
            bold: self.bold.data,
            italic,
            bold_italic,
        })
    }
}

/// Outcome of the one-shot font resolution.
#[derive(Debug)]
pub struct ResolvedFonts {
    setting: FontSetting,
    pair: Option<FontPair>,
    fallback_reason: Option<Error>,
}

impl ResolvedFonts {
    fn custom(pair: FontPair) -> Self {
        Self {
            setting: FontSetting::Custom {
                family: pair.family.clone(),
            },
            pair: Some(pair),
            fallback_reason: None,
        }
    }

    fn fallback(builtin: BuiltinFamily, reason: Error) -> Self {
        Self {
            setting: FontSetting::Fallback(builtin),
            pair: None,
            fallback_reason: Some(reason),
        }
    }

    /// The active font setting.
    pub fn setting(&self) -> &FontSetting {
        &self.setting
    }

    pub fn is_custom(&self) -> bool {
        self.pair.is_some()
    }

    /// The loaded custom pair, present exactly when the setting is [`FontSetting::Custom`].
    pub fn pair(&self) -> Option<&FontPair> {
        self.pair.as_ref()
    }

    /// The error that caused the fallback, present exactly when the setting is
    /// [`FontSetting::Fallback`].
    pub fn fallback_reason(&self) -> Option<&Error> {
        self.fallback_reason.as_ref()
    }

    /// Classification of [`ResolvedFonts::fallback_reason`].
    pub fn fallback_cause(&self) -> Option<UnavailableReason> {
        self.fallback_reason.as_ref().map(UnavailableReason::of)
    }

    /// The custom pair as a `genpdf` family, or `None` when the fallback is active.
    pub fn into_font_family(self) -> Option<Result<FontFamily<FontData>, Error>> {
        self.pair.map(FontPair::into_font_family)
    }
}

/// Checks that every table of the font lies inside the file and that the tables needed for text
/// layout are present.
fn check_font_tables(bytes: &[u8]) -> Result<(), String> {
    let raw = RawFace::parse(bytes, 0).map_err(|err| err.to_string())?;
    for record in raw.table_records {
        let end = u64::from(record.offset) + u64::from(record.length);
        if end > bytes.len() as u64 {
            return Err(format!(
                "table at offset {} ends at byte {} past the end of the file ({} bytes)",
                record.offset,
                end,
                bytes.len()
            ));
        }
    }

    let face = Face::parse(bytes, 0).map_err(|err| err.to_string())?;
    let tables = face.tables();
    let missing: Vec<&str> = [
        ("cmap", tables.cmap.is_some()),
        ("hmtx", tables.hmtx.is_some()),
        ("glyf", tables.glyf.is_some()),
    ]
    .into_iter()
    .filter(|(_, present)| !present)
    .map(|(name, _)| name)
    .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(format!("missing tables [{}]", missing.join(", ")))
    }
}

fn read_font(path: &Path, style: &str) -> Result<LoadedFont, Error> {
    let bytes = fs::read(path).map_err(|err| {
        Error::new(
            format!("Failed to read {} font at {}", style, path.display()),
            err,
        )
    })?;

    if bytes.is_empty() {
        return Err(Error::new(
            format!("The {} font at {} is empty", style, path.display()),
            ErrorKind::InvalidData,
        ));
    }

    let malformed = |reason: String| {
        Error::new(
            format!(
                "Malformed {} font at {}: {}",
                style,
                path.display(),
                reason
            ),
            ErrorKind::InvalidData,
        )
    };

    check_font_tables(&bytes).map_err(malformed)?;

    // genpdf's parser indexes slices without bounds checks; a panic still counts as malformed.
    let parsed = panic::catch_unwind(AssertUnwindSafe(|| FontData::new(bytes.clone(), None)));
    let data = match parsed {
        Ok(result) => result.map_err(|err| malformed(err.to_string()))?,
        Err(_) => return Err(malformed("font parser aborted".to_owned())),
    };

    debug!("Loaded {} font from {}", style, path.display());
    Ok(LoadedFont {
        path: path.to_path_buf(),
        bytes,
        data,
    })
}

/// Loads both weights of the configured custom family.
///
/// Fails as a unit: no pair is returned unless both files read and parse.
pub fn load_font_pair(config: &FontConfig) -> Result<FontPair, Error> {
    let regular = read_font(&config.regular_path(), "regular")?;
    let bold = read_font(&config.bold_path(), "bold")?;

    Ok(FontPair {
        family: config.family().to_owned(),
        regular,
        bold,
    })
}

/// Lists the configured font files that do not exist on disk.
pub fn missing_font_files(config: &FontConfig) -> Vec<PathBuf> {
    [config.regular_path(), config.bold_path()]
        .into_iter()
        .filter(|candidate| !candidate.is_file())
        .collect()
}

/// Indicates whether both custom font files are present. The files are not parsed.
pub fn custom_fonts_available(config: &FontConfig) -> bool {
    missing_font_files(config).is_empty()
}

/// Decides the active font: the custom pair when it loads, the configured built-in family
/// otherwise. Never fails; the cause of a fallback is kept on the returned value.
pub fn resolve(config: &FontConfig) -> ResolvedFonts {
    match load_font_pair(config) {
        Ok(pair) => {
            info!(
                "Using custom font family '{}' from {}",
                pair.family,
                config.directory().display()
            );
            ResolvedFonts::custom(pair)
        }
        Err(err) => {
            warn!(
                "Custom font family '{}' unavailable ({}: {}); falling back to built-in '{}'.",
                config.family(),
                UnavailableReason::of(&err),
                err,
                config.fallback().identifier()
            );
            ResolvedFonts::fallback(config.fallback(), err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_config() -> (tempfile::TempDir, FontConfig) {
        let dir = tempfile::tempdir().expect("create scratch font dir");
        let config = FontConfig::new().with_directory(dir.path());
        (dir, config)
    }

    #[test]
    fn falls_back_when_nothing_is_present() {
        let (_dir, config) = scratch_config();
        let resolved = resolve(&config);

        assert_eq!(
            resolved.setting(),
            &FontSetting::Fallback(BuiltinFamily::Helvetica)
        );
        assert_eq!(resolved.setting().identifier(), "Helvetica");
        assert!(resolved.pair().is_none());
        assert_eq!(resolved.fallback_cause(), Some(UnavailableReason::Missing));
    }

    #[test]
    fn reports_missing_files_by_path() {
        let (dir, config) = scratch_config();
        fs::write(dir.path().join("Arial.ttf"), b"placeholder").expect("write regular");

        assert_eq!(missing_font_files(&config), vec![config.bold_path()]);
        assert!(!custom_fonts_available(&config));
    }

    #[test]
    fn garbage_bytes_are_malformed() {
        let (dir, config) = scratch_config();
        fs::write(dir.path().join("Arial.ttf"), b"definitely not a font").expect("write regular");
        fs::write(dir.path().join("Arial Bold.ttf"), b"nor is this").expect("write bold");

        assert!(custom_fonts_available(&config));
        let err = load_font_pair(&config).unwrap_err();
        assert_eq!(UnavailableReason::of(&err), UnavailableReason::Malformed);
        assert!(err.to_string().contains("Arial.ttf"));

        let resolved = resolve(&config);
        assert!(resolved.setting().is_fallback());
        assert_eq!(resolved.fallback_cause(), Some(UnavailableReason::Malformed));
    }

    #[test]
    fn table_directory_past_end_is_malformed() {
        // sfnt version 1.0 announcing five tables, with no table records following.
        let header = [0u8, 1, 0, 0, 0, 5, 0, 0x40, 0, 2, 0, 0x10];
        assert!(check_font_tables(&header).is_err());

        let (dir, config) = scratch_config();
        fs::write(dir.path().join("Arial.ttf"), header).expect("write regular");
        let err = load_font_pair(&config).unwrap_err();
        assert_eq!(UnavailableReason::of(&err), UnavailableReason::Malformed);
    }

    #[test]
    fn empty_file_is_malformed() {
        let (dir, config) = scratch_config();
        fs::write(dir.path().join("Arial.ttf"), b"").expect("write regular");

        let err = load_font_pair(&config).unwrap_err();
        assert_eq!(UnavailableReason::of(&err), UnavailableReason::Malformed);
    }

    #[test]
    fn configured_fallback_family_is_used() {
        let (_dir, config) = scratch_config();
        let resolved = resolve(&config.with_fallback(BuiltinFamily::Courier));
        assert_eq!(resolved.setting().identifier(), "Courier");
    }

    #[test]
    fn resolution_is_repeatable() {
        let (_dir, config) = scratch_config();
        let first = resolve(&config);
        let second = resolve(&config);
        assert_eq!(first.setting(), second.setting());
    }

    #[test]
    fn prepare_text_depends_on_setting() {
        let custom = FontSetting::Custom {
            family: "Arial".to_owned(),
        };
        let fallback = FontSetting::Fallback(BuiltinFamily::Helvetica);

        assert_eq!(custom.prepare_text("Ağaç işçisi"), "Ağaç işçisi");
        assert_eq!(fallback.prepare_text("Ağaç işçisi"), "Agaç isçisi");
        assert!(matches!(fallback.prepare_text("Report"), Cow::Borrowed(_)));
        assert!(matches!(fallback.prepare_text("Ωμέγα 日本"), Cow::Borrowed(_)));
    }
}
