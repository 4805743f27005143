//! Installs the resolved report fonts into a `printpdf` document.

use std::fmt::Display;
use std::io;

use genpdf::error::Error;
use printpdf::{IndirectFontRef, PdfDocumentReference};

use crate::fonts::{FontSetting, ResolvedFonts};

/// Regular and bold font handles registered with a single document.
pub struct DocumentFonts {
    setting: FontSetting,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

impl DocumentFonts {
    /// The setting these handles were installed from.
    pub fn setting(&self) -> &FontSetting {
        &self.setting
    }

    pub fn regular(&self) -> &IndirectFontRef {
        &self.regular
    }

    pub fn bold(&self) -> &IndirectFontRef {
        &self.bold
    }
}

fn pdf_error(message: String, err: impl Display) -> Error {
    Error::new(
        format!("{}: {}", message, err),
        io::Error::new(io::ErrorKind::Other, err.to_string()),
    )
}

/// Registers the active fonts with `document`.
///
/// A custom pair is embedded from its raw font programs; a fallback only references the built-in
/// regular and bold faces.
pub fn install(
    resolved: &ResolvedFonts,
    document: &PdfDocumentReference,
) -> Result<DocumentFonts, Error> {
    let setting = resolved.setting().clone();

    let (regular, bold) = match (resolved.pair(), &setting) {
        (Some(pair), _) => {
            let regular = document
                .add_external_font(pair.regular().bytes())
                .map_err(|err| {
                    pdf_error(
                        format!("Failed to embed {}", pair.regular().path().display()),
                        err,
                    )
                })?;
            let bold = document.add_external_font(pair.bold().bytes()).map_err(|err| {
                pdf_error(
                    format!("Failed to embed {}", pair.bold().path().display()),
                    err,
                )
            })?;
            (regular, bold)
        }
        (None, FontSetting::Fallback(builtin)) => {
            let regular = document.add_builtin_font(builtin.regular()).map_err(|err| {
                pdf_error(
                    format!("Failed to register built-in '{}'", builtin.identifier()),
                    err,
                )
            })?;
            let bold = document.add_builtin_font(builtin.bold()).map_err(|err| {
                pdf_error(
                    format!("Failed to register built-in bold '{}'", builtin.identifier()),
                    err,
                )
            })?;
            (regular, bold)
        }
        (None, FontSetting::Custom { family }) => {
            return Err(Error::new(
                format!("Custom font family '{}' has no loaded font files", family),
                io::Error::new(io::ErrorKind::NotFound, "custom font pair missing"),
            ))
        }
    };

    Ok(DocumentFonts {
        setting,
        regular,
        bold,
    })
}

#[cfg(test)]
mod tests {
    use printpdf::{Mm, PdfDocument};

    use super::*;
    use crate::config::FontConfig;
    use crate::fonts;

    #[test]
    fn fallback_installs_builtin_faces() {
        let dir = tempfile::tempdir().expect("create scratch font dir");
        let resolved = fonts::resolve(&FontConfig::new().with_directory(dir.path()));
        let (document, _, _) = PdfDocument::new("fonts", Mm(210.0), Mm(297.0), "Layer 1");

        let installed = install(&resolved, &document).expect("install built-in fonts");
        assert!(installed.setting().is_fallback());
        assert_eq!(installed.setting().identifier(), "Helvetica");
    }
}
