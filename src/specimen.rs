//! One-page font specimen used to check which font a report will be rendered with.

use std::fs;
use std::io::{self, BufWriter};
use std::path::Path;

use genpdf::error::{Context as _, Error};
use printpdf::{Mm, PdfDocument, PdfLayerReference};

use crate::fonts::ResolvedFonts;
use crate::registry::{self, DocumentFonts};

/// Turkish pangram; it contains every letter of the Turkish alphabet.
pub const DEFAULT_SAMPLE_TEXT: &str = "Pijamalı hasta yağız şoföre çabucak güvendi.";

const TURKISH_UPPERCASE: &str = "ABCÇDEFGĞHIİJKLMNOÖPRSŞTUÜVYZ";
const TURKISH_LOWERCASE: &str = "abcçdefgğhıijklmnoöprsştuüvyz";

const PAGE_WIDTH_MM: f64 = 210.0;
const PAGE_HEIGHT_MM: f64 = 297.0;
const LEFT_MARGIN_MM: f64 = 20.0;
const TOP_MARGIN_MM: f64 = 25.0;
const LINE_SPACING: f64 = 1.6;
const PT_TO_MM: f64 = 25.4 / 72.0;

/// Content and sizing of the specimen page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpecimenOptions {
    title: String,
    sample_text: String,
    font_size: u8,
}

impl Default for SpecimenOptions {
    fn default() -> Self {
        Self {
            title: "Font specimen".to_owned(),
            sample_text: DEFAULT_SAMPLE_TEXT.to_owned(),
            font_size: 14,
        }
    }
}

impl SpecimenOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn sample_text(&self) -> &str {
        &self.sample_text
    }

    pub fn font_size(&self) -> u8 {
        self.font_size
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_sample_text(mut self, text: impl Into<String>) -> Self {
        self.sample_text = text.into();
        self
    }

    /// Sets the body font size in points. The title is set six points larger.
    pub fn with_font_size(mut self, font_size: u8) -> Self {
        self.font_size = font_size.max(1);
        self
    }
}

struct PageCursor<'a> {
    layer: PdfLayerReference,
    fonts: &'a DocumentFonts,
    y: f64,
}

impl PageCursor<'_> {
    fn line(&mut self, text: &str, size: u8, bold: bool) {
        let font = if bold {
            self.fonts.bold()
        } else {
            self.fonts.regular()
        };
        let text = self.fonts.setting().prepare_text(text).into_owned();
        self.y -= f64::from(size) * PT_TO_MM * LINE_SPACING;
        self.layer
            .use_text(text, size.into(), Mm(LEFT_MARGIN_MM), Mm(self.y), font);
    }

    fn gap(&mut self, size: u8) {
        self.y -= f64::from(size) * PT_TO_MM;
    }
}

/// Renders the specimen page for `resolved` and returns the PDF bytes.
pub fn render(resolved: &ResolvedFonts, options: &SpecimenOptions) -> Result<Vec<u8>, Error> {
    let (document, page, layer) = PdfDocument::new(
        options.title.clone(),
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Specimen".to_owned(),
    );
    let fonts = registry::install(resolved, &document)?;
    let setting = fonts.setting().clone();

    let body = options.font_size;
    let heading = body.saturating_add(6);
    let mut cursor = PageCursor {
        layer: document.get_page(page).get_layer(layer),
        fonts: &fonts,
        y: PAGE_HEIGHT_MM - TOP_MARGIN_MM,
    };

    cursor.line(&options.title, heading, true);
    cursor.gap(body);
    cursor.line(&format!("Active font: {}", setting.identifier()), body, false);
    if resolved.is_custom() {
        cursor.line("Fallback: no", body, false);
    } else {
        if let Some(cause) = resolved.fallback_cause() {
            cursor.line(&format!("Fallback: yes ({})", cause), body, false);
        }
        if let Some(reason) = resolved.fallback_reason() {
            cursor.line(&reason.to_string(), body.saturating_sub(4).max(6), false);
        }
    }
    cursor.gap(body);
    cursor.line("Regular", body, true);
    cursor.line(&options.sample_text, body, false);
    cursor.line(TURKISH_UPPERCASE, body, false);
    cursor.line(TURKISH_LOWERCASE, body, false);
    cursor.gap(body);
    cursor.line("Bold", body, true);
    cursor.line(&options.sample_text, body, true);
    cursor.line(TURKISH_UPPERCASE, body, true);
    cursor.line(TURKISH_LOWERCASE, body, true);

    let mut bytes = Vec::new();
    {
        let mut writer = BufWriter::new(&mut bytes);
        document.save(&mut writer).map_err(|err| {
            Error::new(
                format!("Failed to serialize font specimen: {}", err),
                io::Error::new(io::ErrorKind::Other, err.to_string()),
            )
        })?;
    }
    Ok(bytes)
}

/// Renders the specimen page and writes it to `path`.
pub fn write(
    resolved: &ResolvedFonts,
    options: &SpecimenOptions,
    path: impl AsRef<Path>,
) -> Result<(), Error> {
    let path = path.as_ref();
    let bytes = render(resolved, options)?;
    fs::write(path, bytes)
        .with_context(|| format!("Failed to write font specimen to {}", path.display()))
}
