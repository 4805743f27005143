//! Built-in PDF font families used when the custom fonts are unavailable.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use printpdf::BuiltinFont;

/// One of the base-14 PDF families. Every PDF viewer provides these, so they need no font files.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BuiltinFamily {
    #[default]
    Helvetica,
    Times,
    Courier,
}

impl BuiltinFamily {
    /// PostScript name of the regular weight, used as the fallback identifier.
    pub fn identifier(self) -> &'static str {
        match self {
            BuiltinFamily::Helvetica => "Helvetica",
            BuiltinFamily::Times => "Times-Roman",
            BuiltinFamily::Courier => "Courier",
        }
    }

    pub fn regular(self) -> BuiltinFont {
        match self {
            BuiltinFamily::Helvetica => BuiltinFont::Helvetica,
            BuiltinFamily::Times => BuiltinFont::TimesRoman,
            BuiltinFamily::Courier => BuiltinFont::Courier,
        }
    }

    pub fn bold(self) -> BuiltinFont {
        match self {
            BuiltinFamily::Helvetica => BuiltinFont::HelveticaBold,
            BuiltinFamily::Times => BuiltinFont::TimesBold,
            BuiltinFamily::Courier => BuiltinFont::CourierBold,
        }
    }
}

impl fmt::Display for BuiltinFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

/// Error returned when parsing an unknown built-in family name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownBuiltinFamily(String);

impl fmt::Display for UnknownBuiltinFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown built-in font family '{}' (expected helvetica, times or courier)",
            self.0
        )
    }
}

impl std::error::Error for UnknownBuiltinFamily {}

impl FromStr for BuiltinFamily {
    type Err = UnknownBuiltinFamily;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "helvetica" => Ok(BuiltinFamily::Helvetica),
            "times" | "times-roman" => Ok(BuiltinFamily::Times),
            "courier" => Ok(BuiltinFamily::Courier),
            _ => Err(UnknownBuiltinFamily(value.to_owned())),
        }
    }
}

/// Maps the Turkish letters missing from the WinAnsi encoding onto their closest ASCII letter.
///
/// The remaining Turkish letters (ç, ö, ü and their capitals) are part of WinAnsi and are kept.
pub(crate) fn fold_to_winansi(text: &str) -> Cow<'_, str> {
    if !text.chars().any(|c| winansi_replacement(c).is_some()) {
        return Cow::Borrowed(text);
    }

    Cow::Owned(
        text.chars()
            .map(|c| winansi_replacement(c).unwrap_or(c))
            .collect(),
    )
}

fn winansi_replacement(c: char) -> Option<char> {
    match c {
        'ğ' => Some('g'),
        'Ğ' => Some('G'),
        'ı' => Some('i'),
        'İ' => Some('I'),
        'ş' => Some('s'),
        'Ş' => Some('S'),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_names_case_insensitively() {
        assert_eq!("Helvetica".parse(), Ok(BuiltinFamily::Helvetica));
        assert_eq!(" TIMES ".parse(), Ok(BuiltinFamily::Times));
        assert_eq!("times-roman".parse(), Ok(BuiltinFamily::Times));
        assert_eq!("courier".parse(), Ok(BuiltinFamily::Courier));
    }

    #[test]
    fn rejects_unknown_names() {
        let err = "Comic Sans".parse::<BuiltinFamily>().unwrap_err();
        assert!(err.to_string().contains("Comic Sans"));
    }

    #[test]
    fn weights_match_family() {
        assert!(matches!(
            BuiltinFamily::Times.bold(),
            BuiltinFont::TimesBold
        ));
        assert!(matches!(
            BuiltinFamily::Courier.regular(),
            BuiltinFont::Courier
        ));
        assert_eq!(BuiltinFamily::default().identifier(), "Helvetica");
    }

    #[test]
    fn folds_only_letters_outside_winansi() {
        assert_eq!(
            fold_to_winansi("Işık, Ğ ve Ş; çöü kalır"),
            "Isik, G ve S; çöü kalir"
        );
        assert!(matches!(fold_to_winansi("çöü ÇÖÜ"), Cow::Borrowed(_)));
    }
}
