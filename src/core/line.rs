//! Styled subtitle text, one line per supported language.

use egui::Color32;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Languages a dialogue item carries text for.
/// The set is closed: every `LocalizedText` holds exactly one line per variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    English,
    Nederlands,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::English, Language::Nederlands];
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::English => write!(f, "English"),
            Language::Nederlands => write!(f, "Nederlands"),
        }
    }
}

/// A single styled line of subtitle text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Line {
    pub text: String,
    #[serde(with = "hex_color")]
    pub color: Color32,
    pub use_color: bool,
    pub bold: bool,
    pub italic: bool,
    /// Starts a new sentence when segmenting
    pub new_line: bool,
}

impl Default for Line {
    fn default() -> Self {
        Self {
            text: String::new(),
            color: Color32::WHITE,
            use_color: false,
            bold: false,
            italic: false,
            new_line: false,
        }
    }
}

impl Line {
    /// Create an unstyled line
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn colored(mut self, color: Color32) -> Self {
        self.use_color = true;
        self.color = color;
        self
    }

    /// Mark this line as the start of a new sentence
    pub fn starting_sentence(mut self) -> Self {
        self.new_line = true;
        self
    }

    /// Render the line with rich-text markup.
    ///
    /// Bold and italic tags are always applied; the colour tag only when
    /// `use_markup` is set.
    pub fn render(&self, use_markup: bool) -> String {
        let mut text = self.text.clone();
        if self.bold {
            text = format!("<b>{}</b>", text);
        }
        if self.italic {
            text = format!("<i>{}</i>", text);
        }
        if use_markup && self.use_color {
            text = format!("<color=#{}>{}</color>", to_hex_rgba(self.color), text);
        }
        text
    }
}

/// Text for every supported language
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct LocalizedText {
    pub english: Line,
    pub nederlands: Line,
}

impl LocalizedText {
    /// The line for `language`
    pub fn line(&self, language: Language) -> &Line {
        match language {
            Language::English => &self.english,
            Language::Nederlands => &self.nederlands,
        }
    }

    pub fn line_mut(&mut self, language: Language) -> &mut Line {
        match language {
            Language::English => &mut self.english,
            Language::Nederlands => &mut self.nederlands,
        }
    }

    /// Replace the line for `language`
    pub fn with_line(mut self, language: Language, line: Line) -> Self {
        *self.line_mut(language) = line;
        self
    }
}

/// Format a colour as eight uppercase hex digits, `RRGGBBAA`, unmultiplied.
pub fn to_hex_rgba(color: Color32) -> String {
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    format!("{:02X}{:02X}{:02X}{:02X}", r, g, b, a)
}

/// Parse `#RGB`, `#RGBA`, `#RRGGBB` or `#RRGGBBAA` (the `#` is optional).
/// Missing alpha means opaque.
pub fn parse_hex_rgba(s: &str) -> Option<Color32> {
    let hex = s.trim().trim_start_matches('#');
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let expand = |c: u8| -> Option<u8> {
        let v = (c as char).to_digit(16)? as u8;
        Some(v * 17)
    };
    let pair = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();

    let bytes = hex.as_bytes();
    let [r, g, b, a] = match hex.len() {
        3 => [expand(bytes[0])?, expand(bytes[1])?, expand(bytes[2])?, 255],
        4 => [expand(bytes[0])?, expand(bytes[1])?, expand(bytes[2])?, expand(bytes[3])?],
        6 => [pair(0)?, pair(2)?, pair(4)?, 255],
        8 => [pair(0)?, pair(2)?, pair(4)?, pair(6)?],
        _ => return None,
    };
    Some(Color32::from_rgba_unmultiplied(r, g, b, a))
}

/// Serde adapter storing a `Color32` as a `#RRGGBBAA` string
pub mod hex_color {
    use super::{parse_hex_rgba, to_hex_rgba};
    use egui::Color32;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(color: &Color32, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("#{}", to_hex_rgba(*color)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Color32, D::Error> {
        let s = String::deserialize(deserializer)?;
        parse_hex_rgba(&s).ok_or_else(|| de::Error::custom(format!("invalid colour: {}", s)))
    }
}
