#![forbid(unsafe_code)]

//! Cell content and formatting values.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The content of a single cell.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum CellValue {
    #[default]
    Empty,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl CellValue {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    #[must_use]
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<i32> for CellValue {
    fn from(v: i32) -> Self {
        Self::Number(f64::from(v))
    }
}

impl From<bool> for CellValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for CellValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for CellValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Bool(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

/// An RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rgb(pub u8, pub u8, pub u8);

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum HorizontalAlign {
    Left,
    Center,
    Right,
}

/// Cell formatting. Every field is optional; `None` means "not set".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CellStyle {
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub underline: Option<bool>,
    pub font_color: Option<Rgb>,
    pub fill_color: Option<Rgb>,
    pub number_format: Option<String>,
    pub align: Option<HorizontalAlign>,
}

impl CellStyle {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Overlay every field set in `other` onto `self`.
    #[must_use]
    pub fn merge(&self, other: &CellStyle) -> CellStyle {
        CellStyle {
            bold: other.bold.or(self.bold),
            italic: other.italic.or(self.italic),
            underline: other.underline.or(self.underline),
            font_color: other.font_color.or(self.font_color),
            fill_color: other.fill_color.or(self.fill_color),
            number_format: other
                .number_format
                .clone()
                .or_else(|| self.number_format.clone()),
            align: other.align.or(self.align),
        }
    }

    /// Short summary of the fields this style sets, e.g. `bold, fill #ffee00`.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if let Some(b) = self.bold {
            parts.push(if b { "bold".to_string() } else { "not bold".to_string() });
        }
        if let Some(i) = self.italic {
            parts.push(if i { "italic".to_string() } else { "not italic".to_string() });
        }
        if let Some(u) = self.underline {
            parts.push(if u { "underline".to_string() } else { "no underline".to_string() });
        }
        if let Some(c) = self.font_color {
            parts.push(format!("font {c}"));
        }
        if let Some(c) = self.fill_color {
            parts.push(format!("fill {c}"));
        }
        if let Some(fmt) = &self.number_format {
            parts.push(format!("format '{fmt}'"));
        }
        if let Some(a) = self.align {
            parts.push(format!("align {a:?}").to_lowercase());
        }
        if parts.is_empty() {
            "no formatting".to_string()
        } else {
            parts.join(", ")
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BorderLine {
    #[default]
    Thin,
    Medium,
    Thick,
    Dashed,
    Dotted,
    Double,
    /// Removes the border on the selected edges.
    None,
}

/// Which edges of a range a border applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BorderEdges {
    #[default]
    All,
    Outer,
    Inner,
    Top,
    Bottom,
    Left,
    Right,
}

/// A border request: line style, color, and the edges to apply it to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BorderSpec {
    pub style: BorderLine,
    pub color: Option<Rgb>,
    pub edges: BorderEdges,
}

/// Per-cell border state as stored in snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CellBorders {
    pub top: Option<(BorderLine, Option<Rgb>)>,
    pub bottom: Option<(BorderLine, Option<Rgb>)>,
    pub left: Option<(BorderLine, Option<Rgb>)>,
    pub right: Option<(BorderLine, Option<Rgb>)>,
}

impl CellBorders {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MergeDirection {
    /// Merge the whole range into one cell.
    #[default]
    All,
    /// Merge each row of the range separately.
    Horizontal,
    /// Merge each column of the range separately.
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ClearMode {
    /// Remove values, keep formatting.
    #[default]
    Content,
    /// Remove formatting and borders, keep values.
    Format,
}
