use serde::{Deserialize, Serialize};

/// Font size applied to every calendar cell, in points.
pub const CALENDAR_FONT_SIZE: u32 = 14;

/// Font size a cell has before any calendar styling touches it.
pub const HOST_DEFAULT_FONT_SIZE: u32 = 11;

/// Background colors. The calendar only ever uses this fixed palette.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Fill {
    #[default]
    White,
    /// Month title band.
    LightBlue,
    /// Day-initial header band.
    Gray,
}

impl Fill {
    /// `#rrggbb` form.
    pub const fn hex(self) -> &'static str {
        match self {
            Self::White => "#ffffff",
            Self::LightBlue => "#e6f2ff",
            Self::Gray => "#f0f0f0",
        }
    }

    /// `AARRGGBB` form used by SpreadsheetML.
    pub const fn argb(self) -> &'static str {
        match self {
            Self::White => "FFFFFFFF",
            Self::LightBlue => "FFE6F2FF",
            Self::Gray => "FFF0F0F0",
        }
    }

    /// Match a color string against the palette.
    ///
    /// Accepts `#rrggbb`, `rrggbb`, `AARRGGBB` and the name `white`.
    pub fn from_color(color: &str) -> Option<Self> {
        let trimmed = color.trim().trim_start_matches('#');
        if trimmed.eq_ignore_ascii_case("white") {
            return Some(Self::White);
        }
        let rgb = match trimmed.len() {
            8 => trimmed.get(2..)?,
            6 => trimmed,
            _ => return None,
        };
        [Self::White, Self::LightBlue, Self::Gray]
            .into_iter()
            .find(|f| f.hex().get(1..).is_some_and(|h| h.eq_ignore_ascii_case(rgb)))
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum HAlign {
    Left,
    Center,
    Right,
}

impl HAlign {
    pub const fn as_xml(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }

    pub fn from_xml(value: &str) -> Option<Self> {
        match value {
            "left" => Some(Self::Left),
            "center" => Some(Self::Center),
            "right" => Some(Self::Right),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum VAlign {
    Top,
    Middle,
    Bottom,
}

impl VAlign {
    /// SpreadsheetML spells middle as "center".
    pub const fn as_xml(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Middle => "center",
            Self::Bottom => "bottom",
        }
    }

    pub fn from_xml(value: &str) -> Option<Self> {
        match value {
            "top" => Some(Self::Top),
            "center" => Some(Self::Middle),
            "bottom" => Some(Self::Bottom),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum BorderStyle {
    #[default]
    None,
    Thin,
}

/// Resolved style of a single cell.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct CellStyle {
    pub bold: bool,
    pub font_size: u32,
    pub fill: Fill,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align_h: Option<HAlign>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align_v: Option<VAlign>,
    pub border: BorderStyle,
}

impl Default for CellStyle {
    fn default() -> Self {
        Self {
            bold: false,
            font_size: HOST_DEFAULT_FONT_SIZE,
            fill: Fill::White,
            align_h: None,
            align_v: None,
            border: BorderStyle::None,
        }
    }
}

impl CellStyle {
    /// Plain white cell at the calendar font size.
    pub const fn blank() -> Self {
        Self {
            bold: false,
            font_size: CALENDAR_FONT_SIZE,
            fill: Fill::White,
            align_h: None,
            align_v: None,
            border: BorderStyle::None,
        }
    }

    #[must_use]
    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    #[must_use]
    pub const fn fill(mut self, fill: Fill) -> Self {
        self.fill = fill;
        self
    }

    #[must_use]
    pub const fn align(mut self, h: Option<HAlign>, v: Option<VAlign>) -> Self {
        self.align_h = h;
        self.align_v = v;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_matches_hex_forms() {
        assert_eq!(Fill::from_color("#E6F2FF"), Some(Fill::LightBlue));
        assert_eq!(Fill::from_color("FFF0F0F0"), Some(Fill::Gray));
        assert_eq!(Fill::from_color("white"), Some(Fill::White));
        assert_eq!(Fill::from_color("#123456"), None);
    }

    #[test]
    fn middle_is_written_as_center() {
        assert_eq!(VAlign::Middle.as_xml(), "center");
        assert_eq!(VAlign::from_xml("center"), Some(VAlign::Middle));
    }
}
