//! Header and footer content for paginated output
//!
//! Headers and footers are pure functions of the page number and the
//! settings held by [`HeaderFooterManager`]; no per-page state is stored.

mod numbering;

pub use numbering::{to_letters, to_roman, PageNumberFormat, MAX_ROMAN};

use serde::{Deserialize, Serialize};

/// Horizontal alignment of a line of text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl Alignment {
    /// Keyword used in style strings
    pub fn keyword(&self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
            Alignment::Justify => "justify",
        }
    }

    /// Paragraph style string selecting this alignment
    pub fn paragraph_style(&self) -> String {
        format!("text-align: {};", self.keyword())
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.trim().to_ascii_lowercase().as_str() {
            "left" => Some(Alignment::Left),
            "center" => Some(Alignment::Center),
            "right" => Some(Alignment::Right),
            "justify" => Some(Alignment::Justify),
            _ => None,
        }
    }
}

/// Where the page number is placed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageNumberPosition {
    TopLeft,
    TopCenter,
    TopRight,
    BottomLeft,
    #[default]
    BottomCenter,
    BottomRight,
}

impl PageNumberPosition {
    pub const ALL: [PageNumberPosition; 6] = [
        PageNumberPosition::TopLeft,
        PageNumberPosition::TopCenter,
        PageNumberPosition::TopRight,
        PageNumberPosition::BottomLeft,
        PageNumberPosition::BottomCenter,
        PageNumberPosition::BottomRight,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::TopLeft => "Top Left",
            Self::TopCenter => "Top Center",
            Self::TopRight => "Top Right",
            Self::BottomLeft => "Bottom Left",
            Self::BottomCenter => "Bottom Center",
            Self::BottomRight => "Bottom Right",
        }
    }

    /// True for the three top-row positions
    pub fn is_in_header(&self) -> bool {
        matches!(self, Self::TopLeft | Self::TopCenter | Self::TopRight)
    }

    /// True for the three bottom-row positions
    pub fn is_in_footer(&self) -> bool {
        !self.is_in_header()
    }

    /// Alignment a renderer should use for the number's line.
    ///
    /// Composition of the header/footer string ignores it.
    pub fn alignment(&self) -> Alignment {
        match self {
            Self::TopLeft | Self::BottomLeft => Alignment::Left,
            Self::TopCenter | Self::BottomCenter => Alignment::Center,
            Self::TopRight | Self::BottomRight => Alignment::Right,
        }
    }
}

/// Header/footer settings for a whole document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HeaderFooterManager {
    default_header: String,
    default_footer: String,
    first_page_header: String,
    first_page_footer: String,
    different_first_page: bool,
    show_page_numbers: bool,
    page_number_position: PageNumberPosition,
    page_number_format: PageNumberFormat,
}

impl HeaderFooterManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the default or first-page header
    pub fn set_header(&mut self, text: impl Into<String>, is_first_page: bool) {
        if is_first_page {
            self.first_page_header = text.into();
        } else {
            self.default_header = text.into();
        }
    }

    /// Overwrite the default or first-page footer
    pub fn set_footer(&mut self, text: impl Into<String>, is_first_page: bool) {
        if is_first_page {
            self.first_page_footer = text.into();
        } else {
            self.default_footer = text.into();
        }
    }

    /// Header text for a page, without the page number
    pub fn header_for_page(&self, page_number: i64) -> &str {
        if self.different_first_page && page_number == 1 {
            &self.first_page_header
        } else {
            &self.default_header
        }
    }

    /// Footer text for a page, without the page number
    pub fn footer_for_page(&self, page_number: i64) -> &str {
        if self.different_first_page && page_number == 1 {
            &self.first_page_footer
        } else {
            &self.default_footer
        }
    }

    /// Header text with the page number composed in when it belongs on top
    pub fn complete_header_for_page(&self, page_number: i64) -> String {
        let header = self.header_for_page(page_number);
        if self.show_page_numbers && self.page_number_position.is_in_header() {
            self.compose(header, page_number)
        } else {
            header.to_string()
        }
    }

    /// Footer text with the page number composed in when it belongs at the bottom
    pub fn complete_footer_for_page(&self, page_number: i64) -> String {
        let footer = self.footer_for_page(page_number);
        if self.show_page_numbers && self.page_number_position.is_in_footer() {
            self.compose(footer, page_number)
        } else {
            footer.to_string()
        }
    }

    // Left/center/right never changes the string; the number is appended.
    fn compose(&self, content: &str, page_number: i64) -> String {
        let number = self.page_number_format.format(page_number);
        if content.trim().is_empty() {
            number
        } else {
            format!("{} {}", content, number)
        }
    }

    /// Reset content and flags. Numbering format and position are kept.
    pub fn clear(&mut self) {
        self.default_header.clear();
        self.default_footer.clear();
        self.first_page_header.clear();
        self.first_page_footer.clear();
        self.different_first_page = false;
        self.show_page_numbers = false;
    }

    pub fn is_different_first_page(&self) -> bool {
        self.different_first_page
    }

    pub fn set_different_first_page(&mut self, different: bool) {
        self.different_first_page = different;
    }

    pub fn is_show_page_numbers(&self) -> bool {
        self.show_page_numbers
    }

    pub fn set_show_page_numbers(&mut self, show: bool) {
        self.show_page_numbers = show;
    }

    pub fn page_number_position(&self) -> PageNumberPosition {
        self.page_number_position
    }

    pub fn set_page_number_position(&mut self, position: PageNumberPosition) {
        self.page_number_position = position;
    }

    pub fn page_number_format(&self) -> PageNumberFormat {
        self.page_number_format
    }

    pub fn set_page_number_format(&mut self, format: PageNumberFormat) {
        self.page_number_format = format;
    }

    pub fn default_header(&self) -> &str {
        &self.default_header
    }

    pub fn default_footer(&self) -> &str {
        &self.default_footer
    }

    pub fn first_page_header(&self) -> &str {
        &self.first_page_header
    }

    pub fn first_page_footer(&self) -> &str {
        &self.first_page_footer
    }
}
