//! Theme System for the inspector.
//!
//! Two fixed palettes, light and dark. Node boxes alternate between two
//! accent backgrounds by depth, so siblings share a colour and every child
//! row contrasts with its parent:
//!
//! ```text
//! depth 0  Primary    (accent_background)
//! depth 1  Alternate  (accent_background_alt)
//! depth 2  Primary
//! ```
//!
//! # Example
//!
//! ```ignore
//! use composition_inspector::theme::{ColorScheme, ColorVariant, Palette};
//!
//! let palette = Palette::for_scheme(ColorScheme::Dark);
//! let bg = palette.node_background(ColorVariant::Primary);
//! ```

use crate::types::Rgba;

/// Light or dark terminal background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorScheme {
    #[default]
    Light,
    Dark,
}

/// Node colour variant. Strictly alternates by depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorVariant {
    Primary,
    Alternate,
}

impl ColorVariant {
    /// The variant used by this variant's children.
    pub fn other(self) -> Self {
        match self {
            Self::Primary => Self::Alternate,
            Self::Alternate => Self::Primary,
        }
    }
}

/// Resolved colours for one scheme.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub text: Rgba,
    pub background: Rgba,
    pub tint: Rgba,
    pub accent_background: Rgba,
    pub accent_background_alt: Rgba,
    /// Status line and inline load errors.
    pub error: Rgba,
}

fn hex(code: &str) -> Rgba {
    Rgba::from_hex(code).unwrap_or(Rgba::TERMINAL_DEFAULT)
}

impl Palette {
    pub fn light() -> Self {
        Self {
            text: hex("#333"),
            background: hex("#fff"),
            tint: hex("#555"),
            accent_background: hex("#eee"),
            accent_background_alt: hex("#ddd"),
            error: hex("#b00020"),
        }
    }

    pub fn dark() -> Self {
        Self {
            text: hex("#ccc"),
            background: hex("#000"),
            tint: hex("#aaa"),
            accent_background: hex("#222"),
            accent_background_alt: hex("#333"),
            error: hex("#ff6e6e"),
        }
    }

    pub fn for_scheme(scheme: ColorScheme) -> Self {
        match scheme {
            ColorScheme::Light => Self::light(),
            ColorScheme::Dark => Self::dark(),
        }
    }

    /// Box background for a node of the given variant.
    pub fn node_background(&self, variant: ColorVariant) -> Rgba {
        match variant {
            ColorVariant::Primary => self.accent_background,
            ColorVariant::Alternate => self.accent_background_alt,
        }
    }
}
