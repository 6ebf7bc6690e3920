//! UI Theme Module - color palette and style helpers
//!
//! Palette tokens instead of hard-coded colors, plus helpers for the
//! dashboard's recurring states (item kind tags, connectivity, selection).

use std::sync::OnceLock;

use ratatui::style::{Color, Modifier, Style};

use screenwatch_core::model::ItemKind;

/// Color palette tokens for the theme
#[derive(Clone, Debug)]
pub struct Palette {
    /// Panel border color
    pub panel_border: Color,
    /// Primary text color
    pub text: Color,
    /// Dimmed text (labels)
    pub text_dim: Color,
    /// Muted text (placeholders)
    pub text_muted: Color,
    /// Accent color (highlights, focus, card icons)
    pub accent: Color,
    /// Advert tag background
    pub advert_tag: Color,
    /// Playlist tag background
    pub playlist_tag: Color,
    /// Connected indicator
    pub success: Color,
    /// Loading state
    pub warn: Color,
    /// Disconnected indicator, failed loads
    pub error: Color,
    /// Selection background
    pub selection_bg: Color,
    /// Selection foreground
    pub selection_fg: Color,
    /// Key hint text
    pub key_hint: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self::dark()
    }
}

impl Palette {
    /// Dark blue theme
    pub fn dark() -> Self {
        Self {
            panel_border: Color::Rgb(60, 70, 90),
            text: Color::Rgb(212, 212, 212),
            text_dim: Color::Rgb(150, 150, 150),
            text_muted: Color::Rgb(100, 100, 100),
            accent: Color::Rgb(39, 88, 148), // card icon blue
            advert_tag: Color::Rgb(79, 193, 255),
            playlist_tag: Color::Rgb(255, 165, 0), // orange
            success: Color::Rgb(78, 201, 176),
            warn: Color::Rgb(220, 180, 100),
            error: Color::Rgb(244, 135, 113),
            selection_bg: Color::Rgb(38, 79, 120),
            selection_fg: Color::White,
            key_hint: Color::Rgb(206, 145, 120),
        }
    }

    /// High contrast theme variant
    pub fn high_contrast() -> Self {
        Self {
            panel_border: Color::White,
            text: Color::White,
            text_dim: Color::Rgb(200, 200, 200),
            text_muted: Color::Rgb(150, 150, 150),
            accent: Color::Cyan,
            advert_tag: Color::Cyan,
            playlist_tag: Color::Yellow,
            success: Color::Green,
            warn: Color::Yellow,
            error: Color::Red,
            selection_bg: Color::Blue,
            selection_fg: Color::White,
            key_hint: Color::Yellow,
        }
    }
}

/// Theme configuration
#[derive(Clone, Debug, Default)]
pub struct Theme {
    pub palette: Palette,
}

impl Theme {
    pub fn new(palette: Palette) -> Self {
        Self { palette }
    }

    // ========== StyleKit Helper Functions ==========

    /// Label tag for an item kind (`Advert` / `Playlist`)
    pub fn kind_tag_style(&self, kind: ItemKind) -> Style {
        let bg = match kind {
            ItemKind::Advert => self.palette.advert_tag,
            ItemKind::Playlist => self.palette.playlist_tag,
        };
        Style::default()
            .bg(bg)
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for the online/offline indicator
    pub fn connectivity_style(&self, online: bool) -> Style {
        let color = if online {
            self.palette.success
        } else {
            self.palette.error
        };
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    }

    pub fn connectivity_icon(&self, online: bool) -> &'static str {
        if online { "● online" } else { "○ offline" }
    }

    /// Style for key hints in footer
    pub fn key_hint_style(&self) -> Style {
        Style::default().fg(self.palette.key_hint)
    }

    /// Style for subtle borders
    pub fn subtle_border_style(&self) -> Style {
        Style::default().fg(self.palette.panel_border)
    }

    /// Style for focused borders
    pub fn focused_border_style(&self) -> Style {
        Style::default().fg(self.palette.advert_tag)
    }

    /// Style for selected items
    pub fn selection_style(&self) -> Style {
        Style::default()
            .bg(self.palette.selection_bg)
            .fg(self.palette.selection_fg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn text_style(&self) -> Style {
        Style::default().fg(self.palette.text)
    }

    /// Card field labels
    pub fn label_style(&self) -> Style {
        Style::default()
            .fg(self.palette.text_dim)
            .add_modifier(Modifier::BOLD)
    }

    pub fn text_muted_style(&self) -> Style {
        Style::default().fg(self.palette.text_muted)
    }

    pub fn warn_style(&self) -> Style {
        Style::default().fg(self.palette.warn)
    }

    pub fn error_style(&self) -> Style {
        Style::default().fg(self.palette.error)
    }

    pub fn title_style(&self) -> Style {
        Style::default()
            .fg(self.palette.text)
            .add_modifier(Modifier::BOLD)
    }

    /// Card heading icon
    pub fn card_icon_style(&self) -> Style {
        Style::default()
            .bg(Color::White)
            .fg(self.palette.accent)
            .add_modifier(Modifier::BOLD)
    }
}

static ACTIVE_THEME: OnceLock<Theme> = OnceLock::new();

/// Pick the palette once at startup; later calls keep the first choice
pub fn install(high_contrast: bool) {
    let palette = if high_contrast {
        Palette::high_contrast()
    } else {
        Palette::dark()
    };
    let _ = ACTIVE_THEME.set(Theme::new(palette));
}

/// Get the active theme
pub fn theme() -> &'static Theme {
    ACTIVE_THEME.get_or_init(Theme::default)
}

/// Convenience re-exports for common use cases
pub mod styles {
    use super::*;

    pub fn kind_tag(kind: ItemKind) -> Style {
        theme().kind_tag_style(kind)
    }

    pub fn connectivity(online: bool) -> Style {
        theme().connectivity_style(online)
    }

    pub fn connectivity_icon(online: bool) -> &'static str {
        theme().connectivity_icon(online)
    }

    pub fn key_hint() -> Style {
        theme().key_hint_style()
    }

    pub fn border_subtle() -> Style {
        theme().subtle_border_style()
    }

    pub fn border_focused() -> Style {
        theme().focused_border_style()
    }

    pub fn selection() -> Style {
        theme().selection_style()
    }

    pub fn text() -> Style {
        theme().text_style()
    }

    pub fn label() -> Style {
        theme().label_style()
    }

    pub fn text_muted() -> Style {
        theme().text_muted_style()
    }

    pub fn warn() -> Style {
        theme().warn_style()
    }

    pub fn error() -> Style {
        theme().error_style()
    }

    pub fn title() -> Style {
        theme().title_style()
    }

    pub fn card_icon() -> Style {
        theme().card_icon_style()
    }
}
