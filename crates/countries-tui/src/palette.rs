use countries_core::Theme;
use ratatui::style::{Color, Modifier, Style};

/// Colors every widget is drawn with; one per [`Theme`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub fg: Color,
    pub bg: Color,
    pub surface: Color,
    pub dim: Color,
    pub accent: Color,
    pub selection: Color,
    pub error: Color,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self {
                fg: Color::Rgb(17, 21, 23),
                bg: Color::Rgb(250, 250, 250),
                surface: Color::Rgb(255, 255, 255),
                dim: Color::Rgb(110, 110, 110),
                accent: Color::Rgb(33, 102, 172),
                selection: Color::Rgb(222, 230, 240),
                error: Color::Rgb(190, 30, 45),
            },
            Theme::Dark => Self {
                fg: Color::Rgb(255, 255, 255),
                bg: Color::Rgb(32, 44, 55),
                surface: Color::Rgb(43, 57, 69),
                dim: Color::Rgb(160, 170, 180),
                accent: Color::Rgb(240, 200, 90),
                selection: Color::Rgb(60, 78, 94),
                error: Color::Rgb(255, 110, 110),
            },
        }
    }

    pub fn base(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    pub fn card(&self) -> Style {
        Style::default().fg(self.fg).bg(self.surface)
    }

    pub fn label(&self) -> Style {
        Style::default().fg(self.fg).add_modifier(Modifier::BOLD)
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(self.dim)
    }

    pub fn highlight(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .bg(self.selection)
            .add_modifier(Modifier::BOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_themes_differ() {
        let light = Palette::for_theme(Theme::Light);
        let dark = Palette::for_theme(Theme::Dark);
        assert_ne!(light.bg, dark.bg);
        assert_ne!(light.fg, dark.fg);
    }
}
