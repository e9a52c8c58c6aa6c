use ratatui::style::{Color, Modifier, Style};

use crate::models::ThemeMode;

pub struct Theme {
    pub mode: ThemeMode,
    pub root_bg: Color,
    pub focus_border: Color,
    pub blurred_border: Color,
    pub text: Color,
    pub text_secondary: Color,
    pub text_highlight: Color,
    pub selection_bg: Color,
    pub selection_fg: Color,

    // Editor chrome, code colours come from syntect
    pub line_number: Style,

    // Rendered markdown
    pub heading: Style,
    pub inline_code: Style,
    pub code_block: Style,
    pub quote: Style,
    pub bullet: Style,

    pub button: Style,
    pub button_disabled: Style,
    pub confirmation: Style,
    pub footer: Style,
    pub popup_title: Style,
    pub popup_border: Style,
}

impl Theme {
    pub fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Dark => Self::dark(),
            ThemeMode::Light => Self::light(),
        }
    }

    fn dark() -> Self {
        Self {
            mode: ThemeMode::Dark,
            root_bg: Color::Black,
            focus_border: Color::Cyan,
            blurred_border: Color::DarkGray,
            text: Color::White,
            text_secondary: Color::Gray,
            text_highlight: Color::Yellow,
            selection_bg: Color::DarkGray,
            selection_fg: Color::Yellow,

            line_number: Style::default().fg(Color::DarkGray),

            heading: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            inline_code: Style::default().fg(Color::Yellow).bg(Color::Rgb(30, 30, 30)),
            code_block: Style::default().fg(Color::LightGreen).bg(Color::Rgb(30, 30, 30)),
            quote: Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
            bullet: Style::default().fg(Color::Cyan),

            button: Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD),
            button_disabled: Style::default().fg(Color::Gray).bg(Color::DarkGray),
            confirmation: Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            footer: Style::default().fg(Color::Gray).add_modifier(Modifier::DIM),
            popup_title: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            popup_border: Style::default().fg(Color::Magenta).bg(Color::Black),
        }
    }

    fn light() -> Self {
        Self {
            mode: ThemeMode::Light,
            root_bg: Color::White,
            focus_border: Color::Blue,
            blurred_border: Color::Gray,
            text: Color::Black,
            text_secondary: Color::DarkGray,
            text_highlight: Color::Blue,
            selection_bg: Color::Rgb(220, 220, 235),
            selection_fg: Color::Blue,

            line_number: Style::default().fg(Color::Gray),

            heading: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            inline_code: Style::default().fg(Color::Rgb(163, 21, 21)).bg(Color::Rgb(238, 238, 238)),
            code_block: Style::default().fg(Color::Black).bg(Color::Rgb(238, 238, 238)),
            quote: Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
            bullet: Style::default().fg(Color::Blue),

            button: Style::default().fg(Color::White).bg(Color::Blue).add_modifier(Modifier::BOLD),
            button_disabled: Style::default().fg(Color::DarkGray).bg(Color::Gray),
            confirmation: Style::default().fg(Color::Rgb(0, 128, 0)).add_modifier(Modifier::BOLD),
            footer: Style::default().fg(Color::DarkGray),
            popup_title: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            popup_border: Style::default().fg(Color::Blue).bg(Color::White),
        }
    }

    pub fn root(&self) -> Style {
        Style::default().bg(self.root_bg).fg(self.text)
    }

    pub fn border(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.focus_border).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.blurred_border)
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::for_mode(ThemeMode::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_follows_mode() {
        let light = Theme::default();
        assert_eq!(light.mode, ThemeMode::Light);
        assert_eq!(light.root_bg, Color::White);

        let dark = Theme::for_mode(light.mode.toggled());
        assert_eq!(dark.root_bg, Color::Black);
        assert_eq!(Theme::for_mode(dark.mode.toggled()).root_bg, light.root_bg);
    }
}
