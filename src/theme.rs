use ratatui::style::{Color, Modifier, Style};
use std::str::FromStr;

/// Styles for the two bar charts.
#[derive(Clone, Copy)]
pub struct ChartStyle {
    /// Bars of the category chart.
    pub category_bar: Color,
    pub easy: Color,
    pub medium: Color,
    pub hard: Color,
    /// Value text drawn inside bars.
    pub value: Style,
}

impl ChartStyle {
    /// Bar color for a difficulty key; unknown keys fall back to the category color.
    pub fn difficulty_color(&self, difficulty: &str) -> Color {
        match difficulty {
            "easy" => self.easy,
            "medium" => self.medium,
            "hard" => self.hard,
            _ => self.category_bar,
        }
    }
}

/// Styles for answer lines once the correct answer is revealed.
#[derive(Clone, Copy)]
pub struct AnswerStyle {
    pub correct: Style,
    pub incorrect: Style,
}

/// Complete theme configuration for ratatui
#[derive(Clone)]
pub struct ThemeConfig {
    pub list_normal: Style,
    pub list_selected: Style,
    pub border: Style,
    pub border_selected: Style,
    pub title: Style,
    pub text: Style,
    pub header: Style,
    pub chart: ChartStyle,
    pub answer: AnswerStyle,
}

/// Named themes selectable from the command line or config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Dracula,
    Solarized,
    Gruvbox,
    EverforestLight,
}

impl Theme {
    pub fn config(self) -> ThemeConfig {
        match self {
            Theme::Dracula => dracula_theme(),
            Theme::Solarized => solarized_dark(),
            Theme::Gruvbox => gruvbox_theme(),
            Theme::EverforestLight => everforest_light_theme(),
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dracula" => Ok(Theme::Dracula),
            "solarized" | "solarized_dark" => Ok(Theme::Solarized),
            "gruvbox" => Ok(Theme::Gruvbox),
            "everforest_light" | "everforest" => Ok(Theme::EverforestLight),
            other => Err(format!(
                "Unknown theme '{}'. Available: dracula, solarized, gruvbox, everforest_light",
                other
            )),
        }
    }
}

// The original survey page drew category bars in #8884d8.
const SURVEY_PURPLE: Color = Color::Rgb(136, 132, 216);

fn answer_style(green: Color, red: Color) -> AnswerStyle {
    AnswerStyle {
        correct: Style::default().fg(green).add_modifier(Modifier::BOLD),
        incorrect: Style::default().fg(red).add_modifier(Modifier::CROSSED_OUT),
    }
}

/// Returns a ThemeConfig based on the Solarized Dark color palette.
pub fn solarized_dark() -> ThemeConfig {
    // Solarized Dark palette
    let base03 = Color::Rgb(0, 43, 54);
    let base02 = Color::Rgb(7, 54, 66);
    let base01 = Color::Rgb(88, 110, 117);
    let base0 = Color::Rgb(131, 148, 150);
    let base3 = Color::Rgb(253, 246, 227);
    let yellow = Color::Rgb(181, 137, 0);
    let red = Color::Rgb(220, 50, 47);
    let blue = Color::Rgb(38, 139, 210);
    let green = Color::Rgb(133, 153, 0);

    ThemeConfig {
        list_normal: Style::default().fg(base0).bg(base02),
        list_selected: Style::default()
            .fg(base3)
            .bg(blue)
            .add_modifier(Modifier::BOLD),
        border: Style::default().fg(base01),
        border_selected: Style::default().fg(blue),
        title: Style::default().fg(blue).add_modifier(Modifier::BOLD),
        text: Style::default().fg(base0).bg(base02),
        header: Style::default()
            .fg(base3)
            .bg(base03)
            .add_modifier(Modifier::BOLD),
        chart: ChartStyle {
            category_bar: SURVEY_PURPLE,
            easy: green,
            medium: yellow,
            hard: red,
            value: Style::default().fg(base03).add_modifier(Modifier::BOLD),
        },
        answer: answer_style(green, red),
    }
}

/// Returns a ThemeConfig based on the Dracula color palette.
pub fn dracula_theme() -> ThemeConfig {
    // Dracula palette
    let bg = Color::Rgb(40, 42, 54);
    let selection = Color::Rgb(68, 71, 90);
    let fg = Color::Rgb(248, 248, 242);
    let comment = Color::Rgb(98, 114, 164);
    let purple = Color::Rgb(189, 147, 249);
    let yellow = Color::Rgb(241, 250, 140);
    let green = Color::Rgb(80, 250, 123);
    let red = Color::Rgb(255, 85, 85);

    ThemeConfig {
        list_normal: Style::default().fg(fg).bg(bg),
        list_selected: Style::default()
            .fg(fg)
            .bg(selection)
            .add_modifier(Modifier::BOLD),
        border: Style::default().fg(comment),
        border_selected: Style::default().fg(purple),
        title: Style::default().fg(purple).add_modifier(Modifier::BOLD),
        text: Style::default().fg(fg).bg(bg),
        header: Style::default()
            .fg(fg)
            .bg(selection)
            .add_modifier(Modifier::BOLD),
        chart: ChartStyle {
            category_bar: SURVEY_PURPLE,
            easy: green,
            medium: yellow,
            hard: red,
            value: Style::default().fg(bg).add_modifier(Modifier::BOLD),
        },
        answer: answer_style(green, red),
    }
}

/// Returns a ThemeConfig based on the Gruvbox Dark color palette.
pub fn gruvbox_theme() -> ThemeConfig {
    // Gruvbox Dark palette
    let bg0 = Color::Rgb(40, 40, 40);
    let bg1 = Color::Rgb(60, 56, 54);
    let fg1 = Color::Rgb(235, 219, 178);
    let gray = Color::Rgb(146, 131, 116);
    let green = Color::Rgb(152, 151, 26);
    let yellow = Color::Rgb(215, 153, 33);
    let red = Color::Rgb(204, 36, 29);
    let orange = Color::Rgb(214, 93, 14);

    ThemeConfig {
        list_normal: Style::default().fg(fg1).bg(bg0),
        list_selected: Style::default()
            .fg(bg0)
            .bg(fg1)
            .add_modifier(Modifier::BOLD),
        border: Style::default().fg(gray),
        border_selected: Style::default().fg(orange),
        title: Style::default().fg(orange).add_modifier(Modifier::BOLD),
        text: Style::default().fg(fg1).bg(bg0),
        header: Style::default().fg(fg1).bg(bg1).add_modifier(Modifier::BOLD),
        chart: ChartStyle {
            category_bar: SURVEY_PURPLE,
            easy: green,
            medium: yellow,
            hard: red,
            value: Style::default().fg(bg0).add_modifier(Modifier::BOLD),
        },
        answer: answer_style(green, red),
    }
}

/// Returns a ThemeConfig based on the Everforest Light color palette.
pub fn everforest_light_theme() -> ThemeConfig {
    // Everforest Light palette
    let bg = Color::Rgb(253, 246, 227);
    let bg_view = Color::Rgb(243, 234, 211);
    let fg = Color::Rgb(92, 106, 114);
    let gray = Color::Rgb(147, 159, 149);
    let yellow = Color::Rgb(223, 160, 0);
    let green = Color::Rgb(141, 161, 1);
    let red = Color::Rgb(248, 85, 82);

    ThemeConfig {
        list_normal: Style::default().fg(fg).bg(bg_view),
        list_selected: Style::default()
            .fg(bg)
            .bg(gray)
            .add_modifier(Modifier::BOLD),
        border: Style::default().fg(gray),
        border_selected: Style::default().fg(yellow),
        title: Style::default().fg(yellow).add_modifier(Modifier::BOLD),
        text: Style::default().fg(fg).bg(bg_view),
        header: Style::default().fg(bg).bg(fg).add_modifier(Modifier::BOLD),
        chart: ChartStyle {
            category_bar: SURVEY_PURPLE,
            easy: green,
            medium: yellow,
            hard: red,
            value: Style::default().fg(bg).add_modifier(Modifier::BOLD),
        },
        answer: answer_style(green, red),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_from_str() {
        assert_eq!(Theme::from_str("dracula"), Ok(Theme::Dracula));
        assert_eq!(Theme::from_str("Gruvbox"), Ok(Theme::Gruvbox));
        assert_eq!(Theme::from_str("everforest"), Ok(Theme::EverforestLight));
        assert!(Theme::from_str("neon").is_err());
    }

    #[test]
    fn test_difficulty_colors_follow_traffic_light() {
        let chart = Theme::Dracula.config().chart;
        assert_eq!(chart.difficulty_color("easy"), chart.easy);
        assert_eq!(chart.difficulty_color("medium"), chart.medium);
        assert_eq!(chart.difficulty_color("hard"), chart.hard);
        assert_eq!(chart.difficulty_color("other"), chart.category_bar);
    }
}
