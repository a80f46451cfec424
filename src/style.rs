use crate::validator::Severity;
use is_terminal::IsTerminal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Green,
    Yellow,
    Blue,
    Cyan,
}

impl Color {
    fn code(self) -> &'static str {
        match self {
            Color::Red => "\x1b[31m",
            Color::Green => "\x1b[32m",
            Color::Yellow => "\x1b[33m",
            Color::Blue => "\x1b[34m",
            Color::Cyan => "\x1b[36m",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnsiStyle {
    pub color: Option<Color>,
    pub bold: bool,
    pub dim: bool,
}

impl AnsiStyle {
    /// Parse a dotted style such as `red.bold`.
    pub fn parse(style_str: &str) -> Result<Self, String> {
        let mut style = AnsiStyle::default();

        if style_str.is_empty() {
            return Ok(style);
        }

        for part in style_str.split('.') {
            match part {
                "bold" => style.bold = true,
                "dim" => style.dim = true,
                "red" => style.color = Some(Color::Red),
                "green" => style.color = Some(Color::Green),
                "yellow" => style.color = Some(Color::Yellow),
                "blue" => style.color = Some(Color::Blue),
                "cyan" => style.color = Some(Color::Cyan),
                _ => return Err(format!("Unknown style component: {}", part)),
            }
        }

        Ok(style)
    }

    pub const fn severity(severity: Severity) -> Self {
        match severity {
            Severity::Error => Self {
                color: Some(Color::Red),
                bold: true,
                dim: false,
            },
            Severity::Warning => Self {
                color: Some(Color::Yellow),
                bold: false,
                dim: false,
            },
        }
    }

    fn has_style(&self) -> bool {
        self.color.is_some() || self.bold || self.dim
    }

    pub fn apply(&self, text: &str) -> String {
        if !self.has_style() {
            return text.to_string();
        }

        let mut output = String::with_capacity(text.len() + 16);
        if let Some(color) = self.color {
            output.push_str(color.code());
        }
        if self.bold {
            output.push_str("\x1b[1m");
        }
        if self.dim {
            output.push_str("\x1b[2m");
        }
        output.push_str(text);
        output.push_str("\x1b[0m");
        output
    }
}

/// Colour is on unless disabled by flag, `NO_COLOR`, or a non-terminal `stream`.
pub fn colors_enabled(no_color: bool, stream: &impl IsTerminal) -> bool {
    !no_color && std::env::var_os("NO_COLOR").is_none() && stream.is_terminal()
}

/// Applies styles only when colour output is enabled.
#[derive(Debug, Clone, Copy)]
pub struct Painter {
    enabled: bool,
}

impl Painter {
    pub const fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Colour for stdout, see [`colors_enabled`].
    pub fn detect(no_color: bool) -> Self {
        Self::new(colors_enabled(no_color, &std::io::stdout()))
    }

    pub fn paint(&self, style: AnsiStyle, text: &str) -> String {
        if self.enabled {
            style.apply(text)
        } else {
            text.to_string()
        }
    }
}
