use colored::Color;

pub const PRIMARY: Color = Color::BrightGreen;
pub const ACCENT: Color = Color::BrightYellow;
pub const SEPARATOR: Color = Color::BrightBlack;
pub const TEXT_DEFAULT: Color = Color::White;

pub const FREQUENCY: Color = Color::BrightCyan;
pub const MODULATION: Color = Color::BrightMagenta;
pub const LEVEL: Color = Color::BrightBlue;
pub const LOCKED: Color = Color::Red;
