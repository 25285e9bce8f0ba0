use ratatui::style::Color;

/// Gruvbox-derived colors for the demo
pub struct Palette;

impl Palette {
    pub const BG0: Color = Color::Rgb(0x28, 0x28, 0x28);
    pub const BG2: Color = Color::Rgb(0x45, 0x40, 0x3d);
    pub const FG0: Color = Color::Rgb(0xd4, 0xbe, 0x98);
    pub const GREY2: Color = Color::Rgb(0xa8, 0x99, 0x84);
    pub const ACCENT: Color = Color::Rgb(0x89, 0xb4, 0x82);
    pub const ERROR: Color = Color::Rgb(0xea, 0x69, 0x62);

    /// Row backgrounds, picked per item so neighbours differ
    pub const ROWS: [Color; 6] = [
        Color::Rgb(0x45, 0x40, 0x3d),
        Color::Rgb(0x3b, 0x44, 0x39),
        Color::Rgb(0x37, 0x41, 0x41),
        Color::Rgb(0x4c, 0x3a, 0x3e),
        Color::Rgb(0x4f, 0x42, 0x2e),
        Color::Rgb(0x40, 0x3a, 0x4c),
    ];

    pub fn row_color(id: u64) -> Color {
        Self::ROWS[(id % Self::ROWS.len() as u64) as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjacent_rows_differ() {
        for id in 0..20u64 {
            assert_ne!(Palette::row_color(id), Palette::row_color(id + 1));
        }
    }
}
