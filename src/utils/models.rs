/// Box drawing characters of the printed grid
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Glyph {
    Vertical,
    Horizontal,
    /// `├`
    LeftTee,
    /// `┤`
    RightTee,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    /// `┬`, joins a row to the cells below
    DownTee,
    /// `┴`, joins a row to the cells above
    UpTee,
    Cross,
}

impl Glyph {
    #[must_use]
    pub fn as_char(self) -> char {
        match self {
            Self::Vertical => '│',
            Self::Horizontal => '─',
            Self::LeftTee => '├',
            Self::RightTee => '┤',
            Self::TopLeft => '┌',
            Self::TopRight => '┐',
            Self::BottomLeft => '└',
            Self::BottomRight => '┘',
            Self::DownTee => '┬',
            Self::UpTee => '┴',
            Self::Cross => '┼',
        }
    }
}

/// Which horizontal rule of the grid is drawn
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rule {
    Top,
    Between,
    Bottom,
}
