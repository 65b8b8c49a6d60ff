use std::fmt::{Display, Formatter};

/// Colors used when presenting the four DMG shades.
///
/// The PPU always renders with the classic gray ramp; this only affects the frame handed to the
/// frontend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[cfg_attr(feature = "clap", value(rename_all = "verbatim"))]
pub enum DmgPalette {
    #[default]
    Classic,
    GreenTint,
    LimeGreen,
}

impl DmgPalette {
    pub const ALL: [Self; 3] = [Self::Classic, Self::GreenTint, Self::LimeGreen];
}

impl Display for DmgPalette {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Classic => write!(f, "Classic"),
            Self::GreenTint => write!(f, "GreenTint"),
            Self::LimeGreen => write!(f, "LimeGreen"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn default_palette_is_classic() {
        assert_eq!(DmgPalette::default(), DmgPalette::Classic);
    }

    #[test]
    fn display_names_unique() {
        let names: Vec<_> = DmgPalette::ALL.iter().map(ToString::to_string).collect();
        for (i, name) in names.iter().enumerate() {
            assert!(!names[i + 1..].contains(name), "duplicate palette name {name}");
        }
    }
}
