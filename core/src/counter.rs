//! Three-glyph seven-segment style counter formatting.

pub const COUNTER_WIDTH: usize = 3;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Glyph {
    Digit(u8),
    Minus,
}

impl Glyph {
    fn from_char(c: char) -> Option<Self> {
        match c {
            '-' => Some(Self::Minus),
            _ => c.to_digit(10).map(|d| Self::Digit(d as u8)),
        }
    }

    pub const fn as_char(self) -> char {
        match self {
            Self::Digit(d) => (b'0' + d) as char,
            Self::Minus => '-',
        }
    }

    /// Presentation class of the glyph, `digit-0` through `digit-9` or `digit-minus`.
    pub fn class(self) -> String {
        match self {
            Self::Digit(d) => format!("digit-{}", d),
            Self::Minus => "digit-minus".to_string(),
        }
    }
}

/// Zero-padded three character counter text.
///
/// Values that do not fit are pinned: anything from 1000 up shows `999`,
/// anything below -99 shows `-99`.
pub fn format_for_counter(num: i32) -> String {
    match num {
        ..-99 => "-99".to_string(),
        -99..0 => format!("-{:02}", -num),
        0..1000 => format!("{:03}", num),
        1000.. => "999".to_string(),
    }
}

pub fn counter_glyphs(num: i32) -> [Glyph; COUNTER_WIDTH] {
    let mut glyphs = [Glyph::Digit(0); COUNTER_WIDTH];
    for (slot, c) in glyphs.iter_mut().zip(format_for_counter(num).chars()) {
        if let Some(glyph) = Glyph::from_char(c) {
            *slot = glyph;
        }
    }
    glyphs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digits(num: i32) -> String {
        counter_glyphs(num).iter().map(|g| g.as_char()).collect()
    }

    #[test]
    fn pads_to_three_digits() {
        assert_eq!(
            counter_glyphs(7),
            [Glyph::Digit(0), Glyph::Digit(0), Glyph::Digit(7)]
        );
        assert_eq!(digits(0), "000");
        assert_eq!(digits(42), "042");
    }

    #[test]
    fn every_representable_value_reads_back() {
        for v in 0..1000 {
            let text = digits(v);
            assert_eq!(text.len(), COUNTER_WIDTH);
            assert_eq!(text.parse::<i32>().unwrap(), v);
        }
    }

    #[test]
    fn out_of_range_values_are_pinned() {
        assert_eq!(digits(1000), "999");
        assert_eq!(digits(123_456), "999");
        assert_eq!(digits(-5), "-05");
        assert_eq!(digits(-99), "-99");
        assert_eq!(digits(-1000), "-99");
    }

    #[test]
    fn glyph_classes() {
        assert_eq!(Glyph::Digit(4).class(), "digit-4");
        assert_eq!(Glyph::Minus.class(), "digit-minus");
    }
}
