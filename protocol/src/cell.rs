use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Display state of a single cell, as chosen by the remote engine.
///
/// Engine strings the client does not know are kept verbatim in [`CellView::Other`]
/// so they can still be handed to the renderer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum CellView {
    #[default]
    Covered,
    Flagged,
    Question,
    Revealed(u8),
    Mine,
    Exploded,
    Misflagged,
    Other(String),
}

impl CellView {
    const REVEALED_PREFIX: &'static str = "revealed-";

    pub fn parse(name: &str) -> Self {
        use CellView::*;
        match name {
            "covered" => Covered,
            "flagged" => Flagged,
            "question" => Question,
            "mine" => Mine,
            "exploded" => Exploded,
            "misflagged" => Misflagged,
            _ => match name.strip_prefix(Self::REVEALED_PREFIX).map(str::as_bytes) {
                Some(&[digit @ b'0'..=b'8']) => Revealed(digit - b'0'),
                _ => Other(name.to_string()),
            },
        }
    }

    pub fn wire_name(&self) -> String {
        use CellView::*;
        match self {
            Covered => "covered".to_string(),
            Flagged => "flagged".to_string(),
            Question => "question".to_string(),
            Revealed(count) => format!("{}{}", Self::REVEALED_PREFIX, count),
            Mine => "mine".to_string(),
            Exploded => "exploded".to_string(),
            Misflagged => "misflagged".to_string(),
            Other(name) => name.clone(),
        }
    }

    pub const fn is_flagged(&self) -> bool {
        matches!(self, Self::Flagged)
    }

    pub const fn is_covered(&self) -> bool {
        matches!(self, Self::Covered | Self::Flagged | Self::Question)
    }

    /// A revealed cell with mines around it, the only target a chord makes sense on.
    pub const fn is_numbered(&self) -> bool {
        matches!(self, Self::Revealed(count) if *count > 0)
    }
}

impl Serialize for CellView {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.wire_name())
    }
}

impl<'de> Deserialize<'de> for CellView {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Self::parse(&name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_names_map_to_variants() {
        assert_eq!(CellView::parse("covered"), CellView::Covered);
        assert_eq!(CellView::parse("revealed-3"), CellView::Revealed(3));
        assert_eq!(CellView::parse("exploded"), CellView::Exploded);
    }

    #[test]
    fn unknown_names_pass_through_verbatim() {
        assert_eq!(
            CellView::parse("revealed-9"),
            CellView::Other("revealed-9".to_string())
        );
        let cell: CellView = serde_json::from_str("\"sparkly\"").unwrap();
        assert_eq!(cell, CellView::Other("sparkly".to_string()));
        assert_eq!(serde_json::to_string(&cell).unwrap(), "\"sparkly\"");
    }

    #[test]
    fn only_canonical_counts_are_revealed() {
        for name in ["revealed-08", "revealed-+3", "revealed-", "revealed-10"] {
            let cell = CellView::parse(name);
            assert_eq!(cell, CellView::Other(name.to_string()));
            assert_eq!(cell.wire_name(), name);
        }
        assert_eq!(CellView::parse("revealed-0"), CellView::Revealed(0));
        assert_eq!(CellView::parse("revealed-8"), CellView::Revealed(8));
    }

    #[test]
    fn only_nonzero_reveals_are_numbered() {
        assert!(CellView::Revealed(2).is_numbered());
        assert!(!CellView::Revealed(0).is_numbered());
        assert!(!CellView::Flagged.is_numbered());
        assert!(CellView::Flagged.is_covered());
    }
}
