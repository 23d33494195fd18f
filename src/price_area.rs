//! Price areas (bidding zones) of the Danish electricity grid.
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// A grid pricing and balancing zone
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
pub enum PriceArea {
    /// Western Denmark (Jutland and Funen)
    DK1,
    /// Eastern Denmark (Zealand and the islands)
    DK2,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::str::FromStr;

    #[rstest]
    #[case("DK1", PriceArea::DK1)]
    #[case("DK2", PriceArea::DK2)]
    fn parse_price_area(#[case] label: &str, #[case] expected: PriceArea) {
        assert_eq!(PriceArea::from_str(label).unwrap(), expected);
        assert_eq!(expected.to_string(), label);
    }

    #[test]
    fn parse_price_area_invalid() {
        assert!(PriceArea::from_str("SE3").is_err());
    }
}
