//! Production groups reported in the declaration datasets.
//!
//! Each hour, the declared production of a price area is split into shares per
//! [`ProductionGroup`]. Groups are either renewable (VE, from the Danish "vedvarende energi") or
//! non-renewable, and the non-renewable groups map onto the [`ProportionCategory`]s that are
//! reported to users.
use serde::de::Error;
use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumIter, EnumString};

/// A source of electricity production.
///
/// Parsing accepts the labels used by the upstream data service (e.g. `Kul`, `Træ_mm`) as well as
/// the kebab-case English names used for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, EnumIter)]
pub enum ProductionGroup {
    /// Coal
    #[strum(to_string = "coal", serialize = "Kul")]
    Coal,
    /// Natural gas
    #[strum(to_string = "natural-gas", serialize = "Naturgas")]
    NaturalGas,
    /// Nuclear power (imported)
    #[strum(to_string = "nuclear", serialize = "Atomkraft")]
    Nuclear,
    /// Oil
    #[strum(to_string = "oil", serialize = "Olie")]
    Oil,
    /// Biomass not otherwise specified
    #[strum(to_string = "biomass", serialize = "Biomasse")]
    Biomass,
    /// Waste incineration
    #[strum(to_string = "waste", serialize = "Affald")]
    Waste,
    /// Biogas
    #[strum(to_string = "biogas", serialize = "Biogas")]
    Biogas,
    /// Straw
    #[strum(to_string = "straw", serialize = "Halm")]
    Straw,
    /// Wood chips, pellets and other wood residue
    #[strum(to_string = "wood-residue", serialize = "Træ_mm")]
    WoodResidue,
    /// Solar power
    #[strum(to_string = "solar", serialize = "Solceller", serialize = "Sol")]
    Solar,
    /// Onshore wind
    #[strum(to_string = "wind-onshore", serialize = "Onshore")]
    WindOnshore,
    /// Offshore wind
    #[strum(to_string = "wind-offshore", serialize = "Offshore")]
    WindOffshore,
    /// Hydro power (imported)
    #[strum(to_string = "hydro", serialize = "Vandkraft")]
    Hydro,
    /// Other renewable sources
    #[strum(to_string = "other-renewable", serialize = "Anden VE")]
    OtherRenewable,
}

impl ProductionGroup {
    /// Whether this is a renewable (VE) production group
    pub fn is_ve(&self) -> bool {
        matches!(
            self,
            Self::Solar
                | Self::WindOnshore
                | Self::WindOffshore
                | Self::Hydro
                | Self::OtherRenewable
        )
    }

    /// The reporting category for a non-renewable group, or `None` for renewables.
    ///
    /// Straw and wood residue are folded into [`ProportionCategory::Biomass`].
    pub fn category(&self) -> Option<ProportionCategory> {
        let category = match self {
            Self::Coal => ProportionCategory::Coal,
            Self::NaturalGas => ProportionCategory::NaturalGas,
            Self::Nuclear => ProportionCategory::Nuclear,
            Self::Oil => ProportionCategory::Oil,
            Self::Biomass | Self::Straw | Self::WoodResidue => ProportionCategory::Biomass,
            Self::Waste => ProportionCategory::Waste,
            Self::Biogas => ProportionCategory::Biogas,
            Self::Solar
            | Self::WindOnshore
            | Self::WindOffshore
            | Self::Hydro
            | Self::OtherRenewable => return None,
        };

        Some(category)
    }
}

impl<'de> Deserialize<'de> for ProductionGroup {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.trim()
            .parse()
            .map_err(|_| D::Error::custom(format!("Unknown production group '{s}'")))
    }
}

/// The non-renewable production categories reported to users.
///
/// Variants are declared in reporting order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumIter, Serialize,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ProportionCategory {
    /// Coal
    Coal,
    /// Natural gas
    NaturalGas,
    /// Nuclear power
    Nuclear,
    /// Oil
    Oil,
    /// Biomass, including straw and wood residue
    Biomass,
    /// Waste incineration
    Waste,
    /// Biogas
    Biogas,
}
