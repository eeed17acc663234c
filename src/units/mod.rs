mod tables;


use thiserror::Error;

use crate::dataset::ConsolidatedDataset;
use tables::{UnitFamily, RATE_FAMILIES, SCALE_FAMILIES};

/// One magnitude step of a unit family: values are divided by `divisor`
/// and the tier applies while the rescaled maximum stays strictly under
/// `threshold`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitTier {
    pub label: &'static str,
    pub divisor: f64,
    pub threshold: f64,
}

#[derive(Debug, Error)]
#[error("{quantity} is not a known unit family")]
pub struct UnknownUnitError {
    quantity: String,
}

/// Dual output of unit normalization: exact values for callers that need
/// them, an independently scaled copy for the chart axis.
#[derive(Debug, Clone)]
pub struct UnitSelection {
    /// Values at base-tier scale, safe for tabular export.
    pub report_data: ConsolidatedDataset,
    /// Independent copy at the chosen tier's scale.
    pub graph_data: ConsolidatedDataset,
    /// Maximum of the graph copy.
    pub max_value: f64,
    pub unit_label: &'static str,
}

/// Pick a display unit for an absolute quantity and rescale the dataset.
pub fn find_suitable_unit(
    dataset: ConsolidatedDataset,
    max_value: f64,
    quantity: &str,
    static_units: bool,
) -> Result<UnitSelection, UnknownUnitError> {
    normalize(dataset, max_value, quantity, static_units, SCALE_FAMILIES)
}

/// Pick a display unit for a rate quantity and rescale the dataset.
pub fn find_suitable_rate_unit(
    dataset: ConsolidatedDataset,
    max_value: f64,
    quantity: &str,
    static_units: bool,
) -> Result<UnitSelection, UnknownUnitError> {
    normalize(dataset, max_value, quantity, static_units, RATE_FAMILIES)
}

fn normalize(
    dataset: ConsolidatedDataset,
    max_value: f64,
    quantity: &str,
    static_units: bool,
    families: &[UnitFamily],
) -> Result<UnitSelection, UnknownUnitError> {
    let family = families.iter().find(|family| family.name == quantity);
    let Some(base) = family.and_then(|family| family.tiers.first()) else {
        return Err(UnknownUnitError {
            quantity: quantity.to_string(),
        });
    };
    let tiers = family.map(|family| family.tiers).unwrap_or_default();

    let tier = if static_units {
        base
    } else {
        select_tier(tiers, base, max_value)
    };

    let graph_data = dataset.scaled_by(tier.divisor);
    let report_data = if tier == base {
        graph_data.clone()
    } else {
        dataset.scaled_by(base.divisor)
    };
    let max_value = graph_data.max_value();

    Ok(UnitSelection {
        report_data,
        graph_data,
        max_value,
        unit_label: tier.label,
    })
}

/// Linear scan from finest to coarsest; the first tier keeping the maximum
/// strictly under its threshold wins, the last tier is the catch-all.
fn select_tier<'a>(tiers: &'a [UnitTier], base: &'a UnitTier, max_value: f64) -> &'a UnitTier {
    for tier in tiers {
        if max_value / tier.divisor < tier.threshold {
            return tier;
        }
    }
    tiers.last().unwrap_or(base)
}
