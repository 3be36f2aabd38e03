use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::Stage;

/// Simplified environmental profile of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    X,
    E,
    M,
    EM,
    #[serde(rename = "NONE")]
    NotApplicable,
}

impl Category {
    pub fn short_name(self) -> &'static str {
        match self {
            Category::X => "X",
            Category::E => "E",
            Category::M => "M",
            Category::EM => "EM",
            Category::NotApplicable => "N/A",
        }
    }

    pub fn profile(self) -> CategoryProfile {
        let (name, description) = match self {
            Category::X => (
                "X",
                "Use-phase impacts (operating energy and movement) are not predominant. \
                 Manufacturing alternatives are the most relevant lever; the use phase still \
                 matters but does not justify priority action.",
            ),
            Category::E => (
                "Energy",
                "Impacts of the operating energy consumed by the equipment prevail over the \
                 other life-cycle aspects. Reducing energy consumption is the most efficient \
                 lever.",
            ),
            Category::M => (
                "Material/Movement",
                "Impacts of moving the product during use overcome every other source, \
                 operating energy included. Reducing product mass is the most efficient lever.",
            ),
            Category::EM => (
                "Energy & Material/Movement",
                "Operating energy and movement are both important. Both use-phase aspects are \
                 to be addressed in priority.",
            ),
            Category::NotApplicable => (
                "Not applicable",
                "Cannot determine the impact category from the current data.",
            ),
        };

        CategoryProfile {
            category: self,
            short_name: self.short_name(),
            name,
            description,
        }
    }
}

/// Presentation record for the category panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryProfile {
    pub category: Category,
    pub short_name: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

/// Use-phase axis a stage counts towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    Energy,
    Movement,
}

/// Which stages feed which axis. Stages absent from the map are axis-neutral.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AxisMap(BTreeMap<Stage, Axis>);

impl AxisMap {
    pub fn new(entries: impl IntoIterator<Item = (Stage, Axis)>) -> Self {
        Self(entries.into_iter().collect())
    }

    pub fn axis(&self, stage: Stage) -> Option<Axis> {
        self.0.get(&stage).copied()
    }
}

impl Default for AxisMap {
    fn default() -> Self {
        Self::new([
            (Stage::InUsePower, Axis::Energy),
            (Stage::InUseMobility, Axis::Movement),
        ])
    }
}

/// Tunable cut-offs of the categorizer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryThresholds {
    /// Combined energy + movement share (in %) below which the use phase is not dominant.
    pub use_phase_share_pct: f64,
    /// How many times larger one axis share must be than the other to dominate it.
    pub dominance_ratio: f64,
}

/// Axis shares extracted from a spread.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AxisShares {
    pub energy: f64,
    pub movement: f64,
}

impl AxisShares {
    pub fn use_phase(&self) -> f64 {
        self.energy + self.movement
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Categorizer {
    thresholds: CategoryThresholds,
    axes: AxisMap,
}

impl Categorizer {
    pub fn new(thresholds: CategoryThresholds, axes: AxisMap) -> Self {
        Self { thresholds, axes }
    }

    pub fn thresholds(&self) -> &CategoryThresholds {
        &self.thresholds
    }

    pub fn shares(&self, spread: &BTreeMap<Stage, f64>) -> AxisShares {
        spread
            .iter()
            .fold(AxisShares::default(), |mut shares, (stage, share)| {
                match self.axes.axis(*stage) {
                    Some(Axis::Energy) => shares.energy += share,
                    Some(Axis::Movement) => shares.movement += share,
                    None => {}
                }
                shares
            })
    }

    /// Classify a percentage spread. An empty spread (zero total) is `NotApplicable`.
    pub fn categorize(&self, spread: &BTreeMap<Stage, f64>) -> Category {
        if spread.is_empty() {
            return Category::NotApplicable;
        }

        let shares = self.shares(spread);
        let CategoryThresholds {
            use_phase_share_pct,
            dominance_ratio,
        } = self.thresholds;

        if shares.use_phase() < use_phase_share_pct {
            Category::X
        } else if shares.energy >= shares.movement * dominance_ratio {
            Category::E
        } else if shares.movement >= shares.energy * dominance_ratio {
            Category::M
        } else {
            Category::EM
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn categorizer() -> Categorizer {
        Categorizer::new(
            CategoryThresholds {
                use_phase_share_pct: 50.0,
                dominance_ratio: 2.0,
            },
            AxisMap::default(),
        )
    }

    fn spread(entries: &[(Stage, f64)]) -> BTreeMap<Stage, f64> {
        entries.iter().copied().collect()
    }

    #[test]
    fn empty_spread_is_not_applicable() {
        assert_eq!(
            categorizer().categorize(&BTreeMap::new()),
            Category::NotApplicable
        );
    }

    #[test]
    fn manufacturing_dominated_product_is_x() {
        let category = categorizer().categorize(&spread(&[
            (Stage::ManufacturingElectronics, 70.0),
            (Stage::InUsePower, 20.0),
            (Stage::InUseMobility, 10.0),
        ]));
        assert_eq!(category, Category::X);
    }

    #[test]
    fn dominant_axis_decides_between_e_and_m() {
        let energy = categorizer().categorize(&spread(&[
            (Stage::ManufacturingMechanics, 20.0),
            (Stage::InUsePower, 70.0),
            (Stage::InUseMobility, 10.0),
        ]));
        assert_eq!(energy, Category::E);

        let movement = categorizer().categorize(&spread(&[
            (Stage::ManufacturingMechanics, 45.0),
            (Stage::InUseMobility, 55.0),
        ]));
        assert_eq!(movement, Category::M);
    }

    #[test]
    fn comparable_axes_are_em() {
        let category = categorizer().categorize(&spread(&[
            (Stage::ManufacturingMechanics, 20.0),
            (Stage::InUsePower, 45.0),
            (Stage::InUseMobility, 35.0),
        ]));
        assert_eq!(category, Category::EM);
    }

    #[test]
    fn boundary_share_counts_as_dominant_use_phase() {
        let category = categorizer().categorize(&spread(&[
            (Stage::Recycling, 50.0),
            (Stage::InUsePower, 50.0),
        ]));
        assert_eq!(category, Category::E);
    }

    #[test]
    fn none_serializes_as_documented_tag() {
        let json = serde_json::to_string(&Category::NotApplicable).expect("serializes");
        assert_eq!(json, "\"NONE\"");
    }
}
