use chrono::NaiveDate;
use serde::Serialize;

use super::category::{AxisMap, Categorizer, CategoryThresholds};

/// Everything that may change between formula versions, selected once per evaluation.
pub trait FormulaSet: Send + Sync {
    fn version(&self) -> &'static str;
    fn published_on(&self) -> NaiveDate;
    fn thresholds(&self) -> CategoryThresholds;

    fn axes(&self) -> AxisMap {
        AxisMap::default()
    }

    fn categorizer(&self) -> Categorizer {
        Categorizer::new(self.thresholds(), self.axes())
    }
}

/// First published formula set.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormulaV1;

impl FormulaSet for FormulaV1 {
    fn version(&self) -> &'static str {
        "1.0.0"
    }

    fn published_on(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 3).unwrap_or(NaiveDate::MIN)
    }

    fn thresholds(&self) -> CategoryThresholds {
        CategoryThresholds {
            use_phase_share_pct: 50.0,
            dominance_ratio: 2.0,
        }
    }
}

static FORMULAS: &[&dyn FormulaSet] = &[&FormulaV1];

pub fn formula_for(version: &str) -> Option<&'static dyn FormulaSet> {
    FORMULAS
        .iter()
        .copied()
        .find(|formula| formula.version() == version)
}

pub fn formulas() -> impl Iterator<Item = &'static dyn FormulaSet> {
    FORMULAS.iter().copied()
}

/// Public description of an evaluable version.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionInfo {
    pub version_id: String,
    pub published_on: NaiveDate,
    pub thresholds: CategoryThresholds,
}

impl VersionInfo {
    pub fn of(formula: &dyn FormulaSet) -> Self {
        Self {
            version_id: formula.version().to_string(),
            published_on: formula.published_on(),
            thresholds: formula.thresholds(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_known_versions_only() {
        let formula = formula_for("1.0.0").expect("v1 registered");
        assert_eq!(formula.version(), "1.0.0");
        assert_eq!(
            formula.published_on(),
            NaiveDate::from_ymd_opt(2024, 6, 3).expect("valid date")
        );
        assert!(formula_for("2.0.0").is_none());
    }
}
