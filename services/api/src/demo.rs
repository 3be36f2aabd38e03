use crate::cli::CatalogArgs;
use crate::infra::{build_service, read_product, with_catalog_dir};
use chrono::Local;
use clap::Args;
use ecoprofile::config::{AppConfig, EvaluationSettings};
use ecoprofile::error::AppError;
use ecoprofile::evaluation::{
    EvaluationReport, EvaluationRequest, EvaluationService, ProductSnapshot, RecyclingType,
};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    /// Product snapshot as JSON (the same shape the editor posts)
    #[arg(long)]
    pub(crate) product: PathBuf,
    /// Formula version to evaluate with (defaults to ECO_DEFAULT_VERSION)
    #[arg(long)]
    pub(crate) version: Option<String>,
    /// Print the full report as JSON instead of a table
    #[arg(long)]
    pub(crate) json: bool,
    #[command(flatten)]
    pub(crate) catalog: CatalogArgs,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Formula version to evaluate with (defaults to ECO_DEFAULT_VERSION)
    #[arg(long)]
    pub(crate) version: Option<String>,
    /// Also print the JSON report
    #[arg(long)]
    pub(crate) json: bool,
}

fn settings(catalog: CatalogArgs) -> Result<EvaluationSettings, AppError> {
    let config = AppConfig::load()?;
    Ok(with_catalog_dir(config.evaluation, catalog.catalog_dir))
}

pub(crate) async fn run_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let EvaluateArgs {
        product,
        version,
        json,
        catalog,
    } = args;

    let service = build_service(&settings(catalog)?).await?;
    let request = EvaluationRequest {
        version_id: version,
        product: read_product(&product)?,
    };
    let report = service.evaluate(&request)?;

    if json {
        print_json(&report);
    } else {
        println!("Evaluation of {}", product.display());
        render_report(&report);
    }
    Ok(())
}

pub(crate) async fn run_versions(args: CatalogArgs) -> Result<(), AppError> {
    let service = build_service(&settings(args)?).await?;
    render_versions(&service);
    Ok(())
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let service = build_service(&settings(CatalogArgs::default())?).await?;
    let request = EvaluationRequest {
        version_id: args.version,
        product: demo_product(),
    };

    println!("Eco-profile demo ({})", Local::now().date_naive());
    println!("Steel cabinet (3 kg) with one PCB (1 kg), carried by an urban bus");
    let report = service.evaluate(&request)?;
    render_report(&report);

    if args.json {
        print_json(&report);
    }
    Ok(())
}

/// 3 kg steel cabinet and 1 kg PCB embedded in a combustion urban bus, recycled as average
/// electronic equipment.
pub(crate) fn demo_product() -> ProductSnapshot {
    ProductSnapshot::builder()
        .mechanical_part("steel", 3.0)
        .electronic_component("PCB", 1.0)
        .embedded_mobility("GROUND CIVILIAN", "5", 20_000.0)
        .recycling(RecyclingType::Type1)
        .build()
}

fn render_versions(service: &EvaluationService) {
    println!("Formula versions");
    for info in service.versions() {
        let marker = if info.version_id == service.default_version() {
            " (default)"
        } else {
            ""
        };
        println!(
            "- {}{} | published {} | use-phase threshold {:.0}% | dominance x{:.1}",
            info.version_id,
            marker,
            info.published_on.format("%Y-%m-%d"),
            info.thresholds.use_phase_share_pct,
            info.thresholds.dominance_ratio
        );
    }
}

pub(crate) fn render_report(report: &EvaluationReport) {
    let result = &report.result;
    println!("Formula version {}", result.version_id);

    for impact in &result.impacts {
        let share = result
            .impacts_spread
            .get(&impact.stage)
            .copied()
            .unwrap_or_default();
        println!(
            "\n{}: {:.2} kgCO2e ({:.1}%)",
            impact.name, impact.total, share
        );
        for row in report.rows.iter().filter(|row| row.stage == impact.stage) {
            println!(
                "  - {}: {:.2} {} x {} = {:.2} kgCO2e",
                row.label, row.quantity.value, row.quantity.unit, row.factor, row.impact
            );
        }
    }

    println!("\nTotal: {:.2} kgCO2e", result.total);
    println!(
        "Category: {} ({})",
        report.category.short_name, report.category.name
    );
    println!("  {}", report.category.description);

    let warnings = report.warnings();
    if !warnings.is_empty() {
        println!("Warnings:");
        for warning in warnings {
            println!("  - {warning}");
        }
    }
}

fn print_json(report: &EvaluationReport) {
    match serde_json::to_string_pretty(report) {
        Ok(json) => println!("{json}"),
        Err(err) => println!("JSON report unavailable: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecoprofile::evaluation::{Category, Stage};

    #[tokio::test]
    async fn demo_product_matches_worked_example() {
        let service = build_service(&EvaluationSettings::default())
            .await
            .expect("service builds");

        let report = service
            .evaluate(&EvaluationRequest {
                version_id: None,
                product: demo_product(),
            })
            .expect("demo evaluates");
        let result = &report.result;

        assert!((result.manufacturing_total() - 259.0).abs() < 1e-9);
        assert!((result.stage_total(Stage::InUseMobility) - 320.0).abs() < 1e-9);
        assert!((result.stage_total(Stage::Recycling) - 4.0).abs() < 1e-9);
        assert!((result.total - 583.0).abs() < 1e-9);
        assert_eq!(result.category, Category::M);
        assert!(report
            .rows
            .iter()
            .any(|row| row.label == "GROUND CIVILIAN - Urban bus - fuel/diesel/CNG"));
    }

    #[tokio::test]
    async fn demo_follows_configured_default_version() {
        let saved: Vec<_> = ["ECO_DEFAULT_VERSION", "ECO_CATALOG_DIR"]
            .into_iter()
            .map(|key| (key, std::env::var_os(key)))
            .collect();
        std::env::set_var("ECO_DEFAULT_VERSION", "9.9.9");
        std::env::remove_var("ECO_CATALOG_DIR");

        let outcome = run_demo(DemoArgs::default()).await;

        for (key, value) in saved {
            match value {
                Some(value) => std::env::set_var(key, value),
                None => std::env::remove_var(key),
            }
        }
        assert!(matches!(outcome, Err(AppError::Evaluation(_))));
    }
}
