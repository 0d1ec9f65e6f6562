use anyhow::{Context, Result};
use lazarus_client::ControlPlane;
use lazarus_core::ProfileCatalog;
use lazarus_ui::App;
use std::path::Path;

fn load_catalog(path: Option<&Path>) -> Result<ProfileCatalog> {
    match path {
        Some(path) => ProfileCatalog::from_file(path)
            .with_context(|| format!("Failed to load catalog from {}", path.display())),
        None => Ok(ProfileCatalog::builtin()),
    }
}

pub async fn start(
    catalog_path: Option<&Path>,
    endpoint: Option<String>,
    profile: Option<String>,
) -> Result<()> {
    let catalog = load_catalog(catalog_path)?;
    if let Some(id) = &profile {
        catalog
            .get(id)
            .with_context(|| format!("Unknown profile '{id}'"))?;
    }

    let control = ControlPlane::select(endpoint.as_deref()).await;

    let mut app = App::new(catalog, control);
    if let Some(id) = &profile {
        app.select_profile(id);
    }
    app.run().await?;

    Ok(())
}

pub fn list(catalog_path: Option<&Path>) -> Result<()> {
    let catalog = load_catalog(catalog_path)?;

    for profile in &catalog.profiles {
        let savings = profile.cost.savings_fraction() * 100.0;
        println!(
            "  {} {} ({}) - {}",
            profile.kind.glyph(),
            profile.name,
            profile.id,
            profile.description
        );
        println!(
            "    kind: {}  build steps: {}  boot steps: {}",
            profile.kind.label(),
            profile.build_sequence.len(),
            profile.boot_sequence.len()
        );
        println!(
            "    spot ${:.3}/hr vs on-demand ${:.3}/hr ({savings:.0}% saved)",
            profile.cost.spot_rate, profile.cost.on_demand_rate
        );
        if !profile.metrics.is_empty() {
            let metrics: Vec<String> = profile
                .metrics
                .iter()
                .map(|m| format!("{} ({})", m.label, m.unit))
                .collect();
            println!("    metrics: {}", metrics.join(", "));
        }
        println!();
    }

    Ok(())
}

pub async fn zones(endpoint: Option<String>) -> Result<()> {
    let control = ControlPlane::select(endpoint.as_deref()).await;

    let scan = control.zones().await.context("Zone scan failed")?;

    println!("Spot market ({})", control.describe());
    for quote in &scan.zones {
        let marker = if quote.optimal { "*" } else { " " };
        println!("  {marker} {:<20} ${:.4}/hr", quote.zone, quote.spot_price);
    }

    if let Some(best) = scan.optimal() {
        println!();
        println!("Optimal zone: {} (${:.4}/hr)", best.zone, best.spot_price);
    }

    Ok(())
}
