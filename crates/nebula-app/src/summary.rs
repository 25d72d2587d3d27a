//! Plain-text summary of a loaded world.

use std::fmt::Write;

use nebula_biome::{BiomeIndex, LoadReport};

/// Renders one row per registered biome followed by the world aggregates.
pub fn render_summary(index: &BiomeIndex, report: &LoadReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "World {}: {} biomes ({} virtual)",
        report.world, report.biome_count, report.virtual_count
    );
    let _ = writeln!(out, "{:>6} {:>6} {:>8}  name", "gen", "saved", "virtual");
    for biome in index.iter() {
        let identity = biome.identity;
        let _ = writeln!(
            out,
            "{:>6} {:>6} {:>8}  {}",
            identity.generation_id,
            identity.saved_id,
            if identity.is_virtual() { "yes" } else { "" },
            biome.config.name
        );
    }

    let stats = index.stats();
    let _ = writeln!(out, "max smooth radius: {}", stats.max_smooth_radius);
    let _ = writeln!(out, "replaced blocks: {}", stats.has_replaced_blocks);
    if let Some(colors) = &stats.color_map {
        let _ = writeln!(out, "image colors: {}", colors.len());
    }
    if !report.orphaned.is_empty() {
        let _ = writeln!(out, "reserved for missing biomes: {}", report.orphaned.join(", "));
    }
    if !report.warnings.is_empty() {
        let _ = writeln!(out, "{} warnings:", report.warnings.len());
        for warning in &report.warnings {
            let _ = writeln!(out, "  {warning}");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use nebula_biome::{BiomeConfigProvider, BiomeIdStore, VanillaBiomeCatalog};
    use nebula_config::WorldConfig;
    use nebula_settings::MemorySource;

    #[test]
    fn test_summary_lists_biomes() {
        let dir = tempfile::tempdir().unwrap();
        let provider = BiomeConfigProvider::new(
            WorldConfig::default(),
            MemorySource::new()
                .with("Alps", [("SmoothRadius", "3")])
                .with("Peaks", [("ReplaceToBiomeName", "Alps")])
                .with("Bog", [("extends", "Marsh")]),
            Arc::new(VanillaBiomeCatalog),
            BiomeIdStore::in_save_dir(dir.path()),
        );
        let report = provider.load().unwrap();
        let text = render_summary(&provider.index(), &report);

        assert!(text.starts_with("World world: 3 biomes (1 virtual)"));
        assert!(text.contains("   256     40      yes  Peaks"));
        assert!(text.contains("max smooth radius: 3"));
        assert!(text.contains("1 warnings:"));
        assert!(text.contains("Marsh"));
    }
}
