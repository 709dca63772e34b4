//! Generate static files

use crate::error::Result;
use crate::generator::BuildSummary;
use crate::Mksite;

/// Generate the site and log what was produced
pub fn run(site: &Mksite) -> Result<BuildSummary> {
    let start = std::time::Instant::now();

    tracing::info!("Generating {:?} -> {:?}", site.posts_dir, site.output_dir);
    let summary = site.generate()?;

    let duration = start.elapsed();
    tracing::info!(
        "Generated {} posts, {} standalone pages and {} static files in {:.2}s",
        summary.posts,
        summary.standalones,
        summary.static_files,
        duration.as_secs_f64()
    );

    Ok(summary)
}
