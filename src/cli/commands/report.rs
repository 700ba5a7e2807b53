//! Report generation and class file export

use super::{load_class, open_store};
use crate::args::ClassSection;
use school_attendance::config::Config;
use school_attendance::core::report::{ReportContext, ReportKind};
use school_attendance::core::{DateValue, Result};
use std::path::{Path, PathBuf};

/// Generate one report for a class and section
///
/// # Errors
/// Returns `NotFound` for an empty class, or a rendering or write failure
pub fn run(target: ClassSection, kind: ReportKind, output: Option<&Path>, config: &Config) -> Result<()> {
    let store = open_store(config);
    let registry = load_class(&store, target)?;
    let ctx = ReportContext::new(
        &registry,
        &config.reports.school_name,
        target.class,
        target.section,
        DateValue::today(),
    )?;

    let output_path = output.map_or_else(
        || {
            PathBuf::from(&config.reports.reports_dir)
                .join(kind.file_name(target.class, target.section))
        },
        Path::to_path_buf,
    );
    kind.generator().generate(&ctx, &output_path)?;
    println!("✓ {kind} report generated: {}", output_path.display());
    Ok(())
}

/// Copy the class file into the exports directory
///
/// # Errors
/// Returns `NotFound` when no file is stored for the pair, or a copy failure
pub fn export(target: ClassSection, config: &Config) -> Result<()> {
    let store = open_store(config);
    let path = store.export(
        target.class,
        target.section,
        Path::new(&config.storage.exports_dir),
    )?;
    println!("✓ Data exported to {}", path.display());
    Ok(())
}
