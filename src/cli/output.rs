//! CLI output formatting

use crate::{changes::ChangeKind, core::Step, index::PackageDependents};
use console::Emoji;

// Re-export style
pub use console::style;

// Emojis for output
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "i ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "!");
pub static PACKAGE: Emoji<'_, '_> = Emoji("📦 ", "# ");
pub static IMAGE: Emoji<'_, '_> = Emoji("🐙 ", "@ ");

/// Format a classified path for display
pub fn format_change(path: &str, kind: &ChangeKind, under_images: bool) -> String {
    match kind {
        ChangeKind::Package(name) => format!(
            "{}{} {}",
            PACKAGE,
            style(path).dim(),
            style(format!("package '{}'", name)).cyan()
        ),
        ChangeKind::Image(name) => format!(
            "{}{} {}",
            IMAGE,
            style(path).dim(),
            style(format!("image '{}'", name)).cyan()
        ),
        ChangeKind::Unrecognized if under_images => format!(
            "{}{} {}",
            CROSS,
            style(path).red(),
            style("violates the image naming convention").red()
        ),
        ChangeKind::Unrecognized => format!("{}{} {}", INFO, style(path).dim(), style("ignored").dim()),
    }
}

/// Format a step and what it waits for
pub fn format_step(step: &Step) -> String {
    if step.depends_on.is_empty() {
        format!("  {}", style(&step.key).bold())
    } else {
        format!(
            "  {} ← {}",
            style(&step.key).bold(),
            style(step.depends_on.join(", ")).dim()
        )
    }
}

/// Format the dependents of one package
pub fn format_dependents(dependents: &PackageDependents) -> String {
    if dependents.images.is_empty() {
        format!(
            "{}{}: {}",
            PACKAGE,
            style(&dependents.package).bold(),
            style("no base images").dim()
        )
    } else {
        format!(
            "{}{}: {}",
            PACKAGE,
            style(&dependents.package).bold(),
            style(dependents.images.join(", ")).cyan()
        )
    }
}

/// Format one image with its declared package references
pub fn format_index_entry(image: &str, packages: &[String]) -> String {
    let mut entry = format!("{}{} ({})", IMAGE, style(image).bold(), style(packages.len()).cyan());
    for package in packages {
        entry.push_str(&format!("\n    {}", package));
    }
    entry
}
