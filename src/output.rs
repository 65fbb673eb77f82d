//! CLI output formatting for all stages.
//!
//! Output is grouped by stage, one header line per stage followed by
//! indented detail lines. Paths are shown relative to the project root.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Maps
//!     featured: 4
//!     collaborations: 2
//!     crap: 7
//!     ports: 3 (not enriched)
//!     images: 31
//! Placeholders
//!     crap: old-sketch
//! Prefix collisions
//!     alpha / alpha_beta
//! ```
//!
//! ## Thumbnails
//!
//! ```text
//! Thumbnails (31 images)
//!     alps_1.avif → 600px
//!     sketch_2.avif → 400px
//! Generated 31 thumbnails
//! ```
//!
//! ## Build
//!
//! ```text
//! Passthrough
//!     CNAME
//! HTML: minified 12 files (84210 → 61877 bytes)
//! Stylesheets
//!     css/main.scss → _site/assets/main.css (8302 bytes)
//!     purged _site/assets/main.css: 8302 → 4410 bytes
//! ```
//!
//! # Architecture
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure:
//! no I/O, no side effects.

use crate::enrich::CheckReport;
use crate::html::MinifySummary;
use crate::lifecycle::{AfterBuildReport, BuildReport, CssReport};
use crate::thumbnails::ThumbnailEvent;
use crate::types::Category;
use std::path::Path;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `path` relative to `root` when it lives below it.
fn display_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{}", line);
    }
}

// ============================================================================
// Check
// ============================================================================

pub fn format_check_report(report: &CheckReport) -> Vec<String> {
    let mut lines = vec!["Maps".to_string()];
    for (category, count) in &report.entry_counts {
        let note = if *category == Category::Ports && report.unenriched_ports > 0 {
            " (not enriched)"
        } else {
            ""
        };
        lines.push(format!("{}{}: {}{}", indent(1), category, count, note));
    }
    lines.push(format!("{}images: {}", indent(1), report.image_count));

    if !report.placeholders.is_empty() {
        lines.push("Placeholders".to_string());
        for (category, name) in &report.placeholders {
            lines.push(format!("{}{}: {}", indent(1), category, name));
        }
    }

    if !report.collisions.is_empty() {
        lines.push("Prefix collisions".to_string());
        for (shorter, longer) in &report.collisions {
            lines.push(format!("{}{} / {}", indent(1), shorter, longer));
        }
    }

    if !report.orphan_images.is_empty() {
        lines.push("Unused images".to_string());
        for file in &report.orphan_images {
            lines.push(format!("{}{}", indent(1), file));
        }
    }

    lines
}

pub fn print_check_report(report: &CheckReport) {
    print_lines(format_check_report(report));
}

// ============================================================================
// Thumbnails
// ============================================================================

/// Format a single progress event from the thumbnail stage.
pub fn format_thumbnail_event(event: &ThumbnailEvent) -> Vec<String> {
    match event {
        ThumbnailEvent::Started { total } => vec![format!("Thumbnails ({} images)", total)],
        ThumbnailEvent::Processing { filename, width } => {
            vec![format!("{}{} \u{2192} {}px", indent(1), filename, width)]
        }
        ThumbnailEvent::Failed { filename, error } => {
            vec![format!("{}{}: FAILED ({})", indent(1), filename, error)]
        }
        ThumbnailEvent::Finished { count } => vec![format!("Generated {} thumbnails", count)],
    }
}

// ============================================================================
// Build stages
// ============================================================================

pub fn format_css_report(report: &CssReport, root: &Path) -> Vec<String> {
    let mut lines = vec!["Stylesheets".to_string()];
    for sheet in &report.compiled {
        lines.push(format!(
            "{}{} \u{2192} {} ({} bytes)",
            indent(1),
            display_path(&sheet.source, root),
            display_path(&sheet.output, root),
            sheet.bytes
        ));
    }
    for purged in &report.purged {
        lines.push(format!(
            "{}purged {}: {} \u{2192} {} bytes",
            indent(1),
            display_path(&purged.file, root),
            purged.bytes_before,
            purged.bytes_after
        ));
    }
    lines
}

pub fn print_css_report(report: &CssReport, root: &Path) {
    print_lines(format_css_report(report, root));
}

fn format_minify_summary(summary: &MinifySummary) -> String {
    format!(
        "HTML: minified {} files ({} \u{2192} {} bytes)",
        summary.files, summary.bytes_before, summary.bytes_after
    )
}

pub fn format_after_build_report(report: &AfterBuildReport, root: &Path) -> Vec<String> {
    let mut lines = format_css_report(&report.css, root);
    lines.push(format!(
        "Thumbnails: {} ({} featured) \u{2192} {}",
        report.thumbnails.jobs.len(),
        report.thumbnails.featured_count(),
        display_path(&report.thumbnails.output_dir, root)
    ));
    lines
}

pub fn print_after_build_report(report: &AfterBuildReport, root: &Path) {
    print_lines(format_after_build_report(report, root));
}

pub fn format_build_report(report: &BuildReport, output: &Path, root: &Path) -> Vec<String> {
    let mut lines = Vec::new();
    if !report.copied.is_empty() {
        lines.push("Passthrough".to_string());
        for path in &report.copied {
            lines.push(format!("{}{}", indent(1), display_path(path, output)));
        }
    }
    lines.push(format_minify_summary(&report.html));
    lines.extend(format_after_build_report(&report.after_build, root));
    lines
}

pub fn print_build_report(report: &BuildReport, output: &Path, root: &Path) {
    print_lines(format_build_report(report, output, root));
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::purge::PurgeResult;
    use crate::styles::CompiledStylesheet;
    use crate::thumbnails::ThumbnailSummary;
    use std::path::PathBuf;

    #[test]
    fn indent_levels() {
        assert_eq!(indent(0), "");
        assert_eq!(indent(2), "        ");
    }

    #[test]
    fn display_path_relative_to_root() {
        assert_eq!(
            display_path(Path::new("/site/_site/CNAME"), Path::new("/site")),
            "_site/CNAME"
        );
        assert_eq!(
            display_path(Path::new("/elsewhere/x"), Path::new("/site")),
            "/elsewhere/x"
        );
    }

    // =========================================================================
    // Check formatting
    // =========================================================================

    fn report() -> CheckReport {
        CheckReport {
            entry_counts: vec![(Category::Featured, 2), (Category::Ports, 1)],
            image_count: 5,
            placeholders: vec![(Category::Crap, "beta".to_string())],
            collisions: vec![("alpha".to_string(), "alpha_beta".to_string())],
            unenriched_ports: 1,
            orphan_images: vec!["stray_1.avif".to_string()],
        }
    }

    #[test]
    fn check_report_sections() {
        let lines = format_check_report(&report());
        assert_eq!(
            lines,
            vec![
                "Maps",
                "    featured: 2",
                "    ports: 1 (not enriched)",
                "    images: 5",
                "Placeholders",
                "    crap: beta",
                "Prefix collisions",
                "    alpha / alpha_beta",
                "Unused images",
                "    stray_1.avif",
            ]
        );
    }

    #[test]
    fn clean_check_report_has_only_counts() {
        let report = CheckReport {
            entry_counts: vec![(Category::Featured, 1)],
            image_count: 1,
            ..CheckReport::default()
        };
        assert_eq!(
            format_check_report(&report),
            vec!["Maps", "    featured: 1", "    images: 1"]
        );
    }

    // =========================================================================
    // Thumbnail event formatting
    // =========================================================================

    #[test]
    fn thumbnail_events() {
        assert_eq!(
            format_thumbnail_event(&ThumbnailEvent::Started { total: 3 }),
            vec!["Thumbnails (3 images)"]
        );
        assert_eq!(
            format_thumbnail_event(&ThumbnailEvent::Processing {
                filename: "alps_1.avif".to_string(),
                width: 600
            }),
            vec!["    alps_1.avif \u{2192} 600px"]
        );
        assert_eq!(
            format_thumbnail_event(&ThumbnailEvent::Failed {
                filename: "bad.avif".to_string(),
                error: "corrupt".to_string()
            }),
            vec!["    bad.avif: FAILED (corrupt)"]
        );
        assert_eq!(
            format_thumbnail_event(&ThumbnailEvent::Finished { count: 3 }),
            vec!["Generated 3 thumbnails"]
        );
    }

    // =========================================================================
    // Build formatting
    // =========================================================================

    fn css_report(root: &Path) -> CssReport {
        CssReport {
            compiled: vec![CompiledStylesheet {
                source: root.join("css/main.scss"),
                output: root.join("_site/assets/main.css"),
                bytes: 120,
            }],
            purged: vec![PurgeResult {
                file: root.join("_site/assets/main.css"),
                bytes_before: 120,
                bytes_after: 40,
            }],
        }
    }

    #[test]
    fn css_report_lines() {
        let root = Path::new("/site");
        assert_eq!(
            format_css_report(&css_report(root), root),
            vec![
                "Stylesheets",
                "    css/main.scss \u{2192} _site/assets/main.css (120 bytes)",
                "    purged _site/assets/main.css: 120 \u{2192} 40 bytes",
            ]
        );
    }

    #[test]
    fn build_report_lines() {
        let root = Path::new("/site");
        let output = root.join("_site");
        let report = BuildReport {
            copied: vec![output.join("CNAME")],
            html: MinifySummary {
                files: 2,
                bytes_before: 300,
                bytes_after: 200,
            },
            after_build: AfterBuildReport {
                css: css_report(root),
                thumbnails: ThumbnailSummary {
                    jobs: Vec::new(),
                    output_dir: PathBuf::from("/site/_site/maps"),
                },
            },
        };

        let lines = format_build_report(&report, &output, root);
        assert_eq!(lines[0], "Passthrough");
        assert_eq!(lines[1], "    CNAME");
        assert_eq!(lines[2], "HTML: minified 2 files (300 \u{2192} 200 bytes)");
        assert_eq!(lines[3], "Stylesheets");
        assert_eq!(lines.last().unwrap(), "Thumbnails: 0 (0 featured) \u{2192} _site/maps");
    }
}
