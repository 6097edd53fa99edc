// Colored terminal output for calibration grids, ranked tables and projections.
//
// This module handles all terminal-specific formatting: colors, tables,
// spinners. The main.rs command handlers delegate here.

use anyhow::Result;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use crate::calibration::{CalibrationResult, PairEvaluation, PairOutcome};
use crate::error::ScoreError;
use crate::ranking::{BuzzwordReport, RankReport, RankedTable};

/// Spinner shown while embedding files load. Call `finish_and_clear` when done.
pub fn spinner(message: impl Into<String>) -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("  {spinner} {msg} ({elapsed})")?);
    pb.set_message(message.into());
    pb.enable_steady_tick(std::time::Duration::from_millis(120));
    Ok(pb)
}

/// Display every evaluated (space, axis) pair, marking the winner.
pub fn display_calibration_grid(evaluations: &[PairEvaluation], best: &CalibrationResult) {
    println!(
        "\n{}",
        format!("=== Calibration ({} pairs) ===", evaluations.len()).bold()
    );
    println!();

    println!(
        "  {:<28} {:<16} {:>8}  {:>6}  {:>7}",
        "Space".dimmed(),
        "Axis".dimmed(),
        "Error".dimmed(),
        "Terms".dimmed(),
        "Missing".dimmed(),
    );
    println!("  {}", "-".repeat(72).dimmed());

    for eval in evaluations {
        let is_best = eval.space_index == best.space_index && eval.axis_index == best.axis_index;
        let marker = if is_best { "*".green().bold() } else { " ".normal() };
        let space = super::truncate_chars(&eval.space_id, 25);

        match &eval.outcome {
            PairOutcome::Scored {
                mean_error,
                evaluated,
            } => println!(
                "{} {:<28} {:<16} {:>8}  {:>6}  {:>7}",
                marker,
                space,
                eval.axis_name,
                colorize_error(*mean_error),
                evaluated,
                eval.missing_terms.len(),
            ),
            PairOutcome::EmptyPole(e) => println!(
                "  {:<28} {:<16} {}",
                space,
                eval.axis_name,
                format!("skipped: {e}").dimmed()
            ),
            PairOutcome::NoTerms => println!(
                "  {:<28} {:<16} {}",
                space,
                eval.axis_name,
                "skipped: no labeled terms in vocabulary".dimmed()
            ),
        }
    }

    println!();
    println!(
        "  {} {} on {} (mean error {:.4} over {} terms)",
        "Best:".bold(),
        best.axis_name.green().bold(),
        best.space_id,
        best.mean_error,
        best.evaluated_terms
    );
}

/// Display the top rows of a ranked table.
pub fn display_ranked_table(title: &str, table: &RankedTable, limit: usize) {
    if table.is_empty() {
        println!("No terms scored. Check that the seed terms exist in the embedding space.");
        return;
    }

    println!(
        "\n{}",
        format!("=== {title} ({} terms) ===", table.len()).bold()
    );
    println!();

    println!(
        "  {:>4}  {:<28} {:>7}  {}",
        "Rank".dimmed(),
        "Term".dimmed(),
        "Score".dimmed(),
        "Source terms".dimmed(),
    );
    println!("  {}", "-".repeat(72).dimmed());

    for (i, row) in table.rows().iter().take(limit).enumerate() {
        println!(
            "  {:>4}. {:<28} {:>7}  {}",
            i + 1,
            super::truncate_chars(&row.term, 26),
            colorize_score(row.score),
            super::truncate_chars(&row.sources_joined(), 40).dimmed(),
        );
    }

    if table.len() > limit {
        println!("  {}", format!("... {} more", table.len() - limit).dimmed());
    }
}

/// Display signed projections onto the calibrated axis.
pub fn display_projections(axis_name: &str, projections: &[(String, Result<f64, ScoreError>)]) {
    println!("\n{}", format!("=== Projections on '{axis_name}' ===").bold());
    println!();

    for (word, projection) in projections {
        match projection {
            Ok(p) => {
                let lean = if *p > 0.0 {
                    "left".cyan()
                } else if *p < 0.0 {
                    "right".magenta()
                } else {
                    "none".dimmed()
                };
                println!(
                    "  {:<28} {:>+7.3}  |{:.3}|  {}",
                    super::truncate_chars(word, 26),
                    p,
                    p.abs(),
                    lean
                );
            }
            Err(e) => println!(
                "  {:<28} {}",
                super::truncate_chars(word, 26),
                e.to_string().dimmed()
            ),
        }
    }
}

pub fn display_rank_report(report: &RankReport) {
    println!(
        "  Seeds ranked: {}  |  Neighbors skipped: {}",
        report.seeds_ranked, report.skipped_neighbors
    );
    if !report.missing_seeds.is_empty() {
        println!(
            "  {} {} seed terms not in vocabulary: {}",
            "~".yellow(),
            report.missing_seeds.len(),
            super::truncate_chars(&report.missing_seeds.join(", "), 100).dimmed()
        );
    }
}

pub fn display_buzzword_report(report: &BuzzwordReport) {
    if !report.missing_reference_terms.is_empty() {
        println!(
            "  {} reference terms not in vocabulary: {}",
            "!".bright_red(),
            report.missing_reference_terms.join(", ")
        );
    }
    if !report.skipped_seeds.is_empty() {
        println!(
            "  {} {} seed terms not in vocabulary: {}",
            "~".yellow(),
            report.skipped_seeds.len(),
            super::truncate_chars(&report.skipped_seeds.join(", "), 100).dimmed()
        );
    }
    if !report.excluded_neighbors.is_empty() {
        println!(
            "  {} {} neighbors could not be scored",
            "~".yellow(),
            report.excluded_neighbors.len()
        );
    }
}

/// Colorize a calibration error: lower is better.
fn colorize_error(error: f64) -> colored::ColoredString {
    let text = format!("{error:.4}");
    if error < 0.3 {
        text.green()
    } else if error < 0.5 {
        text.yellow()
    } else {
        text.red()
    }
}

/// Colorize a score by how loaded it is.
fn colorize_score(score: f64) -> colored::ColoredString {
    let text = format!("{score:.3}");
    if score >= 0.75 {
        text.red().bold()
    } else if score >= 0.5 {
        text.bright_red()
    } else if score >= 0.25 {
        text.yellow()
    } else {
        text.normal()
    }
}
