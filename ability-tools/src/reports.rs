use ability_data::{
    DatasetSource, Distribution, DiversityReport, Recommendation, SampleSize, ValueStats, Verdict,
};
use anyhow::Result;
use colored::{ColoredString, Colorize};
use std::fmt::Display;
use std::io::Write;

const RULE: &str = "================================================================";
const SECTION_RULE: &str = "----------------------------------------------------------------";
const LISTING_LIMIT: usize = 5;

/// Severity marker plus the two lines printed for a recommendation.
pub fn recommendation_text(recommendation: &Recommendation) -> (&'static str, String, String) {
    match recommendation {
        Recommendation::SampleSize(SampleSize::TooSmall {
            current,
            minimum,
            robust,
            ideal,
        }) => (
            "❌",
            "Sample size too small for fine-tuning".to_string(),
            format!("Current: {current} | Recommended: {minimum}-{robust}+ | Ideal: {ideal}+"),
        ),
        Recommendation::SampleSize(SampleSize::LowEnd { current, robust }) => (
            "⚠️",
            "Sample size on the low end".to_string(),
            format!("Current: {current} | Recommended: {robust}+ for robust training"),
        ),
        Recommendation::SampleSize(SampleSize::Adequate { current }) => (
            "✅",
            "Sample size adequate for fine-tuning".to_string(),
            format!("Current: {current}"),
        ),
        Recommendation::ThinElementCoverage {
            avg_samples,
            target_low,
            target_high,
        } => (
            "⚠️",
            format!("Only {avg_samples:.1} samples per element combo"),
            format!("Recommend: {target_low}-{target_high}+ samples per combination for good coverage"),
        ),
        Recommendation::UnevenElements { evenness_percent } => (
            "⚠️",
            format!("Uneven distribution ({evenness_percent:.1}% evenness)"),
            "Some combinations are underrepresented - consider balancing".to_string(),
        ),
        Recommendation::LowSequenceDiversity { diversity_percent } => (
            "⚠️",
            format!("Low sequence diversity ({diversity_percent:.1}%)"),
            "Consider adding more varied ability mechanics".to_string(),
        ),
    }
}

fn source_label(source: &DatasetSource) -> String {
    match source {
        DatasetSource::Fixed(path) => format!("{} (repaired)", path.display()),
        DatasetSource::RawFallback(path) => format!("{} (raw fallback)", path.display()),
    }
}

fn verdict_colored(verdict: Verdict) -> ColoredString {
    let text = format!("{verdict} - {}", verdict.summary());
    match verdict {
        Verdict::Excellent => text.as_str().bright_green().bold(),
        Verdict::Good => text.as_str().green(),
        Verdict::Moderate => text.as_str().yellow(),
        Verdict::Low => text.as_str().red().bold(),
    }
}

fn section(out: &mut dyn Write, title: &str) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", title.bright_yellow().bold())?;
    writeln!(out, "{}", SECTION_RULE.yellow())?;
    Ok(())
}

fn write_counts<K: Display>(
    out: &mut dyn Write,
    entries: &[(&K, usize)],
    total: usize,
) -> Result<()> {
    for (key, count) in entries {
        if total == 0 {
            writeln!(out, "  {count:3}  {key}")?;
        } else {
            let pct = ability_data::numbers::percent(*count, total);
            writeln!(out, "  {count:3} ({pct:5.1}%)  {key}")?;
        }
    }
    Ok(())
}

fn write_value_stats(out: &mut dyn Write, name: &str, stats: Option<&ValueStats>) -> Result<()> {
    writeln!(out, "{}:", name.to_uppercase())?;
    match stats {
        Some(stats) => {
            writeln!(
                out,
                "  Range: {:.1} - {:.1} (avg: {:.1})",
                stats.min, stats.max, stats.avg
            )?;
            writeln!(out, "  Unique values: {}", stats.unique_values)?;
            writeln!(out, "  Entropy: {:.2} bits", stats.entropy)?;
        }
        None => writeln!(out, "  {}", "no values recorded".dimmed())?,
    }
    Ok(())
}

fn bottom<K: Ord>(distribution: &Distribution<K>) -> Vec<(&K, usize)> {
    let ranked = distribution.by_count();
    let skip = ranked.len().saturating_sub(LISTING_LIMIT);
    ranked.into_iter().skip(skip).collect()
}

pub fn generate_console_report(
    out: &mut dyn Write,
    report: &DiversityReport,
    source: &DatasetSource,
) -> Result<()> {
    writeln!(out)?;
    writeln!(
        out,
        "{}",
        "📊 Ability Training Data Diversity Analysis"
            .bright_cyan()
            .bold()
    )?;
    writeln!(out, "{}", RULE.cyan())?;
    writeln!(out, "Source: {}", source_label(source))?;
    writeln!(out, "Total entries: {}", report.total_entries)?;

    let elements = &report.elements;
    section(out, "1. Element Combinations")?;
    writeln!(
        out,
        "Unique combinations: {}/{}",
        elements.unique_combinations, elements.max_possible
    )?;
    writeln!(out, "Coverage: {:.1}%", elements.coverage_percent)?;
    writeln!(
        out,
        "Samples per combo: {}-{} (avg: {:.1})",
        elements.min_samples, elements.max_samples, elements.avg_samples
    )?;
    writeln!(
        out,
        "Distribution evenness: {:.1}% (100% = perfectly balanced)",
        elements.evenness_percent
    )?;
    writeln!(
        out,
        "Entropy: {:.2} bits (max: {:.2})",
        elements.entropy, elements.max_entropy
    )?;
    let ranked = elements.distribution.by_count();
    writeln!(out, "\nTop {LISTING_LIMIT} combinations:")?;
    write_counts(out, &ranked[..ranked.len().min(LISTING_LIMIT)], 0)?;
    writeln!(out, "\nBottom {LISTING_LIMIT} combinations:")?;
    write_counts(out, &bottom(&elements.distribution), 0)?;

    let actions = &report.actions;
    section(out, "2. Action Types")?;
    writeln!(out, "Unique actions: {}", actions.unique_actions)?;
    writeln!(out, "Action entropy: {:.2} bits", actions.entropy)?;
    writeln!(
        out,
        "Unique action sequences: {} ({:.1}%)",
        actions.unique_sequences, actions.sequence_diversity_percent
    )?;
    writeln!(out, "Sequence entropy: {:.2} bits", actions.sequence_entropy)?;
    writeln!(out, "\nAction distribution:")?;
    write_counts(
        out,
        &actions.action_distribution.by_count(),
        actions.action_distribution.total(),
    )?;

    if let Some(melee) = &report.melee {
        section(out, "3. Melee Attacks")?;
        writeln!(
            out,
            "Shapes: {} (entropy: {:.2})",
            melee.shapes.unique(),
            melee.shape_entropy
        )?;
        write_counts(out, &melee.shapes.by_count(), 0)?;
        writeln!(
            out,
            "\nMovements: {} (entropy: {:.2})",
            melee.movements.unique(),
            melee.movement_entropy
        )?;
        write_counts(out, &melee.movements.by_count(), 0)?;
        writeln!(
            out,
            "\nShape/movement combinations: {}",
            melee.shape_movement_combos.unique()
        )?;
    }

    let status = &report.status_effects;
    section(out, "4. Status Effects")?;
    writeln!(out, "Unique statuses: {}", status.unique_statuses)?;
    writeln!(out, "Entropy: {:.2} bits", status.entropy)?;
    write_counts(out, &status.distribution.by_count(), 0)?;

    let complexity = &report.complexity;
    section(out, "5. Ability Complexity")?;
    writeln!(
        out,
        "Scripts per ability: {}-{} (avg: {:.1})",
        complexity.min_scripts, complexity.max_scripts, complexity.avg_scripts_per_ability
    )?;
    writeln!(
        out,
        "Nesting depth: {}-{} (avg: {:.1})",
        complexity.min_nesting_depth, complexity.max_nesting_depth, complexity.avg_nesting_depth
    )?;
    writeln!(
        out,
        "Complexity entropy: {:.2} bits",
        complexity.complexity_entropy
    )?;

    section(out, "6. Parameter Values")?;
    for (name, stats) in report.parameters.entries() {
        write_value_stats(out, name, stats)?;
    }

    writeln!(out)?;
    writeln!(out, "{}", "🏆 Overall Diversity Score".bright_cyan().bold())?;
    writeln!(out, "{}", RULE.cyan())?;
    for (name, value) in report.score.components() {
        writeln!(out, "  {name:<20} {value:5.1}")?;
    }
    writeln!(out, "Score: {:.1}/100", report.score.overall)?;
    writeln!(out, "Verdict: {}", verdict_colored(report.score.verdict))?;

    writeln!(out)?;
    writeln!(out, "{}", "💡 Recommendations".bright_cyan().bold())?;
    writeln!(out, "{}", RULE.cyan())?;
    for recommendation in &report.recommendations {
        let (marker, headline, detail) = recommendation_text(recommendation);
        let headline = if recommendation.is_ok() {
            headline.as_str().green()
        } else {
            headline.as_str().yellow()
        };
        writeln!(out, "{marker} {headline}")?;
        writeln!(out, "   {detail}")?;
    }
    Ok(())
}

pub fn generate_json_report(out: &mut dyn Write, report: &DiversityReport) -> Result<()> {
    let json_output = serde_json::to_string_pretty(report)?;
    writeln!(out, "{json_output}")?;
    Ok(())
}

pub fn generate_markdown_report(
    out: &mut dyn Write,
    report: &DiversityReport,
    source: &DatasetSource,
) -> Result<()> {
    writeln!(out, "# Ability Training Data Diversity Report\n")?;
    writeln!(out, "- **Source**: {}", source_label(source))?;
    writeln!(out, "- **Total entries**: {}", report.total_entries)?;
    writeln!(
        out,
        "- **Diversity score**: {:.1}/100 ({} - {})\n",
        report.score.overall,
        report.score.verdict,
        report.score.verdict.summary()
    )?;

    writeln!(out, "## Score Components\n")?;
    writeln!(out, "| Component | Score |")?;
    writeln!(out, "|-----------|------:|")?;
    for (name, value) in report.score.components() {
        writeln!(out, "| {name} | {value:.1} |")?;
    }

    let elements = &report.elements;
    writeln!(out, "\n## Element Combinations\n")?;
    writeln!(
        out,
        "- **Coverage**: {}/{} ({:.1}%)",
        elements.unique_combinations, elements.max_possible, elements.coverage_percent
    )?;
    writeln!(
        out,
        "- **Evenness**: {:.1}% ({:.2} of {:.2} bits)",
        elements.evenness_percent, elements.entropy, elements.max_entropy
    )?;
    writeln!(
        out,
        "- **Samples per combo**: {}-{} (avg {:.1})\n",
        elements.min_samples, elements.max_samples, elements.avg_samples
    )?;
    writeln!(out, "| Combination | Count |")?;
    writeln!(out, "|-------------|------:|")?;
    for (pair, count) in elements.distribution.by_count() {
        writeln!(out, "| {pair} | {count} |")?;
    }

    let actions = &report.actions;
    writeln!(out, "\n## Actions\n")?;
    writeln!(
        out,
        "- **Unique actions**: {} ({:.2} bits)",
        actions.unique_actions, actions.entropy
    )?;
    writeln!(
        out,
        "- **Unique sequences**: {} ({:.1}% diversity, {:.2} bits)",
        actions.unique_sequences, actions.sequence_diversity_percent, actions.sequence_entropy
    )?;
    for (action, count) in actions.action_distribution.by_count() {
        writeln!(out, "  - `{action}`: {count}")?;
    }

    if let Some(melee) = &report.melee {
        writeln!(out, "\n## Melee Attacks\n")?;
        writeln!(
            out,
            "- **Shapes**: {} ({:.2} bits)",
            melee.shapes.unique(),
            melee.shape_entropy
        )?;
        writeln!(
            out,
            "- **Movements**: {} ({:.2} bits)",
            melee.movements.unique(),
            melee.movement_entropy
        )?;
        for ((shape, movement), count) in melee.shape_movement_combos.by_count() {
            writeln!(out, "  - `{shape}` / `{movement}`: {count}")?;
        }
    }

    let status = &report.status_effects;
    writeln!(out, "\n## Status Effects\n")?;
    writeln!(
        out,
        "- **Unique statuses**: {} ({:.2} bits)",
        status.unique_statuses, status.entropy
    )?;
    for (name, count) in status.distribution.by_count() {
        writeln!(out, "  - `{name}`: {count}")?;
    }

    let complexity = &report.complexity;
    writeln!(out, "\n## Complexity\n")?;
    writeln!(
        out,
        "- **Scripts per ability**: {}-{} (avg {:.1})",
        complexity.min_scripts, complexity.max_scripts, complexity.avg_scripts_per_ability
    )?;
    writeln!(
        out,
        "- **Nesting depth**: {}-{} (avg {:.1})",
        complexity.min_nesting_depth, complexity.max_nesting_depth, complexity.avg_nesting_depth
    )?;

    writeln!(out, "\n## Parameters\n")?;
    writeln!(out, "| Parameter | Count | Min | Max | Avg | Unique | Entropy |")?;
    writeln!(out, "|-----------|------:|----:|----:|----:|-------:|--------:|")?;
    for (name, stats) in report.parameters.entries() {
        match stats {
            Some(s) => writeln!(
                out,
                "| {name} | {} | {:.1} | {:.1} | {:.1} | {} | {:.2} |",
                s.count, s.min, s.max, s.avg, s.unique_values, s.entropy
            )?,
            None => writeln!(out, "| {name} | 0 | - | - | - | - | - |")?,
        }
    }

    writeln!(out, "\n## Recommendations\n")?;
    for recommendation in &report.recommendations {
        let (marker, headline, detail) = recommendation_text(recommendation);
        writeln!(out, "- {marker} **{headline}**: {detail}")?;
    }
    Ok(())
}
