use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::io::Write;

use modcalc_engine::{AffixCatalog, AffixOdds, MAX_ENHANCEMENTS, StrengthenOutcome, UpgradePath};

/// Successful paths shown before the rest are summarized.
const SUCCESS_PATH_PREVIEW: usize = 10;
/// Failed paths are only listed when there are at most this many.
const FAILED_PATH_SHOW_MAX: usize = 20;
const FAILED_PATH_PREVIEW: usize = 5;

pub fn generate_json_report<T: Serialize>(out: &mut dyn Write, value: &T) -> Result<()> {
    let json_output = serde_json::to_string_pretty(value)?;
    writeln!(out, "{json_output}")?;
    Ok(())
}

/// One-line rendering of a path, slots numbered from 1.
pub fn describe_path(path: &UpgradePath) -> String {
    let steps: Vec<String> = path
        .steps
        .iter()
        .map(|step| format!("#{} slot {}→{}", step.step, step.slot + 1, step.new_level))
        .collect();
    let mut line = if steps.is_empty() {
        "no upgrades".to_string()
    } else {
        steps.join(", ")
    };
    line.push_str(&format!(" ⇒ {}", path.final_levels));
    if path.stalled() {
        line.push_str(" (stalled)");
    }
    line
}

/// Paths picked for display, plus how many were left out.
struct PathPreview<'a> {
    shown: Vec<&'a UpgradePath>,
    hidden: usize,
}

fn preview_successes(outcome: &StrengthenOutcome) -> PathPreview<'_> {
    let all: Vec<&UpgradePath> = outcome.successful_paths().collect();
    let hidden = all.len().saturating_sub(SUCCESS_PATH_PREVIEW);
    PathPreview {
        shown: all.into_iter().take(SUCCESS_PATH_PREVIEW).collect(),
        hidden,
    }
}

fn preview_failures(outcome: &StrengthenOutcome) -> Option<PathPreview<'_>> {
    let all: Vec<&UpgradePath> = outcome.failed_paths().collect();
    if all.is_empty() || all.len() > FAILED_PATH_SHOW_MAX {
        return None;
    }
    let hidden = all.len().saturating_sub(FAILED_PATH_PREVIEW);
    Some(PathPreview {
        shown: all.into_iter().take(FAILED_PATH_PREVIEW).collect(),
        hidden,
    })
}

pub fn generate_strengthen_console(out: &mut dyn Write, outcome: &StrengthenOutcome) -> Result<()> {
    writeln!(out, "{}", "🔨 Strengthen Odds".bright_cyan().bold())?;
    writeln!(out, "{}", "==================".cyan())?;
    writeln!(out, "Initial levels: {}", outcome.initial)?;
    writeln!(out, "Target levels:  {}", outcome.target)?;
    writeln!(out, "Mode:           {}", outcome.mode)?;
    writeln!(out, "Upgrades:       {MAX_ENHANCEMENTS}")?;
    writeln!(out, "{}", "-".repeat(40))?;
    writeln!(
        out,
        "Successful outcomes: {}",
        outcome.successful_outcomes.to_string().green()
    )?;
    writeln!(out, "Total outcomes:      {}", outcome.total_outcomes)?;
    writeln!(out, "Probability:         {:.6}", outcome.probability)?;
    writeln!(
        out,
        "Probability:         {}",
        format!("{:.4}%", outcome.probability_percent).bold()
    )?;

    let Some(paths) = outcome.paths.as_ref() else {
        return Ok(());
    };
    writeln!(out)?;
    writeln!(out, "Recorded paths: {}", paths.len())?;

    let successes = preview_successes(outcome);
    if !successes.shown.is_empty() {
        writeln!(out)?;
        writeln!(out, "{}", "✅ Successful paths".green().bold())?;
        for (idx, path) in successes.shown.iter().enumerate() {
            writeln!(out, "  {:>2}. {}", idx + 1, describe_path(path))?;
        }
        if successes.hidden > 0 {
            writeln!(out, "  ... {} more successful paths", successes.hidden)?;
        }
    }

    if let Some(failures) = preview_failures(outcome) {
        writeln!(out)?;
        writeln!(out, "{}", "❌ Failed paths".red().bold())?;
        for (idx, path) in failures.shown.iter().enumerate() {
            writeln!(out, "  {:>2}. {}", idx + 1, describe_path(path))?;
        }
        if failures.hidden > 0 {
            writeln!(out, "  ... {} more failed paths", failures.hidden)?;
        }
    }
    Ok(())
}

pub fn generate_strengthen_markdown(out: &mut dyn Write, outcome: &StrengthenOutcome) -> Result<()> {
    writeln!(out, "# Strengthen Odds\n")?;
    writeln!(out, "- **Initial levels**: {}", outcome.initial)?;
    writeln!(out, "- **Target levels**: {}", outcome.target)?;
    writeln!(out, "- **Mode**: {}", outcome.mode)?;
    writeln!(out, "- **Upgrades**: {MAX_ENHANCEMENTS}")?;
    writeln!(
        out,
        "- **Successful outcomes**: {}",
        outcome.successful_outcomes
    )?;
    writeln!(out, "- **Total outcomes**: {}", outcome.total_outcomes)?;
    writeln!(
        out,
        "- **Probability**: {:.6} ({:.4}%)",
        outcome.probability, outcome.probability_percent
    )?;

    if outcome.paths.is_none() {
        return Ok(());
    }

    let successes = preview_successes(outcome);
    if !successes.shown.is_empty() {
        writeln!(out, "\n## Successful Paths\n")?;
        for path in &successes.shown {
            writeln!(out, "- {}", describe_path(path))?;
        }
        if successes.hidden > 0 {
            writeln!(out, "- _… {} more_", successes.hidden)?;
        }
    }
    if let Some(failures) = preview_failures(outcome) {
        writeln!(out, "\n## Failed Paths\n")?;
        for path in &failures.shown {
            writeln!(out, "- {}", describe_path(path))?;
        }
        if failures.hidden > 0 {
            writeln!(out, "- _… {} more_", failures.hidden)?;
        }
    }
    Ok(())
}

fn affix_label(catalog: &AffixCatalog, id: u8) -> String {
    catalog
        .by_id(id)
        .map_or_else(|| format!("#{id}"), |affix| format!("#{id} {}", affix.name))
}

pub fn generate_affix_console(
    out: &mut dyn Write,
    odds: &AffixOdds,
    catalog: &AffixCatalog,
) -> Result<()> {
    writeln!(out, "{}", "🎲 Affix Range Odds".bright_cyan().bold())?;
    writeln!(out, "{}", "===================".cyan())?;
    writeln!(out, "Affix slots:  {}", odds.slot_count)?;
    writeln!(out, "Target range:")?;
    for &id in &odds.target_range {
        writeln!(out, "  • {}", affix_label(catalog, id))?;
    }
    writeln!(out, "{}", "-".repeat(40))?;
    writeln!(
        out,
        "Valid combinations: {}",
        odds.valid_combinations.to_string().green()
    )?;
    writeln!(out, "Total combinations: {}", odds.total_combinations)?;
    writeln!(out, "Probability:        {:.6}", odds.probability)?;
    writeln!(
        out,
        "Probability:        {}",
        format!("{:.4}%", odds.probability_percent).bold()
    )?;

    if let Some(combinations) = odds.combinations.as_ref() {
        writeln!(out)?;
        writeln!(out, "Winning draws ({}):", combinations.len())?;
        for combo in combinations {
            let ids: Vec<String> = combo.iter().map(u8::to_string).collect();
            writeln!(out, "  [{}]", ids.join(", "))?;
        }
    }
    Ok(())
}

pub fn generate_affix_markdown(
    out: &mut dyn Write,
    odds: &AffixOdds,
    catalog: &AffixCatalog,
) -> Result<()> {
    writeln!(out, "# Affix Range Odds\n")?;
    writeln!(out, "- **Affix slots**: {}", odds.slot_count)?;
    let labels: Vec<String> = odds
        .target_range
        .iter()
        .map(|&id| affix_label(catalog, id))
        .collect();
    writeln!(out, "- **Target range**: {}", labels.join(", "))?;
    writeln!(out, "- **Valid combinations**: {}", odds.valid_combinations)?;
    writeln!(out, "- **Total combinations**: {}", odds.total_combinations)?;
    writeln!(
        out,
        "- **Probability**: {:.6} ({:.4}%)",
        odds.probability, odds.probability_percent
    )?;

    if let Some(combinations) = odds.combinations.as_ref() {
        writeln!(out, "\n## Winning Draws\n")?;
        for combo in combinations {
            let ids: Vec<String> = combo.iter().map(u8::to_string).collect();
            writeln!(out, "- {}", ids.join(", "))?;
        }
    }
    Ok(())
}

pub fn generate_catalog_console(out: &mut dyn Write, catalog: &AffixCatalog) -> Result<()> {
    writeln!(out, "{}", "📜 Affix Pool".bright_cyan().bold())?;
    writeln!(out, "{}", "=============".cyan())?;
    for affix in &catalog.affixes {
        writeln!(
            out,
            "  {:>2}  {:28} {:8} {}",
            affix.id,
            affix.name,
            affix.category.to_string(),
            affix.description
        )?;
    }
    Ok(())
}

pub fn generate_catalog_markdown(out: &mut dyn Write, catalog: &AffixCatalog) -> Result<()> {
    writeln!(out, "# Affix Pool\n")?;
    writeln!(out, "| ID | Name | Category | Description |")?;
    writeln!(out, "|----|------|----------|-------------|")?;
    for affix in &catalog.affixes {
        writeln!(
            out,
            "| {} | {} | {} | {} |",
            affix.id, affix.name, affix.category, affix.description
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use modcalc_engine::{ComparisonMode, StrengthenOptions, affix_odds, compute_raw};

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut dyn Write) -> Result<()>,
    {
        let mut buf: Vec<u8> = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn outcome_with_paths(initial: &[i64], target: &[i64]) -> StrengthenOutcome {
        compute_raw(
            initial,
            target,
            StrengthenOptions::new(ComparisonMode::PositionWise).with_paths(None),
        )
        .unwrap()
    }

    #[test]
    fn describe_path_numbers_slots_from_one() {
        let outcome = outcome_with_paths(&[5, 5, 5, 4], &[5, 5, 5, 5]);
        let path = &outcome.paths.as_ref().unwrap()[0];
        assert_eq!(
            describe_path(path),
            "#1 slot 4→5 ⇒ [5, 5, 5, 5] (stalled)"
        );
    }

    #[test]
    fn console_report_truncates_successful_paths() {
        let outcome = outcome_with_paths(&[1, 1, 1, 1], &[1, 1, 1, 1]);
        let text = render(|out| generate_strengthen_console(out, &outcome));
        assert!(text.contains("Total outcomes:      1020"));
        assert!(text.contains("... 1010 more successful paths"));
        assert!(!text.contains("Failed paths"));
    }

    #[test]
    fn console_report_lists_few_failures() {
        // 15 runs: ten split the upgrades 2/3 and succeed, five put four
        // into the last slot and fail.
        let outcome = outcome_with_paths(&[5, 5, 3, 1], &[5, 5, 5, 4]);
        assert_eq!(outcome.total_outcomes, 15);
        assert_eq!(outcome.failed_paths().count(), 5);
        let text = render(|out| generate_strengthen_console(out, &outcome));
        assert!(text.contains("Failed paths"));
    }

    #[test]
    fn console_report_skips_paths_when_not_recorded() {
        let outcome = compute_raw(&[1, 1, 1, 1], &[2, 2, 2, 2], StrengthenOptions::default()).unwrap();
        let text = render(|out| generate_strengthen_console(out, &outcome));
        assert!(!text.contains("Recorded paths"));
        assert!(text.contains("order-independent"));
    }

    #[test]
    fn markdown_report_has_summary() {
        let outcome = outcome_with_paths(&[1, 1, 1, 1], &[2, 2, 2, 2]);
        let text = render(|out| generate_strengthen_markdown(out, &outcome));
        assert!(text.starts_with("# Strengthen Odds"));
        assert!(text.contains("- **Successful outcomes**: 240"));
        assert!(text.contains("## Successful Paths"));
    }

    #[test]
    fn json_report_is_parseable() {
        let outcome = compute_raw(&[4, 4, 4, 4], &[5, 5, 5, 5], StrengthenOptions::default()).unwrap();
        let text = render(|out| generate_json_report(out, &outcome));
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["totalOutcomes"], 24);
    }

    #[test]
    fn affix_reports_name_targets() {
        let catalog = AffixCatalog::default();
        let odds = affix_odds(2, &[7, 9, 8], true).unwrap();
        let console = render(|out| generate_affix_console(out, &odds, &catalog));
        assert!(console.contains("#7 Max HP"));
        assert!(console.contains("Winning draws (3)"));
        let markdown = render(|out| generate_affix_markdown(out, &odds, &catalog));
        assert!(markdown.contains("- **Valid combinations**: 3"));
        assert!(markdown.contains("- 7, 8"));
    }

    #[test]
    fn catalog_reports_every_affix() {
        let catalog = AffixCatalog::default();
        let console = render(|out| generate_catalog_console(out, &catalog));
        assert!(console.contains("Reload Speed"));
        let markdown = render(|out| generate_catalog_markdown(out, &catalog));
        assert_eq!(markdown.matches("\n| ").count(), 10 + 1);
    }
}
