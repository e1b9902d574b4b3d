//! Terminal report for a claim analysis.
//!
//! Renders a [`ClassificationResult`] as a card: headline prediction, the
//! primary ranking, then one section per category with its indicators in
//! the order the model returned them.

use std::fmt::Write;

use greenlens_core::{ClassificationResult, LabelTaxonomy, Score};

const LABEL_WIDTH: usize = 42;
const BAR_WIDTH: usize = 20;

// ── Public API ──

/// Print a result as a vertical report.
pub fn print_report(result: &ClassificationResult) {
    print!("{}", render_report(result));
}

/// Render a result as the text printed by [`print_report`].
pub fn render_report(result: &ClassificationResult) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "=== {} ({}) ===",
        result.prediction,
        percent(result.confidence)
    );
    out.push('\n');

    render_section(&mut out, "Primary categories", &result.scores);

    // Taxonomy order reads better than the map's alphabetical order.
    for category in LabelTaxonomy::standard().primary_labels() {
        if let Some(scores) = result.detailed_analysis.get(category) {
            render_section(&mut out, category, scores);
        }
    }
    out
}

// ── Section rendering ──

fn render_section(out: &mut String, header: &str, scores: &[Score]) {
    if scores.is_empty() {
        return;
    }
    let _ = writeln!(out, "{header}");
    for score in scores {
        let _ = writeln!(
            out,
            "  {:<width$} {:>6}  {}",
            score.label,
            percent(score.score),
            bar(score.score),
            width = LABEL_WIDTH
        );
    }
    out.push('\n');
}

fn percent(score: f32) -> String {
    format!("{:.1}%", score * 100.0)
}

fn bar(score: f32) -> String {
    let filled = (score.clamp(0.0, 1.0) * BAR_WIDTH as f32).round() as usize;
    format!("{}{}", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn sample() -> ClassificationResult {
        let mut detailed = BTreeMap::new();
        detailed.insert(
            "Genuine Sustainability".to_string(),
            vec![Score::new("Verified sustainable practice", 0.81)],
        );
        detailed.insert(
            "Greenwashing".to_string(),
            vec![Score::new("Vague sustainability statement", 0.12)],
        );
        detailed.insert("Marketing Hype".to_string(), vec![]);
        ClassificationResult {
            prediction: "Genuine Sustainability".into(),
            confidence: 0.734,
            scores: vec![
                Score::new("Genuine Sustainability", 0.734),
                Score::new("Marketing Hype", 0.166),
                Score::new("Greenwashing", 0.1),
            ],
            detailed_analysis: detailed,
        }
    }

    #[test]
    fn headline_shows_prediction_and_confidence() {
        let report = render_report(&sample());
        assert!(report.starts_with("=== Genuine Sustainability (73.4%) ==="));
    }

    #[test]
    fn categories_in_taxonomy_order_and_empty_skipped() {
        let report = render_report(&sample());
        let greenwashing = report.find("\nGreenwashing\n").unwrap();
        let genuine = report.find("\nGenuine Sustainability\n").unwrap();
        assert!(greenwashing < genuine);
        assert!(!report.contains("\nMarketing Hype\n"));
        assert!(report.contains("Verified sustainable practice"));
    }

    #[test]
    fn bar_is_clamped() {
        assert_eq!(bar(0.0), ".".repeat(BAR_WIDTH));
        assert_eq!(bar(1.5), "#".repeat(BAR_WIDTH));
        assert_eq!(bar(0.5).matches('#').count(), BAR_WIDTH / 2);
    }
}
