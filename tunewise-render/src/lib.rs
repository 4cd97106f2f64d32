//! Rendering helpers (markdown and terminal text) for human-readable reports.

use tunewise_types::{LegalFlagSummary, LegalImpact, Recommendation, Report};

pub fn render_report_md(report: &Report) -> String {
    let v = &report.vehicle;
    let p = &report.preferences;

    let mut out = String::new();
    out.push_str("# tunewise recommendations\n\n");
    out.push_str(&format!(
        "- Vehicle: {} {} {} ({})\n",
        v.year,
        v.make,
        v.model,
        v.engine_type.as_str()
    ));
    out.push_str(&format!(
        "- Goals: {}\n",
        p.goals.iter().map(|g| g.as_str()).collect::<Vec<_>>().join(", ")
    ));
    out.push_str(&format!(
        "- Budget: {} (ceiling {})\n",
        p.budget_tier.as_str(),
        money(report.effective_budget)
    ));
    out.push_str(&format!("- Experience: {}\n", p.experience.as_str()));
    out.push_str(&format!(
        "- Total cost: {} - {}\n\n",
        money(report.total_cost.min),
        money(report.total_cost.max)
    ));

    out.push_str("## Recommendations\n\n");
    if report.recommendations.is_empty() {
        out.push_str("_No modifications recommended._\n\n");
    }
    for r in &report.recommendations {
        render_recommendation_md(&mut out, r);
    }

    if !report.safety_summary.is_empty() {
        out.push_str("## Safety\n\n");
        for (label, items) in [
            ("High", &report.safety_summary.high),
            ("Medium", &report.safety_summary.medium),
            ("Low", &report.safety_summary.low),
        ] {
            for w in items {
                out.push_str(&format!("- **{}**: {}\n", label, w));
            }
        }
        out.push('\n');
    }

    out.push_str("## Legal\n\n");
    out.push_str("| Dimension | Impact | Modifications |\n|---|---|---|\n");
    for (label, s) in legal_rows(report) {
        out.push_str(&format!(
            "| {} | `{}` | {} |\n",
            label,
            s.impact.as_str(),
            if s.modifications.is_empty() {
                "-".to_string()
            } else {
                s.modifications.join(", ")
            }
        ));
    }
    if !report.legal_summary.considerations.is_empty() {
        out.push('\n');
        for c in &report.legal_summary.considerations {
            out.push_str(&format!("- {}\n", c));
        }
    }
    out.push('\n');

    if !report.compatibility_notes.is_empty() {
        out.push_str("## Compatibility\n\n");
        for n in &report.compatibility_notes {
            out.push_str(&format!("- {}\n", n.message()));
        }
        out.push('\n');
    }

    if let Some(summary) = report.enrichment.as_ref().and_then(|e| e.summary.as_ref()) {
        out.push_str("## Notes\n\n");
        out.push_str(&format!("{}\n\n", summary));
    }

    out.push_str(&format!("_{}_\n", report.disclaimer));
    out
}

fn render_recommendation_md(out: &mut String, r: &Recommendation) {
    out.push_str(&format!("### {}. {}\n\n", r.rank, r.name));
    out.push_str(&format!("- Id: `{}`\n", r.id));
    out.push_str(&format!("- Category: `{}`\n", r.category.as_str()));
    out.push_str(&format!("- Score: {:.1}\n", r.score));
    out.push_str(&format!(
        "- Cost: {} - {}\n",
        money(r.cost.min),
        money(r.cost.max)
    ));
    out.push_str(&format!("- Safety: `{}`\n", r.safety.as_str()));
    out.push_str(&format!("- Verdict: `{}`\n", r.verdict.as_str()));
    if let Some(d) = &r.installation_difficulty {
        out.push_str(&format!("- Installation: {}\n", d));
    }
    if !r.description.is_empty() {
        out.push_str(&format!("\n{}\n", r.description));
    }
    if !r.benefits.is_empty() {
        out.push_str("\n**Benefits**\n\n");
        for b in &r.benefits {
            out.push_str(&format!("- {}\n", b));
        }
    }
    if !r.notes.is_empty() {
        out.push_str("\n**Notes**\n\n");
        for n in &r.notes {
            out.push_str(&format!("- {}\n", n));
        }
    }
    for a in &r.annotations {
        out.push_str(&format!("\n> {}\n", a));
    }
    out.push('\n');
}

/// Compact terminal output.
pub fn render_report_text(report: &Report) -> String {
    let v = &report.vehicle;
    let mut out = String::new();
    out.push_str(&format!(
        "Recommendations for {} {} {} ({})\n",
        v.year,
        v.make,
        v.model,
        v.engine_type.as_str()
    ));
    out.push_str(&format!(
        "Budget ceiling {}, estimated total {} - {}\n\n",
        money(report.effective_budget),
        money(report.total_cost.min),
        money(report.total_cost.max)
    ));

    if report.recommendations.is_empty() {
        out.push_str("No modifications recommended.\n");
    }
    for r in &report.recommendations {
        out.push_str(&format!(
            "{:>2}. {:<28} score {:>4.1}  {} - {}  [{} risk]\n",
            r.rank,
            r.name,
            r.score,
            money(r.cost.min),
            money(r.cost.max),
            r.safety.as_str()
        ));
        for n in &r.notes {
            out.push_str(&format!("      note: {}\n", n));
        }
        for a in &r.annotations {
            out.push_str(&format!("      tip: {}\n", a));
        }
    }

    let flagged: Vec<String> = legal_rows(report)
        .into_iter()
        .filter(|(_, s)| s.impact > LegalImpact::None)
        .map(|(label, s)| format!("{} {}", label.to_lowercase(), s.impact.as_str()))
        .collect();
    if !flagged.is_empty() {
        out.push_str(&format!("\nLegal: {}\n", flagged.join(", ")));
    }

    if !report.compatibility_notes.is_empty() {
        out.push('\n');
        for n in &report.compatibility_notes {
            out.push_str(&format!("* {}\n", n.message()));
        }
    }

    out.push_str(&format!("\n{}\n", report.disclaimer));
    out
}

fn legal_rows(report: &Report) -> [(&'static str, &LegalFlagSummary); 3] {
    [
        ("Warranty", &report.legal_summary.warranty),
        ("Emissions", &report.legal_summary.emissions),
        ("Insurance", &report.legal_summary.insurance),
    ]
}

/// Whole dollars with thousands separators, e.g. `$12,500`.
pub fn money(amount: f64) -> String {
    let whole = amount.max(0.0).round() as u64;
    let digits = whole.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    format!("${out}")
}
