//! Markdown report rendering

use super::{Report, ReportContent};
use crate::idea::Idea;
use crate::{CoreError, CoreResult};
use std::fmt::Write;

pub fn generate(report: &Report, idea: &Idea) -> CoreResult<String> {
    render(report, idea).map_err(|e| CoreError::Render(format!("Markdown rendering failed: {}", e)))
}

fn render(report: &Report, idea: &Idea) -> Result<String, std::fmt::Error> {
    let mut md = String::new();

    writeln!(md, "# Feasibility Report: {}", idea.title)?;
    writeln!(md)?;
    writeln!(md, "- **Report ID:** {}", report.id)?;
    writeln!(md, "- **Type:** {}", report.report_type)?;
    writeln!(md, "- **Status:** {}", report.status)?;
    if let Some(recommendation) = report.recommendation {
        writeln!(md, "- **Recommendation:** {}", recommendation)?;
    }
    if let Some(completed_at) = report.completed_at {
        writeln!(md, "- **Completed:** {}", completed_at.format("%Y-%m-%d %H:%M UTC"))?;
    }
    writeln!(md)?;

    if let Some(summary) = &report.executive_summary {
        writeln!(md, "## Executive Summary")?;
        writeln!(md)?;
        writeln!(md, "{}", summary)?;
        writeln!(md)?;
    }

    match &report.content {
        Some(content) => render_content(&mut md, content)?,
        None => writeln!(md, "_Report content is not available yet._")?,
    }

    Ok(md)
}

fn bullets(md: &mut String, items: &[String]) -> std::fmt::Result {
    for item in items {
        writeln!(md, "- {}", item)?;
    }
    Ok(())
}

fn render_content(md: &mut String, content: &ReportContent) -> std::fmt::Result {
    writeln!(md, "## SWOT")?;
    writeln!(md)?;
    for (heading, items) in [
        ("Strengths", &content.swot.strengths),
        ("Weaknesses", &content.swot.weaknesses),
        ("Opportunities", &content.swot.opportunities),
        ("Threats", &content.swot.threats),
    ] {
        writeln!(md, "### {}", heading)?;
        bullets(md, items)?;
        writeln!(md)?;
    }

    let market = &content.market_analysis;
    writeln!(md, "## Market")?;
    writeln!(md)?;
    writeln!(md, "| TAM | SAM | SOM | CAGR |")?;
    writeln!(md, "|-----|-----|-----|------|")?;
    writeln!(md, "| {} | {} | {} | {} |", market.tam, market.sam, market.som, market.cagr)?;
    writeln!(md)?;
    bullets(md, &market.market_trends)?;
    writeln!(md)?;

    let competition = &content.competition_analysis;
    writeln!(md, "## Competition")?;
    writeln!(md)?;
    writeln!(md, "Market position: {}", competition.market_position)?;
    writeln!(md)?;
    writeln!(md, "| Competitor | Strength | Weakness |")?;
    writeln!(md, "|------------|----------|----------|")?;
    for c in &competition.direct_competitors {
        writeln!(md, "| {} | {} | {} |", c.name, c.strength, c.weakness)?;
    }
    writeln!(md)?;

    let financial = &content.financial_analysis;
    writeln!(md, "## Financials")?;
    writeln!(md)?;
    writeln!(md, "- Initial investment: {}", financial.initial_investment)?;
    writeln!(md, "- Monthly costs: {}", financial.monthly_costs)?;
    writeln!(md, "- Break-even: {}", financial.break_even_period)?;
    writeln!(md)?;
    writeln!(md, "| Year | Revenue | Profit |")?;
    writeln!(md, "|------|---------|--------|")?;
    for p in &financial.revenue_projections {
        writeln!(md, "| {} | {} | {} |", p.year, p.revenue, p.profit)?;
    }
    writeln!(md)?;

    let risk = &content.risk_assessment;
    writeln!(md, "## Risks")?;
    writeln!(md)?;
    for (level, items) in [
        ("High", &risk.high_risks),
        ("Medium", &risk.medium_risks),
        ("Low", &risk.low_risks),
    ] {
        for r in items {
            writeln!(md, "- **{}** {}: {} (mitigation: {})", level, r.risk, r.impact, r.mitigation)?;
        }
    }
    writeln!(md)?;

    writeln!(md, "## Action Items")?;
    writeln!(md)?;
    for (i, item) in content.action_items.iter().enumerate() {
        writeln!(
            md,
            "{}. **{}** ({}, {} priority): {}",
            i + 1,
            item.title,
            item.timeline,
            item.priority,
            item.description
        )?;
    }
    writeln!(md)?;

    writeln!(md, "## Key Insights")?;
    writeln!(md)?;
    bullets(md, &content.key_insights)?;

    Ok(())
}
