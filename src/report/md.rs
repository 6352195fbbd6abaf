use crate::types::report::{BatchReport, CertificateReport};
use crate::types::rules::{Category, DeductionRules};

pub fn to_markdown(report: &CertificateReport) -> String {
    let summary = &report.summary;
    let mut output = String::new();
    output.push_str(&format!("# Renovation Deduction Report: {}\n\n", summary.id));
    if let Some(title) = &summary.title {
        output.push_str(&format!("{title}\n\n"));
    }
    output.push_str(&format!(
        "- source: {}\n- sha256: {}\n- generated: {}\n- solar panel: {}\n\n",
        report.source,
        report.input_sha256,
        report.generated_at,
        if summary.has_solar_panel { "yes" } else { "no" }
    ));

    output.push_str("## Categories\n\n");
    if summary.categories.is_empty() {
        output.push_str("- none\n\n");
    } else {
        output.push_str(
            "| category | total cost | after subsidy | deductible | max deduction | excess |\n",
        );
        output.push_str("|---|---:|---:|---:|---:|---:|\n");
        for line in &summary.categories {
            let calculation = &line.calculation;
            output.push_str(&format!(
                "| {} | {} | {} | {} | {} | {} |\n",
                line.category,
                calculation.total_cost,
                calculation.after_subsidy,
                calculation.deductible_amount,
                calculation.max_deduction,
                calculation.excess_amount
            ));
        }
        output.push('\n');
    }

    output.push_str("## Candidate Patterns\n\n");
    output.push_str("| pattern | total | max | excess |\n");
    output.push_str("|---|---:|---:|---:|\n");
    for pattern in &summary.patterns {
        let marker = if pattern.kind == summary.result.selected_pattern {
            " (selected)"
        } else {
            ""
        };
        output.push_str(&format!(
            "| {}{} | {} | {} | {} |\n",
            pattern.kind, marker, pattern.total, pattern.max, pattern.excess
        ));
    }
    output.push('\n');

    let result = &summary.result;
    output.push_str("## Result\n\n");
    output.push_str(&format!(
        "- total deductible: {}\n- max control amount: {}\n- excess amount: {}\n- remaining: {}\n- final deductible: {}\n- five percent deductible: {}\n",
        result.total_deductible,
        result.max_control_amount,
        result.excess_amount,
        result.remaining,
        result.final_deductible,
        result.five_percent_deductible
    ));

    output
}

pub fn batch_to_markdown(report: &BatchReport) -> String {
    let mut output = String::new();
    output.push_str("# Renovation Deduction Batch\n\n");
    output.push_str(&format!(
        "Directory: {}\n\nEvaluated: {}, failed: {}\n\n",
        report.directory,
        report.rows.len(),
        report.failures.len()
    ));

    output.push_str("## Certificates\n\n");
    if report.rows.is_empty() {
        output.push_str("- none\n\n");
    } else {
        output.push_str("| id | source | max control amount | five percent deductible |\n");
        output.push_str("|---|---|---:|---:|\n");
        for row in &report.rows {
            output.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                row.id, row.source, row.max_control_amount, row.five_percent_deductible
            ));
        }
        output.push('\n');
    }

    output.push_str("## Failures\n\n");
    if report.failures.is_empty() {
        output.push_str("- none\n");
    } else {
        for failure in &report.failures {
            output.push_str(&format!("- {}: {}\n", failure.source, failure.error));
        }
    }

    output
}

fn amount_or(value: Option<i64>, absent: &str) -> String {
    value
        .map(|amount| amount.to_string())
        .unwrap_or_else(|| absent.to_string())
}

pub fn rules_to_markdown(rules: &DeductionRules) -> String {
    let mut output = String::new();
    output.push_str("# Deduction Rules\n\n");
    output.push_str(&format!("Program ceiling: {}\n\n", rules.program_ceiling));
    output.push_str("| category | threshold | cap | solar cap | window ratio |\n");
    output.push_str("|---|---:|---:|---:|---|\n");
    for category in Category::ALL {
        let rule = rules.rule(category);
        output.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            category,
            amount_or(rule.threshold, "none"),
            amount_or(rule.cap, "uncapped"),
            amount_or(rule.solar_cap, "-"),
            if rule.applies_window_ratio { "yes" } else { "no" }
        ));
    }
    output
}
