use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use crm_model::{Confidence, CrmTarget, MappingDocument, RowRecord, SourceSample, ordered_values};
use crm_validate::{Issue, Severity, ValidationReport, stats};

use crate::types::{CheckResult, EditResult, GenerateResult, TransformResult};

pub fn print_generate(result: &GenerateResult) {
    println!(
        "Generated {} rules with {} ({})",
        result.doc.column_mappings.len(),
        result.provider,
        result.model
    );
    println!("Saved: {}", result.output.display());
    print_rules(&result.doc);
    print_mapping_summary(&result.doc);
    print_report(&result.report);
}

pub fn print_check(result: &CheckResult) {
    print_rules(&result.doc);
    print_mapping_summary(&result.doc);
    print_report(&result.report);
    if result.report.is_valid() {
        println!("Mapping document is consistent.");
    }
}

pub fn print_edit(result: &EditResult) {
    println!(
        "Rule {} updated; saved {}",
        result.rule_number,
        result.output.display()
    );
    let impact = &result.impact;
    if !impact.is_empty() {
        let moved: Vec<String> = impact
            .decremented
            .iter()
            .map(|bucket| format!("-{bucket}"))
            .chain(impact.incremented.iter().map(|bucket| format!("+{bucket}")))
            .collect();
        if !moved.is_empty() {
            println!("Summary: {}", moved.join(", "));
        }
        if let Some(n) = impact.review_removed {
            println!("Rule {n} no longer needs review");
        }
        if let Some(n) = impact.review_added {
            println!("Rule {n} now needs review");
        }
    }
    print_rules(&result.doc);
    print_report(&result.report);
}

pub fn print_transform(result: &TransformResult) {
    print_before(&result.source);
    print_after(&result.doc, &result.rows);
    if let Some(path) = &result.output {
        println!("Wrote {} rows to {}", result.rows.len(), path.display());
    }
}

pub fn print_crms() {
    let mut table = Table::new();
    table.set_header(vec![header_cell("CRM"), header_cell("Name"), header_cell("Guidance")]);
    apply_table_style(&mut table);
    for crm in &CrmTarget::KNOWN {
        let guidance = crm.guidance().lines().next().unwrap_or_default();
        table.add_row(vec![
            Cell::new(crm.id()).fg(Color::Blue),
            Cell::new(crm.display_name()),
            dim_cell(guidance),
        ]);
    }
    println!("{table}");
}

/// Issues table, printed to stderr when a document is rejected.
pub fn print_issues(issues: &[Issue]) {
    if issues.is_empty() {
        return;
    }
    eprintln!("{}", issue_table(issues));
}

fn print_report(report: &ValidationReport) {
    if report.issues.is_empty() {
        return;
    }
    println!(
        "Issues: {} error(s), {} warning(s)",
        report.error_count(),
        report.warning_count()
    );
    println!("{}", issue_table(&report.issues));
}

fn print_rules(doc: &MappingDocument) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Target Column"),
        header_cell("Type"),
        header_cell("Source"),
        header_cell("Logic"),
        header_cell("Confidence"),
        header_cell("Review"),
    ]);
    apply_table_style(&mut table);
    for mapping in doc.ordered_rules() {
        let source = if mapping.source_fields.is_empty() {
            dim_cell("-")
        } else {
            Cell::new(mapping.source_label())
        };
        table.add_row(vec![
            Cell::new(mapping.rule_number),
            Cell::new(&mapping.target_column).add_attribute(Attribute::Bold),
            Cell::new(mapping.rule_type),
            source,
            Cell::new(&mapping.transformation_logic),
            confidence_cell(mapping.confidence),
            review_cell(mapping.needs_attention),
        ]);
    }
    align_column(&mut table, 0, CellAlignment::Right);
    println!("{table}");
}

fn print_mapping_summary(doc: &MappingDocument) {
    let stats = stats(doc);
    let mut table = Table::new();
    table.set_header(vec![header_cell("Bucket"), header_cell("Rules")]);
    apply_summary_table_style(&mut table);
    for (rule_type, count) in &stats.by_type {
        table.add_row(vec![Cell::new(rule_type), count_cell(*count, Color::Reset)]);
    }
    for (confidence, count) in &stats.by_confidence {
        table.add_row(vec![
            Cell::new(format!("{confidence} confidence")),
            count_cell(*count, confidence_color(*confidence)),
        ]);
    }
    table.add_row(vec![
        Cell::new("Needs attention"),
        count_cell(stats.attention_list.len(), Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(stats.total())
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
    ]);
    align_column(&mut table, 1, CellAlignment::Right);
    println!("Target CRM: {}", doc.summary.target_crm);
    println!("{table}");
    if !stats.attention_list.is_empty() {
        let listed: Vec<String> = stats.attention_list.iter().map(u32::to_string).collect();
        println!("Review required: rules {}", listed.join(", "));
    }
}

fn print_before(source: &SourceSample) {
    let fields: Vec<String> = source.field_names().into_iter().collect();
    let mut table = Table::new();
    table.set_header(fields.iter().map(|f| header_cell(f)).collect::<Vec<_>>());
    apply_table_style(&mut table);
    for record in source.records() {
        table.add_row(
            fields
                .iter()
                .map(|f| Cell::new(SourceSample::display_value(record, f)))
                .collect::<Vec<_>>(),
        );
    }
    println!("Before ({} records)", source.records().len());
    println!("{table}");
}

fn print_after(doc: &MappingDocument, rows: &[RowRecord]) {
    let columns = doc.target_columns();
    let mut table = Table::new();
    table.set_header(columns.iter().map(|c| header_cell(c)).collect::<Vec<_>>());
    apply_table_style(&mut table);
    for row in rows {
        table.add_row(
            ordered_values(row, &columns)
                .into_iter()
                .map(|value| {
                    if value.is_empty() {
                        dim_cell("-")
                    } else {
                        Cell::new(value)
                    }
                })
                .collect::<Vec<_>>(),
        );
    }
    println!("After ({} rows)", rows.len());
    println!("{table}");
}

fn issue_table(issues: &[Issue]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Severity"),
        header_cell("Invariant"),
        header_cell("Rules"),
        header_cell("Message"),
    ]);
    apply_issue_table_style(&mut table);
    let mut ordered: Vec<&Issue> = issues.iter().collect();
    ordered.sort_by_key(|issue| (severity_rank(issue.severity), issue.invariant));
    for issue in ordered {
        let rules: Vec<String> = issue.rule_numbers.iter().map(u32::to_string).collect();
        table.add_row(vec![
            severity_cell(issue.severity),
            Cell::new(issue.invariant),
            if rules.is_empty() {
                dim_cell("-")
            } else {
                Cell::new(rules.join(", "))
            },
            Cell::new(&issue.message),
        ]);
    }
    table
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
    if table.column_count() == 7 {
        table.set_constraints(vec![
            ColumnConstraint::UpperBoundary(Width::Fixed(4)),
            ColumnConstraint::UpperBoundary(Width::Percentage(20)),
            ColumnConstraint::LowerBoundary(Width::Fixed(11)),
            ColumnConstraint::UpperBoundary(Width::Percentage(20)),
            ColumnConstraint::UpperBoundary(Width::Percentage(40)),
            ColumnConstraint::LowerBoundary(Width::Fixed(10)),
            ColumnConstraint::LowerBoundary(Width::Fixed(6)),
        ]);
    }
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(60);
}

fn apply_issue_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
    table.set_constraints(vec![
        ColumnConstraint::UpperBoundary(Width::Fixed(9)),
        ColumnConstraint::UpperBoundary(Width::Fixed(24)),
        ColumnConstraint::UpperBoundary(Width::Fixed(14)),
        ColumnConstraint::UpperBoundary(Width::Percentage(60)),
    ]);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn severity_rank(severity: Severity) -> u8 {
    match severity {
        Severity::Error => 0,
        Severity::Warning => 1,
    }
}

fn severity_cell(severity: Severity) -> Cell {
    match severity {
        Severity::Error => Cell::new("ERROR").fg(Color::Red),
        Severity::Warning => Cell::new("WARN").fg(Color::Yellow),
    }
}

fn confidence_color(confidence: Confidence) -> Color {
    match confidence {
        Confidence::High => Color::Green,
        Confidence::Medium => Color::Yellow,
        Confidence::Low => Color::Red,
    }
}

fn confidence_cell(confidence: Confidence) -> Cell {
    Cell::new(confidence).fg(confidence_color(confidence))
}

fn review_cell(needs_attention: bool) -> Cell {
    if needs_attention {
        Cell::new("yes")
            .fg(Color::Yellow)
            .add_attribute(Attribute::Bold)
    } else {
        dim_cell("-")
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count == 0 {
        dim_cell("-")
    } else {
        Cell::new(count).fg(color)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
