use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use ade_model::PatientRecords;
use ade_validate::ValidationReport;

use crate::types::{CheckResult, GenerateSummary};

pub fn print_check(result: &CheckResult) {
    println!("Folder: {}", result.ingest.folder.display());
    println!(
        "Files: {} scanned, {} skipped",
        result.ingest.scanned,
        result.ingest.skipped.len()
    );
    print_patients(&result.ingest.records, &result.report);
    if result.report.is_valid() {
        println!("All {} patient(s) passed.", result.ingest.records.len());
    } else {
        print_problems(&result.report);
    }
}

pub fn print_generated(summary: &GenerateSummary) {
    println!("Folder: {}", summary.folder.display());
    println!("Run: {}", summary.run_reference);
    println!(
        "User: {}  Client: {}",
        summary.identity.user_id, summary.identity.client_id
    );
    println!(
        "Pipeline: {}  Sequencer: {}",
        summary.pipeline.pipeline_id, summary.pipeline.sequencer_id
    );
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Patients"),
        header_cell("Analyses"),
        header_cell("Topologies"),
        header_cell("Skipped files"),
    ]);
    apply_table_style(&mut table);
    for index in 0..4 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    table.add_row(vec![
        Cell::new(summary.patient_count),
        Cell::new(summary.analysis_count),
        Cell::new(summary.topology_count),
        count_cell(summary.skipped_files, Color::Yellow),
    ]);
    println!("{table}");
    if let Some(path) = &summary.output {
        println!("Request: {}", path.display());
    }
}

fn print_patients(records: &PatientRecords, report: &ValidationReport) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Patient"),
        header_cell("Sample"),
        header_cell("Tag"),
        header_cell("Files"),
        header_cell("Problems"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    for bucket in records {
        let problems = report.problems_for(&bucket.patient_ref).count();
        for (index, sample) in bucket.samples.iter().enumerate() {
            let first = index == 0;
            table.add_row(vec![
                if first {
                    Cell::new(&bucket.patient_ref).add_attribute(Attribute::Bold)
                } else {
                    dim_cell("")
                },
                Cell::new(&sample.sample_id),
                if sample.tag.is_unspecified() {
                    dim_cell("-")
                } else {
                    Cell::new(sample.tag.as_str())
                },
                Cell::new(sample.files.len()),
                if first {
                    count_cell(problems, Color::Red)
                } else {
                    dim_cell("")
                },
            ]);
        }
    }
    println!("{table}");
}

pub fn print_problems(report: &ValidationReport) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Patient"),
        header_cell("Code"),
        header_cell("Problem"),
    ]);
    apply_table_style(&mut table);
    for problem in &report.problems {
        table.add_row(vec![
            Cell::new(&problem.patient_ref),
            Cell::new(problem.issue.code()).fg(Color::Red),
            Cell::new(problem.message()),
        ]);
    }
    println!("{table}");
    println!(
        "{} problem(s) in {} patient(s); fix the file names and retry.",
        report.problem_count(),
        report.failing_patients().len()
    );
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
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
