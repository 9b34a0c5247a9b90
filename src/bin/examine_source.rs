use calamine::{open_workbook_auto, Reader};
use outage_history::config::InputFormat;
use outage_history::importers::{read_source, Cell};
use std::env;
use std::path::Path;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    let file_path = if args.len() > 1 {
        &args[1]
    } else {
        "data/2019_Annual_Summary.xls"
    };
    let rows_to_show: usize = args.get(2).and_then(|n| n.parse().ok()).unwrap_or(20);

    let path = Path::new(file_path);
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

    println!("Opening source file: {file_path}");

    let format = if is_csv {
        InputFormat::Csv
    } else {
        let workbook = open_workbook_auto(path)?;
        println!("\nSheet names:");
        for (i, name) in workbook.sheet_names().iter().enumerate() {
            println!("  {i}: {name}");
        }
        InputFormat::Excel
    };

    // Header sits on the second row, under the report title
    let table = read_source(path, format, 1)?;

    println!("\n\nHeaders ({} columns):", table.headers.len());
    println!("{}", "=".repeat(100));
    for (col_idx, header) in table.headers.iter().enumerate() {
        println!("Col {:3}: {}", col_idx + 1, header);
    }

    println!("\n{} data rows, first {}:", table.len(), rows_to_show);
    println!("{}", "=".repeat(100));
    for row in table.rows.iter().take(rows_to_show) {
        print!("Row {:4}: ", row.line);
        for cell in &row.cells {
            match cell {
                Cell::Empty => print!("[empty] "),
                other => print!("[{}] ", other.to_text().unwrap_or_default()),
            }
        }
        println!();
    }

    Ok(())
}
