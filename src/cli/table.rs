use crate::domain::Service;

const HEADERS: [&str; 3] = ["Short name", "Compose name", "Dependencies"];

/// Renders services as a boxed text table, one row per service.
pub fn render_services(services: &[Service]) -> String {
    let rows: Vec<[String; 3]> = services
        .iter()
        .map(|s| {
            [
                s.short_name.clone(),
                s.compose_name.clone(),
                s.depends_on.join(", "),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let separator = {
        let mut line = String::from("+");
        for width in widths {
            line.push_str(&"-".repeat(width + 2));
            line.push('+');
        }
        line
    };

    let format_row = |cells: [&str; 3]| {
        let mut line = String::from("|");
        for (cell, width) in cells.iter().zip(widths) {
            let padding = width - cell.chars().count();
            line.push_str(&format!(" {cell}{} |", " ".repeat(padding)));
        }
        line
    };

    let mut lines = vec![separator.clone(), format_row(HEADERS), separator.clone()];
    for row in &rows {
        lines.push(format_row([row[0].as_str(), row[1].as_str(), row[2].as_str()]));
    }
    if !rows.is_empty() {
        lines.push(separator);
    }

    lines.join("\n")
}
