//! Plain-text tables and charts for terminal output.

const BAR_GLYPH: char = '#';

/// Left-aligned columns separated by two spaces, with a dashed header rule.
pub fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|header| header.chars().count()).collect();
    for row in rows {
        for (index, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(index) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let rule: Vec<String> = widths.iter().map(|width| "-".repeat(*width)).collect();
    let rule: Vec<&str> = rule.iter().map(String::as_str).collect();

    let mut lines = vec![render_row(headers, &widths), render_row(&rule, &widths)];
    for row in rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        lines.push(render_row(&cells, &widths));
    }
    lines.join("\n")
}

fn render_row(cells: &[&str], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}", width = *width))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

/// Horizontal bars scaled to the largest count, in the order given.
pub fn bar_chart(entries: &[(String, u64)], width: usize) -> String {
    let max = entries.iter().map(|(_, count)| *count).max().unwrap_or(0);
    let label_width = entries.iter().map(|(label, _)| label.chars().count()).max().unwrap_or(0);

    entries
        .iter()
        .map(|(label, count)| {
            let length = if max == 0 {
                0
            } else {
                let scaled = (*count as f64 / max as f64 * width as f64).round() as usize;
                if *count > 0 {
                    scaled.max(1)
                } else {
                    0
                }
            };
            let bar: String = std::iter::repeat(BAR_GLYPH).take(length).collect();
            format!("{label:<label_width$} | {bar} {count}")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn optional(value: Option<&str>) -> String {
    value.unwrap_or("-").to_string()
}

#[cfg(test)]
mod tests {
    use super::{bar_chart, table};

    #[test]
    fn table_aligns_columns() {
        let rendered = table(
            &["product", "orders"],
            &[
                vec!["Banana".to_string(), "40".to_string()],
                vec!["Organic Strawberries".to_string(), "22".to_string()],
            ],
        );

        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "product               orders");
        assert_eq!(lines[1], "--------------------  ------");
        assert_eq!(lines[2], "Banana                40");
        assert_eq!(lines[3], "Organic Strawberries  22");
    }

    #[test]
    fn bars_scale_to_the_largest_count() {
        let rendered = bar_chart(
            &[("Banana".to_string(), 40), ("Bagels".to_string(), 10), ("Kale".to_string(), 0)],
            20,
        );

        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], format!("Banana | {} 40", "#".repeat(20)));
        assert_eq!(lines[1], format!("Bagels | {} 10", "#".repeat(5)));
        assert_eq!(lines[2], "Kale   |  0");
    }
}
