use super::table::{Cell, Table};

/// Renders a padded, pipe-delimited preview of a table's first rows
pub struct TableFormatter {
    padding: usize,
    alignment: Option<ColumnAlignment>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ColumnAlignment {
    Left,
    Center,
    Right,
}

impl TableFormatter {
    pub fn new() -> Self {
        Self {
            padding: 1,
            alignment: None,
        }
    }

    /// Force one alignment for every column instead of right-aligning numeric ones
    pub fn with_alignment(mut self, alignment: ColumnAlignment) -> Self {
        self.alignment = Some(alignment);
        self
    }

    pub fn format_preview(&self, table: &Table, max_rows: usize) -> String {
        let order = table.output_order();
        if order.is_empty() {
            return "(empty table)".to_string();
        }

        let header: Vec<String> = order.iter().map(|&i| table.columns[i].clone()).collect();
        let body: Vec<Vec<String>> = table
            .rows
            .iter()
            .take(max_rows)
            .map(|row| order.iter().map(|&i| row[i].render().into_owned()).collect())
            .collect();

        let widths = self.calculate_column_widths(&header, &body);
        let alignments: Vec<ColumnAlignment> = order
            .iter()
            .map(|&i| self.column_alignment(table, i))
            .collect();

        let mut formatted = Vec::with_capacity(body.len() + 3);
        formatted.push(self.format_row(&header, &widths, &alignments));
        formatted.push(self.create_separator(&widths));
        for row in &body {
            formatted.push(self.format_row(row, &widths, &alignments));
        }
        formatted.push(format!(
            "[showing {} of {} rows x {} columns]",
            body.len(),
            table.height(),
            table.width()
        ));

        formatted.join("\n")
    }

    fn column_alignment(&self, table: &Table, idx: usize) -> ColumnAlignment {
        if let Some(alignment) = self.alignment {
            return alignment;
        }

        let numeric = !table.rows.is_empty()
            && table
                .rows
                .iter()
                .all(|row| matches!(row[idx], Cell::Number { .. } | Cell::Missing));
        if numeric {
            ColumnAlignment::Right
        } else {
            ColumnAlignment::Left
        }
    }

    fn calculate_column_widths(&self, header: &[String], body: &[Vec<String>]) -> Vec<usize> {
        let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();

        for row in body {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }

        widths
    }

    fn format_row(&self, cells: &[String], widths: &[usize], alignments: &[ColumnAlignment]) -> String {
        let pad = " ".repeat(self.padding);
        let formatted_cells: Vec<String> = cells
            .iter()
            .zip(widths.iter().zip(alignments))
            .map(|(content, (&width, &alignment))| {
                format!("{}{}{}", pad, self.pad_content(content, width, alignment), pad)
            })
            .collect();

        format!("|{}|", formatted_cells.join("|"))
    }

    fn pad_content(&self, content: &str, width: usize, alignment: ColumnAlignment) -> String {
        match alignment {
            ColumnAlignment::Left => format!("{:<width$}", content, width = width),
            ColumnAlignment::Right => format!("{:>width$}", content, width = width),
            ColumnAlignment::Center => format!("{:^width$}", content, width = width),
        }
    }

    fn create_separator(&self, widths: &[usize]) -> String {
        let separators: Vec<String> = widths
            .iter()
            .map(|&w| "-".repeat(w + self.padding * 2))
            .collect();

        format!("|{}|", separators.join("|"))
    }
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::from_rows(
            vec!["note".into(), "close".into()],
            vec![
                vec![Cell::text("a"), Cell::number(101.5)],
                vec![Cell::text("bb"), Cell::number(9.0)],
                vec![Cell::text("c"), Cell::number(1.0)],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_preview_aligns_numbers_right() {
        let preview = TableFormatter::new().format_preview(&sample(), 2);
        let lines: Vec<&str> = preview.lines().collect();
        assert_eq!(lines[0], "| note | close |");
        assert_eq!(lines[1], "|------|-------|");
        assert_eq!(lines[2], "| a    | 101.5 |");
        assert_eq!(lines[3], "| bb   |     9 |");
        assert_eq!(lines[4], "[showing 2 of 3 rows x 2 columns]");
    }

    #[test]
    fn test_preview_puts_index_first() {
        let mut table = sample();
        table.index = Some(1);
        let preview = TableFormatter::new()
            .with_alignment(ColumnAlignment::Left)
            .format_preview(&table, 1);
        assert!(preview.starts_with("| close | note |"));
    }

    #[test]
    fn test_empty_table() {
        let preview = TableFormatter::new().format_preview(&Table::default(), 5);
        assert_eq!(preview, "(empty table)");
    }
}
