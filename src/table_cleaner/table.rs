use chrono::{NaiveDateTime, NaiveTime};
use std::borrow::Cow;

use crate::error::{CleanError, CleanResult};

/// A single value in a [`Table`]
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Missing,
    Text(String),
    /// Numeric value; `raw` keeps the input spelling so output round-trips exactly
    Number { value: f64, raw: String },
    Date(NaiveDateTime),
}

impl Cell {
    pub fn number(value: f64) -> Self {
        Cell::Number {
            value,
            raw: value.to_string(),
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    /// True only for numeric cells whose value is exactly zero
    pub fn is_zero(&self) -> bool {
        matches!(self, Cell::Number { value, .. } if *value == 0.0)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number { value, .. } => Some(*value),
            _ => None,
        }
    }

    /// Text used for CSV output and previews. Missing renders as empty.
    pub fn render(&self) -> Cow<'_, str> {
        match self {
            Cell::Missing => Cow::Borrowed(""),
            Cell::Text(s) => Cow::Borrowed(s.as_str()),
            Cell::Number { raw, .. } => Cow::Borrowed(raw.as_str()),
            Cell::Date(dt) => Cow::Owned(format_date(dt)),
        }
    }

    /// Hashable identity used for exact-duplicate detection
    pub(crate) fn key(&self) -> CellKey<'_> {
        match self {
            Cell::Missing => CellKey::Missing,
            Cell::Text(s) => CellKey::Text(s),
            // -0.0 and 0.0 compare equal, so they must hash equal
            Cell::Number { value, .. } if *value == 0.0 => CellKey::Number(0f64.to_bits()),
            Cell::Number { value, .. } => CellKey::Number(value.to_bits()),
            Cell::Date(dt) => CellKey::Date(*dt),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum CellKey<'a> {
    Missing,
    Text(&'a str),
    Number(u64),
    Date(NaiveDateTime),
}

pub fn format_date(dt: &NaiveDateTime) -> String {
    if dt.time() == NaiveTime::MIN {
        dt.format("%Y-%m-%d").to_string()
    } else {
        dt.format("%Y-%m-%d %H:%M:%S%.f").to_string()
    }
}

/// In-memory table: named columns, ordered rows, optional ordering-key column
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    pub(crate) columns: Vec<String>,
    pub(crate) rows: Vec<Vec<Cell>>,
    pub(crate) index: Option<usize>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
            index: None,
        }
    }

    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> CleanResult<Self> {
        let mut table = Self::new(columns);
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    pub fn push_row(&mut self, row: Vec<Cell>) -> CleanResult<()> {
        if row.len() != self.columns.len() {
            return Err(CleanError::processing(format!(
                "row {} has {} fields, expected {}",
                self.rows.len() + 1,
                row.len(),
                self.columns.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Name of the ordering-key column, if the table has been date-indexed
    pub fn index_column(&self) -> Option<&str> {
        self.index.map(|i| self.columns[i].as_str())
    }

    pub fn column_values(&self, name: &str) -> Option<Vec<&Cell>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|row| &row[idx]).collect())
    }

    pub fn missing_count(&self) -> usize {
        self.rows
            .iter()
            .map(|row| row.iter().filter(|c| c.is_missing()).count())
            .sum()
    }

    /// Column positions in output order: the index column first, the rest as stored
    pub fn output_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = Vec::with_capacity(self.columns.len());
        if let Some(idx) = self.index {
            order.push(idx);
        }
        order.extend((0..self.columns.len()).filter(|i| Some(*i) != self.index));
        order
    }
}
