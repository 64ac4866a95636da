use std::collections::BTreeMap;
use std::fmt;

/// A single recorded field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    U64(u64),
    I64(i64),
    F64(f64),
    Bool(bool),
    Str(String),
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::U64(v) => write!(f, "{v}"),
            Cell::I64(v) => write!(f, "{v}"),
            Cell::F64(v) => write!(f, "{v}"),
            Cell::Bool(v) => write!(f, "{v}"),
            Cell::Str(v) => f.write_str(v),
        }
    }
}

/// A typed column. The type is fixed by the first value recorded into it.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    U64(Vec<u64>),
    I64(Vec<i64>),
    F64(Vec<f64>),
    Bool(Vec<bool>),
    Str(Vec<String>),
}

impl Column {
    /// Column of the cell's type holding `rows` default values.
    fn padded_for(cell: &Cell, rows: usize) -> Self {
        match cell {
            Cell::U64(_) => Column::U64(vec![0; rows]),
            Cell::I64(_) => Column::I64(vec![0; rows]),
            Cell::F64(_) => Column::F64(vec![0.0; rows]),
            Cell::Bool(_) => Column::Bool(vec![false; rows]),
            Cell::Str(_) => Column::Str(vec![String::new(); rows]),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Column::U64(v) => v.len(),
            Column::I64(v) => v.len(),
            Column::F64(v) => v.len(),
            Column::Bool(v) => v.len(),
            Column::Str(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_u64(&self) -> Option<&[u64]> {
        match self {
            Column::U64(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<&[f64]> {
        match self {
            Column::F64(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&[String]> {
        match self {
            Column::Str(v) => Some(v),
            _ => None,
        }
    }

    /// Append a cell, widening integers into float or signed columns.
    /// A cell that cannot be stored is skipped and left to row padding.
    fn push(&mut self, cell: Cell) {
        match (self, cell) {
            (Column::U64(v), Cell::U64(x)) => v.push(x),
            (Column::I64(v), Cell::I64(x)) => v.push(x),
            (Column::I64(v), Cell::U64(x)) => v.push(x as i64),
            (Column::F64(v), Cell::F64(x)) => v.push(x),
            (Column::F64(v), Cell::U64(x)) => v.push(x as f64),
            (Column::F64(v), Cell::I64(x)) => v.push(x as f64),
            (Column::Bool(v), Cell::Bool(x)) => v.push(x),
            (Column::Str(v), cell) => v.push(cell.to_string()),
            _ => {}
        }
    }

    fn pad_to(&mut self, rows: usize) {
        let missing = rows.saturating_sub(self.len());
        if missing == 0 {
            return;
        }
        match self {
            Column::U64(v) => v.extend(std::iter::repeat_n(0, missing)),
            Column::I64(v) => v.extend(std::iter::repeat_n(0, missing)),
            Column::F64(v) => v.extend(std::iter::repeat_n(0.0, missing)),
            Column::Bool(v) => v.extend(std::iter::repeat_n(false, missing)),
            Column::Str(v) => v.extend(std::iter::repeat_n(String::new(), missing)),
        }
    }
}

/// Rows of one event target. Columns appear as new field names are seen;
/// rows that lack a field get that column's default value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: BTreeMap<String, Column>,
    rows: usize,
}

impl Table {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.columns.iter().map(|(name, col)| (name.as_str(), col))
    }

    /// Record one field of the row currently being built.
    pub fn push(&mut self, name: &str, cell: Cell) {
        let rows = self.rows;
        let column = self
            .columns
            .entry(name.to_string())
            .or_insert_with(|| Column::padded_for(&cell, rows));
        column.push(cell);
    }

    /// Close the current row, padding any column that missed it.
    pub fn end_row(&mut self) {
        self.rows += 1;
        for column in self.columns.values_mut() {
            column.pad_to(self.rows);
        }
    }

    /// Record a whole row at once.
    pub fn push_row<'a>(&mut self, cells: impl IntoIterator<Item = (&'a str, Cell)>) {
        for (name, cell) in cells {
            self.push(name, cell);
        }
        self.end_row();
    }
}

/// Every table recorded so far, keyed by event target.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Recording {
    pub tables: BTreeMap<String, Table>,
}

impl Recording {
    pub fn table(&self, target: &str) -> Option<&Table> {
        self.tables.get(target)
    }

    pub fn table_mut(&mut self, target: &str) -> &mut Table {
        self.tables.entry(target.to_string()).or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn late_columns_are_back_filled() {
        let mut table = Table::default();
        table.push_row([("year", Cell::U64(1)), ("morale", Cell::F64(30.0))]);
        table.push_row([("year", Cell::U64(2)), ("inequality", Cell::F64(0.2))]);

        assert_eq!(table.rows(), 2);
        assert_eq!(table.column("year").unwrap().as_u64(), Some(&[1, 2][..]));
        // morale missed row 2, inequality missed row 1
        assert_eq!(
            table.column("morale").unwrap().as_f64(),
            Some(&[30.0, 0.0][..])
        );
        assert_eq!(
            table.column("inequality").unwrap().as_f64(),
            Some(&[0.0, 0.2][..])
        );
    }

    #[test]
    fn integers_widen_into_float_columns() {
        let mut table = Table::default();
        table.push_row([("output", Cell::F64(1.5))]);
        table.push_row([("output", Cell::U64(3))]);
        table.push_row([("output", Cell::I64(-2))]);
        assert_eq!(
            table.column("output").unwrap().as_f64(),
            Some(&[1.5, 3.0, -2.0][..])
        );
    }

    #[test]
    fn mismatched_cell_becomes_padding() {
        let mut table = Table::default();
        table.push_row([("year", Cell::U64(1))]);
        table.push_row([("year", Cell::Str("two".into()))]);
        assert_eq!(table.column("year").unwrap().as_u64(), Some(&[1, 0][..]));
    }

    #[test]
    fn string_columns_accept_anything() {
        let mut table = Table::default();
        table.push_row([("note", Cell::Str("a".into()))]);
        table.push_row([("note", Cell::Bool(true))]);
        assert_eq!(
            table.column("note").unwrap().as_str(),
            Some(&["a".to_string(), "true".to_string()][..])
        );
    }
}
