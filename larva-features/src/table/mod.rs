use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

pub mod roles;

pub use roles::{ColumnMapping, ConfigurationError, Role};

/// One value of a measurement table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Int(i64),
    Double(f64),
    Text(String),
    Missing,
}

impl Cell {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Int(v) => Some(*v as f64),
            Cell::Double(v) => Some(*v),
            Cell::Text(_) | Cell::Missing => None,
        }
    }

    /// Mean of two real-valued cells; any other pairing keeps this cell.
    pub fn mean(&self, other: &Cell) -> Cell {
        match (self, other) {
            (Cell::Double(a), Cell::Double(b)) => Cell::Double((a + b) / 2.0),
            _ => self.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub key: String,
    pub cells: Vec<Cell>,
}

impl Row {
    pub fn new(key: impl Into<String>, cells: Vec<Cell>) -> Self {
        Row {
            key: key.into(),
            cells,
        }
    }

    pub fn cell(&self, index: usize) -> &Cell {
        self.cells.get(index).unwrap_or(&Cell::Missing)
    }

    /// Cell-wise mean with `other`, keeping this row's key.
    pub fn merged(&self, other: &Row) -> Row {
        let cells = self
            .cells
            .iter()
            .enumerate()
            .map(|(i, cell)| cell.mean(other.cell(i)))
            .collect();
        Row::new(self.key.clone(), cells)
    }
}

/// In-memory measurement table: named columns and keyed rows.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Table {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Row) -> Result<()> {
        if row.cells.len() != self.columns.len() {
            return Err(anyhow!(
                "Row `{}` has {} cells but the table has {} columns.",
                row.key,
                row.cells.len(),
                self.columns.len()
            ));
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_only_touches_real_cells() {
        assert_eq!(Cell::Double(1.0).mean(&Cell::Double(2.0)), Cell::Double(1.5));
        assert_eq!(Cell::Int(1).mean(&Cell::Int(3)), Cell::Int(1));
        assert_eq!(
            Cell::Text("a".into()).mean(&Cell::Text("b".into())),
            Cell::Text("a".into())
        );
    }

    #[test]
    fn mixed_numeric_cells_keep_the_first_value() {
        assert_eq!(Cell::Double(2.5).mean(&Cell::Int(2)), Cell::Double(2.5));
        assert_eq!(Cell::Int(2).mean(&Cell::Double(2.5)), Cell::Int(2));

        let first = Row::new("Row0", vec![Cell::Int(2), Cell::Double(1.0)]);
        let second = Row::new("Row1", vec![Cell::Double(2.5), Cell::Double(3.0)]);
        assert_eq!(first.merged(&second).cells, vec![Cell::Int(2), Cell::Double(2.0)]);
        assert_eq!(second.merged(&first).cells, vec![Cell::Double(2.5), Cell::Double(2.0)]);
    }

    #[test]
    fn rejects_ragged_rows() {
        let mut table = Table::new(vec!["a".into(), "b".into()]);
        assert!(table.push_row(Row::new("Row0", vec![Cell::Int(1)])).is_err());
        assert!(table
            .push_row(Row::new("Row0", vec![Cell::Int(1), Cell::Missing]))
            .is_ok());
        assert_eq!(table.len(), 1);
        assert_eq!(table.column_index("b"), Some(1));
    }
}
