use crate::geometry::Position;
use crate::settings::RoleNames;
use crate::table::{Row, Table};
use crate::track::{FrameObservation, HeadTailFrame};
use thiserror::Error;

define_columns! {
    /// What a bound column holds.
    pub enum Role {
        EndAX => "end A X",
        EndAY => "end A Y",
        EndBX => "end B X",
        EndBY => "end B Y",
        CenterX => "center X",
        CenterY => "center Y",
        CentroidX => "centroid X",
        CentroidY => "centroid Y",
        Time => "time",
    }
}

/// Problems with the column selection, detected before any frame is
/// processed.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("Column `{column}` selected as {role} is missing.")]
    MissingColumn { role: Role, column: String },

    #[error("Column `{column}` is selected as both {first} and {second}.")]
    DuplicateColumn {
        column: String,
        first: Role,
        second: Role,
    },

    #[error("Column `{column}` ({role}) holds a non-numeric value in row `{row}`.")]
    NonNumeric {
        role: Role,
        column: String,
        row: String,
    },

    #[error("Reference row `{row}` needs numeric X and Y in its first two columns.")]
    InvalidReference { row: String },
}

/// Column index of every role in one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMapping {
    indices: [usize; 9],
}

impl ColumnMapping {
    pub fn resolve(table: &Table, names: &RoleNames) -> Result<Self, ConfigurationError> {
        let names = names.as_array();
        let mut indices = [0usize; 9];

        for (role, name) in Role::ALL.iter().zip(names) {
            indices[role.index()] =
                table
                    .column_index(name)
                    .ok_or_else(|| ConfigurationError::MissingColumn {
                        role: *role,
                        column: name.to_string(),
                    })?;
        }

        for (i, first) in Role::ALL.iter().enumerate() {
            for second in &Role::ALL[i + 1..] {
                if indices[first.index()] == indices[second.index()] {
                    return Err(ConfigurationError::DuplicateColumn {
                        column: names[first.index()].to_string(),
                        first: *first,
                        second: *second,
                    });
                }
            }
        }

        Ok(ColumnMapping { indices })
    }

    pub fn index(&self, role: Role) -> usize {
        self.indices[role.index()]
    }

    pub fn value(&self, table: &Table, row: &Row, role: Role) -> Result<f64, ConfigurationError> {
        let index = self.index(role);
        row.cell(index)
            .as_f64()
            .ok_or_else(|| ConfigurationError::NonNumeric {
                role,
                column: table.columns.get(index).cloned().unwrap_or_default(),
                row: row.key.clone(),
            })
    }

    fn position(&self, table: &Table, row: &Row, x: Role, y: Role) -> Result<Position, ConfigurationError> {
        Ok(Position::new(
            self.value(table, row, x)?,
            self.value(table, row, y)?,
        ))
    }

    pub fn observation(&self, table: &Table, row: &Row) -> Result<FrameObservation, ConfigurationError> {
        Ok(FrameObservation {
            end_a: self.position(table, row, Role::EndAX, Role::EndAY)?,
            end_b: self.position(table, row, Role::EndBX, Role::EndBY)?,
            center: self.position(table, row, Role::CenterX, Role::CenterY)?,
            centroid: self.position(table, row, Role::CentroidX, Role::CentroidY)?,
            time: self.value(table, row, Role::Time)?,
        })
    }

    /// Reads a head-resolved frame; end A holds the head, end B the tail.
    pub fn head_tail_frame(&self, table: &Table, row: &Row) -> Result<HeadTailFrame, ConfigurationError> {
        let observation = self.observation(table, row)?;
        Ok(HeadTailFrame {
            head: observation.end_a,
            tail: observation.end_b,
            center: observation.center,
            centroid: observation.centroid,
            time: observation.time,
        })
    }

    /// Exchanges the two ends of `row` in place.
    pub fn swap_ends(&self, row: &mut Row) {
        row.cells.swap(self.index(Role::EndAX), self.index(Role::EndBX));
        row.cells.swap(self.index(Role::EndAY), self.index(Role::EndBY));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Cell;

    fn table(columns: &[&str]) -> Table {
        Table::new(columns.iter().map(|c| c.to_string()).collect())
    }

    fn all_columns() -> Vec<&'static str> {
        vec![
            "End1 X",
            "End1 Y",
            "End2 X",
            "End2 Y",
            "Center X",
            "Center Y",
            "Centroid X",
            "Centroid Y",
            "Centroid Time",
        ]
    }

    #[test]
    fn resolves_every_role() {
        let mut columns = all_columns();
        columns.insert(0, "Label");
        let mapping = ColumnMapping::resolve(&table(&columns), &RoleNames::ends()).unwrap();
        assert_eq!(mapping.index(Role::EndAX), 1);
        assert_eq!(mapping.index(Role::Time), 9);
    }

    #[test]
    fn reports_missing_column() {
        let mut columns = all_columns();
        columns.retain(|c| *c != "Centroid Y");
        let err = ColumnMapping::resolve(&table(&columns), &RoleNames::ends()).unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::MissingColumn {
                role: Role::CentroidY,
                column: "Centroid Y".into()
            }
        );
    }

    #[test]
    fn reports_duplicate_selection() {
        let names = RoleNames {
            centroid_x: "Center X".into(),
            ..RoleNames::ends()
        };
        let err = ColumnMapping::resolve(&table(&all_columns()), &names).unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::DuplicateColumn {
                column: "Center X".into(),
                first: Role::CenterX,
                second: Role::CentroidX,
            }
        );
    }

    #[test]
    fn reads_and_swaps_ends() {
        let table = table(&all_columns());
        let mapping = ColumnMapping::resolve(&table, &RoleNames::ends()).unwrap();
        let mut row = Row::new(
            "Row0",
            (1..=9).map(|v| Cell::Double(v as f64)).collect(),
        );

        let observation = mapping.observation(&table, &row).unwrap();
        assert_eq!(observation.end_a, Position::new(1.0, 2.0));
        assert_eq!(observation.time, 9.0);

        mapping.swap_ends(&mut row);
        let swapped = mapping.observation(&table, &row).unwrap();
        assert_eq!(swapped, observation.swapped());
    }

    #[test]
    fn rejects_text_in_role_column() {
        let table = table(&all_columns());
        let mapping = ColumnMapping::resolve(&table, &RoleNames::ends()).unwrap();
        let mut cells: Vec<_> = (1..=9).map(|v| Cell::Double(v as f64)).collect();
        cells[8] = Cell::Text("noon".into());

        let err = mapping.observation(&table, &Row::new("Row3", cells)).unwrap_err();
        assert!(matches!(err, ConfigurationError::NonNumeric { role: Role::Time, .. }));
    }
}
