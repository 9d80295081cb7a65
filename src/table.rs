use crate::error::{PipelineError, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::fmt;

/// A single table cell.
///
/// `Invalid` marks a value that failed validation (or was null at the source).
/// Any row holding at least one `Invalid` cell is removed by [`Table::compact`].
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Time(NaiveTime),
    Invalid,
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, Cell::Invalid)
    }

    /// Returns the string content of a `Text` cell.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(value) => Some(value),
            _ => None,
        }
    }

    /// Renders the cell for output; `None` for `Invalid`.
    pub fn render(&self) -> Option<String> {
        match self {
            Cell::Invalid => None,
            other => Some(other.to_string()),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(value) => f.write_str(value),
            Cell::Date(date) => write!(f, "{}", date),
            Cell::DateTime(datetime) => write!(f, "{}", datetime),
            Cell::Time(time) => write!(f, "{}", time),
            Cell::Invalid => Ok(()),
        }
    }
}

/// A named column of cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub cells: Vec<Cell>,
}

impl Column {
    pub fn new(name: impl Into<String>, cells: Vec<Cell>) -> Self {
        Self {
            name: name.into(),
            cells,
        }
    }

    /// Builds a column of `Text` cells.
    pub fn from_text<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(name, values.into_iter().map(Cell::text).collect())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Applies `rule` to every `Text` cell in place.
    ///
    /// `Invalid` and temporal cells are left as they are, so applying the same
    /// rule twice gives the same column as applying it once.
    pub fn map_text<F>(&mut self, rule: F)
    where
        F: Fn(&str) -> Cell,
    {
        for cell in &mut self.cells {
            if let Cell::Text(value) = cell {
                *cell = rule(value);
            }
        }
    }

    pub fn invalid_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_invalid()).count()
    }
}

/// Ordered set of equally long, uniquely named columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from columns, checking names are unique and lengths agree.
    ///
    /// # Errors
    /// Returns `PipelineError::Schema` on duplicate names or ragged columns.
    pub fn try_from_columns(columns: Vec<Column>) -> Result<Self> {
        let mut table = Self::new();
        for column in columns {
            table.push_column(column)?;
        }
        Ok(table)
    }

    /// Builds a table from a header row and row-major records.
    ///
    /// # Errors
    /// Returns `PipelineError::Schema` if a record's width differs from the header's.
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Result<Self> {
        let mut columns: Vec<Column> = headers
            .into_iter()
            .map(|name| Column::new(name, Vec::with_capacity(rows.len())))
            .collect();

        for (index, row) in rows.into_iter().enumerate() {
            if row.len() != columns.len() {
                return Err(PipelineError::Schema(format!(
                    "Row {} has {} cells, expected {}",
                    index,
                    row.len(),
                    columns.len()
                )));
            }
            for (column, cell) in columns.iter_mut().zip(row) {
                column.cells.push(cell);
            }
        }

        Self::try_from_columns(columns)
    }

    /// Appends a column at the end.
    ///
    /// # Errors
    /// Returns `PipelineError::Schema` if the name is taken or the length differs.
    pub fn push_column(&mut self, column: Column) -> Result<()> {
        if self.has_column(&column.name) {
            return Err(PipelineError::Schema(format!(
                "Duplicate column: {}",
                column.name
            )));
        }
        if let Some(first) = self.columns.first() {
            if first.len() != column.len() {
                return Err(PipelineError::Schema(format!(
                    "Column {} has {} rows, expected {}",
                    column.name,
                    column.len(),
                    first.len()
                )));
            }
        }
        self.columns.push(column);
        Ok(())
    }

    pub fn num_rows(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| PipelineError::missing_column(name))
    }

    pub fn column_mut(&mut self, name: &str) -> Result<&mut Column> {
        self.columns
            .iter_mut()
            .find(|c| c.name == name)
            .ok_or_else(|| PipelineError::missing_column(name))
    }

    /// Fails with the first name in `names` that is not a column of this table.
    pub fn require_columns(&self, names: &[&str]) -> Result<()> {
        match names.iter().find(|name| !self.has_column(name)) {
            Some(missing) => Err(PipelineError::missing_column(*missing)),
            None => Ok(()),
        }
    }

    /// Removes the named columns. Every name must exist.
    pub fn drop_columns(&mut self, names: &[&str]) -> Result<()> {
        self.require_columns(names)?;
        self.columns.retain(|c| !names.contains(&c.name.as_str()));
        Ok(())
    }

    /// Returns the cells of row `index`, in column order.
    pub fn row(&self, index: usize) -> Option<Vec<&Cell>> {
        if index >= self.num_rows() {
            return None;
        }
        Some(self.columns.iter().map(|c| &c.cells[index]).collect())
    }

    pub fn rows(&self) -> impl Iterator<Item = Vec<&Cell>> + '_ {
        (0..self.num_rows()).filter_map(move |index| self.row(index))
    }

    /// Removes every row holding an `Invalid` cell in any column.
    ///
    /// Returns the number of rows removed.
    pub fn compact(&mut self) -> usize {
        let keep: Vec<bool> = (0..self.num_rows())
            .map(|index| self.columns.iter().all(|c| !c.cells[index].is_invalid()))
            .collect();
        let removed = keep.iter().filter(|kept| !**kept).count();
        if removed == 0 {
            return 0;
        }

        for column in &mut self.columns {
            let mut flags = keep.iter();
            column
                .cells
                .retain(|_| flags.next().copied().unwrap_or(false));
        }
        removed
    }

    /// Stacks tables vertically.
    ///
    /// The result has the union of all column names in order of first
    /// appearance; a table lacking a column contributes `Invalid` cells to it.
    pub fn concat(tables: Vec<Table>) -> Table {
        let mut names: Vec<String> = Vec::new();
        for table in &tables {
            for column in &table.columns {
                if !names.contains(&column.name) {
                    names.push(column.name.clone());
                }
            }
        }

        let mut columns: Vec<Column> = names
            .iter()
            .map(|name| Column::new(name.clone(), Vec::new()))
            .collect();
        for table in tables {
            let rows = table.num_rows();
            let mut parts = table.columns;
            for column in &mut columns {
                match parts.iter_mut().find(|part| part.name == column.name) {
                    Some(part) => column.cells.append(&mut part.cells),
                    None => column
                        .cells
                        .extend(std::iter::repeat(Cell::Invalid).take(rows)),
                }
            }
        }

        Table { columns }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::try_from_columns(vec![
            Column::from_text("a", ["1", "2", "3"]),
            Column::new(
                "b",
                vec![Cell::text("x"), Cell::Invalid, Cell::text("z")],
            ),
            Column::from_text("c", ["p", "q", "r"]),
        ])
        .unwrap()
    }

    #[test]
    fn compact_removes_rows_with_single_invalid_cell() {
        let mut table = sample();
        let removed = table.compact();

        assert_eq!(removed, 1);
        assert_eq!(table.num_rows(), 2);
        assert_eq!(
            table.column("a").unwrap().cells,
            vec![Cell::text("1"), Cell::text("3")]
        );
        assert_eq!(
            table.column("c").unwrap().cells,
            vec![Cell::text("p"), Cell::text("r")]
        );
    }

    #[test]
    fn compact_without_invalid_cells_is_noop() {
        let mut table = Table::try_from_columns(vec![Column::from_text("a", ["1", "2"])]).unwrap();
        assert_eq!(table.compact(), 0);
        assert_eq!(table.num_rows(), 2);
    }

    #[test]
    fn ragged_columns_are_rejected() {
        let result = Table::try_from_columns(vec![
            Column::from_text("a", ["1", "2"]),
            Column::from_text("b", ["1"]),
        ]);
        assert!(matches!(result, Err(PipelineError::Schema(_))));
    }

    #[test]
    fn duplicate_columns_are_rejected() {
        let result = Table::try_from_columns(vec![
            Column::from_text("a", ["1"]),
            Column::from_text("a", ["2"]),
        ]);
        assert!(matches!(result, Err(PipelineError::Schema(_))));
    }

    #[test]
    fn from_rows_checks_width() {
        let headers = vec!["a".to_string(), "b".to_string()];
        let result = Table::from_rows(headers, vec![vec![Cell::text("1")]]);
        assert!(matches!(result, Err(PipelineError::Schema(_))));
    }

    #[test]
    fn drop_columns_requires_existing_names() {
        let mut table = sample();
        let err = table.drop_columns(&["a", "missing"]).unwrap_err();
        assert!(matches!(err, PipelineError::MissingColumn { ref column } if column == "missing"));
        assert_eq!(table.num_columns(), 3);

        table.drop_columns(&["a", "c"]).unwrap();
        assert_eq!(table.column_names(), vec!["b"]);
    }

    #[test]
    fn concat_fills_missing_columns_with_invalid() {
        let first = Table::try_from_columns(vec![
            Column::from_text("a", ["1"]),
            Column::from_text("b", ["x"]),
        ])
        .unwrap();
        let second = Table::try_from_columns(vec![
            Column::from_text("b", ["y", "z"]),
            Column::from_text("c", ["k", "l"]),
        ])
        .unwrap();

        let table = Table::concat(vec![first, second]);
        assert_eq!(table.column_names(), vec!["a", "b", "c"]);
        assert_eq!(table.num_rows(), 3);
        assert_eq!(
            table.column("a").unwrap().cells,
            vec![Cell::text("1"), Cell::Invalid, Cell::Invalid]
        );
        assert_eq!(
            table.column("c").unwrap().cells,
            vec![Cell::Invalid, Cell::text("k"), Cell::text("l")]
        );
    }

    #[test]
    fn invalid_renders_as_none() {
        assert_eq!(Cell::Invalid.render(), None);
        assert_eq!(Cell::text("").render(), Some(String::new()));
        let date = NaiveDate::from_ymd_opt(2001, 2, 3).unwrap();
        assert_eq!(Cell::Date(date).render(), Some("2001-02-03".to_string()));
    }
}
