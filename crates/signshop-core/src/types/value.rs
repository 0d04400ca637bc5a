//! Typed SQL values and materialized result rows.
//!
//! Parameters are bound from `SqlValue` only, so an unsupported parameter
//! type cannot reach a statement. Query results are copied into `Rows`
//! before the connection closes; nothing borrows from a live cursor.

/// A single SQL value, used both for bound parameters and result cells.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl SqlValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        Self::Integer(i64::from(v))
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        Self::Real(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&String> for SqlValue {
    fn from(v: &String) -> Self {
        Self::Text(v.clone())
    }
}

impl From<Vec<u8>> for SqlValue {
    fn from(v: Vec<u8>) -> Self {
        Self::Blob(v)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

/// Build a `Vec<SqlValue>` from heterogeneous values.
#[macro_export]
macro_rules! sql_params {
    () => {
        ::std::vec::Vec::<$crate::types::value::SqlValue>::new()
    };
    ($($value:expr),+ $(,)?) => {
        vec![$($crate::types::value::SqlValue::from($value)),+]
    };
}

/// Result rows copied out of a query, with their column names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rows {
    columns: Vec<String>,
    rows: Vec<Vec<SqlValue>>,
}

impl Rows {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: Vec<SqlValue>) {
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn first(&self) -> Option<Row<'_>> {
        self.iter().next()
    }

    pub fn iter(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(move |values| Row { rows: self, values })
    }

    /// Column lookup is case-insensitive, as SQL identifiers are.
    fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.eq_ignore_ascii_case(name))
    }
}

/// A borrowed view of one result row.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    rows: &'a Rows,
    values: &'a [SqlValue],
}

impl<'a> Row<'a> {
    /// Value of the named column, `None` if the column does not exist.
    pub fn get(&self, column: &str) -> Option<&'a SqlValue> {
        self.rows
            .column_index(column)
            .and_then(|i| self.values.get(i))
    }

    pub fn get_i64(&self, column: &str) -> Option<i64> {
        self.get(column).and_then(SqlValue::as_i64)
    }

    pub fn get_str(&self, column: &str) -> Option<&'a str> {
        self.get(column).and_then(SqlValue::as_str)
    }

    pub fn values(&self) -> &'a [SqlValue] {
        self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Rows {
        let mut rows = Rows::new(vec!["BookID".into(), "Title".into()]);
        rows.push(vec![SqlValue::Integer(7), SqlValue::Text("Log".into())]);
        rows.push(vec![SqlValue::Integer(9), SqlValue::Null]);
        rows
    }

    #[test]
    fn column_lookup_ignores_case() {
        let rows = sample();
        let first = rows.first().unwrap();
        assert_eq!(first.get_i64("bookid"), Some(7));
        assert_eq!(first.get_str("TITLE"), Some("Log"));
        assert!(first.get("Author").is_none());
    }

    #[test]
    fn null_cells_read_as_none() {
        let rows = sample();
        let second = rows.iter().nth(1).unwrap();
        assert_eq!(second.get_str("Title"), None);
        assert!(second.get("Title").unwrap().is_null());
    }

    #[test]
    fn params_macro_converts() {
        let none: Option<&str> = None;
        let params = crate::sql_params!["Shop", 3_i64, -1_i32, none];
        assert_eq!(
            params,
            vec![
                SqlValue::Text("Shop".into()),
                SqlValue::Integer(3),
                SqlValue::Integer(-1),
                SqlValue::Null,
            ]
        );
    }
}
