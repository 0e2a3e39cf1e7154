//! Structured statement representation.
//!
//! Statements hold ordered clause lists and render by joining them, so
//! the emitted SQL never needs trailing-separator trimming and the bind
//! order is exactly the order clauses were added. Values are always bound
//! through `?` placeholders; only identifiers and LIMIT/OFFSET literals
//! are spliced, and identifiers go through [`quote_ident`].

pub(crate) fn quote_ident(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

fn where_clause(sql: &mut String, filters: &[(String, String)]) {
    if filters.is_empty() {
        return;
    }
    // Equality predicates conjoined with AND is the only supported shape.
    let predicates = filters
        .iter()
        .map(|(column, _)| format!("{} = ?", quote_ident(column)))
        .collect::<Vec<_>>()
        .join(" AND ");
    sql.push_str(" WHERE ");
    sql.push_str(&predicates);
}

#[derive(Debug, Default)]
pub(crate) struct SelectStatement {
    pub table: String,
    /// Explicitly requested columns; when empty the executor fills this
    /// with the table's declared columns before rendering.
    pub columns: Vec<String>,
    pub filters: Vec<(String, String)>,
    /// (column, ascending) pairs; the first entry is the primary key of
    /// the ordering.
    pub orders: Vec<(String, bool)>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl SelectStatement {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            ..Default::default()
        }
    }

    /// Fill the column list from the table's declared columns. Explicitly
    /// requested columns win; the declared list only applies when no
    /// column was requested at all.
    pub fn default_columns(&mut self, declared: Vec<String>) {
        if self.columns.is_empty() {
            self.columns = declared;
        }
    }

    pub fn sql(&self) -> String {
        let columns = self
            .columns
            .iter()
            .map(|c| quote_ident(c))
            .collect::<Vec<_>>()
            .join(", ");
        let mut sql = format!("SELECT {} FROM {}", columns, quote_ident(&self.table));
        where_clause(&mut sql, &self.filters);
        if !self.orders.is_empty() {
            let orders = self
                .orders
                .iter()
                .map(|(column, ascending)| {
                    format!(
                        "{} {}",
                        quote_ident(column),
                        if *ascending { "ASC" } else { "DESC" }
                    )
                })
                .collect::<Vec<_>>()
                .join(", ");
            sql.push_str(" ORDER BY ");
            sql.push_str(&orders);
        }
        if let Some(n) = self.limit {
            sql.push_str(&format!(" LIMIT {n}"));
        }
        if let Some(n) = self.offset {
            sql.push_str(&format!(" OFFSET {n}"));
        }
        sql
    }

    pub fn params(&self) -> impl Iterator<Item = &str> {
        self.filters.iter().map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Default)]
pub(crate) struct InsertStatement {
    pub table: String,
    pub assignments: Vec<(String, String)>,
}

impl InsertStatement {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            ..Default::default()
        }
    }

    pub fn sql(&self) -> String {
        let columns = self
            .assignments
            .iter()
            .map(|(column, _)| quote_ident(column))
            .collect::<Vec<_>>()
            .join(", ");
        let placeholders = vec!["?"; self.assignments.len()].join(", ");
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            quote_ident(&self.table),
            columns,
            placeholders
        )
    }

    pub fn params(&self) -> impl Iterator<Item = &str> {
        self.assignments.iter().map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Default)]
pub(crate) struct UpdateStatement {
    pub table: String,
    pub assignments: Vec<(String, String)>,
    pub filters: Vec<(String, String)>,
}

impl UpdateStatement {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            ..Default::default()
        }
    }

    pub fn sql(&self) -> String {
        let assignments = self
            .assignments
            .iter()
            .map(|(column, _)| format!("{} = ?", quote_ident(column)))
            .collect::<Vec<_>>()
            .join(", ");
        let mut sql = format!("UPDATE {} SET {}", quote_ident(&self.table), assignments);
        where_clause(&mut sql, &self.filters);
        sql
    }

    /// SET values first, then WHERE values, matching placeholder order.
    pub fn params(&self) -> impl Iterator<Item = &str> {
        self.assignments
            .iter()
            .chain(self.filters.iter())
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Default)]
pub(crate) struct DeleteStatement {
    pub table: String,
    pub filters: Vec<(String, String)>,
}

impl DeleteStatement {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            ..Default::default()
        }
    }

    pub fn sql(&self) -> String {
        let mut sql = format!("DELETE FROM {}", quote_ident(&self.table));
        where_clause(&mut sql, &self.filters);
        sql
    }

    pub fn params(&self) -> impl Iterator<Item = &str> {
        self.filters.iter().map(|(_, value)| value.as_str())
    }
}
