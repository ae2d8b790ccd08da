use anyhow::{bail, Result};
use rusqlite::{params, Connection};

#[macro_export]
macro_rules! sqlite_column {
    ($name:expr, $sql_type:expr $(, $field:ident = $value:expr)*) => {
        {
            // Only mutated when optional field assignments are passed
            #[allow(unused_mut)]
            let mut column = Column {
                name: $name,
                sql_type: $sql_type,
                is_primary_key: false,
                non_null: false,
                foreign_key: None,
            };
            $(
                column.$field = $value;
            )*
            column
        }
    };
}

#[derive(Debug, PartialEq, Eq)]
pub enum SqlType {
    Text,
    Integer,
    Real,
}

impl SqlType {
    fn as_sql(&self) -> &'static str {
        match self {
            SqlType::Text => "TEXT",
            SqlType::Integer => "INTEGER",
            SqlType::Real => "REAL",
        }
    }
}

pub struct ForeignKey {
    pub foreign_table: &'static str,
    pub foreign_column: &'static str,
}

pub struct Column {
    pub name: &'static str,
    pub sql_type: &'static SqlType,
    pub is_primary_key: bool,
    pub non_null: bool,
    pub foreign_key: Option<&'static ForeignKey>,
}

pub struct Table {
    pub name: &'static str,
    pub columns: &'static [Column],
    pub indices: &'static [(&'static str, &'static str)],
}

impl Table {
    pub fn create(&self, conn: &Connection) -> Result<()> {
        let column_defs: Vec<String> = self
            .columns
            .iter()
            .map(|column| {
                let mut def = format!("{} {}", column.name, column.sql_type.as_sql());
                if column.is_primary_key {
                    def.push_str(" PRIMARY KEY");
                }
                if column.non_null {
                    def.push_str(" NOT NULL");
                }
                if let Some(foreign_key) = column.foreign_key {
                    def.push_str(&format!(
                        " REFERENCES {}({})",
                        foreign_key.foreign_table, foreign_key.foreign_column
                    ));
                }
                def
            })
            .collect();

        conn.execute(
            &format!("CREATE TABLE {} ({});", self.name, column_defs.join(", ")),
            params![],
        )?;

        for (index_name, column_name) in self.indices {
            conn.execute(
                &format!(
                    "CREATE INDEX {} ON {}({});",
                    index_name, self.name, column_name
                ),
                params![],
            )?;
        }
        Ok(())
    }

    /// Names of the declared columns the live table lacks.
    ///
    /// Comparison is case-insensitive, as SQLite identifiers are. Columns the
    /// live table has beyond the declared ones are ignored.
    pub fn missing_columns(&self, conn: &Connection) -> Result<Vec<&'static str>> {
        let mut stmt = conn.prepare(&format!("PRAGMA table_info({});", self.name))?;
        let actual: Vec<String> = stmt
            .query_map(params![], |row| row.get::<_, String>(1))?
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .map(|name| name.to_ascii_lowercase())
            .collect();

        Ok(self
            .columns
            .iter()
            .map(|c| c.name)
            .filter(|name| !actual.contains(&name.to_ascii_lowercase()))
            .collect())
    }

    fn exists(&self, conn: &Connection) -> Result<bool> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name = ?1 COLLATE NOCASE",
            params![self.name],
            |r| r.get(0),
        )?;
        Ok(count > 0)
    }
}

/// A set of tables that together make up a database layout.
pub struct Schema {
    pub tables: &'static [Table],
}

impl Schema {
    pub fn create(&self, conn: &Connection) -> Result<()> {
        conn.execute("PRAGMA foreign_keys = ON;", params![])?;
        for table in self.tables {
            table.create(conn)?;
        }
        Ok(())
    }

    /// Checks that every table exists with at least the declared columns.
    pub fn validate(&self, conn: &Connection) -> Result<()> {
        for table in self.tables {
            if !table.exists(conn)? {
                bail!("Table {} is missing", table.name);
            }
            let missing = table.missing_columns(conn)?;
            if !missing.is_empty() {
                bail!(
                    "Table {} is missing columns: {}",
                    table.name,
                    missing.join(", ")
                );
            }
        }
        Ok(())
    }
}
