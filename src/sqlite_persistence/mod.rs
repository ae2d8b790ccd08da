mod table_schema;

pub use table_schema::{Column, ForeignKey, Schema, SqlType, Table};
