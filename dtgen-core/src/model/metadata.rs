use serde::{Deserialize, Serialize};

/// Storage column descriptors for SQL exports.
///
/// Key names follow the export contract of the host application.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct SqlMetadata {
	/// Generic / default dialect.
	pub field: String,
	#[serde(rename = "field_Oracle")]
	pub field_oracle: String,
	#[serde(rename = "field_MSSQL")]
	pub field_mssql: String,
}

impl SqlMetadata {
	/// Nullable variable-length string column of `len` characters.
	pub fn nullable_varchar(len: usize) -> Self {
		Self {
			field: format!("varchar({len}) default NULL"),
			field_oracle: format!("varchar2({len}) default NULL"),
			field_mssql: format!("VARCHAR({len}) NULL"),
		}
	}
}

/// Metadata a data type exposes for export.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct DataTypeMetadata {
	pub sql: SqlMetadata,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn serializes_with_dialect_keys() {
		let metadata = DataTypeMetadata { sql: SqlMetadata::nullable_varchar(255) };
		let json = serde_json::to_value(&metadata).unwrap();
		assert_eq!(json["sql"]["field"], "varchar(255) default NULL");
		assert_eq!(json["sql"]["field_Oracle"], "varchar2(255) default NULL");
		assert_eq!(json["sql"]["field_MSSQL"], "VARCHAR(255) NULL");
	}
}
