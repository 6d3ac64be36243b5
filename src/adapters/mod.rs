// Adapters layer: concrete implementations for external systems (database, report files).

pub mod csv_report;
pub mod sqlite;
