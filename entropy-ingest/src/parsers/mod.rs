pub mod csv_rows;
pub mod json_rows;
