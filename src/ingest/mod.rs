/// Turns already-tabulated upload data into incident rows.
///
/// Decoding the spreadsheet bytes happens upstream; this module starts from a
/// header list plus one header->cell map per data row.
///
/// Submodules:
/// - `rows` — source-format detection, header resolution and per-row cleanup.

pub mod rows;

pub use rows::{ingest_table, ingest_table_with, TabularData};
