//! Sample inputs fed to inference: decoded JSON tables and raw TBL files.

mod json_sample;
mod tbl;

pub use json_sample::{JsonSample, JsonTable};
pub use tbl::{TblFile, TblSection, SECTION_NAME_LEN, TBL_MAGIC};
