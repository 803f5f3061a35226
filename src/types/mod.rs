//! Data types shared by the layout engine, the surfaces and the XLSX codec.

mod cell;
mod config;
mod mutation;
mod page;
mod style;
mod workbook;

pub use cell::*;
pub use config::*;
pub use mutation::*;
pub use page::*;
pub use style::*;
pub use workbook::*;
