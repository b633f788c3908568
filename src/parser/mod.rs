pub mod columns;
pub mod deserializers;
pub mod pipeline;
pub mod types;

pub use pipeline::{load_or_empty, parse_csv, parse_csv_reader, ParseOutput};
pub use types::{ParseWarning, SalesRecord, SalesRecordRaw};
