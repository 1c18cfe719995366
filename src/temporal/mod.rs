mod congress;
mod select;

pub use congress::Congress;
pub use select::{select_active, select_for_date, OverlapPolicy, Selection, TemporalError};
