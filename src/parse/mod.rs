pub mod query;
pub mod record;

pub use query::{QueryToken, split_query};
pub use record::{
    CommentRecord, EpicFile, EpicRecord, RecordError, TaskFile, TaskRecord, format_date,
    format_datetime, parse_date, parse_datetime,
};
