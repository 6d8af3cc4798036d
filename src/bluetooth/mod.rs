pub mod connection;
pub mod reader;

pub use connection::{connect_with_retry, with_retry};
pub use reader::fetch_record;
