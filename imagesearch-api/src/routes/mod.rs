pub(crate) mod error;
pub(crate) mod images;

pub(crate) use error::SearchError;
