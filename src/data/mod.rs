pub(crate) mod row;
pub(crate) mod value;
