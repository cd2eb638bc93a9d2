pub(crate) mod canvas;
pub(crate) mod compositor;
pub(crate) mod row;
