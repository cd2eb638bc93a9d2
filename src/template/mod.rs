pub(crate) mod directive;
pub(crate) mod document;
pub(crate) mod model;
