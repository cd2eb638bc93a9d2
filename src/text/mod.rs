pub(crate) mod draw;
pub(crate) mod layout;
pub(crate) mod metrics;
pub(crate) mod normalize;
