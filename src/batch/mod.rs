pub(crate) mod activity_log;
pub(crate) mod naming;
pub(crate) mod runner;
pub(crate) mod validate;
