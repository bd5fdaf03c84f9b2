pub(crate) mod context;
pub(crate) mod mark;
pub(crate) mod minors;
