pub(crate) mod merge;
pub(crate) mod post;
pub(crate) mod walkdown;
pub(crate) mod walkup;

pub mod ext_face;
pub mod structures;
