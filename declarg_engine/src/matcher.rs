mod model;
mod short;

pub(crate) use model::*;
pub(crate) use short::*;
