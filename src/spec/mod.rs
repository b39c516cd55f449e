pub(crate) mod legacy;
pub(crate) mod model;
pub(crate) mod validate;
