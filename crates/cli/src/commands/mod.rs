pub(crate) mod render;
pub(crate) mod results;
pub(crate) mod submit;
pub(crate) mod text;
