// Library root: the web layer, split out of the binary so integration tests
// can drive the router directly.

pub mod render;
pub mod routes;
