/// Compilation of raw definitions into a renderable table.
pub mod compile;
/// Serde model of block definition files.
pub mod model;
