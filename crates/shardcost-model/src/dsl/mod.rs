//! Text front-ends: schema descriptions and query plans.

pub mod plan;
pub mod schema;
