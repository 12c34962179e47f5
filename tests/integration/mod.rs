//! Integration tests for text2cypher-cleanup.

pub mod detector_test;
pub mod live_graph_test;
pub mod pipeline_test;
pub mod schema_cache_test;
