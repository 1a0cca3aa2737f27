pub mod descriptor;
pub mod executor;
pub mod registry;
pub mod schema;
pub mod search;

pub use descriptor::ToolDescriptor;
pub use executor::ToolExecutor;
pub use registry::{Tool, ToolRegistry};
pub use schema::tool_call_schema_json;
pub use search::search_tool;
