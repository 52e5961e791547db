pub mod a001_conversation;
pub mod a002_query_metadata;
pub mod a003_tool_registry;
