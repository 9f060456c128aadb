// MCP surface: JSON-RPC envelope, resource/tool catalog, request routing
// and the stdio transport loop.

pub mod aliases;
pub mod handlers;
pub mod protocol;
pub mod resources;
pub mod server;
pub mod tools;

pub use server::McpServer;
