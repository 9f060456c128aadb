//! Legacy tool names still sent by older client configurations.

/// Maps a legacy tool name to its canonical name; other names pass through.
pub fn resolve_alias(name: &str) -> &str {
    match name {
        "mcp_popmelt_query_talents" => "query_talents",
        "mcp_popmelt_generate_css" => "generate_css",
        other => other,
    }
}
