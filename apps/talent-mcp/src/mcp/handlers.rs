//! Request router: maps MCP methods onto the talent service and CSS generator.
//!
//! Every failure below the dispatch boundary comes back as an error-flagged
//! result or a JSON-RPC error object. Nothing here terminates the transport.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, error, info, warn};

use crate::css::{generate_css, ComponentKind, CustomProperties, VisualState};
use crate::errors::AppError;
use crate::mcp::aliases::resolve_alias;
use crate::mcp::protocol::{
    error_codes, methods, JsonRpcId, JsonRpcRequest, JsonRpcResponse, PROTOCOL_VERSION,
};
use crate::mcp::resources::{self, TalentResource, JSON_MIME};
use crate::mcp::tools::{self, GENERATE_CSS, QUERY_TALENTS};
use crate::models::TalentSummary;
use crate::state::AppState;
use crate::talents::Criteria;

pub const SERVER_NAME: &str = "popmelt-talent-profile";

#[derive(Debug, Default, Deserialize)]
struct QueryTalentsArgs {
    #[serde(default)]
    criteria: Option<Criteria>,
}

#[derive(Debug, Deserialize)]
struct GenerateCssArgs {
    talent_id: String,
    component: ComponentKind,
    #[serde(default)]
    state: VisualState,
    #[serde(default)]
    custom_properties: CustomProperties,
}

#[derive(Debug, Deserialize)]
struct ReadResourceParams {
    uri: String,
}

#[derive(Debug, Deserialize)]
struct CallToolParams {
    name: String,
    #[serde(default)]
    arguments: Option<Value>,
}

pub struct Handlers {
    state: AppState,
}

impl Handlers {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Routes one request. Notifications (no id) never produce a response.
    pub async fn dispatch(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        debug!("Dispatching method: {}", request.method);

        let Some(id) = request.id else {
            self.handle_notification(&request.method);
            return None;
        };
        let id = Some(id);

        let response = match request.method.as_str() {
            methods::INITIALIZE => self.handle_initialize(id),
            methods::PING => JsonRpcResponse::success(id, json!({})),
            methods::SHUTDOWN => {
                info!("Handling shutdown request");
                JsonRpcResponse::success(id, Value::Null)
            }
            methods::RESOURCES_LIST => JsonRpcResponse::success(
                id,
                json!({ "resources": resources::resource_definitions() }),
            ),
            methods::RESOURCE_TEMPLATES_LIST => JsonRpcResponse::success(
                id,
                json!({ "resourceTemplates": resources::resource_templates() }),
            ),
            methods::RESOURCES_READ => self.handle_resources_read(id, request.params).await,
            methods::TOOLS_LIST => {
                JsonRpcResponse::success(id, json!({ "tools": tools::tool_definitions() }))
            }
            methods::TOOLS_CALL => self.handle_tools_call(id, request.params).await,
            other => JsonRpcResponse::error(
                id,
                error_codes::METHOD_NOT_FOUND,
                format!("Method not found: {other}"),
            ),
        };
        Some(response)
    }

    fn handle_notification(&self, method: &str) {
        match method {
            methods::INITIALIZED => info!("Client initialized notification received"),
            other => debug!("Ignoring notification {other}"),
        }
    }

    fn handle_initialize(&self, id: Option<JsonRpcId>) -> JsonRpcResponse {
        info!(
            "Handling initialize request (talent source: {})",
            self.state.talents.source()
        );

        JsonRpcResponse::success(
            id,
            json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": {
                    "resources": {},
                    "tools": {}
                },
                "serverInfo": {
                    "name": SERVER_NAME,
                    "version": env!("CARGO_PKG_VERSION")
                }
            }),
        )
    }

    // ── Resources ──────────────────────────────────────────────────────────

    async fn handle_resources_read(
        &self,
        id: Option<JsonRpcId>,
        params: Option<Value>,
    ) -> JsonRpcResponse {
        let params: ReadResourceParams = match params.map(serde_json::from_value) {
            Some(Ok(p)) => p,
            Some(Err(e)) => {
                return JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    format!("Invalid resources/read params: {e}"),
                )
            }
            None => {
                return JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    "Missing 'uri' parameter",
                )
            }
        };

        let Some(resource) = TalentResource::parse(&params.uri) else {
            return JsonRpcResponse::error(
                id,
                error_codes::RESOURCE_NOT_FOUND,
                format!("Resource not found: {}", params.uri),
            );
        };

        let text = match &resource {
            TalentResource::List => self.read_talent_list().await,
            TalentResource::Talent(talent_id) => self.read_talent(talent_id).await,
        };

        match text {
            Ok(text) => JsonRpcResponse::success(
                id,
                json!({
                    "contents": [{
                        "uri": params.uri,
                        "mimeType": JSON_MIME,
                        "text": text
                    }]
                }),
            ),
            Err(e) => {
                match &e {
                    AppError::NotFound(msg) => debug!("{msg}"),
                    other => error!("Error reading {}: {other}", params.uri),
                }
                Self::resource_error(id)
            }
        }
    }

    async fn read_talent_list(&self) -> Result<String, AppError> {
        debug!("Listing all talents");
        let summaries: Vec<TalentSummary> = self
            .state
            .talents
            .list()
            .await
            .iter()
            .map(|t| t.summary_row())
            .collect();
        Ok(serde_json::to_string(&summaries)?)
    }

    async fn read_talent(&self, talent_id: &str) -> Result<String, AppError> {
        debug!("Fetching talent: {talent_id}");
        let talent = self
            .state
            .talents
            .get(talent_id)
            .await
            .ok_or_else(|| AppError::NotFound(format!("Talent {talent_id} not found")))?;
        Ok(serde_json::to_string(&talent)?)
    }

    fn resource_error(id: Option<JsonRpcId>) -> JsonRpcResponse {
        JsonRpcResponse::success(id, json!({ "contents": [], "isError": true }))
    }

    // ── Tools ──────────────────────────────────────────────────────────────

    async fn handle_tools_call(
        &self,
        id: Option<JsonRpcId>,
        params: Option<Value>,
    ) -> JsonRpcResponse {
        let params: CallToolParams = match params.map(serde_json::from_value) {
            Some(Ok(p)) => p,
            Some(Err(e)) => {
                return JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    format!("Invalid tools/call params: {e}"),
                )
            }
            None => {
                return JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    "Missing 'name' parameter",
                )
            }
        };

        let arguments = params.arguments.unwrap_or_else(|| json!({}));
        let outcome = match resolve_alias(&params.name) {
            QUERY_TALENTS => self
                .call_query_talents(arguments)
                .await
                .map_err(|e| e.to_tool_message("Failed to query talents")),
            GENERATE_CSS => self
                .call_generate_css(arguments)
                .await
                .map_err(|e| e.to_tool_message("Failed to generate CSS")),
            unknown => {
                warn!("Unknown tool requested: {unknown}");
                return JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    format!("Unknown tool: {unknown}"),
                );
            }
        };

        match outcome {
            Ok(text) => Self::tool_text(id, text, false),
            Err(message) => Self::tool_text(id, message, true),
        }
    }

    async fn call_query_talents(&self, arguments: Value) -> Result<String, AppError> {
        let args: QueryTalentsArgs = parse_args(QUERY_TALENTS, arguments)?;
        let criteria = args.criteria.unwrap_or_default();
        debug!("Querying talents with criteria: {:?}", criteria);

        let talents = self.state.talents.query(&criteria).await;
        Ok(serde_json::to_string_pretty(&talents)?)
    }

    async fn call_generate_css(&self, arguments: Value) -> Result<String, AppError> {
        let args: GenerateCssArgs = parse_args(GENERATE_CSS, arguments)?;
        debug!(
            "Generating CSS for {} ({}) using talent {}",
            args.component, args.state, args.talent_id
        );

        let talent = self
            .state
            .talents
            .get(&args.talent_id)
            .await
            .ok_or_else(|| {
                AppError::NotFound(format!("Talent with ID \"{}\" not found", args.talent_id))
            })?;

        Ok(generate_css(
            &talent,
            args.component,
            args.state,
            &args.custom_properties,
        ))
    }

    fn tool_text(id: Option<JsonRpcId>, text: String, is_error: bool) -> JsonRpcResponse {
        JsonRpcResponse::success(
            id,
            json!({
                "content": [{
                    "type": "text",
                    "text": text
                }],
                "isError": is_error
            }),
        )
    }
}

fn parse_args<T: DeserializeOwned>(tool: &str, arguments: Value) -> Result<T, AppError> {
    serde_json::from_value(arguments)
        .map_err(|e| AppError::Validation(format!("Invalid arguments for {tool}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;

    use crate::config::Config;
    use crate::models::{NewTalent, Talent, TalentPatch};
    use crate::store::{InMemoryStore, StoreError, TalentStore};
    use crate::talents::fallback::fallback_talents;
    use crate::talents::TalentService;

    struct DownStore;

    fn down() -> StoreError {
        StoreError::Api {
            context: "Error fetching talents".to_string(),
            status: 500,
            code: None,
            message: "Internal Server Error".to_string(),
        }
    }

    #[async_trait]
    impl TalentStore for DownStore {
        fn backend(&self) -> &'static str {
            "down"
        }
        async fn fetch_all(&self) -> Result<Vec<Talent>, StoreError> {
            Err(down())
        }
        async fn fetch_by_id(&self, _id: &str) -> Result<Option<Talent>, StoreError> {
            Err(down())
        }
        async fn query(&self, _criteria: &Criteria) -> Result<Vec<Talent>, StoreError> {
            Err(down())
        }
        async fn create(&self, _talent: NewTalent) -> Result<Talent, StoreError> {
            Err(down())
        }
        async fn update(&self, _id: &str, _patch: TalentPatch) -> Result<Talent, StoreError> {
            Err(down())
        }
        async fn delete(&self, _id: &str) -> Result<(), StoreError> {
            Err(down())
        }
    }

    fn handlers_with(service: TalentService) -> Handlers {
        let config = Config::from_lookup(|_| None).unwrap();
        Handlers::new(AppState::new(config, service))
    }

    fn fallback_handlers() -> Handlers {
        handlers_with(TalentService::fallback_only())
    }

    fn request(method: &str, params: Value) -> JsonRpcRequest {
        JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            id: Some(JsonRpcId::Number(1)),
            method: method.to_string(),
            params: Some(params),
        }
    }

    async fn call(handlers: &Handlers, method: &str, params: Value) -> JsonRpcResponse {
        handlers.dispatch(request(method, params)).await.unwrap()
    }

    async fn call_tool(handlers: &Handlers, name: &str, arguments: Value) -> Value {
        let response = call(
            handlers,
            methods::TOOLS_CALL,
            json!({ "name": name, "arguments": arguments }),
        )
        .await;
        assert!(response.error.is_none(), "{:?}", response.error);
        response.result.unwrap()
    }

    fn tool_text(result: &Value) -> &str {
        result["content"][0]["text"].as_str().unwrap()
    }

    #[tokio::test]
    async fn test_initialize_reports_capabilities() {
        let response = call(&fallback_handlers(), methods::INITIALIZE, json!({})).await;
        let result = response.result.unwrap();
        assert_eq!(result["protocolVersion"], PROTOCOL_VERSION);
        assert!(result["capabilities"]["resources"].is_object());
        assert!(result["capabilities"]["tools"].is_object());
        assert_eq!(result["serverInfo"]["name"], SERVER_NAME);
    }

    #[tokio::test]
    async fn test_notifications_get_no_response() {
        let mut req = request(methods::INITIALIZED, json!({}));
        req.id = None;
        assert!(fallback_handlers().dispatch(req).await.is_none());
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let response = call(&fallback_handlers(), "prompts/list", json!({})).await;
        assert_eq!(response.error.unwrap().code, error_codes::METHOD_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_ping_and_shutdown_succeed() {
        let handlers = fallback_handlers();
        assert!(call(&handlers, methods::PING, json!({})).await.error.is_none());
        assert!(call(&handlers, methods::SHUTDOWN, json!({})).await.error.is_none());
    }

    #[tokio::test]
    async fn test_resource_catalogs() {
        let handlers = fallback_handlers();
        let list = call(&handlers, methods::RESOURCES_LIST, json!({})).await;
        assert_eq!(list.result.unwrap()["resources"][0]["uri"], "talents://list");

        let templates = call(&handlers, methods::RESOURCE_TEMPLATES_LIST, json!({})).await;
        assert_eq!(
            templates.result.unwrap()["resourceTemplates"][0]["uriTemplate"],
            "talents://{id}"
        );
    }

    #[tokio::test]
    async fn test_read_talent_list_returns_summaries() {
        let response = call(
            &fallback_handlers(),
            methods::RESOURCES_READ,
            json!({ "uri": "talents://list" }),
        )
        .await;
        let result = response.result.unwrap();
        let text = result["contents"][0]["text"].as_str().unwrap();
        let rows: Value = serde_json::from_str(text).unwrap();
        assert_eq!(
            rows,
            json!([
                {"id": "maya-chen", "name": "Maya Chen", "type": "designer"},
                {"id": "olivia-gray", "name": "Olivia Gray", "type": "designer"}
            ])
        );
    }

    #[tokio::test]
    async fn test_read_talent_returns_full_record() {
        let response = call(
            &fallback_handlers(),
            methods::RESOURCES_READ,
            json!({ "uri": "talents://olivia-gray" }),
        )
        .await;
        let result = response.result.unwrap();
        assert_eq!(result["contents"][0]["uri"], "talents://olivia-gray");
        let talent: Talent =
            serde_json::from_str(result["contents"][0]["text"].as_str().unwrap()).unwrap();
        assert_eq!(talent.name, "Olivia Gray");
        assert!(result.get("isError").is_none());
    }

    #[tokio::test]
    async fn test_read_missing_talent_is_error_flagged() {
        let response = call(
            &fallback_handlers(),
            methods::RESOURCES_READ,
            json!({ "uri": "talents://ghost" }),
        )
        .await;
        assert!(response.error.is_none());
        assert_eq!(
            response.result.unwrap(),
            json!({ "contents": [], "isError": true })
        );
    }

    #[tokio::test]
    async fn test_read_talent_twice_is_byte_identical() {
        let handlers = fallback_handlers();
        let params = json!({ "uri": "talents://maya-chen" });
        let first = call(&handlers, methods::RESOURCES_READ, params.clone()).await;
        let second = call(&handlers, methods::RESOURCES_READ, params).await;
        assert_eq!(
            first.result.unwrap()["contents"][0]["text"],
            second.result.unwrap()["contents"][0]["text"]
        );
    }

    #[tokio::test]
    async fn test_read_foreign_uri_and_missing_params() {
        let handlers = fallback_handlers();
        let foreign = call(&handlers, methods::RESOURCES_READ, json!({ "uri": "file:///x" })).await;
        assert_eq!(foreign.error.unwrap().code, error_codes::RESOURCE_NOT_FOUND);

        let mut req = request(methods::RESOURCES_READ, json!({}));
        req.params = None;
        let missing = handlers.dispatch(req).await.unwrap();
        assert_eq!(missing.error.unwrap().code, error_codes::INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_tools_list() {
        let response = call(&fallback_handlers(), methods::TOOLS_LIST, json!({})).await;
        let result = response.result.unwrap();
        assert_eq!(result["tools"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_query_type_designer_returns_both() {
        let result = call_tool(
            &fallback_handlers(),
            QUERY_TALENTS,
            json!({ "criteria": { "type": "designer" } }),
        )
        .await;
        assert_eq!(result["isError"], false);
        let talents: Vec<Talent> = serde_json::from_str(tool_text(&result)).unwrap();
        assert_eq!(talents.len(), 2);
    }

    #[tokio::test]
    async fn test_query_keywords_vibrant_returns_maya_pretty_printed() {
        let result = call_tool(
            &fallback_handlers(),
            QUERY_TALENTS,
            json!({ "criteria": { "keywords": "vibrant" } }),
        )
        .await;
        let text = tool_text(&result);
        assert!(text.starts_with("[\n  {"));
        let talents: Vec<Talent> = serde_json::from_str(text).unwrap();
        assert_eq!(talents.len(), 1);
        assert_eq!(talents[0].id, "maya-chen");
    }

    #[tokio::test]
    async fn test_query_without_criteria_returns_all() {
        let result = call_tool(&fallback_handlers(), QUERY_TALENTS, json!({})).await;
        let talents: Vec<Talent> = serde_json::from_str(tool_text(&result)).unwrap();
        assert_eq!(talents.len(), 2);
    }

    #[tokio::test]
    async fn test_query_falls_back_when_store_is_down() {
        let handlers = handlers_with(TalentService::new(Some(Arc::new(DownStore))));
        let result = call_tool(
            &handlers,
            QUERY_TALENTS,
            json!({ "criteria": { "keywords": "modern" } }),
        )
        .await;
        assert_eq!(result["isError"], false);
        let talents: Vec<Talent> = serde_json::from_str(tool_text(&result)).unwrap();
        assert_eq!(talents[0].id, "olivia-gray");
    }

    #[tokio::test]
    async fn test_query_reads_from_configured_store() {
        let store = InMemoryStore::with_talents(fallback_talents()[..1].to_vec());
        let handlers = handlers_with(TalentService::new(Some(Arc::new(store))));
        let result = call_tool(&handlers, QUERY_TALENTS, json!({})).await;
        let talents: Vec<Talent> = serde_json::from_str(tool_text(&result)).unwrap();
        assert_eq!(talents.len(), 1);
    }

    #[tokio::test]
    async fn test_query_with_non_object_criteria_is_error_flagged() {
        let result = call_tool(
            &fallback_handlers(),
            QUERY_TALENTS,
            json!({ "criteria": "designer" }),
        )
        .await;
        assert_eq!(result["isError"], true);
        assert!(tool_text(&result).contains("Invalid arguments for query_talents"));
    }

    #[tokio::test]
    async fn test_generate_button_css() {
        let result = call_tool(
            &fallback_handlers(),
            GENERATE_CSS,
            json!({ "talent_id": "maya-chen", "component": "button" }),
        )
        .await;
        assert_eq!(result["isError"], false);
        let css = tool_text(&result);
        assert!(css.contains(".button {"));
        assert!(css.contains(".button:hover"));
        assert!(css.contains(".button:disabled"));
    }

    #[tokio::test]
    async fn test_generate_css_for_unknown_talent_is_error_flagged() {
        let result = call_tool(
            &fallback_handlers(),
            GENERATE_CSS,
            json!({ "talent_id": "ghost", "component": "button" }),
        )
        .await;
        assert_eq!(result["isError"], true);
        let body: Value = serde_json::from_str(tool_text(&result)).unwrap();
        assert_eq!(body["error"], "Talent with ID \"ghost\" not found");
    }

    #[tokio::test]
    async fn test_generate_navbar_is_placeholder() {
        let result = call_tool(
            &fallback_handlers(),
            GENERATE_CSS,
            json!({
                "talent_id": "olivia-gray",
                "component": "navbar",
                "state": "hover",
                "custom_properties": { "gap": 4, "accent": "teal" }
            }),
        )
        .await;
        assert_eq!(tool_text(&result), "/* CSS for navbar component */");
    }

    #[tokio::test]
    async fn test_generate_css_rejects_unknown_component() {
        let result = call_tool(
            &fallback_handlers(),
            GENERATE_CSS,
            json!({ "talent_id": "maya-chen", "component": "footer" }),
        )
        .await;
        assert_eq!(result["isError"], true);
        assert!(tool_text(&result).contains("Invalid arguments for generate_css"));
    }

    #[tokio::test]
    async fn test_legacy_tool_names_are_accepted() {
        let result = call_tool(
            &fallback_handlers(),
            "mcp_popmelt_generate_css",
            json!({ "talent_id": "maya-chen", "component": "card" }),
        )
        .await;
        assert!(tool_text(&result).starts_with(".card {"));
    }

    #[tokio::test]
    async fn test_unknown_tool_is_invalid_params() {
        let response = call(
            &fallback_handlers(),
            methods::TOOLS_CALL,
            json!({ "name": "delete_talent", "arguments": {} }),
        )
        .await;
        assert_eq!(response.error.unwrap().code, error_codes::INVALID_PARAMS);
    }
}
