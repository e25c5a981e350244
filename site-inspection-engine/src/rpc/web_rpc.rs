use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::engine::assets::analysis::{AnalysisResult, StatusCode};
use crate::engine::core::app_state::ViewportSet;
use crate::engine::core::config::ViewerConfig;
use crate::engine::elements::element_list::ElementList;
use crate::engine::elements::visibility::{VisibilityCommand, VisibilitySets};
use crate::engine::loading::analysis_loader::{AnalysisLoader, AnalysisReceived};
use crate::engine::loading::point_cloud_loader::PointCloudStore;
use crate::engine::viewport::render_list::build_render_list;
use crate::tools::measure::commands::ViewportCommand;
use crate::tools::measure::interaction::ViewportInteraction;
use crate::tools::measure::overlay::MeasurementOverlay;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;

#[cfg(target_arch = "wasm32")]
use web_sys::{MessageEvent, window};

/// JSON-RPC 2.0 request structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 response structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub result: Option<serde_json::Value>,
    pub error: Option<RpcError>,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 notification structure for one-way communication.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcNotification {
    pub jsonrpc: String,
    pub method: String,
    pub params: serde_json::Value,
}

/// JSON-RPC 2.0 error object.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

/// Resource managing bidirectional RPC communication with the dashboard frontend.
/// Handles both request-response patterns and notification broadcasting.
#[derive(Resource, Default)]
pub struct WebRpcInterface {
    outgoing_notifications: Vec<RpcNotification>,
    outgoing_responses: Vec<RpcResponse>,
}

impl WebRpcInterface {
    /// Send notification to the frontend without expecting response.
    pub fn send_notification(&mut self, method: &str, params: serde_json::Value) {
        self.outgoing_notifications.push(RpcNotification {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
        });
    }

    /// Queue response for transmission to the frontend.
    fn queue_response(&mut self, response: RpcResponse) {
        self.outgoing_responses.push(response);
    }

    /// Notifications queued this frame, oldest first.
    pub fn pending_notifications(&self) -> &[RpcNotification] {
        &self.outgoing_notifications
    }

    pub fn pending_responses(&self) -> &[RpcResponse] {
        &self.outgoing_responses
    }
}

/// Plugin establishing WebRPC communication layer for iframe-based deployment.
pub struct WebRpcPlugin;

impl Plugin for WebRpcPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WebRpcInterface>()
            .add_event::<IncomingRpcMessage>()
            .add_systems(
                Update,
                (process_incoming_messages, handle_rpc_messages)
                    .chain()
                    .in_set(ViewportSet::Input),
            )
            .add_systems(PostUpdate, send_outgoing_messages);

        #[cfg(target_arch = "wasm32")]
        app.add_systems(Startup, setup_message_listener);
    }
}

#[cfg(target_arch = "wasm32")]
fn setup_message_listener(mut commands: Commands) {
    use std::sync::Arc;
    use std::sync::Mutex;

    // Thread-safe message queue for cross-thread communication.
    let message_queue: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let queue_clone = message_queue.clone();

    let closure = Closure::wrap(Box::new(move |event: MessageEvent| {
        // Filter messages to ensure they contain string data.
        if let Ok(data) = event.data().dyn_into::<js_sys::JsString>() {
            let message_str: String = data.into();

            if message_str.contains("jsonrpc") {
                if let Ok(mut queue) = queue_clone.lock() {
                    queue.push(message_str);
                }
            }
        }
    }) as Box<dyn FnMut(MessageEvent)>);

    if let Some(window) = window() {
        if let Err(e) =
            window.add_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
        {
            error!("Failed to register message listener: {:?}", e);
        }
    }

    // Prevent closure from being dropped by transferring ownership to JS.
    closure.forget();
    commands.insert_resource(MessageQueue(message_queue));
}

/// Resource wrapping thread-safe message queue for WASM event handling.
#[derive(Resource)]
struct MessageQueue(std::sync::Arc<std::sync::Mutex<Vec<String>>>);

/// Event representing incoming RPC message from the frontend.
#[derive(Event)]
pub(crate) struct IncomingRpcMessage {
    pub(crate) content: String,
}

fn process_incoming_messages(
    message_queue: Option<Res<MessageQueue>>,
    mut message_events: EventWriter<IncomingRpcMessage>,
) {
    let Some(queue_res) = message_queue else {
        return;
    };

    let messages = if let Ok(mut queue) = queue_res.0.lock() {
        std::mem::take(&mut *queue)
    } else {
        Vec::new()
    };

    for message_str in messages {
        message_events.write(IncomingRpcMessage {
            content: message_str,
        });
    }
}

/// Read-only viewer state the query methods answer from.
pub struct RpcContext<'a> {
    pub fps: f32,
    pub elements: &'a ElementList,
    pub visibility: &'a VisibilitySets,
    pub interaction: &'a ViewportInteraction,
    pub point_clouds: &'a PointCloudStore,
    pub config: &'a ViewerConfig,
}

/// State change requested by an RPC method, applied after the response is built.
#[derive(Debug, Clone)]
pub enum RpcEffect {
    Viewport(ViewportCommand),
    Visibility(VisibilityCommand),
    LoadAnalysisPath(String),
    LoadAnalysisDocument(Box<AnalysisResult>),
}

fn handle_rpc_messages(
    mut events: EventReader<IncomingRpcMessage>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    diagnostics: Option<Res<DiagnosticsStore>>,
    state: (
        Res<ElementList>,
        Res<VisibilitySets>,
        Res<ViewportInteraction>,
        Res<PointCloudStore>,
        Res<ViewerConfig>,
    ),
    mut writers: (
        EventWriter<ViewportCommand>,
        EventWriter<VisibilityCommand>,
        EventWriter<AnalysisReceived>,
    ),
    mut analysis_loader: ResMut<AnalysisLoader>,
    asset_server: Res<AssetServer>,
) {
    let (elements, visibility, interaction, point_clouds, config) = state;
    let fps = diagnostics
        .as_deref()
        .and_then(|d| d.get(&FrameTimeDiagnosticsPlugin::FPS))
        .and_then(|fps_diagnostic| fps_diagnostic.smoothed())
        .unwrap_or(0.0) as f32;

    let context = RpcContext {
        fps,
        elements: &elements,
        visibility: &visibility,
        interaction: &interaction,
        point_clouds: &point_clouds,
        config: &config,
    };

    let mut effects = Vec::new();
    for event in events.read() {
        match serde_json::from_str::<RpcRequest>(&event.content) {
            Ok(request) => {
                debug!("Processing RPC method: {}", request.method);
                if let Some(response) = handle_rpc_request(&request, &context, &mut effects) {
                    rpc_interface.queue_response(response);
                }
            }
            Err(parse_error) => {
                rpc_interface.send_notification(
                    "debug_message",
                    serde_json::json!({
                        "message": format!("Parse error: {}", parse_error)
                    }),
                );
            }
        }
    }

    let (viewport_commands, visibility_commands, analysis_events) = &mut writers;
    for effect in effects {
        match effect {
            RpcEffect::Viewport(command) => {
                viewport_commands.write(command);
            }
            RpcEffect::Visibility(command) => {
                visibility_commands.write(command);
            }
            RpcEffect::LoadAnalysisPath(path) => analysis_loader.request(&asset_server, &path),
            RpcEffect::LoadAnalysisDocument(result) => {
                analysis_events.write(AnalysisReceived(*result));
            }
        }
    }
}

/// Handle individual RPC request and generate response based on method.
///
/// Requests without an ID are notifications: their effects apply, no response is built.
pub fn handle_rpc_request(
    request: &RpcRequest,
    context: &RpcContext,
    effects: &mut Vec<RpcEffect>,
) -> Option<RpcResponse> {
    let result = match request.method.as_str() {
        "viewport_command" => handle_viewport_command(&request.params, effects),
        "toggle_category" => handle_toggle_category(&request.params, effects),
        "toggle_item_visibility" => handle_toggle_item(&request.params, context, effects),
        "load_analysis" => handle_load_analysis(&request.params, effects),
        "get_status_summary" => handle_get_status_summary(context),
        "get_overlay" => handle_get_overlay(context),
        "get_render_list" => handle_get_render_list(context),
        "get_fps" => Ok(serde_json::json!({ "fps": context.fps })),
        _ => {
            warn!("Unknown RPC method: {}", request.method);
            let id = request.id.clone()?;
            return Some(create_error_response(
                id,
                -32601,
                "Method not found",
                Some(serde_json::json!({"method": request.method})),
            ));
        }
    };

    let id = request.id.clone()?;
    match result {
        Ok(result_value) => Some(RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: Some(result_value),
            error: None,
            id: Some(id),
        }),
        Err(error) => Some(RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(error),
            id: Some(id),
        }),
    }
}

fn handle_viewport_command(
    params: &serde_json::Value,
    effects: &mut Vec<RpcEffect>,
) -> Result<serde_json::Value, RpcError> {
    #[derive(serde::Deserialize)]
    struct CommandParams {
        command: String,
    }

    let parsed = serde_json::from_value::<CommandParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected 'command' parameter"))?;
    let command = ViewportCommand::parse(&parsed.command)
        .map_err(|err| RpcError::invalid_params(&err.to_string()))?;

    effects.push(RpcEffect::Viewport(command));
    info!("Viewport command dispatched: {}", command.as_str());

    Ok(serde_json::json!({
        "success": true,
        "command": command.as_str()
    }))
}

fn handle_toggle_category(
    params: &serde_json::Value,
    effects: &mut Vec<RpcEffect>,
) -> Result<serde_json::Value, RpcError> {
    #[derive(serde::Deserialize)]
    struct CategoryParams {
        status: String,
    }

    let parsed = serde_json::from_value::<CategoryParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected 'status' parameter"))?;
    let status = StatusCode::parse(&parsed.status)
        .map_err(|err| RpcError::invalid_params(&err.to_string()))?;

    effects.push(RpcEffect::Visibility(VisibilityCommand::ToggleCategory(
        status,
    )));

    Ok(serde_json::json!({
        "success": true,
        "status": status.as_str()
    }))
}

fn handle_toggle_item(
    params: &serde_json::Value,
    context: &RpcContext,
    effects: &mut Vec<RpcEffect>,
) -> Result<serde_json::Value, RpcError> {
    #[derive(serde::Deserialize)]
    struct ItemParams {
        guid: String,
    }

    let parsed = serde_json::from_value::<ItemParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected 'guid' parameter"))?;
    if context.elements.find(&parsed.guid).is_none() {
        return Err(RpcError::invalid_params(&format!(
            "Unknown element: {}",
            parsed.guid
        )));
    }

    effects.push(RpcEffect::Visibility(VisibilityCommand::ToggleItem {
        guid: parsed.guid.clone(),
    }));

    Ok(serde_json::json!({
        "success": true,
        "guid": parsed.guid
    }))
}

fn handle_load_analysis(
    params: &serde_json::Value,
    effects: &mut Vec<RpcEffect>,
) -> Result<serde_json::Value, RpcError> {
    #[derive(serde::Deserialize)]
    struct LoadParams {
        path: Option<String>,
        document: Option<serde_json::Value>,
    }

    let parsed = serde_json::from_value::<LoadParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected 'path' or 'document' parameter"))?;

    match (parsed.path, parsed.document) {
        (_, Some(document)) => {
            let result = serde_json::from_value::<AnalysisResult>(document).map_err(|err| {
                RpcError::invalid_params(&format!("Malformed analysis document: {err}"))
            })?;
            let total = result.elements().len();
            effects.push(RpcEffect::LoadAnalysisDocument(Box::new(result)));
            Ok(serde_json::json!({ "success": true, "elements": total }))
        }
        (Some(path), None) if !path.trim().is_empty() => {
            effects.push(RpcEffect::LoadAnalysisPath(path.clone()));
            Ok(serde_json::json!({ "success": true, "path": path }))
        }
        _ => Err(RpcError::invalid_params(
            "Expected 'path' or 'document' parameter",
        )),
    }
}

fn handle_get_status_summary(context: &RpcContext) -> Result<serde_json::Value, RpcError> {
    Ok(serde_json::json!({
        "floor": context.elements.floor_name,
        "statistics": context.elements.statistics,
        "summary_by_type": context.elements.summary_by_type(),
        "hidden_categories": context
            .visibility
            .hidden_categories()
            .map(|code| code.as_str())
            .collect::<Vec<_>>(),
        "visible_count": context.elements.visible_count(context.visibility),
        "total": context.elements.elements.len(),
    }))
}

fn handle_get_overlay(context: &RpcContext) -> Result<serde_json::Value, RpcError> {
    let overlay =
        MeasurementOverlay::from_interaction(context.interaction, context.config.grid_cell_size);
    serde_json::to_value(overlay).map_err(|err| RpcError::internal_error(&err.to_string()))
}

fn handle_get_render_list(context: &RpcContext) -> Result<serde_json::Value, RpcError> {
    let entries: Vec<_> = build_render_list(
        &context.elements.elements,
        context.visibility,
        context.point_clouds,
    )
    .iter()
    .map(|entry| entry.summary())
    .collect();
    serde_json::to_value(entries).map_err(|err| RpcError::internal_error(&err.to_string()))
}

/// Create standardized error response with optional data payload.
fn create_error_response(
    id: serde_json::Value,
    code: i32,
    message: &str,
    data: Option<serde_json::Value>,
) -> RpcResponse {
    RpcResponse {
        jsonrpc: "2.0".to_string(),
        result: None,
        error: Some(RpcError {
            code,
            message: message.to_string(),
            data,
        }),
        id: Some(id),
    }
}

/// Send queued notifications and responses to the frontend.
fn send_outgoing_messages(mut rpc_interface: ResMut<WebRpcInterface>) {
    // Send notifications first.
    for notification in rpc_interface.outgoing_notifications.drain(..) {
        send_message_to_parent(&notification);
    }

    // Send responses second to maintain order.
    for response in rpc_interface.outgoing_responses.drain(..) {
        send_message_to_parent(&response);
    }
}

/// Send serialized message to parent window.
fn send_message_to_parent<T: Serialize>(message: &T) {
    #[cfg(target_arch = "wasm32")]
    {
        match serde_json::to_string(message) {
            Ok(json) => {
                if let Some(window) = window() {
                    if let Some(parent) = window.parent().ok().flatten() {
                        if let Err(e) = parent.post_message(&JsValue::from_str(&json), "*") {
                            error!("Failed to send message to parent: {:?}", e);
                        }
                    } else {
                        warn!("No parent window available for message transmission");
                    }
                } else {
                    error!("Window object not available");
                }
            }
            Err(e) => {
                error!("Failed to serialize message: {}", e);
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        // No-op for non-WASM targets.
        let _ = message;
    }
}

/// Standard RPC error codes and constructors.
impl RpcError {
    pub fn invalid_params(message: &str) -> Self {
        Self {
            code: -32602,
            message: message.to_string(),
            data: None,
        }
    }

    pub fn internal_error(message: &str) -> Self {
        Self {
            code: -32603,
            message: message.to_string(),
            data: None,
        }
    }
}
