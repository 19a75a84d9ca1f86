/// Macro for model field updates with automatic rendering.
/// Supports both single and multiple field updates.
///
/// # Examples
///
/// Single field update:
/// ```ignore
/// update_field!(model.error_message, None)
/// ```
///
/// Multiple field updates:
/// ```ignore
/// update_field!(
///     model.wifi_scan.list_visible, false;
///     model.error_message, None
/// )
/// ```
#[macro_export]
macro_rules! update_field {
    // Multiple field updates (must come first to match the pattern)
    ($($model_field:expr, $value:expr);+ $(;)?) => {{
        let mut changed = false;
        $(
            let value = $value;
            if $model_field != value {
                $model_field = value;
                changed = true;
            }
        )+
        if changed {
            crux_core::render::render()
        } else {
            crux_core::Command::done()
        }
    }};

    // Single field update
    ($model_field:expr, $value:expr) => {{
        update_field!($model_field, $value;)
    }};
}

/// Macro for device GET requests expecting a JSON response.
/// Does not touch the model; requires domain parameters for event wrapping.
///
/// NOTE: URLs are prefixed with `https://relative`.
/// `crux_http` requires absolute URLs and rejects relative paths.
/// Shells strip this prefix before sending requests.
///
/// # Example
/// ```ignore
/// device_get!(Status, StatusEvent, "/status", PollResponse, StatusSnapshot)
/// ```
#[macro_export]
macro_rules! device_get {
    ($domain:ident, $domain_event:ident, $endpoint:expr, $response_event:ident, $response_type:ty) => {
        $crate::HttpCmd::get($crate::build_url($endpoint))
            .header("Content-Type", "application/json")
            .build()
            .then_send(|result| {
                let event_result: Result<$response_type, $crate::types::RequestError> =
                    $crate::process_json_response(result);
                $crate::events::Event::$domain($crate::events::$domain_event::$response_event(
                    event_result,
                ))
            })
    };
}

/// Macro for device POST requests with a JSON body and a status-only response.
///
/// # Example
/// ```ignore
/// device_post!(Config, ConfigEvent, model, "/config", SubmitResponse, "Save configuration",
///     body_json: &payload
/// )
/// ```
#[macro_export]
macro_rules! device_post {
    ($domain:ident, $domain_event:ident, $model:expr, $endpoint:expr, $response_event:ident, $action:expr, body_json: $body:expr) => {{
        match $crate::HttpCmd::post($crate::build_url($endpoint))
            .header("Content-Type", "application/json")
            .body_json($body)
        {
            Ok(builder) => builder.build().then_send(|result| {
                let event_result = $crate::process_status_response(result);
                $crate::events::Event::$domain($crate::events::$domain_event::$response_event(
                    event_result,
                ))
            }),
            Err(e) => $crate::http_helpers::handle_request_error($model, $action, e),
        }
    }};
}
