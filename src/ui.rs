//! Console rendering - turns render events into printable text

use crate::body::{BodyConfig, BodyMode, FieldType};
use crate::messages::ui_events::HELP_TEXT;
use crate::messages::RenderEvent;
use crate::models::{EditBuffers, KeyValues, RequestDefinition, ResponseInfo};

/// Text for one render event
pub fn render_event(event: &RenderEvent) -> String {
    match event {
        RenderEvent::Listing(definitions) => render_listing(definitions),
        RenderEvent::Definition {
            definition,
            live,
            is_new,
        } => render_definition(definition, live, *is_new),
        RenderEvent::Loading { url } => format!("Sending {} ...", url),
        RenderEvent::Response(response) => render_response(response),
        RenderEvent::Snippet { kind, text } => format!("--- {} ---\n{}", kind, text),
        RenderEvent::Notice(message) => format!("-- {}", message),
        RenderEvent::Error(message) => format!("!! {}", message),
        RenderEvent::Help => HELP_TEXT.to_string(),
    }
}

pub fn render_listing(definitions: &[RequestDefinition]) -> String {
    if definitions.is_empty() {
        return String::from("No saved requests.");
    }
    definitions
        .iter()
        .map(|d| {
            let marker = if d.enabled { " " } else { "x" };
            format!("[{}] {:<20} {:<7} {}  {}", marker, d.id, d.method.as_str(), d.endpoint, d.name)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_definition(definition: &RequestDefinition, live: &EditBuffers, is_new: bool) -> String {
    let mut lines = Vec::new();
    let id = if is_new { "(unsaved)" } else { definition.id.as_str() };
    lines.push(format!("{} {}", id, definition.name));
    if !definition.description.is_empty() {
        lines.push(format!("  {}", definition.description));
    }
    lines.push(format!(
        "{} {}{}",
        definition.method,
        definition.endpoint,
        if definition.enabled { "" } else { "  [disabled]" }
    ));
    push_pairs(&mut lines, "Headers", &live.headers);
    push_pairs(&mut lines, "Params", &live.params);
    lines.push(format!("Body: {}", live.body.mode.label()));
    lines.extend(render_body(&live.body).into_iter().map(|l| format!("  {}", l)));
    lines.join("\n")
}

fn push_pairs(lines: &mut Vec<String>, title: &str, pairs: &KeyValues) {
    if pairs.is_empty() {
        return;
    }
    lines.push(format!("{}:", title));
    for (key, value) in pairs.iter() {
        lines.push(format!("  {}: {}", key, value));
    }
}

fn render_body(body: &BodyConfig) -> Vec<String> {
    match body.mode {
        BodyMode::None => Vec::new(),
        BodyMode::Raw => {
            let mut lines = vec![format!("({})", body.raw.language.as_str())];
            lines.extend(body.raw.content.lines().map(String::from));
            lines
        }
        BodyMode::FormData => body
            .form_data
            .iter()
            .filter(|f| !f.key.is_empty())
            .map(|f| match f.field_type {
                FieldType::Text => format!("{} = {}", f.key, f.value),
                FieldType::File => format!(
                    "{} = @{}",
                    f.key,
                    f.file.as_ref().map(|a| a.file_name()).unwrap_or("<no file>")
                ),
            })
            .collect(),
        BodyMode::UrlEncoded => body
            .url_encoded
            .iter()
            .filter(|p| !p.key.is_empty())
            .map(|p| format!("{} = {}", p.key, p.value))
            .collect(),
        BodyMode::Binary => {
            let name = if body.binary.file_name.is_empty() {
                "<no file>"
            } else {
                body.binary.file_name.as_str()
            };
            let attached = if body.binary.file.is_some() { "" } else { " (not attached)" };
            vec![format!("{}{}", name, attached)]
        }
        BodyMode::Graphql => {
            let mut lines: Vec<String> = body.graphql.query.lines().map(String::from).collect();
            lines.push(format!("variables: {}", body.graphql.variables));
            lines
        }
    }
}

pub fn render_response(response: &ResponseInfo) -> String {
    let mut lines = vec![format!(
        "{} {}  {}",
        response.status,
        if response.ok { "OK" } else { "FAILED" },
        format_duration(response.duration_ms)
    )];
    if !response.url.is_empty() {
        lines.push(response.url.clone());
    }

    let body = response.body.pretty();
    if body.is_empty() || body == "null" {
        lines.push(String::from("No content returned."));
    } else {
        lines.push(body);
    }
    lines.join("\n")
}

/// Seconds with three decimals
pub fn format_duration(duration_ms: u64) -> String {
    format!("{:.3} s", duration_ms as f64 / 1000.0)
}
