//! UI events - messages from the console driver to the App layer

use std::path::PathBuf;

use crate::body::{normalize_mode, BodyMode, RawLanguage};
use crate::models::{HttpMethod, StatusFilter};
use crate::snippet::SnippetKind;

/// Events generated from console input lines
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    // Collection
    List(StatusFilter),
    Select(String),
    Show,
    New,
    Save,
    Delete,

    // Request fields
    Endpoint(String),
    Method(HttpMethod),
    CycleMethod,
    Rename(String),
    Describe(String),
    ToggleEnabled,
    Header { key: String, value: String },
    Param { key: String, value: String },

    // Body
    Mode(BodyMode),
    Raw(String),
    Language(RawLanguage),
    Beautify,
    Form { key: String, value: String },
    FormFile { key: String, path: PathBuf },
    UrlEncoded { key: String, value: String },
    GraphqlQuery(String),
    GraphqlVariables(String),
    Attach(PathBuf),

    // Request actions
    SendRequest,
    CancelRequest,
    Snippet(SnippetKind),

    // System
    Help,
    Quit,
}

pub const HELP_TEXT: &str = "\
 COLLECTION
   list [all|enabled|disabled]   List saved requests
   select <id>                   Load a saved request
   show                          Print the current request
   new                           Start a blank request
   save                          Save the current request
   delete                        Delete the current request

 REQUEST
   endpoint <url|curl ...>       Set the endpoint (a curl command is imported)
   method [GET|POST|...]         Set or cycle the HTTP method
   name <text>                   Set the name
   desc <text>                   Set the description
   toggle                        Enable or disable the request
   header <key> [value]          Set a header
   param <key> [value]           Set a query parameter

 BODY
   mode <none|raw|form-data|x-www-form-urlencoded|binary|graphql>
   raw <text>                    Raw body content
   lang <json|text|xml|html>     Raw body language
   beautify                      Pretty-print the raw JSON body
   form <key> [value]            Add a form-data text field
   form-file <key> <path>        Add a form-data file field
   urlenc <key> [value]          Add a urlencoded pair
   gql-query <query>             GraphQL query
   gql-vars <json>               GraphQL variables
   attach <path>                 Binary body file

 ACTIONS
   send                          Send the request
   cancel                        Cancel the pending request
   snippet <curl|fetch|node>     Print a code snippet
   help                          Show this help
   quit                          Exit";

/// Parse one console line. `Ok(None)` for a blank line.
pub fn parse_command(line: &str) -> Result<Option<UiEvent>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (command, rest) = split_word(line);
    let event = match command.to_lowercase().as_str() {
        "list" | "ls" => {
            let filter = StatusFilter::parse(rest)
                .ok_or_else(|| format!("Unknown filter: {}", rest))?;
            UiEvent::List(filter)
        }
        "select" | "open" => UiEvent::Select(required(rest, "select <id>")?.to_string()),
        "show" => UiEvent::Show,
        "new" => UiEvent::New,
        "save" => UiEvent::Save,
        "delete" | "rm" => UiEvent::Delete,

        "endpoint" | "url" => UiEvent::Endpoint(rest.to_string()),
        "method" => {
            if rest.is_empty() {
                UiEvent::CycleMethod
            } else {
                let method = HttpMethod::parse(rest)
                    .ok_or_else(|| format!("Unknown HTTP method: {}", rest))?;
                UiEvent::Method(method)
            }
        }
        "name" => UiEvent::Rename(rest.to_string()),
        "desc" => UiEvent::Describe(rest.to_string()),
        "toggle" => UiEvent::ToggleEnabled,
        "header" => {
            let (key, value) = key_value(rest, "header <key> [value]")?;
            UiEvent::Header { key, value }
        }
        "param" => {
            let (key, value) = key_value(rest, "param <key> [value]")?;
            UiEvent::Param { key, value }
        }

        "mode" => UiEvent::Mode(normalize_mode(rest)),
        "raw" => UiEvent::Raw(rest.to_string()),
        "lang" => {
            let language = RawLanguage::parse(rest)
                .ok_or_else(|| format!("Unknown language: {}", rest))?;
            UiEvent::Language(language)
        }
        "form" => {
            let (key, value) = key_value(rest, "form <key> [value]")?;
            UiEvent::Form { key, value }
        }
        "form-file" => {
            let (key, path) = key_value(rest, "form-file <key> <path>")?;
            UiEvent::FormFile {
                key,
                path: PathBuf::from(required(&path, "form-file <key> <path>")?),
            }
        }
        "urlenc" => {
            let (key, value) = key_value(rest, "urlenc <key> [value]")?;
            UiEvent::UrlEncoded { key, value }
        }
        "gql-query" => UiEvent::GraphqlQuery(rest.to_string()),
        "gql-vars" => UiEvent::GraphqlVariables(rest.to_string()),
        "beautify" => UiEvent::Beautify,
        "attach" => UiEvent::Attach(PathBuf::from(required(rest, "attach <path>")?)),

        "send" | "s" => UiEvent::SendRequest,
        "cancel" => UiEvent::CancelRequest,
        "snippet" => {
            let kind = if rest.is_empty() {
                SnippetKind::default()
            } else {
                SnippetKind::parse(rest).ok_or_else(|| format!("Unknown snippet kind: {}", rest))?
            };
            UiEvent::Snippet(kind)
        }

        "help" | "?" => UiEvent::Help,
        "quit" | "exit" | "q" => UiEvent::Quit,
        other => return Err(format!("Unknown command: {} (try 'help')", other)),
    };

    Ok(Some(event))
}

/// First whitespace-delimited word and the trimmed remainder
fn split_word(text: &str) -> (&str, &str) {
    match text.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (text, ""),
    }
}

fn key_value(rest: &str, usage: &str) -> Result<(String, String), String> {
    let (key, value) = split_word(required(rest, usage)?);
    Ok((key.to_string(), value.to_string()))
}

fn required<'a>(rest: &'a str, usage: &str) -> Result<&'a str, String> {
    if rest.is_empty() {
        Err(format!("Usage: {}", usage))
    } else {
        Ok(rest)
    }
}
