use crate::AppState;
use crate::error::AppError;
use crate::models::StoredFile;
use crate::services::registry;
use crate::utils::validation::sanitize_filename;
use axum::{
    Json,
    body::Body,
    extract::{Multipart, Path, Query, State},
    http::{HeaderMap, header},
    response::{Html, IntoResponse, Redirect, Response},
};
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Deserialize;
use tokio_util::io::ReaderStream;

const INDEX_TOKEN_HEADER: &str = "x-index-token";
const UPLOAD_TOKEN_HEADER: &str = "x-upload-token";

#[derive(Deserialize)]
pub struct ViewQuery {
    pub t: Option<String>,
    pub msg: Option<String>,
}

#[derive(Deserialize)]
pub struct UploadQuery {
    pub token: Option<String>,
    pub err: Option<String>,
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn encode(value: &str) -> String {
    utf8_percent_encode(value, NON_ALPHANUMERIC).to_string()
}

fn upload_error_redirect(msg: &str) -> Redirect {
    Redirect::to(&format!("/upload?err={}", encode(msg)))
}

pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ViewQuery>,
    headers: HeaderMap,
) -> Result<Html<String>, AppError> {
    if !state.gate.view_allowed(
        query.t.as_deref(),
        header_value(&headers, INDEX_TOKEN_HEADER),
    ) {
        return Err(AppError::Unauthorized(
            "Missing or invalid index token".to_string(),
        ));
    }

    let files = registry::list_files(state.store.as_ref()).await?;
    Ok(Html(render_index(&files, query.msg.as_deref())))
}

pub async fn api_list(
    State(state): State<AppState>,
    Query(query): Query<ViewQuery>,
    headers: HeaderMap,
) -> Result<Json<Vec<StoredFile>>, AppError> {
    if !state.gate.view_allowed(
        query.t.as_deref(),
        header_value(&headers, INDEX_TOKEN_HEADER),
    ) {
        return Err(AppError::Unauthorized(
            "Missing or invalid index token".to_string(),
        ));
    }

    let files = registry::list_files(state.store.as_ref()).await?;
    Ok(Json(files))
}

/// Serves one stored file as an attachment. Downloads carry no token gate
/// of their own; links are shareable once a name is known.
pub async fn download(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, AppError> {
    let name = sanitize_filename(&filename)
        .map_err(|_| AppError::NotFound("File not found".to_string()))?;

    let stat = state
        .store
        .stat(&name)
        .await?
        .ok_or_else(|| AppError::NotFound("File not found".to_string()))?;

    if let Some(rejection) = state
        .gatekeeper
        .screen_download(state.store.as_ref(), &name)
        .await?
    {
        return Err(AppError::Conflict(format!(
            "Blocked by server zip policy: archive is {}",
            rejection.reason()
        )));
    }

    let reader = state.store.open(&name).await?;
    let body = Body::from_stream(ReaderStream::new(reader));

    // The same name may later point to different content, so clients and
    // intermediaries must never reuse a cached copy.
    let headers = [
        (
            header::CONTENT_TYPE,
            "application/octet-stream".to_string(),
        ),
        (header::CONTENT_LENGTH, stat.size.to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{name}\""),
        ),
        (header::CACHE_CONTROL, "no-store, max-age=0".to_string()),
    ];

    Ok((headers, body).into_response())
}

pub async fn upload_form(
    State(state): State<AppState>,
    Query(query): Query<UploadQuery>,
    headers: HeaderMap,
) -> Result<Html<String>, AppError> {
    if !state.gate.upload_allowed(
        query.token.as_deref(),
        None,
        header_value(&headers, UPLOAD_TOKEN_HEADER),
    ) {
        return Err(AppError::Unauthorized(
            "Missing or invalid upload token".to_string(),
        ));
    }

    Ok(Html(render_upload_form(query.err.as_deref())))
}

/// Accepts a single-file multipart submission. Every outcome other than an
/// auth failure answers with a redirect carrying a user-visible message.
pub async fn upload(
    State(state): State<AppState>,
    Query(query): Query<UploadQuery>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Redirect, AppError> {
    let mut form_token: Option<String> = None;
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "file" => {
                let original_name = field.file_name().unwrap_or_default().to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                file = Some((original_name, data.to_vec()));
            }
            "token" => {
                form_token = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?,
                );
            }
            _ => {}
        }
    }

    // Nothing has touched storage yet; the gate runs before any side effect.
    if !state.gate.upload_allowed(
        query.token.as_deref(),
        form_token.as_deref(),
        header_value(&headers, UPLOAD_TOKEN_HEADER),
    ) {
        return Err(AppError::Unauthorized(
            "Missing or invalid upload token".to_string(),
        ));
    }

    let Some((original_name, data)) = file else {
        return Ok(upload_error_redirect("No file provided"));
    };
    if original_name.is_empty() {
        return Ok(upload_error_redirect("File has no name"));
    }
    let Ok(name) = sanitize_filename(&original_name) else {
        return Ok(upload_error_redirect("Invalid filename"));
    };

    state.store.write(&name, &data).await?;

    if let Some(rejection) = state
        .gatekeeper
        .screen_upload(state.store.as_ref(), &name)
        .await?
    {
        return Ok(upload_error_redirect(&format!(
            "Rejected {} zip archive",
            rejection.reason()
        )));
    }

    tracing::info!("stored upload {} ({} bytes)", name, data.len());
    Ok(Redirect::to(&format!(
        "/?msg={}",
        encode(&format!("Upload OK: {name}"))
    )))
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn render_index(files: &[StoredFile], msg: Option<&str>) -> String {
    let mut page = String::from(
        "<!doctype html><html><head><meta charset=\"utf-8\"><title>filedrop</title></head><body>\
         <h1>Files</h1>",
    );
    if let Some(msg) = msg {
        page.push_str(&format!("<p class=\"msg\">{}</p>", html_escape(msg)));
    }
    page.push_str(
        "<table><tr><th>Name</th><th>Size</th><th>Modified</th><th>SHA-256</th><th>Zip</th></tr>",
    );
    for file in files {
        let zip = match &file.zip {
            None => String::new(),
            Some(z) if z.bad => "corrupt".to_string(),
            Some(z) if z.empty => "empty".to_string(),
            Some(z) => format!("{} entries", z.count),
        };
        page.push_str(&format!(
            "<tr><td><a href=\"/dl/{href}\">{name}</a></td><td>{size}</td><td>{mtime}</td>\
             <td><code>{sha}</code></td><td>{zip}</td></tr>",
            href = encode(&file.name),
            name = html_escape(&file.name),
            size = html_escape(&file.size_h),
            mtime = html_escape(&file.mtime_iso),
            sha = html_escape(&file.sha12),
        ));
    }
    page.push_str("</table><p><a href=\"/upload\">Upload</a></p></body></html>");
    page
}

fn render_upload_form(err: Option<&str>) -> String {
    let mut page = String::from(
        "<!doctype html><html><head><meta charset=\"utf-8\"><title>filedrop upload</title></head>\
         <body><h1>Upload</h1>",
    );
    if let Some(err) = err {
        page.push_str(&format!("<p class=\"error\">{}</p>", html_escape(err)));
    }
    page.push_str(
        "<form method=\"post\" action=\"/upload\" enctype=\"multipart/form-data\">\
         <input type=\"file\" name=\"file\">\
         <input type=\"password\" name=\"token\" placeholder=\"upload token\">\
         <button type=\"submit\">Send</button></form>\
         <p><a href=\"/\">Back to listing</a></p></body></html>",
    );
    page
}
