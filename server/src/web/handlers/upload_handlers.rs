// restoration-server/src/web/handlers/upload_handlers.rs

use actix_multipart::{Field, Multipart};
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{web, HttpResponse};
use futures_util::TryStreamExt;
use restoration_core::{OrderId, StoredFile};
use serde_json::json;
use std::io;
use tokio_util::io::{ReaderStream, StreamReader};
use tracing::{info, instrument, warn};

use crate::errors::AppError;
use crate::state::AppState;

const FILE_FIELD: &str = "file";

/// Advances `payload` to the `file` part, skipping any other parts.
async fn next_file_field(payload: &mut Multipart) -> Result<Field, AppError> {
  loop {
    let field = payload
      .try_next()
      .await
      .map_err(|e| AppError::Validation(format!("Malformed multipart body: {}", e)))?;
    match field {
      Some(field) if field.name() == Some(FILE_FIELD) => return Ok(field),
      Some(_) => continue,
      None => return Err(AppError::Validation("No file provided".to_string())),
    }
  }
}

/// Streams the `file` part through the binder.
async fn store_upload(
  app_state: &AppState,
  payload: &mut Multipart,
  order_id: Option<&OrderId>,
) -> Result<StoredFile, AppError> {
  let field = next_file_field(payload).await?;
  let filename = field
    .content_disposition()
    .and_then(|cd| cd.get_filename())
    .unwrap_or_default()
    .to_string();

  let body = Box::pin(field.map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string())));
  let stored = app_state
    .binder
    .accept(StreamReader::new(body), &filename, None, order_id)
    .await?;
  Ok(stored)
}

#[instrument(name = "handler::upload_unbound", skip_all)]
pub async fn upload_unbound_handler(
  app_state: web::Data<AppState>,
  mut payload: Multipart,
) -> Result<HttpResponse, AppError> {
  let stored = store_upload(&app_state, &mut payload, None).await?;
  info!(file_id = %stored.file_id, filename = %stored.original_filename, size = stored.size, "File uploaded.");

  Ok(HttpResponse::Ok().json(json!({
    "success": true,
    "message": "File uploaded successfully",
    "file_id": stored.file_id,
    "filename": stored.original_filename,
    "file_size": stored.size,
  })))
}

#[instrument(name = "handler::upload_for_order", skip(app_state, payload), fields(order_id = %order_id))]
pub async fn upload_for_order_handler(
  app_state: web::Data<AppState>,
  order_id: web::Path<String>,
  mut payload: Multipart,
) -> Result<HttpResponse, AppError> {
  // Unknown orders are refused before any bytes are written.
  let order = app_state.lifecycle.find_order(&order_id).await?;
  let order_id = order.order_id().clone();

  let stored = store_upload(&app_state, &mut payload, Some(&order_id)).await?;
  let updated = match app_state
    .lifecycle
    .mark_file_uploaded(order_id.as_str(), stored.metadata())
    .await
  {
    Ok(updated) => updated,
    Err(e) => {
      warn!(path = %stored.path.display(), error = %e, "Binding failed, removing stored file.");
      if let Err(cleanup) = tokio::fs::remove_file(&stored.path).await {
        warn!(error = %cleanup, "Could not remove unbound upload.");
      }
      return Err(e.into());
    }
  };
  info!(
    filename = %stored.original_filename,
    size = stored.size,
    status = %updated.status(),
    "File uploaded for order."
  );

  Ok(HttpResponse::Ok().json(json!({
    "success": true,
    "message": "File uploaded successfully",
    "order_id": order_id,
    "filename": stored.original_filename,
    "file_size": stored.size,
  })))
}

#[instrument(name = "handler::download", skip(app_state), fields(file_id = %file_id))]
pub async fn download_handler(
  app_state: web::Data<AppState>,
  file_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let located = app_state.binder.locate(&file_id).await?;
  let file = tokio::fs::File::open(&located.path)
    .await
    .map_err(restoration_core::OrderError::from)?;
  let size = file.metadata().await.ok().map(|m| m.len());

  let disposition = ContentDisposition {
    disposition: DispositionType::Attachment,
    parameters: vec![DispositionParam::Filename(located.stored_name.clone())],
  };

  let mut response = HttpResponse::Ok();
  response
    .content_type("application/octet-stream")
    .insert_header(disposition);
  if let Some(size) = size {
    response.no_chunking(size);
  }
  Ok(response.streaming(ReaderStream::new(file)))
}
