/**
 * Avatar Upload
 *
 * `POST /api/users/{id}/avatar`, multipart field `avatar`.
 *
 * The image must be one of `image/jpeg`, `image/png`, `image/gif`,
 * `image/webp` and at most 5 MB; both are checked before the database is
 * touched. A request body over the route's body limit is a 413. The image is
 * stored in the upload directory under a generated name and served at
 * `/uploads/<filename>`. The previous avatar file is removed on a
 * best-effort basis.
 */

use std::path::Path as FsPath;

use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, Path, State};
use axum::response::Json;
use uuid::Uuid;

use crate::backend::auth::users::set_avatar_url;
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;
use crate::shared::social::{validate_avatar, AvatarResponse, AVATAR_MAX_BYTES};

/// URL prefix uploaded files are served under
pub const UPLOADS_PREFIX: &str = "/uploads/";

/// Multipart field carrying the image
pub const AVATAR_FIELD: &str = "avatar";

/// Keep only `a-zA-Z0-9._-` from the final path component
pub fn sanitize_filename(name: &str) -> String {
    let base = FsPath::new(name.trim())
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    base.chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '.' | '_' | '-' => c,
            _ => '-',
        })
        .collect()
}

/// Stored name: `<user>-<random>.<ext>`
fn avatar_filename(user_id: Uuid, ext: &str) -> String {
    format!("{}-{}.{}", user_id, Uuid::new_v4().simple(), ext)
}

/// Validated image read from the request
struct AvatarUpload {
    ext: &'static str,
    data: Vec<u8>,
    original: String,
}

/// Multipart failures keep axum's status, so an over-limit body is a 413
fn multipart_error(e: MultipartError) -> BackendError {
    BackendError::handler(e.status(), format!("Invalid multipart body: {}", e.body_text()))
}

/// Read the `avatar` field, rejecting bad types before the body is read and
/// oversized files as soon as they cross the limit
async fn read_avatar(multipart: &mut Multipart) -> BackendResult<AvatarUpload> {
    while let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(AVATAR_FIELD) {
            continue;
        }
        let mime = field.content_type().unwrap_or_default().to_string();
        validate_avatar(&mime, 1)?;

        let mut data = Vec::new();
        while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
            if data.len() + chunk.len() > AVATAR_MAX_BYTES {
                validate_avatar(&mime, data.len() + chunk.len())?;
            }
            data.extend_from_slice(&chunk);
        }
        let ext = validate_avatar(&mime, data.len())?;
        let original = field.file_name().map(sanitize_filename).unwrap_or_default();
        return Ok(AvatarUpload { ext, data, original });
    }
    Err(BackendError::bad_request("Missing multipart field 'avatar'"))
}

pub async fn upload_avatar(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(user_id): Path<Uuid>,
    mut multipart: Multipart,
) -> BackendResult<Json<AvatarResponse>> {
    if caller != user_id {
        tracing::warn!("[Upload] {} tried to upload an avatar for {}", caller, user_id);
        return Err(BackendError::forbidden("You can only change your own avatar"));
    }
    let AvatarUpload { ext, data, original } = read_avatar(&mut multipart).await?;
    let pool = state.pool()?;

    let filename = avatar_filename(user_id, ext);
    let target = state.config.upload_dir.join(&filename);
    tokio::fs::create_dir_all(&state.config.upload_dir).await?;
    tokio::fs::write(&target, &data).await?;
    tracing::info!(
        "[Upload] Stored avatar for {} ({} bytes, from '{}') as {}",
        user_id,
        data.len(),
        original,
        filename
    );

    let avatar_url = format!("{}{}", UPLOADS_PREFIX, filename);
    let previous = match set_avatar_url(pool, user_id, &avatar_url).await {
        Ok(previous) => previous,
        Err(e) => {
            if let Err(cleanup) = tokio::fs::remove_file(&target).await {
                tracing::warn!(
                    "[Upload] Could not remove {} after failed update: {}",
                    target.display(),
                    cleanup
                );
            }
            return Err(e.into());
        }
    };

    if let Some(old) = previous.as_deref().and_then(|url| url.strip_prefix(UPLOADS_PREFIX)) {
        let old_path = state.config.upload_dir.join(sanitize_filename(old));
        if let Err(e) = tokio::fs::remove_file(&old_path).await {
            tracing::debug!("[Upload] Could not remove old avatar {}: {}", old_path.display(), e);
        }
    }

    Ok(Json(AvatarResponse { avatar_url }))
}
