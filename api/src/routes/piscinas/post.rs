use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use axum::extract::Multipart;
use sea_orm::ActiveModelTrait;

use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::state::AppState;

use super::common::{
    build_datos, build_piscina_activa, check_mime, parse_bombas, parse_profundidades,
    reconcile_bombas, validate_profundidades, PiscinaForm, ReconcileMode,
};

/// POST /api/piscinas
///
/// Creates a pool from a multipart submission. Admin only. All fields, the
/// pool photo, and the three files of every pump are mandatory; validation
/// completes in full before any file is uploaded.
pub async fn create_piscina(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let form = PiscinaForm::from_multipart(multipart).await?;

    let datos = build_datos(&form, None)?;

    let raw_profundidades = form
        .text("profundidades")
        .ok_or_else(|| ApiError::validation("Las profundidades son requeridas"))?;
    let profundidades = parse_profundidades(raw_profundidades)?;
    validate_profundidades(&profundidades, datos.total_profundidades)?;

    let raw_bombas = form
        .text("bombas")
        .ok_or_else(|| ApiError::validation("Las bombas son requeridas"))?;
    let inputs = parse_bombas(raw_bombas)?;

    let foto = form
        .files
        .get("foto")
        .ok_or_else(|| ApiError::validation("La foto de la piscina es requerida"))?;
    check_mime(foto, true, "foto")?;

    // Pump validation (attributes, file presence, MIME types) happens inside
    // the reconciler, ahead of its uploads.
    let bombas = reconcile_bombas(inputs, &form.files, ReconcileMode::Create, state.storage()).await?;

    let foto_subida = state
        .storage()
        .upload(foto, "piscinas/fotos")
        .await
        .map_err(|e| ApiError::Upstream(e.to_string()))?;

    let activa = build_piscina_activa(datos, profundidades, foto_subida.url, bombas, None);
    let piscina = activa.insert(state.db()).await?;

    tracing::info!(piscina_id = piscina.id, nombre = %piscina.nombre, "piscina creada");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(piscina, "Piscina creada exitosamente")),
    ))
}
