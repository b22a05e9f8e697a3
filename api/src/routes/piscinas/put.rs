use axum::{
    Json,
    extract::{Multipart, Path, State},
    response::IntoResponse,
};
use db::models::piscina::Model as PiscinaModel;
use sea_orm::ActiveModelTrait;

use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::state::AppState;

use super::common::{
    build_datos, build_piscina_activa, check_mime, parse_bombas, parse_profundidades,
    reconcile_bombas, validate_profundidades, PiscinaForm, ReconcileMode,
};

/// PUT /api/piscinas/{piscina_id}
///
/// Partially updates a pool from a multipart submission. Admin only. Absent
/// fields keep their stored values; an absent `bombas` field keeps the stored
/// pump array untouched. Count and ordering invariants are re-validated
/// against the effective (new or stored) depth list and total.
pub async fn update_piscina(
    State(state): State<AppState>,
    Path(piscina_id): Path<i64>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let existente = PiscinaModel::find_by_id(state.db(), piscina_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Piscina no encontrada".to_string()))?;

    let form = PiscinaForm::from_multipart(multipart).await?;

    let datos = build_datos(&form, Some(&existente))?;

    let profundidades = match form.text("profundidades") {
        Some(raw) => parse_profundidades(raw)?,
        None => existente.profundidades.0.clone(),
    };
    validate_profundidades(&profundidades, datos.total_profundidades)?;

    let foto_nueva = match form.files.get("foto") {
        Some(archivo) => {
            check_mime(archivo, true, "foto")?;
            Some(archivo)
        }
        None => None,
    };

    let bombas = match form.text("bombas") {
        Some(raw) => {
            let inputs = parse_bombas(raw)?;
            reconcile_bombas(
                inputs,
                &form.files,
                ReconcileMode::Update {
                    existentes: &existente.bombas.0,
                },
                state.storage(),
            )
            .await?
        }
        None => existente.bombas.0.clone(),
    };

    let foto = match foto_nueva {
        Some(archivo) => {
            state
                .storage()
                .upload(archivo, "piscinas/fotos")
                .await
                .map_err(|e| ApiError::Upstream(e.to_string()))?
                .url
        }
        None => existente.foto.clone(),
    };

    let activa = build_piscina_activa(datos, profundidades, foto, bombas, Some(&existente));
    let piscina = activa.update(state.db()).await?;

    tracing::info!(piscina_id = piscina.id, "piscina actualizada");

    Ok(Json(ApiResponse::success(
        piscina,
        "Piscina actualizada exitosamente",
    )))
}
