//! Multipart form reconciliation for pool create/update.
//!
//! Pool submissions arrive as `multipart/form-data`: scalar fields as text, a
//! JSON-encoded `bombas` array, a JSON-encoded or comma-separated
//! `profundidades` field, a `foto` file, and per-pump files named by the
//! positional convention `fotoBomba_{i}` / `hojaSeguridad_{i}` /
//! `fichaTecnica_{i}`. Everything is decoded into validated intermediates
//! first; no upload call is issued until the whole request has validated.

use std::collections::HashMap;

use axum::extract::Multipart;
use chrono::Utc;
use db::models::piscina::{
    self, Bomba, Bombas, Categoria, Forma, MaterialBomba, Profundidades, SeRepite, Uso,
};
use sea_orm::{ActiveValue::Set, IntoActiveModel};
use serde::Deserialize;
use validator::Validate;

use crate::error::ApiError;
use crate::services::storage::{FileStore, UploadedFile};

/// Per-file size cap, matching the original upload policy.
pub const MAX_FILE_BYTES: usize = 5 * 1024 * 1024;

const IMAGE_MIMES: [&str; 3] = ["image/png", "image/jpeg", "image/jpg"];

/// Raw multipart payload split into text fields and uploaded files.
#[derive(Debug, Default)]
pub struct PiscinaForm {
    fields: HashMap<String, String>,
    pub files: HashMap<String, UploadedFile>,
}

impl PiscinaForm {
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|_| ApiError::validation("Formulario multipart inválido"))?
        {
            let name = match field.name() {
                Some(n) if !n.is_empty() => n.to_string(),
                _ => continue,
            };

            if let Some(filename) = field.file_name().map(|s| s.to_string()) {
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|_| ApiError::validation("Formulario multipart inválido"))?;
                if bytes.len() > MAX_FILE_BYTES {
                    return Err(ApiError::validation(format!(
                        "El archivo {name} supera el tamaño máximo de 5 MB"
                    )));
                }
                form.files.insert(
                    name,
                    UploadedFile {
                        filename,
                        content_type,
                        bytes,
                    },
                );
            } else {
                let text = field
                    .text()
                    .await
                    .map_err(|_| ApiError::validation("Formulario multipart inválido"))?;
                form.fields.insert(name, text);
            }
        }

        Ok(form)
    }

    /// Returns the trimmed text value of a field, treating empty as absent.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
    }
}

// --- Depth-array reconciler ---

fn json_to_f64(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Normalizes the raw `profundidades` field into an ordered float sequence.
///
/// Accepts a JSON array (of numbers or numeric strings) or, when JSON decoding
/// fails, a comma-separated list. Tokens that fail to parse are discarded, as
/// are non-finite values: `f64::from_str` accepts "NaN"/"inf", but NaN slips
/// past the ordering check and cannot survive the JSON column round trip.
pub fn parse_profundidades(raw: &str) -> Result<Vec<f64>, ApiError> {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(serde_json::Value::Array(items)) => Ok(items
            .iter()
            .filter_map(json_to_f64)
            .filter(|f| f.is_finite())
            .collect()),
        Ok(_) => Err(ApiError::validation("Profundidades debe ser un array")),
        Err(_) => Ok(raw
            .split(',')
            .filter_map(|t| t.trim().parse::<f64>().ok())
            .filter(|f| f.is_finite())
            .collect()),
    }
}

/// Enforces the count-match and strict-ascending invariants.
pub fn validate_profundidades(valores: &[f64], total: i32) -> Result<(), ApiError> {
    if valores.len() != total.max(0) as usize {
        return Err(ApiError::validation(
            "La cantidad de profundidades no coincide con el total",
        ));
    }
    if valores.windows(2).any(|par| par[1] <= par[0]) {
        return Err(ApiError::validation(
            "Las profundidades deben estar en orden ascendente",
        ));
    }
    Ok(())
}

// --- Pump-array reconciler ---

/// Loosely-typed pump object as decoded from the wire, before validation.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BombaInput {
    pub marca: Option<String>,
    pub referencia: Option<String>,
    pub potencia: Option<f64>,
    pub material: Option<String>,
    pub se_repite: Option<String>,
    pub total_bombas: Option<i64>,
    pub foto_bomba: Option<String>,
    pub hoja_seguridad: Option<String>,
    pub ficha_tecnica: Option<String>,
}

/// Decodes the raw `bombas` field into an ordered pump sequence.
pub fn parse_bombas(raw: &str) -> Result<Vec<BombaInput>, ApiError> {
    let value: serde_json::Value = serde_json::from_str(raw)
        .map_err(|_| ApiError::validation("Bombas debe ser un array JSON válido"))?;
    if !value.is_array() {
        return Err(ApiError::validation("Bombas debe ser un array"));
    }
    serde_json::from_value(value).map_err(|_| ApiError::validation("Bombas debe ser un array"))
}

/// Validates one pump's required attributes, naming the offending index.
fn validate_bomba(input: &BombaInput, index: usize) -> Result<Bomba, ApiError> {
    let marca = input
        .marca
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::validation(format!("La marca de la bomba {index} es requerida")))?
        .to_string();

    let referencia = input
        .referencia
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            ApiError::validation(format!("La referencia de la bomba {index} es requerida"))
        })?
        .to_string();

    let potencia = match input.potencia {
        Some(p) if p > 0.0 => p,
        _ => {
            return Err(ApiError::validation(format!(
                "La potencia de la bomba {index} es requerida"
            )));
        }
    };

    let material: MaterialBomba = input
        .material
        .as_deref()
        .ok_or_else(|| {
            ApiError::validation(format!("El material de la bomba {index} es requerido"))
        })?
        .parse()
        .map_err(|_| {
            ApiError::validation(format!(
                "El material de la bomba {index} debe ser \"Sumergible\" o \"Centrifuga\""
            ))
        })?;

    let se_repite: SeRepite = match input.se_repite.as_deref() {
        None => SeRepite::No,
        Some(raw) => raw.parse().map_err(|_| {
            ApiError::validation(format!(
                "El campo seRepite de la bomba {index} debe ser \"si\" o \"no\""
            ))
        })?,
    };

    let total_bombas = if se_repite == SeRepite::Si {
        match input.total_bombas {
            Some(t) if t >= 1 => Some(t),
            _ => {
                return Err(ApiError::validation(format!(
                    "La bomba {index} requiere el campo totalBombas cuando seRepite es \"si\""
                )));
            }
        }
    } else {
        input.total_bombas
    };

    Ok(Bomba {
        marca,
        referencia,
        potencia,
        material,
        se_repite,
        total_bombas,
        foto_bomba: input.foto_bomba.clone(),
        hoja_seguridad: input.hoja_seguridad.clone(),
        ficha_tecnica: input.ficha_tecnica.clone(),
    })
}

/// The three per-pump file roles, bound positionally as `{role}_{index}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileRole {
    FotoBomba,
    HojaSeguridad,
    FichaTecnica,
}

impl FileRole {
    pub const ALL: [FileRole; 3] = [
        FileRole::FotoBomba,
        FileRole::HojaSeguridad,
        FileRole::FichaTecnica,
    ];

    pub fn wire_name(self) -> &'static str {
        match self {
            FileRole::FotoBomba => "fotoBomba",
            FileRole::HojaSeguridad => "hojaSeguridad",
            FileRole::FichaTecnica => "fichaTecnica",
        }
    }

    pub fn field_name(self, index: usize) -> String {
        format!("{}_{}", self.wire_name(), index)
    }

    fn folder(self) -> &'static str {
        match self {
            FileRole::FotoBomba => "piscinas/bombas/fotos",
            FileRole::HojaSeguridad => "piscinas/bombas/hojas",
            FileRole::FichaTecnica => "piscinas/bombas/fichas",
        }
    }

    fn is_image(self) -> bool {
        matches!(self, FileRole::FotoBomba)
    }
}

/// Rejects files whose MIME type does not match the role: image roles take
/// PNG/JPEG, document roles take PDF.
pub fn check_mime(file: &UploadedFile, image: bool, campo: &str) -> Result<(), ApiError> {
    if image {
        if !IMAGE_MIMES.contains(&file.content_type.as_str()) {
            return Err(ApiError::validation(format!(
                "Solo se permiten imágenes PNG o JPEG para {campo}"
            )));
        }
    } else if file.content_type != "application/pdf" {
        return Err(ApiError::validation(format!(
            "Solo se permiten archivos PDF para {campo}"
        )));
    }
    Ok(())
}

pub enum ReconcileMode<'a> {
    Create,
    Update { existentes: &'a [Bomba] },
}

/// Normalizes and validates the pump array, then binds each pump to its
/// uploaded files by position.
///
/// All validation — attributes, file presence (mandatory on create), MIME
/// types — completes before the first upload call goes out, so a rejected
/// request never leaves orphaned files behind. On update, a pump field whose
/// file is absent falls back to the client-supplied URL if any, else to the
/// stored pump at the same position.
pub async fn reconcile_bombas(
    inputs: Vec<BombaInput>,
    files: &HashMap<String, UploadedFile>,
    mode: ReconcileMode<'_>,
    storage: &dyn FileStore,
) -> Result<Vec<Bomba>, ApiError> {
    if inputs.is_empty() {
        return Err(ApiError::validation("Debe agregar al menos 1 bomba"));
    }

    let mut bombas: Vec<Bomba> = inputs
        .iter()
        .enumerate()
        .map(|(i, b)| validate_bomba(b, i))
        .collect::<Result<_, _>>()?;

    let mut pendientes: Vec<(usize, FileRole, &UploadedFile)> = Vec::new();
    for i in 0..bombas.len() {
        for role in FileRole::ALL {
            let campo = role.field_name(i);
            match files.get(&campo) {
                Some(archivo) => {
                    check_mime(archivo, role.is_image(), &campo)?;
                    pendientes.push((i, role, archivo));
                }
                None => {
                    if matches!(mode, ReconcileMode::Create) {
                        return Err(ApiError::validation(format!(
                            "Falta el archivo {} para la bomba {}",
                            role.wire_name(),
                            i
                        )));
                    }
                }
            }
        }
    }

    if let ReconcileMode::Update { existentes } = mode {
        for (i, bomba) in bombas.iter_mut().enumerate() {
            let previa = existentes.get(i);
            if bomba.foto_bomba.is_none() {
                bomba.foto_bomba = previa.and_then(|p| p.foto_bomba.clone());
            }
            if bomba.hoja_seguridad.is_none() {
                bomba.hoja_seguridad = previa.and_then(|p| p.hoja_seguridad.clone());
            }
            if bomba.ficha_tecnica.is_none() {
                bomba.ficha_tecnica = previa.and_then(|p| p.ficha_tecnica.clone());
            }
        }
    }

    // Uploads for distinct files are independent; issue them concurrently.
    // A single failure aborts the whole request.
    let subidas =
        futures::future::try_join_all(pendientes.into_iter().map(|(i, role, archivo)| async move {
            let stored = storage
                .upload(archivo, role.folder())
                .await
                .map_err(|e| ApiError::Upstream(e.to_string()))?;
            Ok::<_, ApiError>((i, role, stored.url))
        }))
        .await?;

    // A fresh upload always overwrites whatever the client supplied.
    for (i, role, url) in subidas {
        let bomba = &mut bombas[i];
        match role {
            FileRole::FotoBomba => bomba.foto_bomba = Some(url),
            FileRole::HojaSeguridad => bomba.hoja_seguridad = Some(url),
            FileRole::FichaTecnica => bomba.ficha_tecnica = Some(url),
        }
    }

    Ok(bombas)
}

// --- Pool aggregate builder ---

/// Validated scalar fields of a pool submission.
#[derive(Debug, Clone, Validate)]
pub struct PiscinaDatos {
    #[validate(length(min = 1, message = "El nombre es requerido"))]
    pub nombre: String,
    #[validate(length(min = 1, message = "La dirección es requerida"))]
    pub direccion: String,
    #[validate(range(min = 0.1, message = "La altura debe ser mayor a 0"))]
    pub altura: f64,
    #[validate(range(min = 0.1, message = "El ancho debe ser mayor a 0"))]
    pub ancho: f64,
    #[validate(length(min = 1, message = "La ciudad es requerida"))]
    pub ciudad: String,
    #[validate(length(min = 1, message = "El municipio es requerido"))]
    pub municipio: String,
    pub temperatura_externa: Option<f64>,
    pub categoria: Categoria,
    #[validate(range(min = 1, message = "Debe haber al menos 1 profundidad"))]
    pub total_profundidades: i32,
    pub forma: Forma,
    pub uso: Uso,
    #[validate(length(min = 1, message = "Los filtros son requeridos"))]
    pub filtros: String,
}

/// Assembles the scalar fields from the form, falling back field-by-field to
/// the existing record on update; absent fields never overwrite stored values.
pub fn build_datos(
    form: &PiscinaForm,
    existente: Option<&piscina::Model>,
) -> Result<PiscinaDatos, ApiError> {
    let texto = |campo: &str, guardado: Option<String>| {
        form.text(campo)
            .map(str::to_string)
            .or(guardado)
            .unwrap_or_default()
    };

    let numero = |campo: &str, mensaje: &str, guardado: Option<f64>| match form.text(campo) {
        Some(raw) => raw
            .parse::<f64>()
            .map_err(|_| ApiError::validation(mensaje)),
        None => Ok(guardado.unwrap_or(0.0)),
    };

    let datos = PiscinaDatos {
        nombre: texto("nombre", existente.map(|p| p.nombre.clone())),
        direccion: texto("direccion", existente.map(|p| p.direccion.clone())),
        altura: numero(
            "altura",
            "La altura debe ser un número",
            existente.map(|p| p.altura),
        )?,
        ancho: numero(
            "ancho",
            "El ancho debe ser un número",
            existente.map(|p| p.ancho),
        )?,
        ciudad: texto("ciudad", existente.map(|p| p.ciudad.clone())),
        municipio: texto("municipio", existente.map(|p| p.municipio.clone())),
        temperatura_externa: match form.text("temperaturaExterna") {
            Some(raw) => Some(
                raw.parse()
                    .map_err(|_| ApiError::validation("La temperatura debe ser un número"))?,
            ),
            None => existente.and_then(|p| p.temperatura_externa),
        },
        categoria: match form.text("categoria") {
            Some(raw) => raw
                .parse()
                .map_err(|_| ApiError::validation("Categoría inválida"))?,
            None => existente
                .map(|p| p.categoria)
                .ok_or_else(|| ApiError::validation("La categoría es requerida"))?,
        },
        total_profundidades: match form.text("totalProfundidades") {
            Some(raw) => raw
                .parse()
                .map_err(|_| ApiError::validation("Debe haber al menos 1 profundidad"))?,
            None => existente
                .map(|p| p.total_profundidades)
                .ok_or_else(|| ApiError::validation("El total de profundidades es requerido"))?,
        },
        forma: match form.text("forma") {
            Some(raw) => raw
                .parse()
                .map_err(|_| ApiError::validation("Forma inválida"))?,
            None => existente
                .map(|p| p.forma)
                .ok_or_else(|| ApiError::validation("La forma es requerida"))?,
        },
        uso: match form.text("uso") {
            Some(raw) => raw
                .parse()
                .map_err(|_| ApiError::validation("Uso inválido"))?,
            None => existente
                .map(|p| p.uso)
                .ok_or_else(|| ApiError::validation("El uso es requerido"))?,
        },
        filtros: texto("filtros", existente.map(|p| p.filtros.clone())),
    };

    datos
        .validate()
        .map_err(|e| ApiError::validation_errors(&e))?;
    Ok(datos)
}

/// Merges reconciled depths, reconciled pumps, the photo URL, and the scalar
/// fields into a persistable record. On update the existing row's identity and
/// creation timestamp are preserved.
pub fn build_piscina_activa(
    datos: PiscinaDatos,
    profundidades: Vec<f64>,
    foto: String,
    bombas: Vec<Bomba>,
    existente: Option<&piscina::Model>,
) -> piscina::ActiveModel {
    let now = Utc::now();
    let mut active = match existente {
        Some(p) => p.clone().into_active_model(),
        None => piscina::ActiveModel {
            created_at: Set(now),
            ..Default::default()
        },
    };

    active.nombre = Set(datos.nombre);
    active.direccion = Set(datos.direccion);
    active.altura = Set(datos.altura);
    active.ancho = Set(datos.ancho);
    active.ciudad = Set(datos.ciudad);
    active.municipio = Set(datos.municipio);
    active.temperatura_externa = Set(datos.temperatura_externa);
    active.categoria = Set(datos.categoria);
    active.total_profundidades = Set(datos.total_profundidades);
    active.profundidades = Set(Profundidades(profundidades));
    active.forma = Set(datos.forma);
    active.uso = Set(datos.uso);
    active.foto = Set(foto);
    active.filtros = Set(datos.filtros);
    active.bombas = Set(Bombas(bombas));
    active.updated_at = Set(now);
    active
}
