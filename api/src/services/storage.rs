//! Object-storage adapter.
//!
//! Binary uploads (pool photos, pump photos, compliance PDFs) are shipped to an
//! external object-storage service that answers with a public URL and an opaque
//! identifier. The service is reached through the `FileStore` trait so tests
//! can substitute a recording fake; the production implementation posts
//! multipart requests with `reqwest`.

use async_trait::async_trait;
use bytes::Bytes;
use common::config;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Error al subir archivo: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Respuesta inesperada del servicio de archivos: {0}")]
    BadResponse(String),
}

/// A single file lifted out of a multipart request.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub content_type: String,
    pub bytes: Bytes,
}

/// Upload result: public URL plus the opaque identifier needed to delete it.
#[derive(Debug, Clone, Deserialize)]
pub struct StoredFile {
    pub url: String,
    pub public_id: String,
}

#[async_trait]
pub trait FileStore: Send + Sync {
    async fn upload(&self, file: &UploadedFile, folder: &str) -> Result<StoredFile, StorageError>;
    async fn delete(&self, public_id: &str) -> Result<(), StorageError>;
}

/// Production `FileStore` backed by an HTTP upload endpoint.
pub struct HttpStorage {
    client: reqwest::Client,
    upload_url: String,
    api_key: String,
}

impl HttpStorage {
    pub fn from_config() -> Self {
        Self {
            client: reqwest::Client::new(),
            upload_url: config::storage_upload_url(),
            api_key: config::storage_api_key(),
        }
    }
}

#[async_trait]
impl FileStore for HttpStorage {
    async fn upload(&self, file: &UploadedFile, folder: &str) -> Result<StoredFile, StorageError> {
        let part = Part::bytes(file.bytes.to_vec())
            .file_name(file.filename.clone())
            .mime_str(&file.content_type)?;

        let form = Form::new()
            .text("folder", folder.to_string())
            .part("file", part);

        let response = self
            .client
            .post(&self.upload_url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await?
            .error_for_status()?;

        let stored = response
            .json::<StoredFile>()
            .await
            .map_err(|e| StorageError::BadResponse(e.to_string()))?;

        Ok(stored)
    }

    async fn delete(&self, public_id: &str) -> Result<(), StorageError> {
        self.client
            .delete(format!("{}/{}", self.upload_url, public_id))
            .bearer_auth(&self.api_key)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
