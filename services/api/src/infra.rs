use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use intern_portal::config::AppConfig;
use intern_portal::error::AppError;
use intern_portal::portal::{
    Attachment, FieldErrors, FileStorage, LocationType, MockLatency, MockPortalService,
    SessionStorage, SessionStore,
};
use intern_portal::portal::validation::FieldKey;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn portal_service(config: &AppConfig) -> Arc<MockPortalService> {
    let latency = MockLatency::from_flag(config.portal.simulate_latency);
    Arc::new(MockPortalService::new(latency))
}

pub(crate) fn session_store<S>(
    service: Arc<MockPortalService>,
    storage: S,
) -> SessionStore<MockPortalService, S>
where
    S: SessionStorage + 'static,
{
    SessionStore::new(service, Arc::new(storage))
}

pub(crate) fn file_session(
    config: &AppConfig,
    service: Arc<MockPortalService>,
) -> SessionStore<MockPortalService, FileStorage> {
    session_store(service, FileStorage::new(&config.portal.session_file))
}

/// Describe a local file for upload, guessing its content type from the extension.
pub(crate) fn attachment_from_path(path: &Path) -> Result<Attachment, AppError> {
    let metadata = std::fs::metadata(path)?;
    if !metadata.is_file() {
        return Err(AppError::Validation(format!(
            "{} is not a regular file",
            path.display()
        )));
    }

    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| AppError::Validation(format!("{} has no file name", path.display())))?;
    let content_type = mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string();

    Ok(Attachment::new(name, metadata.len(), content_type))
}

/// Attachment for a file that only exists by name, as used by the scripted demo.
pub(crate) fn named_attachment(name: &str, size_bytes: u64) -> Attachment {
    let content_type = mime_guess::from_path(name).first_or_octet_stream();
    Attachment::new(name, size_bytes, content_type.essence_str())
}

pub(crate) fn parse_location_type(raw: &str) -> Result<LocationType, String> {
    LocationType::parse(raw)
        .ok_or_else(|| format!("'{raw}' is not one of Remote, On-site, Hybrid"))
}

pub(crate) fn field_error_summary<K: FieldKey>(errors: &FieldErrors<K>) -> String {
    errors
        .iter()
        .map(|(field, message)| format!("{}: {message}", field.path()))
        .collect::<Vec<_>>()
        .join("; ")
}
