use std::path::Path;

use localident_core::{LocalIdentConfig, DEFAULT_TEMPLATE};
use napi_derive::napi;

fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

#[napi]
pub fn get_css_module_local_ident(
    resource_path: String,
    root_context: String,
    local_name: String,
    template: Option<String>,
) -> String {
    localident_core::get_local_ident(
        &resource_path,
        &root_context,
        &local_name,
        template.as_deref().unwrap_or(DEFAULT_TEMPLATE),
    )
}

/// Class maps for every style module under `root`, as JSON.
#[napi]
pub fn build_class_map(root: String, template: Option<String>) -> napi::Result<String> {
    localident_core::logging::init();

    let mut config = LocalIdentConfig::default();
    if let Some(template) = template {
        config.template = template;
    }

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(to_napi_error)?;

    let manifest = rt
        .block_on(localident_core::build_project_class_maps(Path::new(&root), &config))
        .map_err(|e| {
            tracing::error!("class map build failed: {:#}", e);
            to_napi_error(format!("{e:#}"))
        })?;

    manifest.to_json().map_err(to_napi_error)
}
