//! Utility functions for building broker URLs
//! Supports both traditional host:port format and modern base URL format

/// Build broker URL from either base_url or host/port combination
///
/// If base_url is provided, it takes precedence and should include the protocol.
/// Otherwise, constructs URL from host and port using http as default protocol.
pub fn build_api_url(base_url: Option<&str>, host: &str, port: u16, path: &str) -> String {
    if let Some(base) = base_url {
        format!("{}{}", base.trim_end_matches('/'), path)
    } else if host.starts_with("http://") || host.starts_with("https://") {
        format!("{}{}", host.trim_end_matches('/'), path)
    } else {
        format!("http://{}:{}{}", host, port, path)
    }
}

/// Path of a whole NGSI-v2 entity
pub fn entity_path(entity_id: &str) -> String {
    format!("/v2/entities/{}", entity_id)
}

/// Path of an entity's attribute collection, target of partial updates
pub fn entity_attrs_path(entity_id: &str) -> String {
    format!("/v2/entities/{}/attrs", entity_id)
}
