use std::path::Path;

use reqwest::{Certificate, ClientBuilder, Identity};

use crate::domain::TlsMaterials;
use crate::error::ConfigError;

/// Reads the optional root CA bundle and client certificate/key pair.
///
/// # Errors
///
/// Returns an error when a file cannot be read or parsed, or when only one
/// half of the client identity is given.
pub fn load_tls_materials(
    cacert: Option<&Path>,
    cert: Option<&Path>,
    key: Option<&Path>,
) -> Result<TlsMaterials, ConfigError> {
    let root_ca = match cacert {
        Some(path) => {
            let bytes = std::fs::read(path).map_err(|err| ConfigError::ReadCacert {
                path: path.to_path_buf(),
                source: err,
            })?;
            let cert = Certificate::from_pem(&bytes).map_err(|err| ConfigError::InvalidCacert {
                path: path.to_path_buf(),
                source: err,
            })?;
            Some(cert)
        }
        None => None,
    };

    let identity = match (cert, key) {
        (Some(cert_path), Some(key_path)) => {
            let cert_bytes = std::fs::read(cert_path).map_err(|err| ConfigError::ReadCert {
                path: cert_path.to_path_buf(),
                source: err,
            })?;
            let key_bytes = std::fs::read(key_path).map_err(|err| ConfigError::ReadKey {
                path: key_path.to_path_buf(),
                source: err,
            })?;
            let identity = Identity::from_pkcs8_pem(&cert_bytes, &key_bytes)
                .map_err(|err| ConfigError::InvalidIdentity { source: err })?;
            Some(identity)
        }
        (Some(_), None) => return Err(ConfigError::CertRequiresKey),
        (None, Some(_)) => return Err(ConfigError::KeyRequiresCert),
        (None, None) => None,
    };

    Ok(TlsMaterials { root_ca, identity })
}

pub(super) fn apply_tls_materials(
    mut builder: ClientBuilder,
    materials: &TlsMaterials,
) -> ClientBuilder {
    if let Some(cert) = materials.root_ca.as_ref() {
        builder = builder.add_root_certificate(cert.clone());
    }
    if let Some(identity) = materials.identity.as_ref() {
        builder = builder.identity(identity.clone());
    }
    builder
}
