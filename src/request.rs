//! Common parameters and signing for CMQ requests.

use std::collections::BTreeMap;

use crate::config::ClientConfig;
use crate::credential::Credential;
use crate::error::Result;
use crate::sign::{SignMethod, canonical_string, percent_encode, sign};

/// Value of the `RequestClient` parameter identifying this SDK.
pub(crate) const REQUEST_CLIENT: &str = concat!("SDK_Rust_", env!("CARGO_PKG_VERSION"));

/// Random positive integer for the `Nonce` parameter.
fn generate_nonce() -> u32 {
    let bytes = uuid::Uuid::new_v4().into_bytes();
    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]).max(1)
}

/// Current Unix time in seconds, corrected by the server clock offset.
fn get_timestamp(time_offset_secs: i64) -> i64 {
    chrono::Utc::now().timestamp() + time_offset_secs
}

/// Adds the common parameters to `params` and signs the result.
///
/// Returns the complete parameter set including `Signature`, ready to be
/// encoded with [`encode_params`].
pub(crate) fn build_signed_params(
    action: &str,
    mut params: BTreeMap<String, String>,
    credential: &Credential,
    config: &ClientConfig,
    sign_method: SignMethod,
    time_offset: i64,
) -> Result<BTreeMap<String, String>> {
    params.insert("Action".to_string(), action.to_string());
    params.insert("SecretId".to_string(), credential.secret_id.clone());
    params.insert("Timestamp".to_string(), get_timestamp(time_offset).to_string());
    params.insert("Nonce".to_string(), generate_nonce().to_string());
    params.insert("RequestClient".to_string(), REQUEST_CLIENT.to_string());
    if sign_method != SignMethod::default() {
        params.insert(
            "SignatureMethod".to_string(),
            sign_method.as_param_str().to_string(),
        );
    }

    let src = canonical_string(config.method.as_str(), config.host(), &config.path, &params);
    let signature = sign(&src, &credential.secret_key, sign_method)?;
    params.insert("Signature".to_string(), signature);

    Ok(params)
}

/// Encodes a parameter set as `k=v&...` for a form body or query string.
pub(crate) fn encode_params(params: &BTreeMap<String, String>) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", percent_encode(k), percent_encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}
