use std::collections::BTreeMap;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use hmac::{Hmac, Mac};
use sha1::Sha1;
use sha2::Sha256;

use crate::error::{CmqError, Result};

type HmacSha1 = Hmac<Sha1>;
type HmacSha256 = Hmac<Sha256>;

/// HMAC digest used to sign requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignMethod {
    #[default]
    HmacSha1,
    HmacSha256,
}

impl SignMethod {
    /// Value of the `SignatureMethod` parameter.
    pub fn as_param_str(self) -> &'static str {
        match self {
            SignMethod::HmacSha1 => "HmacSHA1",
            SignMethod::HmacSha256 => "HmacSHA256",
        }
    }

    pub(crate) fn to_u8(self) -> u8 {
        match self {
            SignMethod::HmacSha1 => 0,
            SignMethod::HmacSha256 => 1,
        }
    }

    pub(crate) fn from_u8(value: u8) -> Self {
        match value {
            1 => SignMethod::HmacSha256,
            _ => SignMethod::HmacSha1,
        }
    }
}

/// Percent-encodes a string for the wire (RFC 3986).
///
/// Unreserved characters (A-Z, a-z, 0-9, '-', '.', '_', '~') are NOT encoded.
/// All other characters are encoded as `%XX` (uppercase hex).
/// Spaces become `%20` (NOT `+`).
pub(crate) fn percent_encode(s: &str) -> String {
    let mut encoded = String::with_capacity(s.len() * 2);
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                encoded.push(byte as char);
            }
            _ => {
                encoded.push_str(&format!("%{:02X}", byte));
            }
        }
    }
    encoded
}

/// Builds the string CMQ recomputes on its side:
/// `{METHOD}{host}{path}?k1=v1&k2=v2...`.
///
/// Keys come out in ordinal order (BTreeMap provides this) and values are
/// left unencoded.
pub(crate) fn canonical_string(
    http_method: &str,
    host: &str,
    path: &str,
    params: &BTreeMap<String, String>,
) -> String {
    let query = params
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");
    format!("{}{}{}?{}", http_method, host, path, query)
}

/// HMAC over `src` keyed by `secret_key`, base64 encoded.
pub(crate) fn sign(src: &str, secret_key: &str, method: SignMethod) -> Result<String> {
    let digest = match method {
        SignMethod::HmacSha1 => {
            let mut mac = HmacSha1::new_from_slice(secret_key.as_bytes())
                .map_err(|e| CmqError::Signature(format!("HMAC key error: {}", e)))?;
            mac.update(src.as_bytes());
            mac.finalize().into_bytes().to_vec()
        }
        SignMethod::HmacSha256 => {
            let mut mac = HmacSha256::new_from_slice(secret_key.as_bytes())
                .map_err(|e| CmqError::Signature(format!("HMAC key error: {}", e)))?;
            mac.update(src.as_bytes());
            mac.finalize().into_bytes().to_vec()
        }
    };
    Ok(BASE64.encode(digest))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_params() -> BTreeMap<String, String> {
        let mut params = BTreeMap::new();
        params.insert("Action".to_string(), "SendMessage".to_string());
        params.insert("SecretId".to_string(), "AKIDtest".to_string());
        params.insert("Timestamp".to_string(), "1700000000".to_string());
        params.insert("Nonce".to_string(), "12345".to_string());
        params.insert("queueName".to_string(), "orders".to_string());
        params.insert("msgBody".to_string(), "hello world".to_string());
        params
    }

    #[test]
    fn percent_encode_unreserved_chars() {
        assert_eq!(percent_encode("abcXYZ019"), "abcXYZ019");
        assert_eq!(percent_encode("-._~"), "-._~");
    }

    #[test]
    fn percent_encode_special_chars() {
        assert_eq!(percent_encode("hello world"), "hello%20world");
        assert_eq!(percent_encode("/"), "%2F");
        assert_eq!(percent_encode("="), "%3D");
        assert_eq!(percent_encode("&"), "%26");
        assert_eq!(percent_encode("+"), "%2B");
    }

    #[test]
    fn percent_encode_chinese() {
        assert_eq!(percent_encode("中文"), "%E4%B8%AD%E6%96%87");
    }

    #[test]
    fn canonical_string_sorts_keys_ordinally() {
        let mut params = BTreeMap::new();
        params.insert("b".to_string(), "2".to_string());
        params.insert("a".to_string(), "1".to_string());
        let src = canonical_string("POST", "host", "/v2/index.php", &params);
        assert_eq!(src, "POSThost/v2/index.php?a=1&b=2");
    }

    #[test]
    fn canonical_string_uppercase_before_lowercase() {
        let mut params = BTreeMap::new();
        params.insert("queueName".to_string(), "q".to_string());
        params.insert("Action".to_string(), "DeleteQueue".to_string());
        params.insert("Nonce".to_string(), "1".to_string());
        let src = canonical_string("GET", "h", "/p", &params);
        assert_eq!(src, "GETh/p?Action=DeleteQueue&Nonce=1&queueName=q");
    }

    #[test]
    fn canonical_string_keeps_values_unencoded() {
        let mut params = BTreeMap::new();
        params.insert("msgBody".to_string(), "a b&c=d".to_string());
        let src = canonical_string("POST", "h", "/p", &params);
        assert!(src.ends_with("?msgBody=a b&c=d"));
    }

    #[test]
    fn sign_deterministic() {
        let src = canonical_string("POST", "h", "/p", &sample_params());
        for method in [SignMethod::HmacSha1, SignMethod::HmacSha256] {
            let sig1 = sign(&src, "secret", method).unwrap();
            let sig2 = sign(&src, "secret", method).unwrap();
            assert_eq!(sig1, sig2, "signature must be deterministic");
        }
    }

    #[test]
    fn sign_changes_with_any_value() {
        let base = sample_params();
        let src = canonical_string("POST", "h", "/p", &base);
        let original = sign(&src, "secret", SignMethod::HmacSha1).unwrap();

        for key in base.keys() {
            let mut changed = base.clone();
            changed.insert(key.clone(), format!("{}x", base[key]));
            let src = canonical_string("POST", "h", "/p", &changed);
            let sig = sign(&src, "secret", SignMethod::HmacSha1).unwrap();
            assert_ne!(sig, original, "changing {} must change the signature", key);
        }
    }

    #[test]
    fn sign_different_secrets_differ() {
        let sig1 = sign("src", "secret1", SignMethod::HmacSha1).unwrap();
        let sig2 = sign("src", "secret2", SignMethod::HmacSha1).unwrap();
        assert_ne!(sig1, sig2);
    }

    #[test]
    fn sign_methods_differ_in_length() {
        let sha1 = sign("src", "key", SignMethod::HmacSha1).unwrap();
        let sha256 = sign("src", "key", SignMethod::HmacSha256).unwrap();
        assert_eq!(BASE64.decode(&sha1).unwrap().len(), 20);
        assert_eq!(BASE64.decode(&sha256).unwrap().len(), 32);
    }

    #[test]
    fn sign_known_vector() {
        // RFC 2202 test case 2.
        let sig = sign("what do ya want for nothing?", "Jefe", SignMethod::HmacSha1).unwrap();
        let bytes = BASE64.decode(sig).unwrap();
        let hex: String = bytes.iter().map(|b| format!("{:02x}", b)).collect();
        assert_eq!(hex, "effcdf6ae5eb2fa2d27416d5f184df9c259a7c79");
    }

    #[test]
    fn sign_method_param_strings() {
        assert_eq!(SignMethod::HmacSha1.as_param_str(), "HmacSHA1");
        assert_eq!(SignMethod::HmacSha256.as_param_str(), "HmacSHA256");
        assert_eq!(SignMethod::from_u8(SignMethod::HmacSha256.to_u8()), SignMethod::HmacSha256);
        assert_eq!(SignMethod::from_u8(SignMethod::HmacSha1.to_u8()), SignMethod::HmacSha1);
    }
}
