use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};

use crate::{error::PassError, payload::SaveClaims};

pub(crate) fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default()
}

pub fn sign(claims: &SaveClaims, key: &EncodingKey) -> Result<String, PassError> {
    Ok(encode(&Header::new(Algorithm::RS256), claims, key)?)
}

/// Sign the claims and form `<save_endpoint>/<token>`.
pub fn save_url(
    claims: &SaveClaims,
    key: &EncodingKey,
    save_endpoint: &str,
) -> Result<String, PassError> {
    let token = sign(claims, key)?;
    Ok(format!("{}/{}", save_endpoint.trim_end_matches('/'), token))
}
