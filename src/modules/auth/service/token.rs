use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Claims {
    pub id: String,
}

#[derive(Debug)]
pub enum Error {
    Malformed,
    BadSignature,
}

type Result<T> = std::result::Result<T, Error>;

fn mac(secret: &str, payload: &str) -> HmacSha256 {
    // The key length is unrestricted for HMAC, this cannot fail.
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts keys of any size");
    mac.update(payload.as_bytes());
    mac
}

/// Issues a signed session token carrying the user identifier, in the form
/// `base64url(claims).base64url(signature)`.
pub fn sign(secret: &str, claims: &Claims) -> String {
    let payload = URL_SAFE_NO_PAD.encode(serde_json::json!(claims).to_string());
    let signature = URL_SAFE_NO_PAD.encode(mac(secret, payload.as_str()).finalize().into_bytes());
    format!("{}.{}", payload, signature)
}

/// Verifies a token's signature and shape. Fails closed on any deviation.
pub fn verify(secret: &str, token: &str) -> Result<Claims> {
    let (payload, signature) = token.split_once('.').ok_or(Error::Malformed)?;

    let signature = URL_SAFE_NO_PAD
        .decode(signature)
        .map_err(|_| Error::Malformed)?;
    mac(secret, payload)
        .verify_slice(signature.as_slice())
        .map_err(|_| Error::BadSignature)?;

    let payload = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|_| Error::Malformed)?;
    serde_json::from_slice::<Claims>(payload.as_slice()).map_err(|_| Error::Malformed)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "super-secret-signing-key";

    #[test]
    fn sign_then_verify_roundtrips() {
        let claims = Claims {
            id: "01J5K3ZY7M".to_string(),
        };

        let token = sign(SECRET, &claims);
        assert_eq!(verify(SECRET, token.as_str()).unwrap(), claims);
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let token = sign(
            SECRET,
            &Claims {
                id: "01J5K3ZY7M".to_string(),
            },
        );
        let forged_payload = URL_SAFE_NO_PAD.encode(r#"{"id":"someone-else"}"#);
        let signature = token.split_once('.').unwrap().1;

        assert!(verify(SECRET, format!("{}.{}", forged_payload, signature).as_str()).is_err());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = sign(
            SECRET,
            &Claims {
                id: "01J5K3ZY7M".to_string(),
            },
        );

        assert!(verify("a-different-secret", token.as_str()).is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(verify(SECRET, "not-a-token").is_err());
        assert!(verify(SECRET, "a.b.c").is_err());
        assert!(verify(SECRET, "").is_err());
    }
}
