//! Payment signature checks.
//!
//! The gateway signs `"{payment_id}|{subscription_id}"` with HMAC-SHA256
//! keyed by the account secret and sends the hex digest back with the
//! payment callback.

use coursebundler_core::error::{AppError, AppResult};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Signs and verifies payment callbacks.
#[derive(Clone)]
pub struct PaymentSigner {
    secret: String,
}

impl PaymentSigner {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Hex-encoded signature for a payment.
    pub fn sign(&self, payment_id: &str, subscription_id: &str) -> AppResult<String> {
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .map_err(|e| AppError::internal(format!("invalid signing key: {e}")))?;

        mac.update(payment_id.as_bytes());
        mac.update(b"|");
        mac.update(subscription_id.as_bytes());

        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    /// Checks `signature` in constant time.
    pub fn verify(&self, payment_id: &str, subscription_id: &str, signature: &str) -> AppResult<bool> {
        let expected = self.sign(payment_id, subscription_id)?;
        Ok(constant_time_compare(&expected, signature))
    }
}

impl std::fmt::Debug for PaymentSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentSigner").finish_non_exhaustive()
    }
}

fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }
    result == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_and_verify() {
        let signer = PaymentSigner::new("gateway-secret");
        let signature = signer.sign("pay_1", "sub_1").unwrap();

        assert_eq!(signature.len(), 64);
        assert!(signer.verify("pay_1", "sub_1", &signature).unwrap());
        assert!(!signer.verify("pay_2", "sub_1", &signature).unwrap());
        assert!(!signer.verify("pay_1", "sub_2", &signature).unwrap());
    }

    #[test]
    fn test_other_secret_rejected() {
        let signature = PaymentSigner::new("a").sign("pay_1", "sub_1").unwrap();
        assert!(!PaymentSigner::new("b").verify("pay_1", "sub_1", &signature).unwrap());
    }

    #[test]
    fn test_debug_hides_secret() {
        let rendered = format!("{:?}", PaymentSigner::new("top-secret"));
        assert!(!rendered.contains("top-secret"));
    }
}
