//! 支付签名校验
//!
//! The payment gateway signs its callback as
//! `HMAC-SHA256(secret, "{gateway_order_id}|{gateway_payment_id}")`,
//! hex-encoded. Verification is stateless and constant-time; business
//! re-validation of the cart happens separately in checkout.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Compute the expected hex signature for a gateway callback.
pub fn sign(secret: &str, gateway_order_id: &str, gateway_payment_id: &str) -> String {
    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(mac) => mac,
        // HMAC accepts keys of any length; unreachable in practice
        Err(_) => return String::new(),
    };
    mac.update(format!("{gateway_order_id}|{gateway_payment_id}").as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Check a gateway-provided signature against the shared secret.
///
/// Uses constant-time comparison via `Mac::verify_slice`. Any malformed
/// input (non-hex, wrong length) is a plain `false`, never an error.
pub fn verify_signature(
    secret: &str,
    gateway_order_id: &str,
    gateway_payment_id: &str,
    provided_signature: &str,
) -> bool {
    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(format!("{gateway_order_id}|{gateway_payment_id}").as_bytes());

    let Ok(sig_bytes) = hex::decode(provided_signature) else {
        return false;
    };
    mac.verify_slice(&sig_bytes).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-gateway-secret";

    #[test]
    fn accepts_its_own_signature() {
        let sig = sign(SECRET, "order_123", "pay_456");
        assert!(verify_signature(SECRET, "order_123", "pay_456", &sig));
    }

    #[test]
    fn rejects_flipped_character() {
        let mut sig = sign(SECRET, "order_123", "pay_456");
        let flipped = if sig.ends_with('0') { '1' } else { '0' };
        sig.pop();
        sig.push(flipped);
        assert!(!verify_signature(SECRET, "order_123", "pay_456", &sig));
    }

    #[test]
    fn rejects_non_hex_and_truncated_input() {
        assert!(!verify_signature(SECRET, "order_123", "pay_456", "zzzz"));
        assert!(!verify_signature(SECRET, "order_123", "pay_456", ""));
        let sig = sign(SECRET, "order_123", "pay_456");
        assert!(!verify_signature(SECRET, "order_123", "pay_456", &sig[..32]));
    }

    #[test]
    fn rejects_wrong_secret_or_ids() {
        let sig = sign(SECRET, "order_123", "pay_456");
        assert!(!verify_signature("other-secret", "order_123", "pay_456", &sig));
        assert!(!verify_signature(SECRET, "order_999", "pay_456", &sig));
        assert!(!verify_signature(SECRET, "order_123", "pay_999", &sig));
    }

    #[test]
    fn separator_prevents_field_ambiguity() {
        // ("ab", "c") and ("a", "bc") must not collide
        let sig = sign(SECRET, "ab", "c");
        assert!(!verify_signature(SECRET, "a", "bc", &sig));
    }
}
