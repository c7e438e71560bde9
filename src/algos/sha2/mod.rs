use sha2::Sha256;

super::new_hmac_spec!(HmacSha256, Sha256, 32, "HMAC-SHA256");
