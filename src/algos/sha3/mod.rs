use sha3::Sha3_256;

super::new_hmac_spec!(HmacSha3_256, Sha3_256, 32, "HMAC-SHA3-256");
