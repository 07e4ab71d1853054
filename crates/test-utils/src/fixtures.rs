//! Fixture data shared by cross-service tests.

/// Signing secret shared by every test auth server.
pub const TEST_JWT_SECRET: &str = "test-utils-shared-signing-secret";

pub const ALICE_USERNAME: &str = "alice";
pub const ALICE_PASSWORD: &str = "pw1";

pub const BOB_USERNAME: &str = "bob";
pub const BOB_PASSWORD: &str = "pw2";

/// Credential records written to the test users file.
pub fn users_json() -> serde_json::Value {
    serde_json::json!([
        {
            "username": ALICE_USERNAME,
            "password": ALICE_PASSWORD,
            "details": {"display_name": "Alice", "favorite_color": "green"}
        },
        {
            "username": BOB_USERNAME,
            "password": BOB_PASSWORD,
            "details": {"display_name": "Bob"}
        }
    ])
}

/// Name of the image placed in every test image root.
pub const PHOTO_NAME: &str = "photo.jpg";

/// Bytes of `photo.jpg`: a JPEG SOI/APP0 prefix, enough to be recognisable.
pub const PHOTO_BYTES: &[u8] = &[
    0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00, 0x01,
];
