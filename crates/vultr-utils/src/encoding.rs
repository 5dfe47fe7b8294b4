use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Encode free-form user data the way `server/create` expects it
pub fn encode_user_data(user_data: &str) -> String {
    STANDARD.encode(user_data.as_bytes())
}

/// Form value for a boolean switch
pub fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}
