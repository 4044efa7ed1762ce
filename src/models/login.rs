use serde::{Deserialize, Deserializer, Serialize};

/// Datos de login que el padre envía y que se reenvían a Unity
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Debug)]
pub struct LoginPayload {
    pub user_id: String,
    pub token: String,
}

impl LoginPayload {
    pub fn new(user_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            token: token.into(),
        }
    }

    /// JSON que recibe GameManager.ReceiveUserInfo
    pub fn to_unity_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Mensajes aceptados por el canal window.postMessage
#[derive(Clone, PartialEq, Deserialize, Debug)]
#[serde(tag = "type")]
pub enum ParentMessage {
    #[serde(rename = "LOGIN_INFO")]
    LoginInfo {
        #[serde(deserialize_with = "string_or_number")]
        user_id: String,
        token: String,
    },
}

impl ParentMessage {
    pub fn into_login(self) -> LoginPayload {
        match self {
            ParentMessage::LoginInfo { user_id, token } => LoginPayload { user_id, token },
        }
    }
}

// El backend emite user_id numérico en algunas versiones
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string(),
    })
}

/// Interpretar el `data` de un MessageEvent ya serializado a JSON.
/// Cualquier otro tipo de mensaje devuelve None.
pub fn parse_login_message(json: &str) -> Option<LoginPayload> {
    serde_json::from_str::<ParentMessage>(json)
        .ok()
        .map(ParentMessage::into_login)
}
