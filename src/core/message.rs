use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Origin {
    User,
    Assistant,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub origin: Origin,
    pub text: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            origin: Origin::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            origin: Origin::Assistant,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            origin: Origin::Error,
            text: text.into(),
        }
    }
}

impl Origin {
    pub fn as_str(self) -> &'static str {
        match self {
            Origin::User => "user",
            Origin::Assistant => "assistant",
            Origin::Error => "error",
        }
    }

    /// Prefix used when printing a message in the terminal.
    pub fn label(self) -> &'static str {
        match self {
            Origin::User => "You",
            Origin::Assistant => "Therapist AI",
            Origin::Error => "Error",
        }
    }
}

impl TryFrom<&str> for Origin {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, <Self as TryFrom<&str>>::Error> {
        match value {
            "user" => Ok(Origin::User),
            "assistant" => Ok(Origin::Assistant),
            "error" => Ok(Origin::Error),
            _ => Err(format!("invalid message origin: {value}")),
        }
    }
}

impl TryFrom<String> for Origin {
    type Error = String;

    fn try_from(value: String) -> Result<Self, <Self as TryFrom<String>>::Error> {
        Self::try_from(value.as_str())
    }
}

impl From<Origin> for String {
    fn from(value: Origin) -> Self {
        value.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_serializes_as_lowercase_string() {
        let json = serde_json::to_string(&ChatMessage::error("boom")).expect("encode");
        assert_eq!(json, r#"{"origin":"error","text":"boom"}"#);

        let parsed: ChatMessage =
            serde_json::from_str(r#"{"origin":"assistant","text":"hi"}"#).expect("decode");
        assert_eq!(parsed, ChatMessage::assistant("hi"));
    }

    #[test]
    fn unknown_origin_is_rejected() {
        assert!(Origin::try_from("system").is_err());
        assert!(serde_json::from_str::<ChatMessage>(r#"{"origin":"x","text":""}"#).is_err());
    }
}
