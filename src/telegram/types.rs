// =============================================================================
// Telegram Bot API payloads (the subset this bot reads)
// =============================================================================

use serde::Deserialize;

/// An incoming update delivered to the webhook.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

impl Update {
    /// Chat id and text of a plain text message, if this update carries one.
    pub fn text_message(&self) -> Option<(i64, &str)> {
        let message = self.message.as_ref()?;
        let text = message.text.as_deref()?;
        Some((message.chat.id, text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialises_text_update() {
        let json = r#"{
            "update_id": 10,
            "message": {
                "message_id": 7,
                "date": 1700000000,
                "chat": { "id": -42, "type": "private" },
                "from": { "id": 1, "is_bot": false, "first_name": "A" },
                "text": "/analyze btc"
            }
        }"#;
        let update: Update = serde_json::from_str(json).unwrap();
        assert_eq!(update.text_message(), Some((-42, "/analyze btc")));
    }

    #[test]
    fn non_message_update_has_no_text() {
        let update: Update =
            serde_json::from_str(r#"{ "update_id": 1, "edited_message": {} }"#).unwrap();
        assert!(update.text_message().is_none());
    }
}
