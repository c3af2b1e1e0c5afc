use std::fmt::Write;

use crate::types::Message;


/// Flattens the conversation into the single prompt string sent to the
/// generate endpoint: one `role: content` line per history message, then the
/// new user turn and an open `assistant:` slot.
///
/// Roles and contents are copied verbatim, nothing is escaped.
pub fn flatten_prompt(history: &[Message], prompt: &str) -> String {
    let mut flattened = String::new();

    // writing into a String cannot fail
    for msg in history {
        let _ = writeln!(flattened, "{}: {}", msg.role, msg.content);
    }
    let _ = write!(flattened, "user: {}\nassistant:", prompt);

    flattened
}


#[cfg(test)]
mod tests {
    use super::*;

    fn message(role: &str, content: &str) -> Message {
        Message {
            role: role.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_flatten_without_history() {
        assert_eq!(flatten_prompt(&[], "hello"), "user: hello\nassistant:");
    }

    #[test]
    fn test_flatten_keeps_turn_order() {
        let history = vec![message("user", "hi"), message("assistant", "hello")];

        assert_eq!(
            flatten_prompt(&history, "how are you"),
            "user: hi\nassistant: hello\nuser: how are you\nassistant:"
        );
    }

    #[test]
    fn test_flatten_is_deterministic_and_leaves_history_untouched() {
        let history = vec![
            message("system", "be brief"),
            message("user", "Q1"),
            message("assistant", "A1"),
        ];
        let before = history.clone();

        let first = flatten_prompt(&history, "Q2");
        let second = flatten_prompt(&history, "Q2");

        assert_eq!(first, second);
        assert_eq!(history, before);
    }

    #[test]
    fn test_flatten_passes_roles_and_content_verbatim() {
        let history = vec![message("narrator", "line one\nuser: injected")];

        assert_eq!(
            flatten_prompt(&history, "ok"),
            "narrator: line one\nuser: injected\nuser: ok\nassistant:"
        );
    }
}
