//! Gemma turn-based chat template

use crate::types::{ChatMessage, Role};

pub const START_OF_TURN: &str = "<start_of_turn>";
pub const END_OF_TURN: &str = "<end_of_turn>";

/// Template role a message renders under.
///
/// The template only knows `user` and `model`, so system turns are folded
/// into user turns.
fn template_role(role: Role) -> &'static str {
    match role {
        Role::System | Role::User => "user",
        Role::Assistant => "model",
    }
}

/// Render a conversation into a single prompt, ending with an open model turn.
pub fn format_chat_prompt(messages: &[ChatMessage]) -> String {
    let mut prompt = String::new();
    for message in messages {
        prompt.push_str(START_OF_TURN);
        prompt.push_str(template_role(message.role));
        prompt.push('\n');
        prompt.push_str(&message.content);
        prompt.push_str(END_OF_TURN);
        prompt.push('\n');
    }
    prompt.push_str(START_OF_TURN);
    prompt.push_str("model\n");
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_full_conversation() {
        let messages = vec![
            ChatMessage::system("a"),
            ChatMessage::user("b"),
            ChatMessage::assistant("c"),
        ];

        assert_eq!(
            format_chat_prompt(&messages),
            "<start_of_turn>user\na<end_of_turn>\n\
             <start_of_turn>user\nb<end_of_turn>\n\
             <start_of_turn>model\nc<end_of_turn>\n\
             <start_of_turn>model\n"
        );
    }

    #[test]
    fn test_empty_conversation() {
        assert_eq!(format_chat_prompt(&[]), "<start_of_turn>model\n");
    }

    #[test]
    fn test_multiline_content_is_kept() {
        let prompt = format_chat_prompt(&[ChatMessage::user("line one\nline two")]);
        assert_eq!(
            prompt,
            "<start_of_turn>user\nline one\nline two<end_of_turn>\n<start_of_turn>model\n"
        );
    }
}
