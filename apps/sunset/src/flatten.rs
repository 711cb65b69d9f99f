//! Concatenate message groups into one ordered stream.

use crate::models::DiagnosticMessage;

/// Flatten groups in input order, keeping each group's internal order.
///
/// Lazy and total: empty input, or input made only of empty groups, yields
/// nothing.
pub fn flatten<I, G>(groups: I) -> impl Iterator<Item = DiagnosticMessage>
where
    I: IntoIterator<Item = G>,
    G: IntoIterator<Item = DiagnosticMessage>,
{
    groups.into_iter().flatten()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MessageGroup, Severity};

    fn msg(text: &str) -> DiagnosticMessage {
        DiagnosticMessage::new(Severity::Warning, text)
    }

    #[test]
    fn test_flatten_keeps_group_then_message_order() {
        let groups: Vec<MessageGroup> = vec![
            vec![msg("a"), msg("b")],
            vec![],
            vec![msg("c")],
            vec![msg("d"), msg("e")],
        ];
        let texts: Vec<String> = flatten(groups).map(|m| m.display_text()).collect();
        assert_eq!(texts, ["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn test_flatten_empty_inputs() {
        let none: Vec<MessageGroup> = vec![];
        assert_eq!(flatten(none).count(), 0);
        let empty_groups: Vec<MessageGroup> = vec![vec![], vec![]];
        assert_eq!(flatten(empty_groups).count(), 0);
    }
}
