//! Property tests for the task descriptor grammar.

use proptest::prelude::*;

use dit::{Task, TaskAction, TaskKind, TaskParseError};

fn field() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9./_~ -]{0,32}").unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Parsing never panics on arbitrary input.
    #[test]
    fn property_parse_never_panics(s in "(?s).{0,256}") {
        let _ = Task::parse(&s);
    }

    /// PROPERTY: Whatever parses describes itself as the exact input.
    #[test]
    fn property_describe_is_verbatim(s in "(UPLOAD|DOWNLOAD|CMD)@[^\\n]{0,64}") {
        if let Ok(task) = Task::parse(&s) {
            prop_assert_eq!(task.describe(), s.as_str());
        }
    }

    /// PROPERTY: Two delimiter-free fields always make a valid upload.
    #[test]
    fn property_upload_fields_round_trip(from in field(), to in field()) {
        let task = Task::parse(&format!("UPLOAD@{from}@{to}")).unwrap();
        match task.action() {
            TaskAction::Upload { source, destination } => {
                prop_assert_eq!(source.to_str().unwrap(), from.as_str());
                prop_assert_eq!(destination.as_str(), to.as_str());
            }
            other => prop_assert!(false, "unexpected action {:?}", other),
        }
    }

    /// PROPERTY: A command keeps every byte after the first delimiter.
    #[test]
    fn property_command_keeps_remainder(cmd in "[^\\n]{0,64}") {
        let task = Task::parse(&format!("CMD@{cmd}")).unwrap();
        prop_assert_eq!(task.kind(), TaskKind::Command);
        prop_assert_eq!(
            task.action(),
            &TaskAction::Command { command_line: cmd.clone() }
        );
    }

    /// PROPERTY: Transfers with a third delimiter are rejected, never truncated.
    #[test]
    fn property_extra_delimiter_rejected(a in field(), b in field(), c in field()) {
        for verb in ["UPLOAD", "DOWNLOAD"] {
            let raw = format!("{verb}@{a}@{b}@{c}");
            let is_format_error = matches!(
                Task::parse(&raw),
                Err(TaskParseError::InvalidFormat { .. })
            );
            prop_assert!(is_format_error);
        }
    }
}
