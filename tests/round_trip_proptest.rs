// Property tests: round-trip law, idempotence and block-to-object mapping
use nagdata_core::{parse, Grammar, ParseOptions, ParseState};
use proptest::prelude::*;

fn word() -> impl Strategy<Value = String> {
    "[a-z_][a-z0-9_]{0,10}"
}

fn value() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ./!$%,:=-]{0,20}"
}

fn blanks() -> impl Strategy<Value = String> {
    "[ \t]{0,3}"
}

fn line_end() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("\n"), Just("\r\n")]
}

fn comment_line() -> impl Strategy<Value = String> {
    (blanks(), prop_oneof![Just('#'), Just(';')], "[a-zA-Z0-9 ]{0,20}", line_end())
        .prop_map(|(lead, marker, text, end)| format!("{lead}{marker}{text}{end}"))
}

fn object_attribute() -> impl Strategy<Value = String> {
    (blanks(), word(), proptest::option::of((" {1,4}", value())), line_end()).prop_map(
        |(lead, name, value, end)| match value {
            Some((gap, value)) => format!("{lead}{name}{gap}{value}{end}"),
            None => format!("{lead}{name}{end}"),
        },
    )
}

fn object_block() -> impl Strategy<Value = (String, usize)> {
    (
        word(),
        blanks(),
        proptest::collection::vec(object_attribute(), 0..6),
        blanks(),
        line_end(),
        line_end(),
    )
        .prop_map(|(name, gap, attrs, close_lead, end, close_end)| {
            let mut block = format!("define {name}{gap}{{{end}");
            for attr in &attrs {
                block.push_str(attr);
            }
            block.push_str(&format!("{close_lead}}}{close_end}"));
            (block, attrs.len())
        })
}

fn object_file() -> impl Strategy<Value = (String, Vec<usize>)> {
    proptest::collection::vec(
        (proptest::collection::vec(comment_line(), 0..3), object_block()),
        0..5,
    )
    .prop_map(|parts| {
        let mut source = String::new();
        let mut counts = Vec::new();
        for (comments, (block, count)) in parts {
            for comment in comments {
                source.push_str(&comment);
            }
            source.push_str(&block);
            counts.push(count);
        }
        (source, counts)
    })
}

fn status_file() -> impl Strategy<Value = String> {
    proptest::collection::vec(
        (
            word(),
            proptest::collection::vec((blanks(), word(), blanks(), value()), 0..6),
            blanks(),
        ),
        0..5,
    )
    .prop_map(|blocks| {
        let mut source = String::new();
        for (name, attrs, close_lead) in blocks {
            source.push_str(&format!("{name} {{\n"));
            for (lead, attr, gap, value) in attrs {
                source.push_str(&format!("{lead}{attr}{gap}={value}\n"));
            }
            source.push_str(&format!("{close_lead}}}\n\n"));
        }
        source
    })
}

proptest! {
    #[test]
    fn object_files_round_trip((source, counts) in object_file()) {
        let options = ParseOptions::default().grammar(Grammar::Object).preserve_format(true);
        let result = parse(&source, &options).unwrap();
        prop_assert_eq!(result.reconstruct(), Some(source.clone()));

        let real: Vec<usize> = result.objects().real().map(|o| o.arguments.len()).collect();
        prop_assert_eq!(real, counts);

        let again = parse(&source, &options).unwrap();
        prop_assert_eq!(result, again);
    }

    #[test]
    fn status_files_round_trip(source in status_file()) {
        let options = ParseOptions::default().grammar(Grammar::Status).preserve_format(true);
        let result = parse(&source, &options).unwrap();
        prop_assert_eq!(result.reconstruct(), Some(source.clone()));
    }

    #[test]
    fn status_fragments_round_trip(lines in proptest::collection::vec((word(), value()), 0..10)) {
        let source: String = lines.iter().map(|(k, v)| format!("{k}={v}\n")).collect();
        let options = ParseOptions::default()
            .grammar(Grammar::Status)
            .start_state(ParseState::AwaitingAttribute)
            .preserve_format(true);
        let result = parse(&source, &options).unwrap();
        prop_assert_eq!(result.reconstruct(), Some(source.clone()));
        prop_assert_eq!(result.objects().real().count(), usize::from(!lines.is_empty()));
    }
}
