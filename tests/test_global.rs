
use ds_common_logger::sinks::Sink;
use ds_common_logger::{ConfigureOptions, Level};

// The global context is shared by all tests of a binary, so this file has only one test.
#[test]
fn test_global() {
    let early = ds_common_logger::get_logger("app.early");
    assert_eq!(early.level(), Some(Level::Info));
    assert!(!ds_common_logger::global().config().is_configured());

    let (memory, sink) = self::test_utils::memory_sink();
    ds_common_logger::configure(
        ConfigureOptions::with_level(Level::Debug)
            .prefix("global")
            .handlers(vec![sink.clone()]),
    );
    // second call is ignored
    ds_common_logger::configure(ConfigureOptions::default().prefix("ignored"));
    assert_eq!(ds_common_logger::global().config().get_prefix(), "global");

    // the early logger got the configured level, but it has a stdout sink already
    assert_eq!(early.level(), Some(Level::Debug));
    early.debug("early, to stdout only");

    let late = ds_common_logger::get_logger("app.late");
    assert!(late.has_sink(&sink));
    late.debug("late");
    ds_common_logger::global().config().set_prefix("renamed");
    late.info("late again");

    memory.validate_logs(&[
        ("[global][app.late][DEBUG]", "", "late"),
        ("[renamed][app.late][INFO]", "", "late again"),
    ]);

    ds_common_logger::global().reset();
    assert!(!ds_common_logger::global().config().is_configured());
    assert!(ds_common_logger::global().registry().names().is_empty());
}
