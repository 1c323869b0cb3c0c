#![feature(test)]

extern crate test;

use ds_common_logger::sinks::{MemorySink, SharedSink};
use ds_common_logger::{extra, ConfigureOptions, Level, Logger, LoggingContext};
use std::sync::Arc;
use test::Bencher;

fn context() -> LoggingContext {
    let context = LoggingContext::new();
    context.configure(
        ConfigureOptions::with_level(Level::Info)
            .prefix("bench")
            .handlers(vec![]),
    );
    context
}

// a logger that writes into memory only
fn logger(context: &LoggingContext, name: &str) -> (Arc<Logger>, Arc<MemorySink>) {
    let memory = Arc::new(MemorySink::new());
    let sink: SharedSink = memory.clone();
    context.registry().get_or_create(name).add_sink(sink);
    (context.get_logger(name, None), memory)
}

#[bench]
fn b10_get_existing_logger(b: &mut Bencher) {
    let context = context();
    logger(&context, "bench.existing");
    b.iter(|| context.get_logger("bench.existing", None));
}

#[bench]
fn b20_relevant_logs(b: &mut Bencher) {
    let context = context();
    let (logger, memory) = logger(&context, "bench.relevant");
    b.iter(|| {
        for _ in 1..100 {
            logger.error("This is an error message");
        }
        memory.clear();
    });
}

#[bench]
fn b30_relevant_logs_with_extra(b: &mut Bencher) {
    let context = context();
    let (logger, memory) = logger(&context, "bench.extra");
    b.iter(|| {
        for i in 1..100 {
            logger.error_with("This is an error message", extra! { "i" => i, "k" => "v" });
        }
        memory.clear();
    });
}

#[bench]
fn b40_suppressed_logs(b: &mut Bencher) {
    let context = context();
    let (logger, _memory) = logger(&context, "bench.suppressed");
    b.iter(|| {
        for _ in 1..100 {
            logger.debug("This is a debug message");
        }
    });
}
