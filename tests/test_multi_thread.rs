
use ds_common_logger::{ConfigureOptions, Level, LoggingContext};
use std::sync::Arc;
use std::thread;

const NO_OF_THREADS: usize = 8;
const NO_OF_LOGLINES_PER_THREAD: usize = 500;

#[test]
fn multi_threaded() {
    let context = LoggingContext::new();
    let (memory, sink) = self::test_utils::memory_sink();
    context.configure(
        ConfigureOptions::with_level(Level::Debug)
            .format("%(threadName)s %(name)s %(message)s")
            .handlers(vec![sink]),
    );

    let handles: Vec<_> = (0..NO_OF_THREADS)
        .map(|i| {
            let context = context.clone();
            thread::Builder::new()
                .name(format!("thread-{i}"))
                .spawn(move || {
                    // all threads race for the same shared logger, and use one of their own
                    let shared = context.get_logger("shared", None);
                    let own = context.get_logger(&format!("worker.{i}"), None);
                    for n in 0..NO_OF_LOGLINES_PER_THREAD {
                        if n % 2 == 0 {
                            shared.debug(format!("{n}"));
                        } else {
                            own.info(format!("{n}"));
                        }
                    }
                    shared
                })
                .unwrap_or_else(|e| panic!("Cannot spawn thread: {e}"))
        })
        .collect();

    let loggers: Vec<_> = handles
        .into_iter()
        .map(|h| h.join().unwrap_or_else(|_| panic!("Worker thread panicked")))
        .collect();
    assert!(loggers.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    assert_eq!(context.registry().names().len(), NO_OF_THREADS + 1);

    let lines = memory.lines();
    assert_eq!(lines.len(), NO_OF_THREADS * NO_OF_LOGLINES_PER_THREAD);
    for i in 0..NO_OF_THREADS {
        let thread_name = format!("thread-{i} ");
        assert_eq!(
            lines.iter().filter(|l| l.starts_with(&thread_name)).count(),
            NO_OF_LOGLINES_PER_THREAD
        );
    }
    assert_eq!(
        lines.iter().filter(|l| l.contains(" shared ")).count(),
        NO_OF_THREADS * NO_OF_LOGLINES_PER_THREAD / 2
    );
}
