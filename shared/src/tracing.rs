use std::{panic, thread};
use time::macros::format_description;
use tracing_subscriber::fmt::time::UtcTime;

/// Initializes the tracing subscriber that is shared between the binaries.
/// `env_filter` has similar syntax to env_logger. It is documented at
/// https://docs.rs/tracing-subscriber/latest/tracing_subscriber/filter/struct.EnvFilter.html
pub fn initialize(env_filter: &str) {
    // Log collectors use this timestamp format to separate multi line log
    // messages.
    tracing_subscriber::fmt()
        .with_timer(UtcTime::new(format_description!(
            "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z"
        )))
        .with_env_filter(env_filter)
        .with_ansi(atty::is(atty::Stream::Stdout))
        .init();

    set_panic_hook();
}

// Sets a panic hook so panic information is logged in addition to the default
// panic printer.
fn set_panic_hook() {
    let default_hook = panic::take_hook();
    let hook = move |info: &panic::PanicInfo| {
        let thread = thread::current();
        let thread_name = thread.name().unwrap_or("<unnamed>");
        // Printing a full backtrace from a custom hook is not possible on
        // stable rust so we chain into the default handler which does.
        tracing::error!("thread '{}' {}:", thread_name, info);
        default_hook(info);
    };
    panic::set_hook(Box::new(hook));
}
