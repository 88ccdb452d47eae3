use std::fs::File;
use std::io;
use std::sync::Arc;

use riddari_cecp::driver::{Driver, DriverOptions};
use riddari_cecp::input::StdinSource;
use riddari_engine::Engine;

// Ensures a panic anywhere exits the process, rather than leaving the
// interface waiting forever on a silent pipe.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        original_hook(panic_info);
        std::process::exit(1);
    }));
}

// Diagnostics must stay off stdout (the protocol channel) and stderr (the
// protocol forbids it). Set RIDDARI_LOG to a path to collect them in a file;
// without it they are dropped.
fn init_logging() {
    let Ok(path) = std::env::var("RIDDARI_LOG") else {
        return;
    };
    let Ok(file) = File::create(&path) else {
        return;
    };

    tracing_subscriber::fmt()
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .init();
}

fn main() {
    install_panic_hook();
    init_logging();

    let mut driver = Driver::new(
        Engine::new(),
        StdinSource,
        io::stdout(),
        DriverOptions::default(),
    );
    driver.run();
}
