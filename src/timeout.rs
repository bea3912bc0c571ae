use crate::cancellation::CancellationToken;
use core::time;
use std::io;
use std::thread;
use std::time::{Duration, Instant};

/// Spawns a watchdog thread cancelling `token` once `max_duration` has elapsed.
pub fn initialize_timeout(token: CancellationToken, max_duration: Duration) -> io::Result<()> {
    let start_time = Instant::now();
    thread::Builder::new()
        .name("timeout".into())
        .spawn(move || loop {
            thread::sleep(time::Duration::from_millis(10));
            if start_time.elapsed() > max_duration {
                token.cancel();
                break;
            }
        })
        .map(|_| ())
}
