use crate::cancellation::CancellationToken;

/// Cancels `token` when the process receives SIGINT or SIGTERM.
pub fn initialize(token: CancellationToken) -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(move || {
        token.cancel();
    })
}
