//! agenda-checkin main entrypoint.

use agenda_checkin::run;
use agenda_checkin::ui::messages::error;

fn main() {
    if let Err(e) = run() {
        error(format!("Error: {}", e));
        if e.is_retryable() {
            eprintln!("(transient failure: the command can be retried safely)");
        }
        std::process::exit(1);
    }
}
