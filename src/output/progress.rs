use console::style;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Spinner shown on stderr while a command talks to the server.
pub struct FetchProgress {
    pb: ProgressBar,
}

impl FetchProgress {
    pub fn start(message: &str) -> Self {
        Self {
            pb: create_spinner(style(message).bright().yellow().to_string()),
        }
    }

    pub fn finish_ok(self, message: &str) {
        self.pb
            .finish_with_message(style(format!("{message} ✓")).green().to_string());
    }

    pub fn finish_failed(self, message: &str) {
        self.pb
            .finish_with_message(style(format!("{message} ✗")).red().to_string());
    }
}

fn create_spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_draw_target(ProgressDrawTarget::stderr());
    if let Ok(style) = ProgressStyle::default_spinner().template("  {msg} {spinner}") {
        pb.set_style(style);
    }
    pb.set_message(message);
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}
