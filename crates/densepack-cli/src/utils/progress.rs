use densepack::engine::progress::{Progress, ProgressCallback};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressState, ProgressStyle};
use std::fmt::Write;
use std::time::Duration;

const SPINNER_TICK: Duration = Duration::from_millis(80);
const SPINNER_TEMPLATE: &str = "{spinner:.green} {prefix:.bold} {msg}";
const BAR_TEMPLATE: &str =
    "{prefix:.bold} [{bar:40.cyan/blue}] {pos}/{len} steps  {msg}  ({elapsed_precise}, {eta})";

/// Terminal front end for engine progress events.
///
/// Phases show as a spinner labelled with the phase name. The bisection shows as a bar with
/// one step per halving and the current scale bracket as its message.
#[derive(Clone)]
pub struct CliProgressHandler {
    pb: ProgressBar,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        Self::with_draw_target(ProgressDrawTarget::stderr())
    }

    fn with_draw_target(target: ProgressDrawTarget) -> Self {
        let pb = ProgressBar::with_draw_target(Some(0), target).with_style(spinner_style());
        pb.finish_and_clear();
        Self { pb }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let pb = self.pb.clone();
        Box::new(move |progress: Progress| apply(&pb, progress))
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}

fn apply(pb: &ProgressBar, progress: Progress) {
    match progress {
        Progress::PhaseStart { name } => {
            pb.reset();
            pb.set_length(0);
            pb.set_style(spinner_style());
            pb.set_prefix(name);
            pb.set_message("");
            pb.enable_steady_tick(SPINNER_TICK);
        }
        Progress::PhaseFinish => {
            pb.disable_steady_tick();
            pb.finish_with_message("✓ Done");
        }
        Progress::TaskStart { total_steps } => {
            pb.disable_steady_tick();
            pb.reset();
            pb.set_length(total_steps);
            pb.set_style(bar_style());
        }
        Progress::TaskIncrement => pb.inc(1),
        Progress::TaskFinish => {
            if let Some(length) = pb.length() {
                pb.set_position(length);
            }
            pb.finish();
        }
        Progress::BracketUpdate { lower, upper } => {
            pb.set_message(bracket_message(lower, upper));
        }
        Progress::Message(msg) => {
            if pb.is_finished() {
                pb.set_message(msg);
            } else {
                pb.println(format!("  {msg}"));
            }
        }
    }
}

fn bracket_message(lower: f64, upper: f64) -> String {
    format!("a ∈ [{lower:.5}, {upper:.5}]  Δ {:.1e}", upper - lower)
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template(SPINNER_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template(BAR_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .with_key("eta", |state: &ProgressState, w: &mut dyn Write| {
            let _ = write!(w, "{:.1}s left", state.eta().as_secs_f64());
        })
        .progress_chars("=> ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn hidden_handler() -> CliProgressHandler {
        CliProgressHandler::with_draw_target(ProgressDrawTarget::hidden())
    }

    #[test]
    fn templates_are_valid() {
        assert!(ProgressStyle::with_template(SPINNER_TEMPLATE).is_ok());
        assert!(ProgressStyle::with_template(BAR_TEMPLATE).is_ok());
    }

    #[test]
    fn handler_starts_finished_and_empty() {
        let handler = hidden_handler();
        assert_eq!(handler.pb.length(), Some(0));
        assert!(handler.pb.is_finished());
    }

    #[test]
    fn bisection_events_drive_the_bar() {
        let handler = hidden_handler();
        let callback = handler.get_callback();
        let pb = &handler.pb;

        callback(Progress::PhaseStart {
            name: "Scale Bisection",
        });
        assert_eq!(pb.prefix(), "Scale Bisection");
        assert!(!pb.is_finished());

        callback(Progress::TaskStart { total_steps: 14 });
        assert_eq!(pb.length(), Some(14));
        assert_eq!(pb.position(), 0);

        callback(Progress::BracketUpdate {
            lower: 1.0,
            upper: 8.0,
        });
        callback(Progress::TaskIncrement);
        assert_eq!(pb.position(), 1);
        assert_eq!(pb.message(), "a ∈ [1.00000, 8.00000]  Δ 7.0e0");

        callback(Progress::TaskFinish);
        assert!(pb.is_finished());
        assert_eq!(pb.position(), 14);

        callback(Progress::PhaseFinish);
        assert_eq!(pb.message(), "✓ Done");
    }

    #[test]
    fn message_after_finish_replaces_status() {
        let handler = hidden_handler();
        let callback = handler.get_callback();

        callback(Progress::Message("No overlap-free scale found".to_string()));
        assert_eq!(handler.pb.message(), "No overlap-free scale found");
    }

    #[test]
    fn callback_is_usable_from_another_thread() {
        let handler = hidden_handler();
        let callback = handler.get_callback();

        thread::spawn(move || {
            callback(Progress::PhaseStart {
                name: "Validation",
            });
            callback(Progress::PhaseFinish);
        })
        .join()
        .unwrap();

        assert!(handler.pb.is_finished());
        assert_eq!(handler.pb.message(), "✓ Done");
    }
}
