// src/math_utils.rs
use statrs::function::erf;
use std::f64::consts::SQRT_2;
use std::fmt;
use std::time::Duration;

pub fn norm_cdf(x: f64) -> f64 {
    0.5 * (1.0 + erf::erf(x / SQRT_2))
}

pub struct Timer {
    start_time: std::time::Instant,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    pub fn new() -> Timer {
        Timer {
            start_time: std::time::Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

/// Start/stop notifications emitted by [`timed`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimerEvent<'a> {
    Started { name: &'a str },
    Finished { name: &'a str, elapsed: Duration },
}

impl fmt::Display for TimerEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimerEvent::Started { name } => write!(f, "Timer {} started", name),
            TimerEvent::Finished { name, elapsed } => write!(
                f,
                "Timer {} finished: {:.3} ms",
                name,
                elapsed.as_secs_f64() * 1000.0
            ),
        }
    }
}

/// Run `f` between explicit start/stop timestamps
///
/// `report` receives a `Started` event before `f` runs and a `Finished`
/// event after it returns. The measured duration is returned alongside the
/// result of `f`.
pub fn timed<T, F, R>(name: &str, mut report: R, f: F) -> (T, Duration)
where
    F: FnOnce() -> T,
    R: FnMut(TimerEvent<'_>),
{
    report(TimerEvent::Started { name });
    let timer = Timer::new();
    let out = f();
    let elapsed = timer.elapsed();
    report(TimerEvent::Finished { name, elapsed });
    (out, elapsed)
}

/// Reporter that prints timer events to stdout
pub fn print_timer_event(event: TimerEvent<'_>) {
    println!("{}", event);
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_norm_cdf_reference_points() {
        assert_abs_diff_eq!(norm_cdf(0.0), 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(norm_cdf(1.96), 0.975, epsilon = 1e-4);
        assert_abs_diff_eq!(norm_cdf(-1.96), 0.025, epsilon = 1e-4);
    }

    #[test]
    fn test_timer_measures_wall_clock() {
        let timer = Timer::new();
        std::thread::sleep(Duration::from_millis(5));
        assert!(timer.elapsed() >= Duration::from_millis(5));
    }

    #[test]
    fn test_timed_duration_covers_closure() {
        let (_, elapsed) = timed("sleep", |_| {}, || {
            std::thread::sleep(Duration::from_millis(5))
        });
        assert!(elapsed >= Duration::from_millis(5));
    }

    #[test]
    fn test_timed_reports_both_events() {
        let mut events = Vec::new();
        let (value, elapsed) = timed("work", |e| events.push(e.to_string()), || 21 * 2);

        assert_eq!(value, 42);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], "Timer work started");
        assert!(events[1].starts_with("Timer work finished: "));
        assert!(events[1].ends_with(" ms"));
        assert!(elapsed >= Duration::ZERO);
    }

    #[test]
    fn test_finished_event_format() {
        let event = TimerEvent::Finished {
            name: "serial",
            elapsed: Duration::from_micros(1_500),
        };
        assert_eq!(event.to_string(), "Timer serial finished: 1.500 ms");
    }
}
