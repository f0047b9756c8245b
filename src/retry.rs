// retry.rs

use std::{fmt::Display, thread, time::Instant};

use log::*;

use crate::*;

#[derive(Debug, thiserror::Error)]
#[error("{what} not ready after {waited:?}")]
pub struct TimedOut {
    pub what: String,
    pub waited: Duration,
}

/// Run `op` up to `attempts` times, sleeping `pause` between failures.
///
/// `op` gets the 1-based attempt number. The last error is returned as is.
pub fn retry<T, E, F>(what: &str, attempts: u32, pause: Duration, mut op: F) -> Result<T, E>
where
    E: Display,
    F: FnMut(u32) -> Result<T, E>,
{
    let attempts = attempts.max(1);
    let mut attempt = 1;
    loop {
        match op(attempt) {
            Ok(v) => return Ok(v),
            Err(e) if attempt < attempts => {
                warn!("{what} failed (attempt {attempt}/{attempts}): {e:#}");
                attempt += 1;
                thread::sleep(pause);
            }
            Err(e) => {
                error!("{what} failed after {attempts} attempts: {e:#}");
                return Err(e);
            }
        }
    }
}

/// Poll `ready` every `poll` until it says yes, or fail with [`TimedOut`].
///
/// Returns how long the wait took.
pub fn wait_until<F>(what: &str, poll: Duration, timeout: Duration, mut ready: F) -> anyhow::Result<Duration>
where
    F: FnMut() -> anyhow::Result<bool>,
{
    let start = Instant::now();
    loop {
        if ready()? {
            return Ok(start.elapsed());
        }
        let waited = start.elapsed();
        if waited >= timeout {
            return Err(TimedOut {
                what: what.to_string(),
                waited,
            }
            .into());
        }
        debug!("{what}: waiting...");
        thread::sleep(poll);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retry_stops_at_first_success() {
        let mut calls = vec![];
        let res: Result<u32, String> = retry("op", 5, Duration::ZERO, |n| {
            calls.push(n);
            if n < 3 {
                Err(format!("no luck #{n}"))
            } else {
                Ok(n * 10)
            }
        });
        assert_eq!(res, Ok(30));
        assert_eq!(calls, [1, 2, 3]);
    }

    #[test]
    fn retry_returns_last_error() {
        let mut calls = 0;
        let res: Result<(), String> = retry("op", 3, Duration::ZERO, |n| {
            calls += 1;
            Err(format!("fail #{n}"))
        });
        assert_eq!(res, Err("fail #3".to_string()));
        assert_eq!(calls, 3);
    }

    #[test]
    fn retry_runs_at_least_once() {
        let mut calls = 0;
        let _: Result<(), &str> = retry("op", 0, Duration::ZERO, |_| {
            calls += 1;
            Err("nope")
        });
        assert_eq!(calls, 1);
    }

    #[test]
    fn wait_until_returns_when_ready() {
        let mut polls = 0;
        let waited = wait_until("link", Duration::from_millis(1), Duration::from_secs(5), || {
            polls += 1;
            Ok(polls == 4)
        })
        .unwrap();
        assert_eq!(polls, 4);
        assert!(waited < Duration::from_secs(5));
    }

    #[test]
    fn wait_until_times_out() {
        let timeout = Duration::from_millis(30);
        let err = wait_until("link", Duration::from_millis(5), timeout, || Ok(false)).unwrap_err();
        let timed_out = err.downcast_ref::<TimedOut>().expect("TimedOut error");
        assert_eq!(timed_out.what, "link");
        assert!(timed_out.waited >= timeout);
    }

    #[test]
    fn wait_until_propagates_check_errors() {
        let err = wait_until("link", Duration::ZERO, Duration::from_secs(1), || {
            bail!("driver gone")
        })
        .unwrap_err();
        assert!(err.downcast_ref::<TimedOut>().is_none());
        assert_eq!(err.to_string(), "driver gone");
    }
}

// EOF
