//! source of the receipt time of notifications. Swappable so tests can pin the
//! index bucket a notification lands in.
use chrono::{DateTime, FixedOffset, Local, SecondsFormat};

/// Clock abstraction returning the current instant together with its utc offset
pub trait Clock: Send + Sync + std::fmt::Debug {
	fn now(&self) -> DateTime<FixedOffset>;
}

/// wall clock in the local timezone of the host
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
	fn now(&self) -> DateTime<FixedOffset> {
		let now = Local::now();
		now.with_timezone(now.offset())
	}
}

/// clock that is stuck at a single instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<FixedOffset>);

impl Clock for FixedClock {
	fn now(&self) -> DateTime<FixedOffset> {
		self.0
	}
}

/// RFC3339 with whole seconds and a numeric offset, e.g. `2017-02-02T19:37:22+01:00`
pub fn format_timestamp(instant: &DateTime<FixedOffset>) -> String {
	instant.to_rfc3339_opts(SecondsFormat::Secs, false)
}
