//! Submission counters, rendered in Prometheus text exposition format.

use std::sync::atomic::{AtomicU64, Ordering};

/// The forms this server accepts. Doubles as the rate-limit key prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Form {
    Contact,
    Careers,
}

impl Form {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Contact => "contact",
            Self::Careers => "careers",
        }
    }
}

#[derive(Default)]
struct FormCounters {
    accepted: AtomicU64,
    rejected: AtomicU64,
    throttled: AtomicU64,
    delivery_failed: AtomicU64,
}

/// Per-form counters. All methods are lock-free.
#[derive(Default)]
pub struct Metrics {
    contact: FormCounters,
    careers: FormCounters,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    fn form(&self, form: Form) -> &FormCounters {
        match form {
            Form::Contact => &self.contact,
            Form::Careers => &self.careers,
        }
    }

    /// Submission validated, notification dispatched.
    pub fn record_accepted(&self, form: Form) {
        self.form(form).accepted.fetch_add(1, Ordering::Relaxed);
    }

    /// Submission failed validation.
    pub fn record_rejected(&self, form: Form) {
        self.form(form).rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Submission denied by the rate limiter.
    pub fn record_throttled(&self, form: Form) {
        self.form(form).throttled.fetch_add(1, Ordering::Relaxed);
    }

    /// Mail API refused or was unreachable.
    pub fn record_delivery_failure(&self, form: Form) {
        self.form(form).delivery_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Renders all counters plus server gauges as Prometheus text.
    pub fn render(&self, uptime_secs: u64, tracked_keys: usize) -> String {
        let mut out = String::with_capacity(1024);

        self.counter(
            &mut out,
            "formgate_submissions_accepted_total",
            "Submissions validated and dispatched",
            |c| &c.accepted,
        );
        self.counter(
            &mut out,
            "formgate_submissions_rejected_total",
            "Submissions that failed validation",
            |c| &c.rejected,
        );
        self.counter(
            &mut out,
            "formgate_submissions_throttled_total",
            "Submissions denied by the rate limiter",
            |c| &c.throttled,
        );
        self.counter(
            &mut out,
            "formgate_delivery_failures_total",
            "Notifications the mail API did not accept",
            |c| &c.delivery_failed,
        );

        out.push_str("# HELP formgate_rate_limit_tracked_keys Rate-limit table size\n");
        out.push_str("# TYPE formgate_rate_limit_tracked_keys gauge\n");
        out.push_str(&format!("formgate_rate_limit_tracked_keys {tracked_keys}\n"));

        out.push_str("# HELP formgate_uptime_seconds Server uptime\n");
        out.push_str("# TYPE formgate_uptime_seconds gauge\n");
        out.push_str(&format!("formgate_uptime_seconds {uptime_secs}\n"));

        out
    }

    fn counter<'a>(
        &'a self,
        out: &mut String,
        name: &str,
        help: &str,
        pick: impl Fn(&'a FormCounters) -> &'a AtomicU64,
    ) {
        out.push_str(&format!("# HELP {name} {help}\n# TYPE {name} counter\n"));
        for form in [Form::Contact, Form::Careers] {
            let value = pick(self.form(form)).load(Ordering::Relaxed);
            out.push_str(&format!("{name}{{form=\"{}\"}} {value}\n", form.as_str()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_includes_all_series() {
        let metrics = Metrics::new();
        metrics.record_accepted(Form::Contact);
        metrics.record_accepted(Form::Contact);
        metrics.record_throttled(Form::Careers);

        let text = metrics.render(42, 3);
        assert!(text.contains("formgate_submissions_accepted_total{form=\"contact\"} 2"));
        assert!(text.contains("formgate_submissions_accepted_total{form=\"careers\"} 0"));
        assert!(text.contains("formgate_submissions_throttled_total{form=\"careers\"} 1"));
        assert!(text.contains("formgate_rate_limit_tracked_keys 3"));
        assert!(text.contains("formgate_uptime_seconds 42"));
    }
}
