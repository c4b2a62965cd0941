//! Live earnings display.
//!
//! Renders runner updates as plain text. The running total is redrawn in place
//! with a carriage return; any other output first ends that line.

use std::io::{self, Write};
use std::time::Duration;

use rust_decimal::Decimal;
use tokio::time::Instant;

use super::status_bar::StatusBar;
use crate::console::HELP;
use crate::runner::{Snapshot, Update};

pub struct Renderer<W: Write> {
    out: W,
    status: StatusBar,
    /// The cursor sits at the end of the running-total line.
    counter_open: bool,
}

impl<W: Write> Renderer<W> {
    pub fn new(
        out: W,
        notice_ttl: Duration,
    ) -> Self {
        Self {
            out,
            status: StatusBar::new(notice_ttl),
            counter_open: false,
        }
    }

    pub fn status(&self) -> &StatusBar {
        &self.status
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn render(
        &mut self,
        update: &Update,
        now: Instant,
    ) -> io::Result<()> {
        match update {
            Update::FormChanged { field, value } => {
                self.line(&format!("{field}: {value}"))?;
            }
            Update::Started {
                heading,
                per_second_rate,
                start_time,
            } => {
                self.status.dismiss();
                self.line(heading)?;
                self.line(&format!(
                    "Rate: ${per_second_rate:.4}/s   Start Time: {start_time}"
                ))?;
                self.counter(Decimal::ZERO)?;
            }
            Update::Tick { accumulated } => self.counter(*accumulated)?,
            Update::Stopped {
                accumulated,
                start_time,
                end_time,
            } => {
                self.counter(*accumulated)?;
                self.line(&format!(
                    "Start Time: {start_time}   End Time: {end_time}"
                ))?;
            }
            Update::Cleared => {
                self.status.dismiss();
                self.line("Cleared.")?;
            }
            Update::Rejected(error) => self.notice(&error.to_string(), now)?,
            Update::Refused(error) => self.notice(&error.to_string(), now)?,
            Update::Unrecognized(message) => self.notice(message, now)?,
            Update::Dismissed => self.status.dismiss(),
            Update::Snapshot(snapshot) => self.snapshot(snapshot, now)?,
            Update::Help => self.line(HELP)?,
            Update::Closed => self.line("Bye.")?,
        }
        self.out.flush()
    }

    /// Drops an expired notice.
    pub fn expire(
        &mut self,
        now: Instant,
    ) {
        if self.status.expire(now) {
            tracing::debug!("notice dismissed");
        }
    }

    fn notice(
        &mut self,
        message: &str,
        now: Instant,
    ) -> io::Result<()> {
        self.status.show(message, now);
        self.line(&format!("! {message}"))
    }

    fn snapshot(
        &mut self,
        snapshot: &Snapshot,
        now: Instant,
    ) -> io::Result<()> {
        self.end_counter()?;
        write!(self.out, "{}", snapshot.form)?;
        writeln!(self.out, "Phase:      {}", snapshot.phase)?;
        if let Some(heading) = &snapshot.heading {
            writeln!(self.out, "{heading}")?;
        }
        if let Some(rate) = snapshot.per_second_rate {
            writeln!(self.out, "Rate:       ${rate:.4}/s")?;
        }
        writeln!(self.out, "Earned:     ${:.4}", snapshot.accumulated)?;
        writeln!(self.out, "Start Time: {}", snapshot.start_time)?;
        writeln!(self.out, "End Time:   {}", snapshot.end_time)?;
        if let Some(message) = self.status.current(now) {
            writeln!(self.out, "Notice:     {message}")?;
        }
        Ok(())
    }

    fn counter(
        &mut self,
        amount: Decimal,
    ) -> io::Result<()> {
        write!(self.out, "\r${amount:.4}")?;
        self.counter_open = true;
        Ok(())
    }

    fn end_counter(&mut self) -> io::Result<()> {
        if self.counter_open {
            writeln!(self.out)?;
            self.counter_open = false;
        }
        Ok(())
    }

    fn line(
        &mut self,
        text: &str,
    ) -> io::Result<()> {
        self.end_counter()?;
        writeln!(self.out, "{text}")
    }
}
