//! Log line format for maze sessions.
//!
//! Every line is prefixed with the wall-clock time, the number of the maze session that has run
//! since startup and the tick within that session, so traces from consecutive mazes stay apart:
//!
//! ```text
//! 12:34:56.50000 #02 t000017 DEBUG mazecast::game: Pause toggled state="paused"
//! ```

use std::fmt;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use time::format_description::FormatItem;
use time::macros::format_description;
use time::OffsetDateTime;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

const TIMESTAMP_FORMAT: &[FormatItem<'static>] = format_description!("[hour]:[minute]:[second].[subsecond digits:5]");

/// Ticks wrap in the prefix after six decimal digits.
const TICK_DISPLAY_MODULUS: u64 = 1_000_000;

const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";

static CLOCK: SessionClock = SessionClock::new();

/// Session number and tick shown in the log prefix.
#[derive(Debug)]
pub struct SessionClock {
    session: AtomicU32,
    tick: AtomicU64,
}

impl SessionClock {
    pub const fn new() -> Self {
        Self {
            session: AtomicU32::new(0),
            tick: AtomicU64::new(0),
        }
    }

    /// Moves to the next session and restarts its tick count. Returns the new session number.
    pub fn begin_session(&self) -> u32 {
        self.tick.store(0, Ordering::Relaxed);
        self.session.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn advance_tick(&self) {
        self.tick.fetch_add(1, Ordering::Relaxed);
    }

    /// Current session number and tick.
    pub fn read(&self) -> (u32, u64) {
        (self.session.load(Ordering::Relaxed), self.tick.load(Ordering::Relaxed))
    }
}

impl Default for SessionClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Starts a new session on the global clock. Called when a maze is entered.
pub fn begin_session() -> u32 {
    CLOCK.begin_session()
}

/// Called once per running session tick.
pub fn advance_tick() {
    CLOCK.advance_tick();
}

/// Event formatter writing the session prefix, the level, the target and the event fields.
pub struct SessionFormatter;

impl<S, N> FormatEvent<S, N> for SessionFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(&self, ctx: &FmtContext<'_, S, N>, mut writer: Writer<'_>, event: &Event<'_>) -> fmt::Result {
        let meta = event.metadata();
        let (session, tick) = CLOCK.read();

        write_prefix(&mut writer, OffsetDateTime::now_utc(), session, tick, meta.level())?;
        paint(&mut writer, DIM, format_args!("{}:", meta.target()))?;
        writer.write_char(' ')?;
        ctx.format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Writes `time #session tick LEVEL ` with the level right-aligned to five columns.
fn write_prefix(writer: &mut Writer<'_>, now: OffsetDateTime, session: u32, tick: u64, level: &Level) -> fmt::Result {
    let timestamp = now.format(&TIMESTAMP_FORMAT).map_err(|_| fmt::Error)?;
    paint(writer, DIM, timestamp)?;
    paint(
        writer,
        DIM,
        format_args!(" #{:02} t{:06} ", session, tick % TICK_DISPLAY_MODULUS),
    )?;
    paint(writer, level_color(level), format_args!("{:>5}", level.as_str()))?;
    writer.write_char(' ')
}

fn level_color(level: &Level) -> &'static str {
    match *level {
        Level::TRACE => "\x1b[35m",
        Level::DEBUG => "\x1b[34m",
        Level::INFO => "\x1b[32m",
        Level::WARN => "\x1b[33m",
        Level::ERROR => "\x1b[31m",
    }
}

/// Writes `text` wrapped in `style` when the writer supports ANSI escapes.
fn paint(writer: &mut Writer<'_>, style: &str, text: impl fmt::Display) -> fmt::Result {
    if writer.has_ansi_escapes() {
        write!(writer, "{style}{text}{RESET}")
    } else {
        write!(writer, "{text}")
    }
}
