use std::cell::RefCell;

use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Record};
use tracing::{Event, Id, Level, Metadata, Subscriber};

use crate::table::{Cell, Recording, Table};

thread_local! {
    static RECORDING: RefCell<Recording> = RefCell::default();
}

/// Collects events into per-target tables on the emitting thread.
///
/// Each event becomes one row of the table named after its `target`, and
/// each field one column. Spans are ignored.
#[derive(Debug, Clone, Copy)]
pub struct TableSubscriber {
    max_level: Level,
}

impl Default for TableSubscriber {
    fn default() -> Self {
        Self {
            max_level: Level::INFO,
        }
    }
}

impl TableSubscriber {
    /// Also record events up to `max_level` (e.g. `Level::DEBUG`).
    pub fn with_max_level(max_level: Level) -> Self {
        Self { max_level }
    }
}

struct RowVisitor<'a> {
    table: &'a mut Table,
}

impl Visit for RowVisitor<'_> {
    fn record_u64(&mut self, field: &Field, value: u64) {
        self.table.push(field.name(), Cell::U64(value));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.table.push(field.name(), Cell::I64(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.table.push(field.name(), Cell::F64(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.table.push(field.name(), Cell::Bool(value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.table.push(field.name(), Cell::Str(value.to_string()));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.table.push(field.name(), Cell::Str(format!("{value:?}")));
    }
}

impl Subscriber for TableSubscriber {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.is_event() && *metadata.level() <= self.max_level
    }

    fn new_span(&self, _span: &Attributes<'_>) -> Id {
        Id::from_u64(1)
    }

    fn record(&self, _span: &Id, _values: &Record<'_>) {}

    fn record_follows_from(&self, _span: &Id, _follows: &Id) {}

    fn event(&self, event: &Event<'_>) {
        let target = event.metadata().target();
        RECORDING.with(|r| {
            let mut recording = r.borrow_mut();
            let table = recording.table_mut(target);
            event.record(&mut RowVisitor { table: &mut *table });
            table.end_row();
        });
    }

    fn enter(&self, _span: &Id) {}

    fn exit(&self, _span: &Id) {}
}

/// Install a [`TableSubscriber`] as the global default. Later calls are
/// no-ops, so every test can call this.
pub fn install() {
    let _ = tracing::subscriber::set_global_default(TableSubscriber::default());
}

/// Take everything recorded on this thread, leaving it empty.
pub fn drain() -> Recording {
    RECORDING.with(|r| std::mem::take(&mut *r.borrow_mut()))
}

/// Discard everything recorded on this thread.
pub fn clear() {
    RECORDING.with(|r| *r.borrow_mut() = Recording::default());
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::subscriber::with_default;

    #[test]
    fn events_become_rows_per_target() {
        clear();
        with_default(TableSubscriber::default(), || {
            tracing::info!(target: "year", year = 1u64, population = 1000u64, morale = 48.5);
            tracing::info!(target: "year", year = 2u64, population = 1012u64, morale = 49.1);
            tracing::info!(target: "extinction", year = 3u64);
        });

        let recording = drain();
        let years = recording.table("year").expect("year table");
        assert_eq!(years.rows(), 2);
        assert_eq!(
            years.column("population").unwrap().as_u64(),
            Some(&[1000, 1012][..])
        );
        assert_eq!(
            years.column("morale").unwrap().as_f64(),
            Some(&[48.5, 49.1][..])
        );
        assert_eq!(recording.table("extinction").unwrap().rows(), 1);
    }

    #[test]
    fn debug_events_filtered_by_default() {
        clear();
        with_default(TableSubscriber::default(), || {
            tracing::debug!(target: "noise", value = 1u64);
        });
        assert!(drain().table("noise").is_none());

        with_default(TableSubscriber::with_max_level(Level::DEBUG), || {
            tracing::debug!(target: "noise", value = 1u64);
        });
        assert_eq!(drain().table("noise").unwrap().rows(), 1);
    }

    #[test]
    fn messages_are_recorded_as_strings() {
        clear();
        with_default(TableSubscriber::default(), || {
            tracing::warn!(target: "lever", tax_rate = 1.4, "policy lever outside [0, 1]");
        });
        let recording = drain();
        let table = recording.table("lever").unwrap();
        let message = table.column("message").unwrap().as_str().unwrap();
        assert_eq!(message[0], "policy lever outside [0, 1]");
    }
}
