//! Storyboard Studio: turns a short idea or a pasted script into a sequence
//! of captioned stock images, with optional narration.
//!
//! The library holds the pipeline (script generation, partitioning, image
//! resolution) and the HTTP surface so both binaries and the integration
//! tests share one implementation.

pub mod api;
pub mod aspect;
pub mod config;
pub mod error;
pub mod narration;
pub mod partition;
pub mod router;
pub mod routes;
pub mod script;
pub mod state;
pub mod storyboard;

/// Emit `message` at the level the tag implies, keeping the tag as a field.
pub(crate) fn logv(tag: &str, message: &str) {
    match tag {
        "WARN" => tracing::warn!(tag, "{message}"),
        _ => tracing::info!(tag, "{message}"),
    }
}

pub(crate) fn logi(message: impl AsRef<str>) {
    logv("INFO", message.as_ref());
}

pub(crate) fn logok(message: impl AsRef<str>) {
    logv("OK", message.as_ref());
}

pub(crate) fn logw(message: impl AsRef<str>) {
    logv("WARN", message.as_ref());
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tracing::field::{Field, Visit};
    use tracing_subscriber::Layer;
    use tracing_subscriber::layer::{Context, SubscriberExt};

    type Captured = Arc<Mutex<Vec<(tracing::Level, Vec<(String, String)>)>>>;

    #[derive(Default)]
    struct Fields(Vec<(String, String)>);

    impl Visit for Fields {
        fn record_str(&mut self, field: &Field, value: &str) {
            self.0.push((field.name().to_string(), value.to_string()));
        }

        fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
            self.0.push((field.name().to_string(), format!("{value:?}")));
        }
    }

    struct Capture(Captured);

    impl<S: tracing::Subscriber> Layer<S> for Capture {
        fn on_event(&self, event: &tracing::Event<'_>, _: Context<'_, S>) {
            let mut fields = Fields::default();
            event.record(&mut fields);
            self.0
                .lock()
                .unwrap()
                .push((*event.metadata().level(), fields.0));
        }
    }

    #[test]
    fn tag_is_a_field_and_message_is_untouched() {
        let events: Captured = Arc::default();
        let subscriber = tracing_subscriber::registry().with(Capture(events.clone()));

        tracing::subscriber::with_default(subscriber, || {
            logw("Part 2 skipped");
            logok("Resolved 3/3 images");
        });

        let events = events.lock().unwrap();
        assert_eq!(events.len(), 2);

        let (level, fields) = &events[0];
        assert_eq!(*level, tracing::Level::WARN);
        assert!(fields.contains(&("tag".to_string(), "WARN".to_string())));
        assert!(fields.contains(&("message".to_string(), "Part 2 skipped".to_string())));

        let (level, fields) = &events[1];
        assert_eq!(*level, tracing::Level::INFO);
        assert!(fields.contains(&("tag".to_string(), "OK".to_string())));
        assert!(fields.contains(&("message".to_string(), "Resolved 3/3 images".to_string())));
    }
}
