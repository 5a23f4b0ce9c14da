//! Fake providers and fixtures for engine tests

use catsync_core::catalog::{Catalog, Message};
use catsync_provider::{ProviderError, ProviderResult, TranslationProvider};
use serde_json::{Map, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

type Respond = dyn Fn(&str, &Catalog) -> ProviderResult<String> + Send + Sync;

/// Provider answering through a closure and recording every call
pub(crate) struct FakeProvider {
    respond: Box<Respond>,
    calls: Mutex<Vec<(String, Catalog)>>,
}

impl FakeProvider {
    pub(crate) fn new(
        respond: impl Fn(&str, &Catalog) -> ProviderResult<String> + Send + Sync + 'static,
    ) -> Self {
        Self {
            respond: Box::new(respond),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Translates every value to upper case
    pub(crate) fn uppercase() -> Self {
        Self::new(|_, chunk| Ok(uppercase_json(chunk)))
    }

    /// Fails every call for `locale_name`, upper-cases the rest
    pub(crate) fn failing_for(locale_name: &'static str) -> Self {
        Self::new(move |name, chunk| {
            if name == locale_name {
                Err(ProviderError::Other("service unavailable".to_string()))
            } else {
                Ok(uppercase_json(chunk))
            }
        })
    }

    pub(crate) fn calls(&self) -> Vec<(String, Catalog)> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn sent_keys(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .flat_map(|(_, chunk)| chunk.into_keys())
            .collect()
    }
}

impl TranslationProvider for FakeProvider {
    async fn translate(
        &self,
        chunk: &Catalog,
        target_locale_name: &str,
        _system_instructions: &str,
    ) -> ProviderResult<String> {
        self.calls
            .lock()
            .unwrap()
            .push((target_locale_name.to_string(), chunk.clone()));
        (self.respond)(target_locale_name, chunk)
    }
}

/// Provider that sleeps before answering, tracking peak concurrency
#[derive(Default)]
pub(crate) struct SlowProvider {
    pub(crate) delay: Duration,
    in_flight: AtomicUsize,
    pub(crate) peak: AtomicUsize,
}

impl SlowProvider {
    pub(crate) fn new(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }
}

impl TranslationProvider for SlowProvider {
    async fn translate(
        &self,
        chunk: &Catalog,
        _target_locale_name: &str,
        _system_instructions: &str,
    ) -> ProviderResult<String> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(uppercase_json(chunk))
    }
}

/// Render a chunk as the JSON object a well-behaved provider would return
pub(crate) fn uppercase_json(chunk: &Catalog) -> String {
    let object: Map<String, Value> = chunk
        .iter()
        .map(|(key, message)| {
            let value = match message {
                Message::Text(text) => Value::String(text.to_uppercase()),
                Message::Plural(forms) => Value::Object(
                    forms
                        .iter()
                        .map(|(k, v)| (k.clone(), Value::String(v.to_uppercase())))
                        .collect(),
                ),
            };
            (key.clone(), value)
        })
        .collect();
    format!("Sure! Here you go:\n{}\n", Value::Object(object))
}
