//! Form state store: values, per-field errors, touched flags and the
//! submitting flag, with debounced re-validation while typing.
//!
//! Every validation of a field bumps that field's generation. A debounced
//! validation only applies its result if the generation it was scheduled with
//! is still current, so an immediate blur validation is never overwritten by
//! an older keystroke validation that fires afterwards.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use serde::Serialize;
use tracing::debug;

use crate::contact::rules::FieldName;
use crate::contact::validation::{validate_field, validate_form, ContactFormData, FieldErrors};
use crate::debounce::{Debouncer, DEFAULT_DEBOUNCE};

/// Per-field view for rendering. `error` is only populated once touched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormField {
    pub name: FieldName,
    pub value: String,
    pub error: Option<&'static str>,
    pub touched: bool,
}

#[derive(Debug, Default)]
struct FormInner {
    data: ContactFormData,
    errors: FieldErrors,
    touched: BTreeSet<FieldName>,
    submitting: bool,
    generations: HashMap<FieldName, u64>,
}

impl FormInner {
    fn next_generation(&mut self, field: FieldName) -> u64 {
        let generation = self.generations.entry(field).or_default();
        *generation += 1;
        *generation
    }

    fn generation(&self, field: FieldName) -> u64 {
        self.generations.get(&field).copied().unwrap_or_default()
    }

    fn set_error(&mut self, field: FieldName, error: Option<&'static str>) {
        match error {
            Some(msg) => {
                self.errors.insert(field, msg);
            }
            None => {
                self.errors.remove(&field);
            }
        }
    }
}

/// Cloneable handle; clones share the same state.
#[derive(Clone)]
pub struct ContactForm {
    inner: Arc<Mutex<FormInner>>,
    debouncer: Debouncer<FieldName>,
}

impl Default for ContactForm {
    fn default() -> Self {
        Self::new()
    }
}

impl ContactForm {
    pub fn new() -> Self {
        Self::with_debounce(DEFAULT_DEBOUNCE)
    }

    pub fn with_debounce(delay: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(FormInner::default())),
            debouncer: Debouncer::new(delay),
        }
    }

    /// Stores the new value. Touched fields are re-validated after the
    /// debounce delay; this needs a tokio runtime in that case.
    pub fn handle_field_change(&self, field: FieldName, value: impl Into<String>) {
        let value = value.into();
        let generation = {
            let mut inner = self.lock();
            inner.data.set(field, value.clone());
            if !inner.touched.contains(&field) {
                return;
            }
            inner.next_generation(field)
        };

        let shared = Arc::clone(&self.inner);
        self.debouncer.call(field, move || {
            let mut inner = lock_inner(&shared);
            if inner.generation(field) != generation {
                debug!("discarding stale validation for {field}");
                return;
            }
            let error = validate_field(field, &value);
            inner.set_error(field, error);
        });
    }

    /// Marks the field touched and validates it immediately.
    pub fn handle_field_blur(&self, field: FieldName) {
        self.debouncer.cancel(&field);
        let mut inner = self.lock();
        inner.touched.insert(field);
        inner.next_generation(field);
        let error = validate_field(field, inner.data.get(field));
        inner.set_error(field, error);
    }

    /// Validates every field, marks all of them touched and reports whether
    /// the form is free of errors.
    pub fn validate_entire_form(&self) -> bool {
        self.debouncer.cancel_all();
        let mut inner = self.lock();
        for field in FieldName::ALL {
            inner.next_generation(field);
            inner.touched.insert(field);
        }
        let errors = validate_form(&inner.data);
        inner.errors = errors;
        inner.errors.is_empty()
    }

    /// Back to the initial empty state. Pending validations are dropped.
    pub fn reset(&self) {
        self.debouncer.cancel_all();
        let mut inner = self.lock();
        for field in FieldName::ALL {
            inner.next_generation(field);
        }
        inner.data = ContactFormData::default();
        inner.errors.clear();
        inner.touched.clear();
        inner.submitting = false;
    }

    /// The field's error, only if it has been touched.
    pub fn field_error(&self, field: FieldName) -> Option<&'static str> {
        let inner = self.lock();
        if inner.touched.contains(&field) {
            inner.errors.get(&field).copied()
        } else {
            None
        }
    }

    /// A pristine form cannot be submitted even if it would validate; at
    /// least one field must have been touched.
    pub fn can_submit(&self) -> bool {
        let inner = self.lock();
        !inner.submitting && inner.errors.is_empty() && !inner.touched.is_empty()
    }

    pub fn set_submitting(&self, submitting: bool) {
        self.lock().submitting = submitting;
    }

    pub fn is_submitting(&self) -> bool {
        self.lock().submitting
    }

    pub fn is_touched(&self, field: FieldName) -> bool {
        self.lock().touched.contains(&field)
    }

    pub fn data(&self) -> ContactFormData {
        self.lock().data.clone()
    }

    /// All current errors, touched or not.
    pub fn errors(&self) -> BTreeMap<FieldName, &'static str> {
        self.lock().errors.clone()
    }

    pub fn fields(&self) -> Vec<FormField> {
        let inner = self.lock();
        FieldName::ALL
            .into_iter()
            .map(|name| {
                let touched = inner.touched.contains(&name);
                FormField {
                    name,
                    value: inner.data.get(name).to_string(),
                    error: touched.then(|| inner.errors.get(&name).copied()).flatten(),
                    touched,
                }
            })
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, FormInner> {
        lock_inner(&self.inner)
    }
}

fn lock_inner(inner: &Mutex<FormInner>) -> MutexGuard<'_, FormInner> {
    inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
