//! Global diagnostic context: one process-wide string (`%g`), typically the
//! application or host name.

use std::sync::RwLock;

static GDC: RwLock<String> = RwLock::new(String::new());

pub fn set(value: impl Into<String>) {
    let value = value.into();
    match GDC.write() {
        Ok(mut guard) => *guard = value,
        Err(poisoned) => *poisoned.into_inner() = value,
    }
}

pub fn get() -> String {
    match GDC.read() {
        Ok(guard) => guard.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

pub fn clear() {
    set(String::new());
}
