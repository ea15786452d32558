//! One-shot notice carried across a navigation.
//!
//! SYSTEM CONTEXT
//! ==============
//! Sign-in failures land on the login screen with a message. The message is
//! handed over here instead of in the URL and is shown once.

#[cfg(test)]
#[path = "flash_test.rs"]
mod flash_test;

use leptos::prelude::*;
use okr_portal::routes::AppRoute;

#[derive(Clone, Copy, Debug)]
pub struct Flash(RwSignal<Option<String>>);

impl Default for Flash {
    fn default() -> Self {
        Self(RwSignal::new(None))
    }
}

impl Flash {
    /// Remember the notice a route carries, if any.
    pub fn carry(&self, route: &AppRoute) {
        if let Some(notice) = route.notice() {
            self.0.set(Some(notice.to_owned()));
        }
    }

    /// Take the pending notice, leaving none behind.
    pub fn take(&self) -> Option<String> {
        let mut taken = None;
        self.0.update(|pending| taken = pending.take());
        taken
    }
}

/// The app-wide flash, or a detached one when rendered outside [`crate::app::App`].
pub fn use_flash() -> Flash {
    use_context::<Flash>().unwrap_or_default()
}
