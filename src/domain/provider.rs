//! Provider capability and the configuration seams it depends on.

use tokio::sync::broadcast;

use crate::domain::label::{LinkContext, resolve_label};
use crate::domain::Settings;

/// Supplies custom display text for rendered links.
///
/// Returning `None` defers to the default rendering of the link.
pub trait LinkLabelProvider {
    fn provide(&self, ctx: &LinkContext<'_>) -> Option<String>;
}

/// Read access to the current settings.
///
/// Implementations must return the value current at call time.
pub trait ConfigurationSource {
    fn settings(&self) -> Settings;
}

impl ConfigurationSource for Settings {
    fn settings(&self) -> Settings {
        self.clone()
    }
}

impl<C: ConfigurationSource + ?Sized> ConfigurationSource for &C {
    fn settings(&self) -> Settings {
        (**self).settings()
    }
}

impl<C: ConfigurationSource + ?Sized> ConfigurationSource for std::sync::Arc<C> {
    fn settings(&self) -> Settings {
        (**self).settings()
    }
}

/// Event sent to subscribers after the settings changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsChanged {
    pub settings: Settings,
}

/// Lets rendering hosts learn about settings changes so they can re-render.
///
/// Receivers are polled with `try_recv`; no async runtime is needed.
pub trait ChangeNotifier {
    fn subscribe(&self) -> broadcast::Receiver<SettingsChanged>;
}

/// The label provider backed by [`resolve_label`].
#[derive(Debug, Clone)]
pub struct DisplayLabelProvider<C> {
    config: C,
}

impl<C: ConfigurationSource> DisplayLabelProvider<C> {
    pub fn new(config: C) -> Self {
        Self { config }
    }
}

impl<C: ConfigurationSource> LinkLabelProvider for DisplayLabelProvider<C> {
    fn provide(&self, ctx: &LinkContext<'_>) -> Option<String> {
        resolve_label(&self.config.settings(), ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Anchor, LinkReference, NoteFile, NoteMetadata, ResolvedTarget};
    use std::cell::RefCell;

    /// Configuration whose value can change between calls.
    struct MutableConfig(RefCell<Settings>);

    impl ConfigurationSource for MutableConfig {
        fn settings(&self) -> Settings {
            self.0.borrow().clone()
        }
    }

    #[test]
    fn provider_reads_settings_at_call_time() {
        let config = MutableConfig(RefCell::new(Settings::default()));
        let provider = DisplayLabelProvider::new(&config);

        let note = NoteFile::new("Target.md");
        let meta = NoteMetadata::new()
            .with_property("link-display", "Display")
            .with_property("title", "Title");
        let link = LinkReference::new("Target", "");
        let ctx = LinkContext {
            link: &link,
            target: Some(ResolvedTarget::new(&note, Some(&meta))),
            anchor: &Anchor::None,
            source_path: "Source.md",
        };

        assert_eq!(provider.provide(&ctx).as_deref(), Some("Display"));

        config.0.borrow_mut().key = "title".to_string();
        assert_eq!(provider.provide(&ctx).as_deref(), Some("Title"));
    }

    #[test]
    fn plain_settings_act_as_configuration() {
        let provider = DisplayLabelProvider::new(Settings::default());
        let link = LinkReference::new("Missing", "");
        let ctx = LinkContext {
            link: &link,
            target: None,
            anchor: &Anchor::None,
            source_path: "Source.md",
        };
        assert_eq!(provider.provide(&ctx), None);
    }
}
