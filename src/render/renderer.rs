//! Link rendering host.
//!
//! Rewrites the wikilinks of a note body using a [`LinkLabelProvider`].
//! Labels are cached per settings snapshot, so a settings change is seen
//! on the next call.

use std::collections::HashMap;

use clap::ValueEnum;
use serde::Serialize;
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::debug;

use crate::domain::{
    ChangeNotifier, ConfigurationSource, DisplayLabelProvider, LinkLabelProvider, LinkReference,
    NoteFile, Settings, SettingsChanged,
};
use crate::infra::Vault;
use crate::render::wikilink::find_wikilinks;

/// How a note body is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum RenderMode {
    /// Links replaced by their display text
    #[default]
    Preview,
    /// Raw text, with labels written as wikilink aliases when enabled
    Source,
}

/// Result of rendering a note body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOutput {
    pub content: String,
    /// Wikilinks found, embeds excluded.
    pub links: usize,
    /// Links displayed with a provider label.
    pub labelled: usize,
    /// Links with explicit display text.
    pub aliased: usize,
    /// Links left to default rendering.
    pub deferred: usize,
}

/// One wikilink of a note with the text it displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedLink {
    /// Link text as written, without brackets and alias.
    pub link: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    pub embed: bool,
    /// Provider label, `None` when the link uses default rendering.
    pub label: Option<String>,
    /// Text the link displays in preview.
    pub display: String,
}

/// Renders note bodies against a vault.
pub struct LinkRenderer<'v, P, C> {
    vault: &'v Vault,
    provider: P,
    config: C,
    changes: Option<broadcast::Receiver<SettingsChanged>>,
    /// Settings the cached labels were computed under.
    snapshot: Option<Settings>,
    /// Labels keyed by (source path, link text).
    cache: HashMap<(String, String), Option<String>>,
}

impl<'v, C: ConfigurationSource + Clone> LinkRenderer<'v, DisplayLabelProvider<C>, C> {
    /// Creates a renderer using the default label provider over `config`.
    pub fn new(vault: &'v Vault, config: C) -> Self {
        Self::with_provider(vault, DisplayLabelProvider::new(config.clone()), config)
    }
}

impl<'v, P: LinkLabelProvider, C: ConfigurationSource> LinkRenderer<'v, P, C> {
    /// Creates a renderer with a custom provider.
    pub fn with_provider(vault: &'v Vault, provider: P, config: C) -> Self {
        Self {
            vault,
            provider,
            config,
            changes: None,
            snapshot: None,
            cache: HashMap::new(),
        }
    }

    /// Subscribes to settings changes; any change clears cached labels.
    ///
    /// Changes to `config` are picked up without this. Watching covers a
    /// provider that reads its settings from somewhere else.
    pub fn watch(mut self, notifier: &impl ChangeNotifier) -> Self {
        self.changes = Some(notifier.subscribe());
        self
    }

    /// Number of cached labels.
    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    /// Drops cached labels if the settings changed since the last call.
    fn refresh(&mut self) {
        let mut events = 0u64;
        if let Some(changes) = self.changes.as_mut() {
            loop {
                match changes.try_recv() {
                    Ok(_) => events += 1,
                    Err(TryRecvError::Lagged(missed)) => events += missed,
                    Err(TryRecvError::Empty | TryRecvError::Closed) => break,
                }
            }
        }

        let current = self.config.settings();
        if events == 0 && self.snapshot.as_ref() == Some(&current) {
            return;
        }
        if !self.cache.is_empty() {
            debug!(events, cached = self.cache.len(), "settings changed; clearing label cache");
            self.cache.clear();
        }
        self.snapshot = Some(current);
    }

    /// Label for `link` written inside `source`, or `None` for default rendering.
    pub fn label(&mut self, source: &NoteFile, link: &LinkReference) -> Option<String> {
        self.refresh();

        let key = (source.path().to_string(), link.to_string());
        if let Some(cached) = self.cache.get(&key) {
            return cached.clone();
        }

        let resolved = self.vault.resolve(link.clone(), source.path());
        let label = self.provider.provide(&resolved.context(source.path()));
        self.cache.insert(key, label.clone());
        label
    }

    /// Lists the wikilinks of `body` with their labels.
    pub fn links(&mut self, source: &NoteFile, body: &str) -> Vec<RenderedLink> {
        find_wikilinks(body)
            .into_iter()
            .map(|wikilink| {
                let parsed = LinkReference::parse(wikilink.target).ok();
                let label = match (&parsed, wikilink.alias, wikilink.embed) {
                    (Some(link), None, false) => self.label(source, link),
                    _ => None,
                };
                let display = match (wikilink.alias, &label, &parsed) {
                    (Some(alias), _, _) => alias.to_string(),
                    (None, Some(label), _) => label.clone(),
                    (None, None, Some(link)) => link.default_display(),
                    (None, None, None) => wikilink.target.to_string(),
                };
                RenderedLink {
                    link: wikilink.target.to_string(),
                    alias: wikilink.alias.map(str::to_string),
                    embed: wikilink.embed,
                    label,
                    display,
                }
            })
            .collect()
    }

    /// Renders `body`, written inside `source`, in the given mode.
    ///
    /// - `Preview` replaces every link with its alias, label, or default
    ///   display text. Embeds are kept.
    /// - `Source` keeps the text unchanged unless source mode is enabled in
    ///   the settings; then unaliased links gain their label as alias.
    pub fn render(&mut self, source: &NoteFile, body: &str, mode: RenderMode) -> RenderOutput {
        let source_mode_enabled = self.config.settings().enable_in_source_mode;
        let rewrite = mode == RenderMode::Preview || source_mode_enabled;

        let mut output = RenderOutput {
            content: String::with_capacity(body.len()),
            links: 0,
            labelled: 0,
            aliased: 0,
            deferred: 0,
        };
        let mut last = 0;

        for wikilink in find_wikilinks(body) {
            let raw = &body[wikilink.range.clone()];
            output.content.push_str(&body[last..wikilink.range.start]);
            last = wikilink.range.end;

            if wikilink.embed {
                output.content.push_str(raw);
                continue;
            }
            output.links += 1;

            if let Some(alias) = wikilink.alias {
                output.aliased += 1;
                match mode {
                    RenderMode::Preview => output.content.push_str(alias),
                    RenderMode::Source => output.content.push_str(raw),
                }
                continue;
            }

            let parsed = LinkReference::parse(wikilink.target).ok();
            let label = match (&parsed, rewrite) {
                (Some(link), true) => self.label(source, link),
                _ => None,
            };

            match (mode, label) {
                (RenderMode::Preview, Some(label)) => {
                    output.labelled += 1;
                    output.content.push_str(&label);
                }
                (RenderMode::Preview, None) => {
                    output.deferred += 1;
                    let display = parsed
                        .map(|link| link.default_display())
                        .unwrap_or_else(|| wikilink.target.to_string());
                    output.content.push_str(&display);
                }
                (RenderMode::Source, Some(label)) if is_valid_alias(&label) => {
                    output.labelled += 1;
                    output.content.push_str(&format!("[[{}|{}]]", wikilink.target, label));
                }
                (RenderMode::Source, _) => {
                    output.deferred += 1;
                    output.content.push_str(raw);
                }
            }
        }
        output.content.push_str(&body[last..]);

        debug!(
            source = source.path(),
            ?mode,
            links = output.links,
            labelled = output.labelled,
            "rendered note"
        );
        output
    }
}

/// Whether `label` can be written as a wikilink alias without breaking the link.
fn is_valid_alias(label: &str) -> bool {
    !label.is_empty() && !label.contains("]]") && !label.contains('|') && !label.contains('\n')
}
