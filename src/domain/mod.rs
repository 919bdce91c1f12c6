//! Core types: LinkReference, Anchor, NoteFile, NoteMetadata, Settings, and the label resolver

mod anchor;
mod label;
mod metadata;
mod provider;
mod settings;

pub use anchor::{Anchor, LinkReference, ParseLinkError};
pub use label::{LinkContext, ResolvedTarget, resolve_label};
pub use metadata::{
    FrontmatterValue, HeadingInfo, ListItemInfo, NoteFile, NoteMetadata, SectionInfo, SectionKind,
};
pub use provider::{
    ChangeNotifier, ConfigurationSource, DisplayLabelProvider, LinkLabelProvider, SettingsChanged,
};
pub use settings::{DEFAULT_PROPERTY_KEY, Settings};
