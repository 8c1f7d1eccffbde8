//! Session state for the select → render → publish pipeline.
//!
//! A [`Session`] plays the role of the page state: the active selection, the
//! mosaic configuration, and the outcome of the last publish. Publishing is
//! modeled as an explicit state machine so that at most one publish is in
//! flight, its outcome lands deterministically, and a derived link can only
//! ever be computed from a publish that actually succeeded.

use log::{debug, error};

use crate::mosaic::{self, Mosaic, MosaicConfig};
use crate::publish::{PublishConfig, PublishedLink, Publisher};
use crate::select::{FileSelector, SelectedImage};
use crate::snapshot;
use crate::transform::{derive_transformed_link, CloudConfig, DerivedLink, Transformations};
use crate::{Error, Result};

/// Lifecycle of the current publish
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishState {
    /// Nothing published since the last selection
    Idle,
    /// A publish request is in flight
    Pending,
    /// The last publish completed and returned this link
    Succeeded(PublishedLink),
    /// The last publish failed with this message
    Failed(String),
}

impl PublishState {
    /// Whether the publish trigger is currently allowed
    pub fn can_trigger(&self) -> bool {
        !matches!(self, PublishState::Pending)
    }
}

/// Owns the pipeline state for one user session
pub struct Session {
    selector: FileSelector,
    mosaic_config: MosaicConfig,
    cloud: CloudConfig,
    publisher: Publisher,
    publish_state: PublishState,
}

impl Session {
    pub fn new(
        mosaic_config: MosaicConfig,
        publish_config: PublishConfig,
        cloud: CloudConfig,
    ) -> Result<Self> {
        Ok(Self {
            selector: FileSelector::new(),
            mosaic_config,
            cloud,
            publisher: Publisher::new(publish_config)?,
            publish_state: PublishState::Idle,
        })
    }

    /// Stage raw bytes as the active selection.
    ///
    /// Any previous publish outcome refers to a superseded source, so the
    /// publish state resets to `Idle`.
    pub fn select_file(&mut self, bytes: impl Into<Vec<u8>>) -> SelectedImage {
        let image = self.selector.select(bytes);
        self.publish_state = PublishState::Idle;
        image
    }

    /// Read and stage a file from disk
    pub fn select_path(&mut self, path: impl AsRef<std::path::Path>) -> Result<SelectedImage> {
        let image = self.selector.select_path(path)?;
        self.publish_state = PublishState::Idle;
        Ok(image)
    }

    pub fn mosaic_config(&self) -> &MosaicConfig {
        &self.mosaic_config
    }

    pub fn publish_state(&self) -> &PublishState {
        &self.publish_state
    }

    /// Render the active selection as a mosaic; `None` until a file is selected
    pub fn render(&self) -> Option<Mosaic> {
        let image = self.selector.current()?;
        Some(mosaic::render(image, &self.mosaic_config))
    }

    /// Rasterize the current render and upload it.
    ///
    /// Refused with [`Error::PublishInFlight`] while a publish is pending and
    /// with [`Error::Selection`] when nothing is selected. On failure the
    /// state moves to `Failed`, one diagnostic entry is logged, and the error
    /// is returned to the caller.
    pub fn publish(&mut self) -> Result<&PublishedLink> {
        if !self.publish_state.can_trigger() {
            return Err(Error::PublishInFlight);
        }
        let mosaic = self
            .render()
            .ok_or_else(|| Error::Selection("no file selected".to_string()))?;

        self.publish_state = PublishState::Pending;
        let outcome = snapshot::rasterize(&mosaic)
            .and_then(|snap| self.publisher.publish(&snap));

        match outcome {
            Ok(link) => {
                debug!("publish succeeded: {}", link.url);
                self.publish_state = PublishState::Succeeded(link);
                match &self.publish_state {
                    PublishState::Succeeded(link) => Ok(link),
                    _ => unreachable!(),
                }
            }
            Err(e) => {
                error!("publish failed: {}", e);
                self.publish_state = PublishState::Failed(e.to_string());
                Err(e)
            }
        }
    }

    /// The published link of the last successful publish, if any
    pub fn published_link(&self) -> Option<&PublishedLink> {
        match &self.publish_state {
            PublishState::Succeeded(link) => Some(link),
            _ => None,
        }
    }

    /// Derive a transformed link from the published one.
    ///
    /// Only available once a publish has succeeded; a derived artifact can
    /// never reference an unset source.
    pub fn derived_link(&self, transformations: &Transformations) -> Option<DerivedLink> {
        let link = self.published_link()?;
        Some(derive_transformed_link(link, &self.cloud, transformations))
    }
}
