//! Pixpost
//!
//! A small pipeline that pixelates a locally selected image and publishes the
//! rendered snapshot: select a file, render it as a pixel mosaic at a fixed
//! display size, flatten the mosaic to a PNG snapshot, upload the snapshot
//! (as a `data:` URL) to a JSON endpoint, and optionally derive a blurred
//! delivery URL from the published link.
//!
//! The pipeline is strictly sequential and trigger-driven; the only network
//! call is the upload itself.
//!
//! # Example
//!
//! ```no_run
//! use pixpost::{CloudConfig, MosaicConfig, PublishConfig, Session, Transformations};
//!
//! # fn main() -> pixpost::Result<()> {
//! let mut session = Session::new(
//!     MosaicConfig::default(),
//!     PublishConfig { endpoint: "https://example.com/api/upload".into(), ..Default::default() },
//!     CloudConfig::default(),
//! )?;
//!
//! session.select_path("cat.png")?;
//! let link = session.publish()?;
//! println!("published: {}", link.url);
//!
//! let blurred = session.derived_link(&Transformations {
//!     effect: Some("blur:10".into()),
//!     quality: Some(1),
//! });
//! # Ok(())
//! # }
//! ```

pub mod error;
pub use error::{Error, Result};

// Selection handles and their lifetimes
pub mod select;
pub use select::{FileSelector, SelectedImage};

// Pixel-mosaic rendering
pub mod mosaic;
pub use mosaic::{render, Mosaic, MosaicConfig};

// Snapshot rasterization and data-URL serialization
pub mod snapshot;
pub use snapshot::{rasterize, Snapshot};

// Upload endpoint client
pub mod publish;
pub use publish::{PublishConfig, PublishedLink, Publisher};

// Derived transformation URLs
pub mod transform;
pub use transform::{build_url, derive_transformed_link, CloudConfig, DerivedLink, Transformations};

// Session state machine tying the pipeline together
pub mod session;
pub use session::{PublishState, Session};
