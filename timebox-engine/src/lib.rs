//! Timebox Engine
//!
//! Interactive timebox queries over a multi-series time chart. Users draw
//! rectangular regions on the chart; a series stays highlighted only while
//! its values satisfy every committed region.
//!
//! - [`timebox`] - Timebox identity, bounds and lifecycle
//! - [`mapper`] - Pixel ↔ domain coordinate mapping
//! - [`registry`] - Ordered timebox collection and hit testing
//! - [`selection`] - The focused timebox
//! - [`filter`] - Series matching against committed timeboxes
//! - [`dispatcher`] - Pointer and keyboard gesture handling
//! - [`hover`] - Nearest point lookup
//! - [`session`] - One chart session tying the above together
//! - [`snapshot`] - JSON export and restore of committed timeboxes

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod filter;
pub mod hover;
pub mod mapper;
pub mod registry;
pub mod selection;
pub mod session;
pub mod snapshot;
pub mod timebox;

pub use config::{ChartConfig, EngineConfig, InteractionConfig, Margin};
pub use dispatcher::{DispatchOutcome, Dispatcher, GestureKind, Input, Key, PointerEvent};
pub use error::{EngineError, InvalidReason, Result};
pub use filter::{FilterResult, SeriesStyle};
pub use hover::HoverHit;
pub use mapper::{CoordinateMapper, PixelPoint, PixelRect};
pub use registry::{BrushRegistry, CommitOutcome, Handle, Surface};
pub use selection::{SelectionChange, SelectionState};
pub use session::{ChartSession, TimeboxView};
pub use snapshot::{SessionSnapshot, TimeboxRecord};
pub use timebox::{DomainBounds, Timebox, TimeboxId, TimeboxState};
